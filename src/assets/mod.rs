//! Asset IO boundary: image decoding into premultiplied RGBA8 and frame
//! encoding for export.

pub mod decode;
