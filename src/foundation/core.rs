use crate::foundation::error::{UnderlayError, UnderlayResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Return `true` when either dimension is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale both dimensions by `zoom`, rounding to whole pixels.
    pub fn scaled(self, zoom: f64) -> Canvas {
        Canvas {
            width: (f64::from(self.width) * zoom).round().max(0.0) as u32,
            height: (f64::from(self.height) * zoom).round().max(0.0) as u32,
        }
    }

    /// Convert to the `u16` dimensions required by CPU raster surfaces.
    pub fn surface_dims(self) -> UnderlayResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| UnderlayError::render("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| UnderlayError::render("surface height exceeds u16"))?;
        Ok((w, h))
    }
}

/// Straight-alpha RGBA8 color (r,g,b not premultiplied by a).
///
/// The model stores straight alpha; conversion to premultiplied form happens
/// at the raster boundary only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiply into a raw `[r,g,b,a]` byte quad.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    /// Return `true` when the color contributes nothing when painted.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}
