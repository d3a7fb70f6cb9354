const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Seeded FNV-1a over an arbitrary byte slice.
pub(crate) fn fnv1a64(seed: u64, bytes: &[u8]) -> u64 {
    let mut h = seed ^ FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Deterministic per-pixel hash used as the noise source.
pub(crate) fn hash_pixel(seed: u64, x: u32, y: u32) -> u32 {
    let mut buf = [0u8; 8];
    buf[..4].copy_from_slice(&x.to_le_bytes());
    buf[4..].copy_from_slice(&y.to_le_bytes());
    (fnv1a64(seed, &buf) & 0xFFFF_FFFF) as u32
}

/// Multiply two byte-scaled values, rounding, staying in `0..=255`.
pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
