//! Scene palette
//!
//! Authored as sRGB hex; the shader does its lighting in linear space and the
//! surface format encodes back to sRGB.

/// sRGB hex colour to linear RGBA
pub fn hex_to_linear(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0), 1.0]
}

/// sRGB transfer function, inverse
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub const SKY: u32 = 0x87ceeb;
pub const GROUND: u32 = 0x3a9d23;
pub const HOLE: u32 = 0x111111;
pub const BALL: u32 = 0xffffff;
pub const BALL_STRIPE: u32 = 0xd62828;
pub const HEMI_SKY: u32 = 0xffffff;
pub const HEMI_GROUND: u32 = 0x444444;
/// Aim indicator at zero and full power
pub const AIM_LOW: u32 = 0xffffff;
pub const AIM_HIGH: u32 = 0xff3b30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white_are_fixed_points() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let white = hex_to_linear(0xffffff);
        for c in &white[..3] {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mid_grey_darkens() {
        // sRGB 0x80 is about 0.216 linear
        let grey = hex_to_linear(0x808080);
        assert!((grey[0] - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_channel_order() {
        let sky = hex_to_linear(SKY);
        // Blue dominant, red weakest
        assert!(sky[2] > sky[1] && sky[1] > sky[0]);
        let grass = hex_to_linear(GROUND);
        assert!(grass[1] > grass[0] && grass[1] > grass[2]);
    }
}
