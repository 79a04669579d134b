//! Deterministic sender colors.
//!
//! A name is folded into an `i32` with wrapping arithmetic over its UTF-16
//! code units (`hash = unit + (hash << 5) - hash`). The hue is that hash
//! modulo 360, normalized into `[0, 360)`; saturation and lightness are fixed.

use std::fmt;

pub const SATURATION: u8 = 70;
pub const LIGHTNESS: u8 = 40;

/// An HSL color with saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    /// Convert to 8-bit sRGB components.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let h = f64::from(self.hue % 360) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Hash a display name the way sender colors are keyed.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add((hash << 5).wrapping_sub(hash))
    })
}

/// Color for a display name. Same name, same color; collisions are possible.
pub fn color_of(name: &str) -> Hsl {
    Hsl {
        hue: name_hash(name).rem_euclid(360) as u16,
        saturation: SATURATION,
        lightness: LIGHTNESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alice_hash_is_a_multiple_of_360() {
        // a=97 l=108 i=105 c=99 e=101, hash = c + 31 * hash
        // 97 -> 3115 -> 96670 -> 2996869 -> 92903040 = 360 * 258064
        assert_eq!(name_hash("alice"), 92_903_040);
        assert_eq!(color_of("alice").hue, 0);
    }

    #[test]
    fn bob_hue() {
        // b=98 o=111: 98 -> 3149 -> 97717 = 360 * 271 + 157
        assert_eq!(name_hash("bob"), 97_717);
        assert_eq!(color_of("bob").hue, 157);
    }

    #[test]
    fn negative_hash_is_normalized() {
        assert_eq!(name_hash("operator-on-call"), -1_239_447_197);
        assert_eq!(name_hash("operator-on-call") % 360, -317);
        assert_eq!(color_of("operator-on-call").hue, 43);
    }

    #[test]
    fn empty_name_hashes_to_zero() {
        assert_eq!(color_of("").hue, 0);
    }

    #[test]
    fn fixed_saturation_and_lightness() {
        let c = color_of("bob");
        assert_eq!(c.saturation, 70);
        assert_eq!(c.lightness, 40);
        assert_eq!(c.to_string(), "hsl(157, 70%, 40%)");
    }

    #[test]
    fn hashes_utf16_code_units() {
        // U+1F980 is a surrogate pair 0xD83E 0xDD80
        let expected = 0xDD80 + 31 * 0xD83E;
        assert_eq!(name_hash("\u{1F980}"), expected);
    }

    #[test]
    fn to_rgb_red_sector() {
        assert_eq!(color_of("alice").to_rgb(), (173, 31, 31));
    }

    #[test]
    fn to_rgb_green_sector() {
        assert_eq!(color_of("bob").to_rgb(), (31, 173, 119));
    }
}
