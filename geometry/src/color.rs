use serde::{Deserialize, Serialize};

/// A 32 bit color packed as `0xAARRGGBB`.
///
/// Channel arithmetic on packed colors happens on the four unsigned 8 bit channels independently.
/// Results are masked back into 8 bits, so values outside of `0..=255` wrap around instead of
/// saturating.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    derive_more::From,
    derive_more::Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PackedColor(u32);

impl PackedColor {
    pub const TRANSPARENT: Self = Self(0);
    pub const WHITE: Self = Self(0xffff_ffff);
    pub const BLACK: Self = Self(0xff00_0000);

    pub const fn new(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self::from_channels([alpha, red, green, blue])
    }

    pub const fn from_channels(channels: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(channels))
    }

    /// The channels in `[alpha, red, green, blue]` order.
    pub const fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        self.channels()[0]
    }

    pub const fn red(self) -> u8 {
        self.channels()[1]
    }

    pub const fn green(self) -> u8 {
        self.channels()[2]
    }

    pub const fn blue(self) -> u8 {
        self.channels()[3]
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | ((alpha as u32) << 24))
    }

    /// Combine two colors channel by channel.
    ///
    /// `f` receives the widened channel values and its result is truncated to the lowest 8 bits.
    pub fn zip_channels(self, other: Self, f: impl Fn(i64, i64) -> i64) -> Self {
        let a = self.channels();
        let b = other.channels();
        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            *channel = (f(a[i].into(), b[i].into()) & 0xff) as u8;
        }
        Self::from_channels(out)
    }
}

impl From<[u8; 4]> for PackedColor {
    fn from(channels: [u8; 4]) -> Self {
        Self::from_channels(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_argb_ordered() {
        let color = PackedColor::new(0x80ff_4020);
        assert_eq!(color.channels(), [0x80, 0xff, 0x40, 0x20]);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0xff);
        assert_eq!(color.green(), 0x40);
        assert_eq!(color.blue(), 0x20);
        assert_eq!(PackedColor::from_channels(color.channels()), color);
    }

    #[test]
    fn zip_channels_wraps_instead_of_saturating() {
        let a = PackedColor::from_argb(0xff, 0x80, 0x01, 0x00);
        let b = PackedColor::from_argb(0x02, 0x80, 0x01, 0x00);
        let sum = a.zip_channels(b, |a, b| a + b);
        assert_eq!(sum, PackedColor::from_argb(0x01, 0x00, 0x02, 0x00));

        let difference = PackedColor::TRANSPARENT.zip_channels(b, |a, b| a - b);
        assert_eq!(difference.alpha(), 0xfe);
    }

    #[test]
    fn with_alpha_keeps_color_channels() {
        let color = PackedColor::new(0x1122_3344).with_alpha(0xee);
        assert_eq!(color.argb(), 0xee22_3344);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&PackedColor::new(0xff00_00ff)).unwrap();
        assert_eq!(json, "4278190335");
    }
}
