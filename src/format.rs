//! Sample formats understood by the renderer and the four-character codes the
//! decoder uses to name them.

use std::fmt;
use std::time::Duration;

/// Maximum number of audio channels accepted from the decoder.
pub const MAX_AUDIO_CHANNELS: u32 = 8;

/// A four-character code as exchanged with the decoder, e.g. `S16N` or `YUY2`.
///
/// Audio tags are space padded (`"S8  "`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const S8: FourCc = FourCc(*b"S8  ");
    pub const U8: FourCc = FourCc(*b"U8  ");
    pub const S16N: FourCc = FourCc(*b"S16N");
    pub const S32N: FourCc = FourCc(*b"S32N");
    pub const FL32: FourCc = FourCc(*b"FL32");
    pub const FL64: FourCc = FourCc(*b"FL64");

    pub const AYUV: FourCc = FourCc(*b"AYUV");
    pub const RV32: FourCc = FourCc(*b"RV32");
    pub const UYVY: FourCc = FourCc(*b"UYVY");
    pub const Y422: FourCc = FourCc(*b"Y422");
    pub const UYNV: FourCc = FourCc(*b"UYNV");
    pub const HDYC: FourCc = FourCc(*b"HDYC");
    pub const YUY2: FourCc = FourCc(*b"YUY2");
    pub const V422: FourCc = FourCc(*b"V422");
    pub const YUYV: FourCc = FourCc(*b"YUYV");
    pub const YVYU: FourCc = FourCc(*b"YVYU");

    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }

    /// Case-insensitive comparison, used for chroma tags.
    pub fn matches(&self, other: FourCc) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(code: [u8; 4]) -> Self {
        Self(code)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}

/// PCM sample formats the renderer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioSampleFormat {
    Int8,
    #[default]
    Int16,
    Int32,
    Float,
    Double,
}

impl AudioSampleFormat {
    /// Exact (case-sensitive) lookup of a decoder audio tag.
    pub fn from_fourcc(tag: FourCc) -> Option<Self> {
        match tag {
            FourCc::S8 => Some(Self::Int8),
            FourCc::S16N => Some(Self::Int16),
            FourCc::S32N => Some(Self::Int32),
            FourCc::FL32 => Some(Self::Float),
            FourCc::FL64 => Some(Self::Double),
            _ => None,
        }
    }

    pub fn fourcc(self) -> FourCc {
        match self {
            Self::Int8 => FourCc::S8,
            Self::Int16 => FourCc::S16N,
            Self::Int32 => FourCc::S32N,
            Self::Float => FourCc::FL32,
            Self::Double => FourCc::FL64,
        }
    }

    pub fn bytes_per_sample(self) -> u32 {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float => 4,
            Self::Double => 8,
        }
    }
}

/// Pixel layouts the renderer can upload without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoSampleFormat {
    /// Packed 4:4:4:4 AYUV.
    #[default]
    CharAyuv,
    /// Packed 32-bit BGRA.
    CharBgra,
    /// Packed 4:2:2, UYVY byte order.
    CharUyvy,
    /// Packed 4:2:2, YUYV byte order.
    CharYuy2,
    /// Packed 4:2:2, YVYU byte order.
    CharYvyu,
}

impl VideoSampleFormat {
    /// Case-insensitive lookup of a natively supported chroma.
    pub fn from_chroma(chroma: FourCc) -> Option<Self> {
        const TABLE: [(FourCc, VideoSampleFormat); 10] = [
            (FourCc::AYUV, VideoSampleFormat::CharAyuv),
            (FourCc::RV32, VideoSampleFormat::CharBgra),
            (FourCc::UYVY, VideoSampleFormat::CharUyvy),
            (FourCc::Y422, VideoSampleFormat::CharUyvy),
            (FourCc::UYNV, VideoSampleFormat::CharUyvy),
            (FourCc::HDYC, VideoSampleFormat::CharUyvy),
            (FourCc::YUY2, VideoSampleFormat::CharYuy2),
            (FourCc::V422, VideoSampleFormat::CharYuy2),
            (FourCc::YUYV, VideoSampleFormat::CharYuy2),
            (FourCc::YVYU, VideoSampleFormat::CharYvyu),
        ];

        TABLE
            .iter()
            .find(|(tag, _)| tag.matches(chroma))
            .map(|&(_, format)| format)
    }

    /// Bytes per pixel of a row, so that `stride = width * bytes_per_pixel`.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::CharAyuv | Self::CharBgra => 4,
            Self::CharUyvy | Self::CharYuy2 | Self::CharYvyu => 2,
        }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const ZERO: Dimensions = Dimensions {
        width: 0,
        height: 0,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Audio format accepted during negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioFormatState {
    pub channels: u32,
    pub sample_rate: u32,
    pub format: AudioSampleFormat,
}

impl AudioFormatState {
    /// Always the size matching `format`.
    pub fn bytes_per_sample(&self) -> u32 {
        self.format.bytes_per_sample()
    }
}

/// Video geometry accepted during negotiation.
///
/// `buffer` may be larger than `output` (alignment padding) or reinterpreted
/// (packed 4:2:2 stored as half-width 32-bit texels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoFormatState {
    pub buffer: Dimensions,
    pub output: Dimensions,
    pub format: VideoSampleFormat,
    pub stride: u32,
    pub frame_duration: Duration,
}

impl VideoFormatState {
    /// Size in bytes of one frame buffer.
    pub fn buffer_len(&self) -> usize {
        self.stride as usize * self.buffer.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_display_keeps_padding() {
        assert_eq!(FourCc::S8.to_string(), "S8  ");
        assert_eq!(FourCc::new([b'Y', 0, b'2', 0xff]).to_string(), "Y\\x002\\xff");
    }

    #[test]
    fn audio_tags_are_case_sensitive() {
        assert_eq!(AudioSampleFormat::from_fourcc(FourCc::FL32), Some(AudioSampleFormat::Float));
        assert_eq!(AudioSampleFormat::from_fourcc(FourCc(*b"fl32")), None);
        assert_eq!(AudioSampleFormat::from_fourcc(FourCc::U8), None);
    }

    #[test]
    fn chroma_tags_are_case_insensitive() {
        assert_eq!(
            VideoSampleFormat::from_chroma(FourCc(*b"yuy2")),
            Some(VideoSampleFormat::CharYuy2)
        );
        assert_eq!(
            VideoSampleFormat::from_chroma(FourCc(*b"hdyc")),
            Some(VideoSampleFormat::CharUyvy)
        );
        assert_eq!(VideoSampleFormat::from_chroma(FourCc(*b"I420")), None);
    }

    #[test]
    fn format_sizes_match_tags() {
        for format in [
            AudioSampleFormat::Int8,
            AudioSampleFormat::Int16,
            AudioSampleFormat::Int32,
            AudioSampleFormat::Float,
            AudioSampleFormat::Double,
        ] {
            assert_eq!(AudioSampleFormat::from_fourcc(format.fourcc()), Some(format));
        }
        assert_eq!(AudioSampleFormat::Double.bytes_per_sample(), 8);
        assert_eq!(VideoSampleFormat::CharYvyu.bytes_per_pixel(), 2);
    }
}
