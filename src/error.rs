use crate::format::FourCc;

/// Errors raised while negotiating formats or producing samples.
///
/// None of these cross the decoder callback boundary: handlers log them and
/// return a benign value instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sample buffer too small: need {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("invalid sample geometry {width}x{height} with stride {stride}")]
    Geometry { width: u32, height: u32, stride: u32 },
    #[error("audio sample rate has not been negotiated")]
    SampleRate,
    #[error("decoder did not report a display size")]
    NoDisplaySize,
    #[error("display size {0}x{1} is empty")]
    EmptyDisplaySize(u32, u32),
    #[error("chroma {0} has no usable planes")]
    Chroma(FourCc),
    #[error("invalid framerate: {0}")]
    Framerate(f64),
    #[error("sample pool exhausted ({0} outstanding)")]
    PoolExhausted(usize),
}
