//! Format negotiation with the decoder.
//!
//! Both negotiations may rewrite the decoder's proposal in place, which is
//! how the decoder learns that it has to convert to a format the renderer
//! understands.

use std::time::Duration;

use crate::Error;
use crate::format::{
    AudioFormatState, AudioSampleFormat, Dimensions, FourCc, MAX_AUDIO_CHANNELS,
    VideoFormatState, VideoSampleFormat,
};
use crate::planes::MAX_PLANES;
use crate::session::{DecoderSession, PRIMARY_VIDEO_TRACK};

/// Planar chromas are repacked into buffers aligned to this many pixels.
const PLANAR_ALIGNMENT: u32 = 16;

/// Accepts the decoder's audio proposal, substituting a supported format.
///
/// Never fails: unsigned 8-bit becomes signed 8-bit, anything unknown
/// becomes 16-bit signed, and `format` is rewritten to match.
pub fn negotiate_audio(format: &mut FourCc, rate: &mut u32, channels: &mut u32) -> AudioFormatState {
    *channels = (*channels).min(MAX_AUDIO_CHANNELS);

    let sample_format = match AudioSampleFormat::from_fourcc(*format) {
        Some(sample_format) => sample_format,
        None if *format == FourCc::U8 => AudioSampleFormat::Int8,
        None => AudioSampleFormat::Int16,
    };
    *format = sample_format.fourcc();

    AudioFormatState {
        channels: *channels,
        sample_rate: *rate,
        format: sample_format,
    }
}

fn geometry_error(width: u32, height: u32) -> Error {
    Error::Geometry {
        width,
        height,
        stride: u32::MAX,
    }
}

fn row_pitch(dim: Dimensions, bytes_per_pixel: u32) -> Result<u32, Error> {
    dim.width
        .checked_mul(bytes_per_pixel)
        .ok_or_else(|| geometry_error(dim.width, dim.height))
}

/// Per-plane buffer layout the decoder must allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneLayout {
    pub pitches: [u32; MAX_PLANES],
    pub lines: [u32; MAX_PLANES],
}

/// Picks a renderer-native pixel layout for the decoder's video proposal.
///
/// Unknown chromas are renegotiated: planar ones to aligned packed 4:2:2,
/// single-plane ones to 32-bit BGRA at display size. `chroma` and `height`
/// are rewritten where the decoder has to change its output.
pub fn negotiate_video(
    session: &dyn DecoderSession,
    chroma: &mut FourCc,
    width: &mut u32,
    height: &mut u32,
    layout: &mut PlaneLayout,
) -> Result<VideoFormatState, Error> {
    let (output_width, output_height) = session
        .video_size(PRIMARY_VIDEO_TRACK)
        .ok_or(Error::NoDisplaySize)?;
    let output = Dimensions::new(output_width, output_height);
    if output.is_empty() {
        return Err(Error::EmptyDisplaySize(output_width, output_height));
    }

    let (buffer, format, stride) = match VideoSampleFormat::from_chroma(*chroma) {
        Some(format) => {
            let buffer = Dimensions::new(*width, *height);
            (buffer, format, row_pitch(buffer, format.bytes_per_pixel())?)
        }
        None => {
            let planes = session.chroma_plane_count(*chroma).unwrap_or(0);
            match planes {
                0 => return Err(Error::Chroma(*chroma)),
                1 => {
                    log::debug!("renegotiating chroma {chroma} to {}", FourCc::RV32);
                    *chroma = FourCc::RV32;
                    (output, VideoSampleFormat::CharBgra, row_pitch(output, 4)?)
                }
                _ => {
                    log::debug!("renegotiating planar chroma {chroma} to {}", FourCc::YUY2);
                    *chroma = FourCc::YUY2;
                    // packed 4:2:2 is carried as half-width 32-bit texels
                    let aligned = |n: u32| n.checked_next_multiple_of(PLANAR_ALIGNMENT);
                    let (Some(aligned_width), Some(aligned_height)) =
                        (aligned(output.width), aligned(output.height))
                    else {
                        return Err(geometry_error(output.width, output.height));
                    };
                    let buffer = Dimensions::new(aligned_width / 2, aligned_height);
                    *height = buffer.height;
                    (buffer, VideoSampleFormat::CharYuy2, row_pitch(buffer, 4)?)
                }
            }
        }
    };

    let fps = session.fps();
    if !fps.is_finite() || fps <= 0.0 {
        return Err(Error::Framerate(f64::from(fps)));
    }
    // tiny rates overflow a Duration
    let frame_duration = Duration::try_from_secs_f64(1.0 / f64::from(fps))
        .map_err(|_| Error::Framerate(f64::from(fps)))?;

    layout.pitches[0] = stride;
    layout.lines[0] = buffer.height;

    Ok(VideoFormatState {
        buffer,
        output,
        format,
        stride,
        frame_duration,
    })
}
