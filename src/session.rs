use crate::callbacks::{AudioFormatHandler, AudioHandler, VideoFormatHandler, VideoHandler};
use crate::format::FourCc;

/// Track index queried for the display size.
pub const PRIMARY_VIDEO_TRACK: u32 = 0;

/// A live decoder session the bridge can attach to.
///
/// Implemented by the host's decoder binding. The decoder invokes the
/// registered handlers from its own threads; passing `None` unregisters a
/// callback group.
pub trait DecoderSession: Send + Sync {
    fn set_audio_format_callbacks(&self, handler: Option<AudioFormatHandler>);

    fn set_audio_callbacks(&self, handler: Option<AudioHandler>);

    fn set_video_format_callbacks(&self, handler: Option<VideoFormatHandler>);

    fn set_video_callbacks(&self, handler: Option<VideoHandler>);

    /// Intended display size of `track`, or `None` if it is not known yet.
    fn video_size(&self, track: u32) -> Option<(u32, u32)>;

    /// Frame rate of the current media; zero or negative if unknown.
    fn fps(&self) -> f32;

    /// Microseconds from now until the decoder timestamp `pts` is due.
    fn delay(&self, pts: i64) -> i64;

    /// Number of planes the decoder uses for `chroma`, if it knows the chroma.
    fn chroma_plane_count(&self, chroma: FourCc) -> Option<u32>;
}
