/// A rectangle to copy from a frame buffer into a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateRegion {
    pub dest_x: u32,
    pub dest_y: u32,
    pub src_x: u32,
    pub src_y: u32,
    pub width: u32,
    pub height: u32,
}

impl UpdateRegion {
    /// The whole `width` x `height` frame, copied to the texture origin.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// A texture the consumer lets the bridge update directly from the decoder
/// thread.
///
/// `data` is only borrowed for the duration of the call; the frame buffer is
/// queued and later recycled, so implementations must copy what they need
/// before returning.
pub trait RenderTarget: Send + Sync {
    fn update_region(&self, region: &UpdateRegion, src_pitch: u32, src_bpp: u32, data: &[u8]);
}
