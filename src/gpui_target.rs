use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gpui::RenderImage;
use image::{ImageBuffer, Rgba};
use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::target::{RenderTarget, UpdateRegion};

/// Render target that turns each uploaded region into a gpui image.
///
/// gpui keeps image data in BGRA order, so packed BGRA rows are copied
/// without swizzling.
#[derive(Default)]
pub struct GpuiRenderTarget {
    image: Mutex<Option<Arc<RenderImage>>>,
    frame_ready: AtomicBool,
}

impl GpuiRenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently uploaded frame.
    pub fn current_image(&self) -> Option<Arc<RenderImage>> {
        self.image.lock().clone()
    }

    /// Returns whether a frame arrived since the last call.
    pub fn take_frame_ready(&self) -> bool {
        self.frame_ready.swap(false, Ordering::SeqCst)
    }
}

impl RenderTarget for GpuiRenderTarget {
    fn update_region(&self, region: &UpdateRegion, src_pitch: u32, src_bpp: u32, data: &[u8]) {
        if src_bpp != 4 {
            log::warn!("gpui render target only accepts 32-bit pixels, got {src_bpp} bytes");
            return;
        }
        if region.width == 0 || region.height == 0 {
            return;
        }

        let row_bytes = region.width as usize * 4;
        let mut pixels = vec![0u8; row_bytes * region.height as usize];

        for (row, dest) in pixels.chunks_exact_mut(row_bytes).enumerate() {
            let start = (region.src_y as usize + row) * src_pitch as usize
                + region.src_x as usize * 4;
            let Some(src) = data.get(start..start + row_bytes) else {
                break;
            };
            dest.copy_from_slice(src);
        }

        let Some(buffer) = ImageBuffer::<Rgba<u8>, _>::from_raw(region.width, region.height, pixels)
        else {
            return;
        };

        let frames: SmallVec<[image::Frame; 1]> =
            SmallVec::from_elem(image::Frame::new(buffer), 1);
        *self.image.lock() = Some(Arc::new(RenderImage::new(frames)));
        self.frame_ready.store(true, Ordering::SeqCst);
    }
}
