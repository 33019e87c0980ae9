//! The per-frame plane pointer table exchanged with the decoder.

use std::ptr;

/// Maximum number of picture planes the decoder may ask for.
pub const MAX_PLANES: usize = 5;

const SCRATCH_ALIGN: usize = 32;

#[derive(Clone, Copy)]
#[repr(C, align(32))]
struct Block([u8; SCRATCH_ALIGN]);

/// Throwaway frame storage handed to the decoder when a frame is discarded.
///
/// The decoder needs a writable buffer even for frames nobody will see.
struct ScratchBuffer {
    blocks: Vec<Block>,
    len: usize,
}

impl ScratchBuffer {
    fn new(len: usize) -> Self {
        let count = len.max(1).div_ceil(SCRATCH_ALIGN);
        Self {
            blocks: vec![Block([0; SCRATCH_ALIGN]); count],
            len,
        }
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.blocks.as_mut_ptr().cast()
    }
}

/// Plane pointers the decoder writes a picture into between lock and unlock.
///
/// Pointers either reference the buffer of a locked video sample or the
/// table's own scratch buffer. The table owns the scratch buffer until unlock
/// releases it.
pub struct PlaneTable {
    planes: [*mut u8; MAX_PLANES],
    lens: [usize; MAX_PLANES],
    scratch: Option<ScratchBuffer>,
}

impl Default for PlaneTable {
    fn default() -> Self {
        Self {
            planes: [ptr::null_mut(); MAX_PLANES],
            lens: [0; MAX_PLANES],
            scratch: None,
        }
    }
}

impl std::fmt::Debug for PlaneTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaneTable")
            .field("planes", &self.planes)
            .field("lens", &self.lens)
            .field("scratch", &self.scratch.as_ref().map(|s| s.len))
            .finish()
    }
}

impl PlaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw pointer for plane `index`; null when unset or out of range.
    pub fn plane(&self, index: usize) -> *mut u8 {
        self.planes.get(index).copied().unwrap_or(ptr::null_mut())
    }

    /// Writable length of plane `index` in bytes.
    pub fn plane_len(&self, index: usize) -> usize {
        self.lens.get(index).copied().unwrap_or(0)
    }

    /// Whether plane 0 currently points at the scratch buffer.
    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Views plane `index` as a mutable slice, as the decoder would write it.
    ///
    /// # Safety
    ///
    /// The frame handle returned by the lock that filled this table must
    /// still be alive, and nothing else may access its buffer for the
    /// lifetime of the returned slice.
    pub unsafe fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let data = self.plane(index);
        if data.is_null() {
            return None;
        }
        // SAFETY: `data` was taken from a live buffer of `lens[index]` bytes
        // and the caller guarantees exclusive access to it.
        Some(unsafe { std::slice::from_raw_parts_mut(data, self.plane_len(index)) })
    }

    /// Nulls every plane pointer.
    pub(crate) fn clear(&mut self) {
        if self.scratch.take().is_some() {
            log::warn!("scratch buffer still attached at lock; previous frame was never unlocked");
        }
        self.planes = [ptr::null_mut(); MAX_PLANES];
        self.lens = [0; MAX_PLANES];
    }

    pub(crate) fn attach(&mut self, index: usize, buffer: &mut [u8]) {
        if index < MAX_PLANES {
            self.planes[index] = buffer.as_mut_ptr();
            self.lens[index] = buffer.len();
        }
    }

    /// Points plane 0 at a fresh scratch buffer of at least `len` bytes.
    pub(crate) fn supply_scratch(&mut self, len: usize) {
        let scratch = self.scratch.insert(ScratchBuffer::new(len));
        self.planes[0] = scratch.as_mut_ptr();
        self.lens[0] = scratch.len;
    }

    /// Frees the scratch buffer behind plane 0, if any.
    ///
    /// Returns whether a buffer was released.
    pub(crate) fn release_scratch(&mut self) -> bool {
        if self.planes[0].is_null() {
            return false;
        }
        let Some(scratch) = self.scratch.take() else {
            return false;
        };
        drop(scratch);
        self.planes[0] = ptr::null_mut();
        self.lens[0] = 0;
        true
    }
}
