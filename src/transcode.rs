//! In-place pixel re-mapping for depth-encoded BGRA frames.
//!
//! Some sources pack a depth value into what the decoder reports as 32-bit
//! BGRA. Read as a little-endian word, each pixel carries:
//!
//! ```text
//!  byte 3   byte 2   byte 1   byte 0
//!  xxxxxxxx xxxxxxxx x BBBBB xx dddddddd
//! ```
//!
//! where `d` is the depth byte and `B` a 5-bit blue component. The renderer
//! wants depth in alpha and the blue component expanded to 8 bits; red and
//! green are cleared. This is a channel shuffle only: no filtering, no
//! resampling, and the remaining colour bits are lost.

/// Re-maps the first `width * height` BGRA pixels of `buffer` in place.
pub fn decode_depth_bgra(buffer: &mut [u8], width: u32, height: u32) {
    let len = (width as usize * height as usize * 4).min(buffer.len());

    for pixel in buffer[..len].chunks_exact_mut(4) {
        let word = u32::from_le_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
        pixel[3] = pixel[0];
        pixel[0] = ((word & 0x7c00) >> 7) as u8;
        pixel[1] = 0;
        pixel[2] = 0;
    }
}
