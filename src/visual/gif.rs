use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::error::Result;

/// Palette quantization speed, 1 (best) to 30 (fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Writes `frames` as a looping animated GIF, each shown for `delay_ms`.
pub fn write_gif(path: &Path, frames: &[RgbaImage], delay_ms: u32) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANTIZE_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    encoder.encode_frames(
        frames
            .iter()
            .map(|image| Frame::from_parts(image.clone(), 0, 0, delay)),
    )?;
    Ok(())
}
