use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};

use crate::error::{Error, Result};

static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const TEXT: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn font() -> Result<Font<'static>> {
    Font::try_from_bytes(FONT_BYTES)
        .ok_or_else(|| Error::Configuration("bundled font could not be parsed".into()))
}

/// Pixel height of the title band for a panel of the given size.
pub fn title_height(panel_size: u32) -> u32 {
    ((title_scale(panel_size) * 1.4).ceil() as u32).min(panel_size)
}

fn title_scale(panel_size: u32) -> f32 {
    (panel_size as f32 / 20.0).max(6.0)
}

/// Clears a band along the top of `img` and writes `text` centered in it.
pub fn draw_title(img: &mut RgbaImage, text: &str) -> Result<()> {
    let band = title_height(img.height());
    if band == 0 || img.width() == 0 {
        return Ok(());
    }
    draw_filled_rect_mut(img, Rect::at(0, 0).of_size(img.width(), band), BACKGROUND);
    let center = (img.width() as f32 / 2.0, band as f32 / 2.0);
    draw_centered(img, text, center, title_scale(img.height()), TEXT)
}

/// Writes `text` with its bounding box centered on `center`.
pub fn draw_centered(
    img: &mut RgbaImage,
    text: &str,
    center: (f32, f32),
    height: f32,
    color: Rgba<u8>,
) -> Result<()> {
    let font = font()?;
    let scale = Scale::uniform(height);
    let (w, h) = text_size(scale, &font, text);
    let x = (center.0 - w as f32 / 2.0).round() as i32;
    let y = (center.1 - h as f32 / 2.0).round() as i32;
    draw_text_mut(img, color, x, y, scale, &font, text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark(p: &Rgba<u8>) -> bool {
        p[0] < 128 && p[1] < 128 && p[2] < 128
    }

    #[test]
    fn bundled_font_loads() {
        assert!(font().is_ok());
    }

    #[test]
    fn title_is_written_inside_the_band() {
        let mut img = RgbaImage::from_pixel(200, 200, Rgba([255, 0, 0, 255]));
        draw_title(&mut img, "Step 10").unwrap();
        let band = title_height(200);

        let in_band: Vec<_> = img.enumerate_pixels().filter(|(_, y, _)| *y < band).collect();
        assert!(in_band.iter().any(|(_, _, p)| dark(p)));
        assert!(in_band.iter().any(|(_, _, p)| **p == BACKGROUND));
        assert!(img.enumerate_pixels().filter(|(_, y, _)| *y >= band).all(|(_, _, p)| !dark(p)));
    }

    #[test]
    fn different_text_gives_different_pixels() {
        let mut a = RgbaImage::from_pixel(120, 120, BACKGROUND);
        let mut b = a.clone();
        draw_title(&mut a, "Step 10").unwrap();
        draw_title(&mut b, "Step 20").unwrap();
        assert_ne!(a, b);
    }
}
