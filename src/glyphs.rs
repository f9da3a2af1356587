//! Built-in 5x7 block font.
//!
//! The text field only needs opaque pixels to sample, not typography, so the
//! default rasterizer draws chunky block letters straight into an
//! `RgbaImage`. Hosts with a real font stack can implement
//! [`TextRasterizer`](crate::text_field::TextRasterizer) themselves.

use crate::text_field::TextRasterizer;
use glam::Vec2;
use image::{Rgba, RgbaImage};

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Columns per character including one column of spacing.
const ADVANCE_COLS: u32 = GLYPH_COLS + 1;

/// Block-letter rasterizer. Lowercase is drawn as uppercase; characters
/// without a glyph advance like a space.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    /// Size of one glyph cell in pixels for a font size.
    #[inline]
    fn unit(font_px: u32) -> u32 {
        (font_px / (GLYPH_ROWS + 1)).max(1)
    }
}

impl TextRasterizer for BlockFont {
    fn measure(&self, text: &str, font_px: u32) -> u32 {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        (chars * ADVANCE_COLS - 1) * Self::unit(font_px)
    }

    fn fill_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        center: Vec2,
        font_px: u32,
        paint: &dyn Fn(u32, u32) -> Rgba<u8>,
    ) {
        let unit = Self::unit(font_px);
        let width = self.measure(text, font_px) as f32;
        let height = (GLYPH_ROWS * unit) as f32;
        let left = (center.x - width * 0.5).round() as i64;
        let top = (center.y - height * 0.5).round() as i64;

        for (slot, ch) in text.chars().enumerate() {
            let Some(rows) = glyph(ch) else {
                continue;
            };
            let glyph_left = left + (slot as u32 * ADVANCE_COLS * unit) as i64;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = glyph_left + (col * unit) as i64;
                    let y0 = top + (row as u32 * unit) as i64;
                    fill_block(canvas, x0, y0, unit, paint);
                }
            }
        }
    }
}

fn fill_block(canvas: &mut RgbaImage, x0: i64, y0: i64, size: u32, paint: &dyn Fn(u32, u32) -> Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    for y in y0..y0 + size as i64 {
        if y < 0 || y >= h as i64 {
            continue;
        }
        for x in x0..x0 + size as i64 {
            if x < 0 || x >= w as i64 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            canvas.put_pixel(x, y, paint(x, y));
        }
    }
}

/// Row bitmaps, most significant of the low five bits is the left column.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn opaque_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn test_measure() {
        assert_eq!(BlockFont.measure("", 80), 0);
        // unit = 80 / 8 = 10; one glyph is 5 columns wide.
        assert_eq!(BlockFont.measure("A", 80), 50);
        assert_eq!(BlockFont.measure("AB", 80), 110);
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut img = RgbaImage::new(100, 40);
        BlockFont.fill_text(&mut img, "   ", Vec2::new(50.0, 20.0), 16, &|_, _| WHITE);
        assert_eq!(opaque_pixels(&img), 0);
    }

    #[test]
    fn test_letter_pixel_count() {
        // 'I' has 3 + 5 + 3 = 11 set cells; at unit 2 each is 4 pixels.
        let mut img = RgbaImage::new(40, 40);
        BlockFont.fill_text(&mut img, "I", Vec2::new(20.0, 20.0), 16, &|_, _| WHITE);
        assert_eq!(opaque_pixels(&img), 11 * 4);
    }

    #[test]
    fn test_clips_to_canvas() {
        let mut img = RgbaImage::new(10, 10);
        BlockFont.fill_text(&mut img, "GALAXY", Vec2::new(5.0, 5.0), 64, &|_, _| WHITE);
        assert!(opaque_pixels(&img) <= 100);
    }
}
