//! Fallback images for prompts the service could not or would not render.
//!
//! A placeholder is a dark canvas with the failed prompt printed on it, so a
//! bundle is never published with a broken image reference and the editor can
//! see what should have been there.
//!
//! Text is drawn from the 8x8 bitmap glyphs in `font8x8`, scaled up by
//! `GLYPH_SCALE`. Each glyph row is a byte whose least significant bit is the
//! leftmost pixel. Characters outside the basic Latin range print as `?`.

use super::ImagingError;
use super::encode::save_jpeg;
use super::params::PlaceholderParams;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// First caption line on every placeholder.
pub const CAPTION_HEADER: &str = "FALLBACK (API Error/Refusal):";
/// Caption lines stay shorter than this many characters.
pub const WRAP_WIDTH: usize = 60;

const BACKGROUND: Rgb<u8> = Rgb([26, 26, 26]);
const TEXT: Rgb<u8> = Rgb([255, 100, 100]);
const GLYPH_SIZE: u32 = 8;
const GLYPH_SCALE: u32 = 2;
const LINE_HEIGHT: u32 = 30;

/// Greedy word wrap: a word joins the current line while the line plus a
/// separating space and the word stays under `width` characters.
pub fn wrap_caption(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + word.chars().count() + 1 < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Header, blank separator, then the wrapped prompt.
pub fn caption_lines(prompt: &str) -> Vec<String> {
    let mut lines = vec![CAPTION_HEADER.to_string(), String::new()];
    lines.extend(wrap_caption(prompt, WRAP_WIDTH));
    lines
}

/// Render the placeholder canvas for `prompt`. Lines are centered
/// horizontally and the block is centered vertically; anything past the
/// canvas edge is clipped.
pub fn render_placeholder(prompt: &str, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);
    let lines = caption_lines(prompt);
    let block_height = lines.len() as u32 * LINE_HEIGHT;
    let mut y = height.saturating_sub(block_height) / 2;

    for line in &lines {
        let advance = GLYPH_SIZE * GLYPH_SCALE;
        let line_width = line.chars().count() as u32 * advance;
        let mut x = width.saturating_sub(line_width) / 2;
        for c in line.chars() {
            draw_glyph(&mut canvas, c, x, y);
            x = x.saturating_add(advance);
        }
        y = y.saturating_add(LINE_HEIGHT);
    }
    canvas
}

fn draw_glyph(canvas: &mut RgbImage, c: char, x: u32, y: u32) {
    let glyph = BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8]);
    for (row, &bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH_SIZE {
            if (bits >> col) & 1 == 0 {
                continue;
            }
            let px = x + col * GLYPH_SCALE;
            let py = y + row as u32 * GLYPH_SCALE;
            for dy in 0..GLYPH_SCALE {
                for dx in 0..GLYPH_SCALE {
                    let (tx, ty) = (px + dx, py + dy);
                    if tx < canvas.width() && ty < canvas.height() {
                        canvas.put_pixel(tx, ty, TEXT);
                    }
                }
            }
        }
    }
}

/// Render a placeholder for `prompt` and save it as JPEG at `output`.
pub fn create_placeholder_image(
    prompt: &str,
    output: &Path,
    params: &PlaceholderParams,
) -> Result<(), ImagingError> {
    let canvas = render_placeholder(prompt, params.width, params.height);
    save_jpeg(&DynamicImage::ImageRgb8(canvas), output, params.quality)
}
