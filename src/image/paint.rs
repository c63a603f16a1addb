use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, QrCode};

use crate::error::Result;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;

pub const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
pub const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Paint a QR symbol with a quiet zone of `border` modules, each `box_size` pixels square.
pub fn paint_modules(code: &QrCode, box_size: u32, border: u32) -> GrayImage {
    let modules = code.to_colors();
    let width = code.width() as u32;
    let side = (width + 2 * border) * box_size;

    let mut img = GrayImage::from_pixel(side, side, Luma([0xff]));
    for (i, color) in modules.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (i as u32 % width + border) * box_size;
        let y = (i as u32 / width + border) * box_size;
        draw_filled_rect_mut(
            &mut img,
            Rect::at(x as i32, y as i32).of_size(box_size, box_size),
            Luma([0x00]),
        );
    }
    img
}

/// Stretch a grayscale raster to an exact size and lift it to RGB.
///
/// Nearest-neighbour keeps modules hard-edged after scaling.
pub fn stretch_to_rgb(src: &GrayImage, width: u32, height: u32) -> RgbImage {
    let resized = imageops::resize(src, width, height, FilterType::Nearest);
    DynamicImage::ImageLuma8(resized).to_rgb8()
}

/// Copy `src` into `dst` with its top-left corner at (x, y).
pub fn paste(dst: &mut RgbImage, src: &RgbImage, x: u32, y: u32) {
    imageops::replace(dst, src, x as i64, y as i64);
}

/// Serialize an RGB raster as PNG bytes.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Width and height of `text` drawn with the 5x7 glyph set at `scale`.
pub fn glyph_text_size(text: &str, scale: u32) -> (u32, u32) {
    let count = text.chars().count() as u32;
    if count == 0 {
        return (0, 0);
    }
    let advance = (GLYPH_WIDTH as u32 + 1) * scale;
    (count * advance - scale, GLYPH_HEIGHT as u32 * scale)
}

/// Draw `text` left to right with the 5x7 glyph set, one column of spacing between glyphs.
pub fn draw_glyph_text(image: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: u32) {
    let advance = ((GLYPH_WIDTH as u32 + 1) * scale) as i32;
    for (idx, ch) in text.chars().enumerate() {
        draw_glyph(image, x + idx as i32 * advance, y, ch, color, scale);
    }
}

fn draw_glyph(image: &mut RgbImage, x: i32, y: i32, ch: char, color: Rgb<u8>, scale: u32) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

// Lowercase letters reuse the uppercase shapes; anything unknown draws a box.
#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
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
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        '#' => [0b01010, 0b11111, 0b01010, 0b01010, 0b11111, 0b01010, 0b01010],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '=' => [0b00000, 0b11111, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrcode::EcLevel;

    #[test]
    fn modules_include_quiet_zone() {
        let code = QrCode::with_error_correction_level("A1", EcLevel::L).unwrap();
        let img = paint_modules(&code, 3, 4);
        assert_eq!(img.width(), (21 + 8) * 3);
        // Quiet zone is white, the top-left finder corner is dark.
        assert_eq!(img.get_pixel(0, 0)[0], 0xff);
        assert_eq!(img.get_pixel(4 * 3, 4 * 3)[0], 0x00);
    }

    #[test]
    fn glyph_text_size_excludes_trailing_gap() {
        assert_eq!(glyph_text_size("", 2), (0, 0));
        assert_eq!(glyph_text_size("A", 2), (10, 14));
        assert_eq!(glyph_text_size("A1", 2), (22, 14));
    }

    #[test]
    fn glyphs_clip_at_canvas_edges() {
        let mut img = RgbImage::from_pixel(8, 8, WHITE);
        draw_glyph_text(&mut img, -4, -4, "WIDE LABEL", BLACK, 2);
        assert_eq!(img.dimensions(), (8, 8));
    }

    #[test]
    fn png_bytes_carry_signature() {
        let img = RgbImage::from_pixel(4, 4, WHITE);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
