//! Synthetic screen used whenever the real display cannot be grabbed.
//!
//! The drawing below is cosmetic. What matters is that it always returns
//! an opaque image of exactly the requested size.

use crate::annotation::draw::{fill_rect, outline_rect};
use crate::annotation::{fonts, measure, FontBook};
use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

const GRID_STEP: u32 = 100;
const GRID: Rgba<u8> = Rgba([180, 180, 200, 255]);
const TITLE: &str = "MOCK SCREEN CAPTURE";

/// Build a placeholder screen of `width` x `height` (each at least 1).
pub fn placeholder_image(width: u32, height: u32, fonts: &FontBook) -> RgbaImage {
    let (width, height) = (width.max(1), height.max(1));

    let mut img = RgbaImage::from_fn(width, height, |_, y| {
        let v = (200.0 - (y as f32 / height as f32) * 50.0) as u8;
        Rgba([v, v + 20, v + 40, 255])
    });

    for x in (0..width).step_by(GRID_STEP as usize) {
        fill_rect(&mut img, x as i32, 0, x as i32, height as i32 - 1, GRID);
    }
    for y in (0..height).step_by(GRID_STEP as usize) {
        fill_rect(&mut img, 0, y as i32, width as i32 - 1, y as i32, GRID);
    }

    let (w, h) = (width as i32, height as i32);
    let title_font = fonts.bold();
    let body_font = fonts.regular();

    let (tw, th) = measure(title_font, 72.0, TITLE);
    let (tx, ty) = ((w - tw) / 2, (h - th) / 2);
    write(&mut img, title_font, 72.0, Rgba([100, 100, 100, 255]), (tx + 3, ty + 3), TITLE);
    write(&mut img, title_font, 72.0, Rgba([102, 126, 234, 255]), (tx, ty), TITLE);

    let info = format!("Test Image {}x{} - Add annotations to test!", width, height);
    let (iw, _) = measure(body_font, 32.0, &info);
    let info_at = ((w - iw) / 2, ty + th + 30);
    write(&mut img, body_font, 32.0, Rgba([80, 80, 80, 255]), info_at, &info);

    // Sample widgets to point annotations at.
    let (bx, by) = (w / 4, h / 4);
    fill_rect(&mut img, bx, by, bx + 150, by + 50, Rgba([67, 110, 238, 255]));
    outline_rect(&mut img, bx, by, bx + 150, by + 50, 2, Rgba([50, 90, 200, 255]));
    write(&mut img, body_font, 32.0, Rgba([255, 255, 255, 255]), (bx + 35, by + 15), "Button");

    let (ix, iy) = (w / 2 + 100, h / 4);
    fill_rect(&mut img, ix, iy, ix + 300, iy + 45, Rgba([255, 255, 255, 255]));
    outline_rect(&mut img, ix, iy, ix + 300, iy + 45, 2, Rgba([150, 150, 150, 255]));
    write(&mut img, body_font, 32.0, Rgba([150, 150, 150, 255]), (ix + 10, iy + 12), "Input Field");

    let (cx, cy) = (w / 4, h / 2 + 100);
    fill_rect(&mut img, cx, cy, cx + 30, cy + 30, Rgba([255, 255, 255, 255]));
    outline_rect(&mut img, cx, cy, cx + 30, cy + 30, 2, Rgba([100, 100, 100, 255]));
    let check_at = (cx + 45, cy + 5);
    write(&mut img, body_font, 32.0, Rgba([60, 60, 60, 255]), check_at, "Checkbox Option");

    img
}

fn write(
    img: &mut RgbaImage,
    font: &FontArc,
    size: f32,
    color: Rgba<u8>,
    at: (i32, i32),
    text: &str,
) {
    draw_text_mut(img, color, at.0, at.1, fonts::scale_for(font, size), font, text);
}
