//! Raster primitives with inclusive corners.
//!
//! Coordinates may lie anywhere, including off-canvas. Every primitive
//! clips to the canvas and silently draws nothing when there is nothing
//! left to draw.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Fill the rectangle spanning `(x0, y0)..=(x1, y1)`.
///
/// Inverted corners are swapped. Pixels are replaced, not blended.
pub fn fill_rect(canvas: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));

    // Clip first so the size always fits in a u32 and stays non-zero.
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let left = (left as i64).max(0);
    let top = (top as i64).max(0);
    let right = (right as i64).min(w - 1);
    let bottom = (bottom as i64).min(h - 1);
    if left > right || top > bottom {
        return;
    }

    let rect = Rect::at(left as i32, top as i32)
        .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}

/// Outline the rectangle spanning `(x0, y0)..=(x1, y1)` with a border
/// `thickness` pixels wide, growing inward from the outer edge.
///
/// A border thicker than half the rectangle fills it. `thickness <= 0`
/// draws nothing.
pub fn outline_rect(
    canvas: &mut RgbaImage,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: i32,
    color: Rgba<u8>,
) {
    if thickness <= 0 {
        return;
    }
    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));
    let inset = thickness - 1;

    // Top and bottom bands span the full width; side bands fill the rest.
    let top_band_end = top.saturating_add(inset).min(bottom);
    let bottom_band_start = bottom.saturating_sub(inset).max(top);
    fill_rect(canvas, left, top, right, top_band_end, color);
    fill_rect(canvas, left, bottom_band_start, right, bottom, color);

    let left_band_end = left.saturating_add(inset).min(right);
    let right_band_start = right.saturating_sub(inset).max(left);
    fill_rect(canvas, left, top, left_band_end, bottom, color);
    fill_rect(canvas, right_band_start, top, right, bottom, color);
}
