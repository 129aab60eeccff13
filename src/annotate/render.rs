//! Highlight box drawing

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

use crate::detection::PixelBox;

/// Highlight outline thickness in pixels, drawn inward from the box edge
pub const STROKE_WIDTH: u32 = 2;

/// Draw an unfilled rectangle covering `bbox`
///
/// Coordinates are rounded to the nearest pixel and both edges are inclusive.
/// Boxes too small for an inner stroke get only the outer one; inverted boxes
/// draw nothing.
pub fn draw_highlight(canvas: &mut RgbImage, bbox: &PixelBox, color: Rgb<u8>) {
    let x0 = to_pixel(bbox.left);
    let y0 = to_pixel(bbox.top);
    let width = i64::from(to_pixel(bbox.right)) - i64::from(x0) + 1;
    let height = i64::from(to_pixel(bbox.bottom)) - i64::from(y0) + 1;

    for inset in 0..i64::from(STROKE_WIDTH) {
        let w = width - 2 * inset;
        let h = height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }

        let (Ok(w), Ok(h)) = (u32::try_from(w), u32::try_from(h)) else {
            break;
        };

        let rect = Rect::at(x0.saturating_add(inset as i32), y0.saturating_add(inset as i32))
            .of_size(w, h);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn to_pixel(value: f64) -> i32 {
    // `as` saturates at the i32 bounds
    value.round() as i32
}
