//! Drawing primitives over an RGBA buffer.
//!
//! Coordinates are in pixels with the origin top-left. Text is placed by
//! baseline, matching how the layout constants are expressed.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::error::{RenderError, RenderResult};
use crate::text::Face;

/// An owned canvas for one render call.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A canvas filled with `background`. Fails on a zero dimension.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>) {
        if width <= 0 || height <= 0 {
            return;
        }
        let rect = Rect::at(x, y).of_size(width as u32, height as u32);
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    /// Horizontal rule centred on `y`.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, thickness: i32, color: Rgba<u8>) {
        self.fill_rect(x0, y - thickness / 2, x1 - x0, thickness, color);
    }

    /// Vertical rule centred on `x`.
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, thickness: i32, color: Rgba<u8>) {
        self.fill_rect(x - thickness / 2, y0, thickness, y1 - y0, color);
    }

    /// Outline drawn inside the given rectangle.
    pub fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, thickness: i32, color: Rgba<u8>) {
        self.fill_rect(x, y, width, thickness, color);
        self.fill_rect(x, y + height - thickness, width, thickness, color);
        self.fill_rect(x, y, thickness, height, color);
        self.fill_rect(x + width - thickness, y, thickness, height, color);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
        if radius <= 0 {
            return;
        }
        draw_filled_circle_mut(&mut self.image, (cx, cy), radius, color);
    }

    pub fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        radius: i32,
        color: Rgba<u8>,
    ) {
        let r = radius.min(width / 2).min(height / 2).max(0);
        if r == 0 {
            self.fill_rect(x, y, width, height, color);
            return;
        }
        self.fill_rect(x + r, y, width - 2 * r, height, color);
        self.fill_rect(x, y + r, r, height - 2 * r, color);
        self.fill_rect(x + width - r, y + r, r, height - 2 * r, color);

        // Corner circles sit one pixel in so they stay inside the box
        let right = x + width - 1 - r;
        let bottom = y + height - 1 - r;
        for (cx, cy) in [(x + r, y + r), (right, y + r), (x + r, bottom), (right, bottom)] {
            self.fill_circle(cx, cy, r, color);
        }
    }

    /// Draw `text` with its left edge at `x` and baseline at `baseline`.
    pub fn text(&mut self, face: &Face<'_>, color: Rgba<u8>, x: f32, baseline: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let top = (baseline - face.ascent()).round() as i32;
        draw_text_mut(
            &mut self.image,
            color,
            x.round() as i32,
            top,
            face.scale(),
            face.font(),
            text,
        );
    }

    /// Draw `text` ending at `right`. Returns the left edge used.
    pub fn text_right(&mut self, face: &Face<'_>, color: Rgba<u8>, right: f32, baseline: f32, text: &str) -> f32 {
        let x = right - face.measure(text);
        self.text(face, color, x, baseline, text);
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Fonts, Weight};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn count(canvas: &Canvas, color: Rgba<u8>) -> usize {
        canvas.image.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10, WHITE),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_rules() {
        let mut canvas = Canvas::new(20, 20, WHITE).unwrap();
        canvas.hline(0, 20, 10, 2, BLACK);
        assert_eq!(count(&canvas, BLACK), 40);
        assert_eq!(*canvas.image.get_pixel(5, 9), BLACK);
        assert_eq!(*canvas.image.get_pixel(5, 10), BLACK);
        assert_eq!(*canvas.image.get_pixel(5, 11), WHITE);

        canvas.vline(3, 0, 20, 1, BLACK);
        assert_eq!(*canvas.image.get_pixel(3, 0), BLACK);
        assert_eq!(count(&canvas, BLACK), 40 + 18);
    }

    #[test]
    fn test_degenerate_shapes_draw_nothing() {
        let mut canvas = Canvas::new(10, 10, WHITE).unwrap();
        canvas.fill_rect(2, 2, 0, 5, BLACK);
        canvas.fill_rect(2, 2, 5, -1, BLACK);
        canvas.fill_circle(5, 5, 0, BLACK);
        assert_eq!(count(&canvas, BLACK), 0);
    }

    #[test]
    fn test_rounded_rect_stays_inside_box() {
        let mut canvas = Canvas::new(40, 40, WHITE).unwrap();
        canvas.fill_rounded_rect(5, 5, 30, 22, 3, BLACK);
        for (x, y, p) in canvas.image.enumerate_pixels() {
            if *p == BLACK {
                assert!((5..35).contains(&x) && (5..27).contains(&y), "({}, {})", x, y);
            }
        }
        // Corners are cut, edges are not
        assert_eq!(*canvas.image.get_pixel(5, 5), WHITE);
        assert_eq!(*canvas.image.get_pixel(20, 5), BLACK);
        assert_eq!(*canvas.image.get_pixel(5, 16), BLACK);
    }

    #[test]
    fn test_text_lands_above_baseline() {
        let fonts = Fonts::embedded().unwrap();
        let face = fonts.face(Weight::Bold, 20.0);
        let mut canvas = Canvas::new(100, 40, WHITE).unwrap();
        canvas.text(&face, BLACK, 10.0, 30.0, "Mon");

        let inked: Vec<(u32, u32)> = canvas
            .image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| x >= 9 && y <= 31 && y >= 10));
    }
}
