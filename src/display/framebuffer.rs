use tracing::info;

use super::{Canvas, Color, Font};

/// Text drawn onto a [`FrameBuffer`], kept as-is instead of rasterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub font: Font,
    pub x: i32,
    /// Baseline
    pub y: i32,
    pub color: Color,
    pub text: String,
}

/// In-memory canvas: a pixel grid plus the text spans drawn this frame.
///
/// Stands in for the LED panel when running headless and in tests.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    texts: Vec<TextSpan>,
    frames: u64,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        FrameBuffer {
            width: width as i32,
            height: height as i32,
            pixels: vec![Color::BLACK; (width * height) as usize],
            texts: Vec::new(),
            frames: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn texts(&self) -> &[TextSpan] {
        &self.texts
    }

    pub fn text(&self, text: &str) -> Option<&TextSpan> {
        self.texts.iter().find(|t| t.text == text)
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Color::BLACK).count()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One-line summary of the current frame for logs.
    pub fn describe(&self) -> String {
        let words: Vec<&str> = self.texts.iter().map(|t| t.text.as_str()).collect();
        format!("[{}] ({} px lit)", words.join(" "), self.lit_pixels())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
        self.texts.clear();
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn draw_text(&mut self, font: Font, x: i32, y: i32, color: Color, text: &str) {
        self.texts.push(TextSpan {
            font,
            x,
            y,
            color,
            text: text.to_string(),
        });
    }

    fn present(&mut self) {
        self.frames += 1;
        info!("frame {}: {}", self.frames, self.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_set_pixel_clips_outside() {
        let mut fb = FrameBuffer::new(64, 32);
        fb.set_pixel(-1, 0, Color::RED);
        fb.set_pixel(64, 5, Color::RED);
        fb.set_pixel(63, 31, Color::RED);
        assert_eq!(fb.lit_pixels(), 1);
        assert_eq!(fb.pixel(63, 31), Some(Color::RED));
        assert_eq!(fb.pixel(64, 31), None);
    }

    #[test]
    fn test_set_image_is_clipped_at_left_edge() {
        let mut fb = FrameBuffer::new(64, 32);
        let logo = RgbImage::from_pixel(32, 32, Rgb([0, 0, 255]));
        fb.set_image(&logo, -15, 0);
        // Columns -15..=-1 fall off the panel, 0..=16 remain.
        assert_eq!(fb.lit_pixels(), 17 * 32);
        assert_eq!(fb.pixel(16, 0), Some(Color::new(0, 0, 255)));
        assert_eq!(fb.pixel(17, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_clear_resets_text_and_pixels() {
        let mut fb = FrameBuffer::new(64, 32);
        fb.draw_text(Font::Small, 2, 7, Color::WHITE, "1.");
        fb.set_pixel(0, 0, Color::WHITE);
        fb.clear();
        assert!(fb.texts().is_empty());
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn test_describe_lists_text() {
        let mut fb = FrameBuffer::new(64, 32);
        fb.draw_text(Font::Large, 27, 8, Color::RED, "FT");
        fb.draw_text(Font::Large, 24, 22, Color::WHITE, "2-1");
        fb.present();
        assert_eq!(fb.describe(), "[FT 2-1] (0 px lit)");
        assert_eq!(fb.frames(), 1);
    }
}
