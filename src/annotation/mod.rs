//! Annotation domain: the closed set of overlays a capture can carry.
//!
//! Annotations are plain immutable values. Each knows how to draw itself
//! onto an RGBA canvas; `render_annotation` is the single dispatch point.

pub mod color;
pub mod draw;
pub mod fonts;

pub use color::{parse_color, resolve_color};
pub use fonts::FontBook;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::{Deserialize, Serialize};

/// Font size of box labels, in pixels.
pub const LABEL_FONT_SIZE: f32 = 16.0;
/// White margin around a box label.
pub const LABEL_MARGIN: i32 = 2;
/// Gap between a label's bottom and its box's top edge.
pub const LABEL_GAP: i32 = 5;
/// Padding between text and its background rectangle.
pub const TEXT_PADDING: i32 = 4;
/// Outline thickness of a text background.
pub const TEXT_OUTLINE: i32 = 2;
/// Largest font size text is rendered at. Bigger requests are drawn at this size.
pub const MAX_FONT_SIZE: i32 = 2048;

const LABEL_BACKING: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A drawable overlay. Serializes as `{"type": "box" | "text", ...fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Box(BoxAnnotation),
    Text(TextAnnotation),
}

impl Annotation {
    /// The discriminant as it appears in metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            Annotation::Box(_) => "box",
            Annotation::Text(_) => "text",
        }
    }
}

impl From<BoxAnnotation> for Annotation {
    fn from(b: BoxAnnotation) -> Self {
        Annotation::Box(b)
    }
}

impl From<TextAnnotation> for Annotation {
    fn from(t: TextAnnotation) -> Self {
        Annotation::Text(t)
    }
}

/// Outlined rectangle with an optional label above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxAnnotation {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: String,
    pub line_width: i32,
    pub label: Option<String>,
}

impl BoxAnnotation {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color: "red".to_string(),
            line_width: 3,
            label: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_line_width(mut self, line_width: i32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Text anchored at its top-left corner, optionally on a filled background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub font_size: i32,
    pub color: String,
    pub background: Option<String>,
}

impl TextAnnotation {
    pub fn new(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font_size: 20,
            color: "red".to_string(),
            background: Some("white".to_string()),
        }
    }

    pub fn with_font_size(mut self, font_size: i32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_background(mut self, background: Option<String>) -> Self {
        self.background = background;
        self
    }
}

/// Draw one annotation onto `canvas`.
///
/// Never fails. Anything outside the canvas is clipped away.
pub fn render_annotation(canvas: &mut RgbaImage, annotation: &Annotation, fonts: &FontBook) {
    match annotation {
        Annotation::Box(b) => render_box(canvas, b, fonts),
        Annotation::Text(t) => render_text(canvas, t, fonts),
    }
}

fn render_box(canvas: &mut RgbaImage, b: &BoxAnnotation, fonts: &FontBook) {
    let color = resolve_color(&b.color);
    let x2 = b.x.saturating_add(b.width);
    let y2 = b.y.saturating_add(b.height);
    draw::outline_rect(canvas, b.x, b.y, x2, y2, b.line_width, color);

    let Some(label) = b.label.as_deref().filter(|l| !l.is_empty()) else {
        return;
    };

    let font = fonts.regular();
    let scale = fonts::scale_for(font, LABEL_FONT_SIZE);
    let (tw, th) = measure(font, LABEL_FONT_SIZE, label);

    let label_x = b.x;
    let label_y = b.y.saturating_sub(th).saturating_sub(LABEL_GAP).max(0);

    draw::fill_rect(
        canvas,
        label_x.saturating_sub(LABEL_MARGIN),
        label_y - LABEL_MARGIN,
        label_x.saturating_add(tw).saturating_add(LABEL_MARGIN),
        label_y.saturating_add(th).saturating_add(LABEL_MARGIN),
        LABEL_BACKING,
    );
    draw_text_clipped(canvas, color, label_x, label_y, (tw, th), scale, font, label);
}

fn render_text(canvas: &mut RgbaImage, t: &TextAnnotation, fonts: &FontBook) {
    let color = resolve_color(&t.color);
    let size = t.font_size.clamp(1, MAX_FONT_SIZE) as f32;
    let font = fonts.bold();
    let (tw, th) = measure(font, size, &t.text);

    if let Some(background) = t.background.as_deref() {
        let x0 = t.x.saturating_sub(TEXT_PADDING);
        let y0 = t.y.saturating_sub(TEXT_PADDING);
        let x1 = t.x.saturating_add(tw).saturating_add(TEXT_PADDING);
        let y1 = t.y.saturating_add(th).saturating_add(TEXT_PADDING);
        draw::fill_rect(canvas, x0, y0, x1, y1, resolve_color(background));
        draw::outline_rect(canvas, x0, y0, x1, y1, TEXT_OUTLINE, color);
    }

    if !t.text.is_empty() {
        let scale = fonts::scale_for(font, size);
        draw_text_clipped(canvas, color, t.x, t.y, (tw, th), scale, font, &t.text);
    }
}

/// `draw_text_mut` adds glyph offsets to the anchor as plain `i32`, so only
/// call it when the laid-out text can reach the canvas and every offset fits.
#[allow(clippy::too_many_arguments)]
fn draw_text_clipped(
    canvas: &mut RgbaImage,
    color: Rgba<u8>,
    x: i32,
    y: i32,
    (tw, th): (i32, i32),
    scale: PxScale,
    font: &FontArc,
    text: &str,
) {
    // Glyph boxes can overhang the measured extent by up to a line height.
    let slack = 2 * scale.x.max(scale.y).ceil() as i64;
    let reaches = |origin: i32, extent: i32, limit: u32| {
        let lo = i64::from(origin) - slack;
        let hi = i64::from(origin) + i64::from(extent) + slack;
        let fits = lo >= i64::from(i32::MIN) && hi <= i64::from(i32::MAX);
        fits && hi >= 0 && lo < i64::from(limit)
    };
    if reaches(x, tw, canvas.width()) && reaches(y, th, canvas.height()) {
        draw_text_mut(canvas, color, x, y, scale, font, text);
    }
}

/// Pixel width and height of `text` set in `font` at `size_px`.
pub fn measure(font: &FontArc, size_px: f32, text: &str) -> (i32, i32) {
    let (w, h) = text_size(fonts::scale_for(font, size_px), font, text);
    (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn canvas(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn box_serializes_with_type_tag() {
        let ann: Annotation = BoxAnnotation::new(10, 10, 100, 50).with_label("Button").into();
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "box", "x": 10, "y": 10, "width": 100, "height": 50,
                "color": "red", "line_width": 3, "label": "Button"
            })
        );
    }

    #[test]
    fn text_defaults_match_tool_defaults() {
        let t = TextAnnotation::new(1, 2, "hi");
        assert_eq!(t.font_size, 20);
        assert_eq!(t.color, "red");
        assert_eq!(t.background.as_deref(), Some("white"));
        assert_eq!(Annotation::from(t).kind(), "text");
    }

    #[test]
    fn box_outline_only_touches_edges() {
        let fonts = FontBook::builtin();
        let mut img = canvas(50, 50);
        let ann = BoxAnnotation::new(10, 10, 20, 20).with_line_width(2).into();
        render_annotation(&mut img, &ann, &fonts);

        assert_eq!(*img.get_pixel(10, 10), RED);
        assert_eq!(*img.get_pixel(30, 30), RED);
        assert_eq!(*img.get_pixel(11, 20), RED);
        assert_eq!(*img.get_pixel(20, 20), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(31, 31), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn box_label_sits_above_box() {
        let fonts = FontBook::builtin();
        let mut img = canvas(200, 100);
        let ann = BoxAnnotation::new(20, 60, 80, 30).with_label("OK").into();
        render_annotation(&mut img, &ann, &fonts);

        let (_, th) = measure(fonts.regular(), LABEL_FONT_SIZE, "OK");
        let label_y = 60 - th - LABEL_GAP;
        // White backing starts two pixels above and left of the label.
        assert_eq!(*img.get_pixel(18, (label_y - 2) as u32), WHITE);
        // Nothing is drawn above the backing.
        assert_eq!(*img.get_pixel(18, (label_y - 3) as u32), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn label_is_clamped_to_top_edge() {
        let fonts = FontBook::builtin();
        let mut img = canvas(200, 100);
        let ann = BoxAnnotation::new(20, 0, 80, 40).with_label("Top").into();
        render_annotation(&mut img, &ann, &fonts);

        // Backing row at y=0 just inside the left margin.
        assert_eq!(*img.get_pixel(18, 0), WHITE);
    }

    #[test]
    fn text_background_is_padded_and_outlined() {
        let fonts = FontBook::builtin();
        let mut img = canvas(300, 100);
        let ann = TextAnnotation::new(20, 20, "Hello").with_color("blue").into();
        render_annotation(&mut img, &ann, &fonts);

        let (tw, th) = measure(fonts.bold(), 20.0, "Hello");
        // Outline corners.
        assert_eq!(*img.get_pixel(16, 16), BLUE);
        assert_eq!(*img.get_pixel((20 + tw + 4) as u32, (20 + th + 4) as u32), BLUE);
        // Inside the padding, past the outline, is background.
        assert_eq!(*img.get_pixel(18, 18), WHITE);
        // Outside stays untouched.
        assert_eq!(*img.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn text_without_background_draws_only_glyphs() {
        let fonts = FontBook::builtin();
        let mut img = canvas(300, 100);
        let ann = TextAnnotation::new(20, 20, "Hello")
            .with_background(None)
            .with_color("white")
            .into();
        render_annotation(&mut img, &ann, &fonts);

        assert_eq!(*img.get_pixel(16, 16), Rgba([0, 0, 0, 255]));
        assert!(img.pixels().any(|p| p[0] > 0));
    }

    #[test]
    fn off_canvas_annotations_do_not_panic() {
        let fonts = FontBook::builtin();
        let mut img = canvas(20, 20);
        let before = img.clone();
        let anns: Vec<Annotation> = vec![
            BoxAnnotation::new(-500, -500, 10, 10).with_label("gone").into(),
            BoxAnnotation::new(i32::MAX - 1, i32::MAX - 1, 100, 100).into(),
            TextAnnotation::new(1000, 1000, "far away").into(),
            TextAnnotation::new(-1000, 5, "left").with_background(None).into(),
            TextAnnotation::new(i32::MAX - 5, 10, "far").with_background(None).into(),
            TextAnnotation::new(10, i32::MAX - 5, "low").with_background(None).into(),
            TextAnnotation::new(i32::MIN + 1, i32::MIN + 1, "corner").into(),
            BoxAnnotation::new(i32::MAX - 5, 10, 1, 1).with_label("far").into(),
            BoxAnnotation::new(10, i32::MAX - 5, 1, 1).with_label("low").into(),
        ];
        for ann in &anns {
            render_annotation(&mut img, ann, &fonts);
        }
        assert_eq!(img, before);
    }

    #[test]
    fn degenerate_inputs_render() {
        let fonts = FontBook::builtin();
        let mut img = canvas(20, 20);
        render_annotation(&mut img, &BoxAnnotation::new(5, 5, 0, 0).into(), &fonts);
        assert_eq!(*img.get_pixel(5, 5), RED);

        let zero_font: Annotation = TextAnnotation::new(2, 2, "x").with_font_size(0).into();
        render_annotation(&mut img, &zero_font, &fonts);
        let empty: Annotation = TextAnnotation::new(2, 2, "").into();
        render_annotation(&mut img, &empty, &fonts);
    }

    #[test]
    fn oversized_font_renders_at_cap() {
        let fonts = FontBook::builtin();
        let huge: Annotation = TextAnnotation::new(0, 0, "W")
            .with_font_size(200_000)
            .with_background(None)
            .into();
        let capped: Annotation = TextAnnotation::new(0, 0, "W")
            .with_font_size(MAX_FONT_SIZE)
            .with_background(None)
            .into();

        let mut a = canvas(40, 40);
        render_annotation(&mut a, &huge, &fonts);
        let mut b = canvas(40, 40);
        render_annotation(&mut b, &capped, &fonts);
        assert_eq!(a, b);

        let mut c = canvas(40, 40);
        let max: Annotation = TextAnnotation::new(0, 0, "W").with_font_size(i32::MAX).into();
        render_annotation(&mut c, &max, &fonts);
    }
}
