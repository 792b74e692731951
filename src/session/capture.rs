//! A single capture: one base image plus its ordered annotations.

use super::codec::{self, OutputFormat};
use crate::annotation::{render_annotation, Annotation, BoxAnnotation, FontBook, TextAnnotation};
use crate::capture::Region;
use crate::error::Result;
use chrono::{DateTime, Local};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A base image and the annotations drawn over it, in z-order.
///
/// The base image is never modified. Annotations can only be appended;
/// appends through a shared reference are atomic.
pub struct Capture {
    id: String,
    original_image: RgbaImage,
    monitor: u32,
    region: Option<Region>,
    timestamp: DateTime<Local>,
    annotations: Mutex<Vec<Annotation>>,
    fonts: Arc<FontBook>,
}

/// Descriptive snapshot of a capture, as shown to front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub monitor: u32,
    pub region: Option<Region>,
    pub width: u32,
    pub height: u32,
    pub annotation_count: usize,
    pub annotations: Vec<Annotation>,
}

impl Capture {
    pub fn new(
        id: impl Into<String>,
        original_image: RgbaImage,
        monitor: u32,
        region: Option<Region>,
        fonts: Arc<FontBook>,
    ) -> Self {
        Self {
            id: id.into(),
            original_image,
            monitor,
            region,
            timestamp: Local::now(),
            annotations: Mutex::new(Vec::new()),
            fonts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_image(&self) -> &RgbaImage {
        &self.original_image
    }

    pub fn monitor(&self) -> u32 {
        self.monitor
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn width(&self) -> u32 {
        self.original_image.width()
    }

    pub fn height(&self) -> u32 {
        self.original_image.height()
    }

    /// Append any annotation. Returns the new annotation count.
    pub fn add_annotation(&self, annotation: impl Into<Annotation>) -> usize {
        let mut annotations = self.annotations();
        annotations.push(annotation.into());
        annotations.len()
    }

    /// Append a box annotation. Geometry is not validated.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box_annotation(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: &str,
        line_width: i32,
        label: Option<&str>,
    ) -> usize {
        let mut b = BoxAnnotation::new(x, y, width, height)
            .with_color(color)
            .with_line_width(line_width);
        b.label = label.map(str::to_string);
        self.add_annotation(b)
    }

    /// Append a text annotation anchored at its top-left corner.
    pub fn add_text_annotation(
        &self,
        x: i32,
        y: i32,
        text: &str,
        font_size: i32,
        color: &str,
        background: Option<&str>,
    ) -> usize {
        let t = TextAnnotation::new(x, y, text)
            .with_font_size(font_size)
            .with_color(color)
            .with_background(background.map(str::to_string));
        self.add_annotation(t)
    }

    /// Snapshot of the current annotation sequence.
    pub fn annotation_list(&self) -> Vec<Annotation> {
        self.annotations().clone()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations().len()
    }

    /// A fresh copy of the base image with every annotation drawn in order.
    pub fn render_annotated_image(&self) -> RgbaImage {
        // Snapshot first so concurrent appends never wait on a render.
        let annotations = self.annotation_list();
        let mut canvas = self.original_image.clone();
        for annotation in &annotations {
            render_annotation(&mut canvas, annotation, &self.fonts);
        }
        canvas
    }

    /// The rendered composite as PNG bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let start = std::time::Instant::now();
        let png_bytes = codec::encode_png(&self.render_annotated_image())?;
        log::info!(
            "[RENDER] {} rendered ({}x{}, {} annotations) in {}ms, {} bytes",
            self.id,
            self.width(),
            self.height(),
            self.annotation_count(),
            start.elapsed().as_millis(),
            png_bytes.len()
        );
        Ok(png_bytes)
    }

    /// The rendered composite as a `data:image/png;base64,` URI.
    pub fn to_base64(&self) -> Result<String> {
        Ok(codec::to_data_uri(&self.to_bytes()?))
    }

    /// A markdown image embed of the rendered composite.
    pub fn to_markdown(&self) -> Result<String> {
        let uri = self.to_base64()?;
        Ok(codec::to_markdown(&format!("Capture {}", self.id), &uri))
    }

    /// The rendered composite in the requested format.
    pub fn export(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.to_bytes(),
            OutputFormat::Base64 => self.to_base64().map(String::into_bytes),
            OutputFormat::Markdown => self.to_markdown().map(String::into_bytes),
        }
    }

    pub fn metadata(&self) -> CaptureMetadata {
        let annotations = self.annotation_list();
        CaptureMetadata {
            id: self.id.clone(),
            timestamp: self.timestamp,
            monitor: self.monitor,
            region: self.region,
            width: self.width(),
            height: self.height(),
            annotation_count: annotations.len(),
            annotations,
        }
    }

    fn annotations(&self) -> MutexGuard<'_, Vec<Annotation>> {
        // A panic mid-push cannot leave the Vec half-written.
        self.annotations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("monitor", &self.monitor)
            .field("region", &self.region)
            .field("annotations", &self.annotation_count())
            .finish()
    }
}
