//! PNG, base64 and data URI conversions for captures.

use crate::error::{DecodeError, Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::str::FromStr;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// What a caller wants a rendered capture turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw PNG bytes.
    Png,
    /// A `data:image/png;base64,...` URI.
    Base64,
    /// `![Capture <id>](<data uri>)`.
    #[default]
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "base64" => Ok(OutputFormat::Base64),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format {:?} (png, base64, markdown)", other)),
        }
    }
}

/// Lossless PNG encoding of `image`.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(png_bytes)
}

pub fn to_data_uri(png_bytes: &[u8]) -> String {
    format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(png_bytes))
}

pub fn to_markdown(alt: &str, data_uri: &str) -> String {
    format!("![{}]({})", alt, data_uri)
}

/// Drop everything up to and including the first comma, if there is one.
pub fn strip_data_uri_prefix(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// Decode a base64 payload, with or without a data URI prefix, into bytes.
/// ASCII whitespace inside the payload is ignored.
pub fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, DecodeError> {
    let payload: String = strip_data_uri_prefix(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(payload)?)
}

/// Decode any image format the `image` crate understands into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> std::result::Result<RgbaImage, DecodeError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}
