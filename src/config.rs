//! Runtime configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::capture::{display_available, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use std::path::PathBuf;

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Skip the real display and always use the placeholder image.
    pub force_placeholder: bool,
    /// Directories searched, in order, for annotation fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Placeholder size when no region is requested.
    pub placeholder_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force_placeholder: false,
            font_dirs: default_font_dirs(),
            placeholder_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }
}

impl Config {
    /// Build from `GRABITAR_*` variables, after loading `.env` if present.
    ///
    /// * `GRABITAR_MOCK` - truthy forces the placeholder image
    /// * `GRABITAR_FONT_DIRS` - extra font directories, searched first
    /// * `GRABITAR_PLACEHOLDER_SIZE` - `WIDTHxHEIGHT`
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("[CONFIG] Loaded {}", path.display());
        }

        let mut config = Config::default();

        if let Some(v) = std::env::var_os("GRABITAR_MOCK") {
            config.force_placeholder = is_truthy(&v.to_string_lossy());
        }
        if !display_available() {
            log::info!("[CONFIG] No display detected, using placeholder captures");
            config.force_placeholder = true;
        }

        if let Some(dirs) = std::env::var_os("GRABITAR_FONT_DIRS") {
            let mut font_dirs: Vec<PathBuf> = std::env::split_paths(&dirs).collect();
            font_dirs.append(&mut config.font_dirs);
            config.font_dirs = font_dirs;
        }

        if let Ok(size) = std::env::var("GRABITAR_PLACEHOLDER_SIZE") {
            match parse_size(&size) {
                Some(parsed) => config.placeholder_size = parsed,
                None => log::warn!(
                    "[CONFIG] Ignoring GRABITAR_PLACEHOLDER_SIZE={:?}, expected WIDTHxHEIGHT",
                    size
                ),
            }
        }

        config
    }
}

/// User font directory first, then the usual system locations.
pub fn default_font_dirs() -> Vec<PathBuf> {
    dirs::font_dir()
        .into_iter()
        .chain(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
        .collect()
}

fn is_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let (w, h) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}
