//! Font resolution with a fallback chain that always ends in an embedded face.
//!
//! Hosts may lack any particular font file, so each face is resolved by
//! trying an ordered list of sources. The last source is compiled into the
//! binary, which makes resolution infallible.

use ab_glyph::{Font, FontArc, PxScale};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static EMBEDDED_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

static EMBEDDED: LazyLock<FontArc> = LazyLock::new(|| {
    FontArc::try_from_slice(EMBEDDED_BYTES)
        .expect("embedded DejaVuSansMono.ttf is a valid font")
});

const BOLD_FILES: &[&str] = &[
    "DejaVuSans-Bold.ttf",
    "LiberationSans-Bold.ttf",
    "Arial Bold.ttf",
    "arialbd.ttf",
];
const REGULAR_FILES: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];

/// Where a face can come from, in the order it is tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// One of the named files inside any of the search directories.
    File(&'static [&'static str]),
    /// The face compiled into the binary. Never fails.
    Embedded,
}

/// The two faces annotations draw with.
#[derive(Clone)]
pub struct FontBook {
    bold: FontArc,
    regular: FontArc,
}

impl FontBook {
    /// Resolve both faces from the given directories.
    ///
    /// Bold tries bold files, then regular files, then the embedded face.
    /// Regular tries regular files, then the embedded face.
    pub fn resolve(search_dirs: &[PathBuf]) -> Self {
        let bold = resolve_chain(
            &[
                FontSource::File(BOLD_FILES),
                FontSource::File(REGULAR_FILES),
                FontSource::Embedded,
            ],
            search_dirs,
        );
        let regular = resolve_chain(
            &[FontSource::File(REGULAR_FILES), FontSource::Embedded],
            search_dirs,
        );
        Self { bold, regular }
    }

    /// Both faces set to the embedded font. Metrics are identical on every host.
    pub fn builtin() -> Self {
        Self {
            bold: EMBEDDED.clone(),
            regular: EMBEDDED.clone(),
        }
    }

    pub fn bold(&self) -> &FontArc {
        &self.bold
    }

    pub fn regular(&self) -> &FontArc {
        &self.regular
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook").finish_non_exhaustive()
    }
}

/// Scale at which a face renders with an em box of `size_px` pixels.
pub fn scale_for(font: &FontArc, size_px: f32) -> PxScale {
    font.pt_to_px_scale(size_px).unwrap_or(PxScale::from(size_px))
}

/// Walk the chain until a source yields a font. The final `Embedded`
/// entry guarantees a result; a chain without it still falls back to it.
pub fn resolve_chain(chain: &[FontSource], search_dirs: &[PathBuf]) -> FontArc {
    for source in chain {
        match source {
            FontSource::File(names) => {
                if let Some(font) = load_first(names, search_dirs) {
                    return font;
                }
            }
            FontSource::Embedded => break,
        }
    }
    log::debug!("[FONTS] Using embedded face");
    EMBEDDED.clone()
}

fn load_first(names: &[&str], search_dirs: &[PathBuf]) -> Option<FontArc> {
    search_dirs
        .iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find_map(|path| load_file(&path))
}

fn load_file(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => {
            log::debug!("[FONTS] Loaded {}", path.display());
            Some(font)
        }
        Err(e) => {
            log::warn!("[FONTS] Skipping unreadable font {}: {}", path.display(), e);
            None
        }
    }
}
