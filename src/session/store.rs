//! The in-memory registry of captures and sole authority over capture IDs.

use super::capture::{Capture, CaptureMetadata};
use super::codec;
use crate::annotation::FontBook;
use crate::capture::{default_source, placeholder_image, Region, ScreenSource};
use crate::config::Config;
use crate::error::{Error, Result};
use image::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Owns every capture in the process.
///
/// All mutations happen under one lock. Captures are handed out as `Arc`s,
/// so rendering never holds that lock.
pub struct CaptureStore {
    inner: Mutex<Inner>,
    source: Box<dyn ScreenSource>,
    fonts: Arc<FontBook>,
    force_placeholder: bool,
    placeholder_size: (u32, u32),
}

#[derive(Default)]
struct Inner {
    /// Insertion order; the last entry is the latest capture.
    captures: Vec<Arc<Capture>>,
    counter: u64,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.captures.iter().position(|c| c.id() == id)
    }

    /// `capture_NNN` from the pre-incremented counter, skipping any ID a
    /// caller has already claimed.
    fn next_id(&mut self) -> String {
        loop {
            self.counter += 1;
            let id = format!("capture_{:03}", self.counter);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}

impl CaptureStore {
    /// A store using the build's default screen source and fonts found via
    /// `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(config, default_source(), FontBook::resolve(&config.font_dirs))
    }

    /// A store with an explicit screen source and font book.
    pub fn with_parts(config: &Config, source: Box<dyn ScreenSource>, fonts: FontBook) -> Self {
        if config.force_placeholder {
            log::warn!("[STORE] Placeholder mode: screen captures use a synthetic image");
        }
        Self {
            inner: Mutex::new(Inner::default()),
            source,
            fonts: Arc::new(fonts),
            force_placeholder: config.force_placeholder,
            placeholder_size: config.placeholder_size,
        }
    }

    /// Capture the screen and register the result.
    ///
    /// Never fails: if the screen cannot be grabbed, a placeholder of the
    /// region's size (or the configured default) is used instead.
    pub fn create_from_screen(
        &self,
        monitor: u32,
        region: Option<Region>,
        id: Option<String>,
    ) -> Arc<Capture> {
        let image = self.acquire(monitor, region.as_ref());
        self.register(id, image, monitor, region)
    }

    /// Register a capture from base64 image data, with or without a
    /// `data:...;base64,` prefix.
    pub fn create_from_encoded_image(
        &self,
        data: &str,
        id: Option<String>,
    ) -> Result<Arc<Capture>> {
        let bytes = codec::decode_base64(data)?;
        self.create_from_image_bytes(&bytes, id)
    }

    /// Register a capture from encoded image bytes (PNG, JPEG, ...).
    pub fn create_from_image_bytes(
        &self,
        bytes: &[u8],
        id: Option<String>,
    ) -> Result<Arc<Capture>> {
        let image = codec::decode_image(bytes)?;
        Ok(self.register(id, image, 0, None))
    }

    pub fn get(&self, id: &str) -> Option<Arc<Capture>> {
        let inner = self.inner();
        inner.position(id).map(|i| Arc::clone(&inner.captures[i]))
    }

    /// Like `get`, but an unknown ID is an `Error::NotFound`.
    pub fn lookup(&self, id: &str) -> Result<Arc<Capture>> {
        self.get(id).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Metadata for every capture, oldest first.
    pub fn list(&self) -> Vec<CaptureMetadata> {
        let captures = self.inner().captures.clone();
        captures.iter().map(|c| c.metadata()).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.inner().captures.iter().map(|c| c.id().to_string()).collect()
    }

    /// Remove a capture. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner();
        match inner.position(id) {
            Some(i) => {
                inner.captures.remove(i);
                log::info!("[STORE] Deleted {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every capture and restart ID numbering at `capture_001`.
    pub fn clear_all(&self) {
        let mut inner = self.inner();
        let removed = inner.captures.len();
        *inner = Inner::default();
        log::info!("[STORE] Cleared {} capture(s)", removed);
    }

    /// The most recently inserted capture. Replacing an existing ID does not
    /// count as an insertion.
    pub fn latest(&self) -> Option<Arc<Capture>> {
        self.inner().captures.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner().captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner().captures.is_empty()
    }

    fn acquire(&self, monitor: u32, region: Option<&Region>) -> RgbaImage {
        if !self.force_placeholder {
            match self.source.grab(monitor, region) {
                Ok(image) => return image,
                Err(e) => log::warn!("[CAPTURE] Screen capture failed: {}. Using placeholder.", e),
            }
        }
        let (width, height) = region
            .map(|r| (r.width, r.height))
            .unwrap_or(self.placeholder_size);
        placeholder_image(width, height, &self.fonts)
    }

    fn register(
        &self,
        id: Option<String>,
        image: RgbaImage,
        monitor: u32,
        region: Option<Region>,
    ) -> Arc<Capture> {
        let mut inner = self.inner();
        let id = id.unwrap_or_else(|| inner.next_id());
        let capture = Arc::new(Capture::new(id, image, monitor, region, Arc::clone(&self.fonts)));

        // A reused ID keeps its slot, so `latest` does not move.
        match inner.position(capture.id()) {
            Some(i) => {
                log::info!("[STORE] Replacing existing capture {}", capture.id());
                inner.captures[i] = Arc::clone(&capture);
            }
            None => inner.captures.push(Arc::clone(&capture)),
        }
        log::info!(
            "[STORE] Created {} ({}x{}, monitor {})",
            capture.id(),
            capture.width(),
            capture.height(),
            monitor
        );
        capture
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        // Every mutation is a single Vec operation, so a poisoned lock
        // still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::NoDisplay;

    fn store() -> CaptureStore {
        let config = Config {
            placeholder_size: (64, 48),
            ..Config::default()
        };
        CaptureStore::with_parts(&config, Box::new(NoDisplay), FontBook::builtin())
    }

    #[test]
    fn generated_ids_are_sequential() {
        let s = store();
        let ids: Vec<_> = (0..3)
            .map(|_| s.create_from_screen(0, None, None).id().to_string())
            .collect();
        assert_eq!(ids, ["capture_001", "capture_002", "capture_003"]);
    }

    #[test]
    fn counter_is_not_reused_after_delete() {
        let s = store();
        s.create_from_screen(0, None, None);
        s.create_from_screen(0, None, None);
        assert!(s.delete("capture_002"));
        assert_eq!(s.create_from_screen(0, None, None).id(), "capture_003");
    }

    #[test]
    fn generated_ids_skip_claimed_ones() {
        let s = store();
        s.create_from_screen(0, None, Some("capture_001".into()));
        assert_eq!(s.create_from_screen(0, None, None).id(), "capture_002");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn duplicate_client_id_replaces_in_place() {
        let s = store();
        s.create_from_screen(0, None, Some("shot".into()));
        let newest = s.create_from_screen(0, None, None);
        let region = Some(Region::new(0, 0, 10, 10));
        let replaced = s.create_from_screen(0, region, Some("shot".into()));
        assert_eq!(s.len(), 2);
        assert_eq!(s.ids(), ["shot", "capture_001"]);
        assert!(Arc::ptr_eq(&s.latest().unwrap(), &newest));
        assert!(Arc::ptr_eq(&s.get("shot").unwrap(), &replaced));
        assert_eq!(s.get("shot").unwrap().width(), 10);
    }

    #[test]
    fn replacing_the_latest_keeps_it_latest() {
        let s = store();
        s.create_from_screen(0, None, None);
        s.create_from_screen(0, None, Some("shot".into()));
        let region = Some(Region::new(0, 0, 4, 4));
        let replaced = s.create_from_screen(0, region, Some("shot".into()));
        assert!(Arc::ptr_eq(&s.latest().unwrap(), &replaced));
        assert_eq!(s.ids(), ["capture_001", "shot"]);
    }

    #[test]
    fn placeholder_uses_region_size() {
        let s = store();
        let c = s.create_from_screen(1, Some(Region::new(5, 5, 30, 20)), None);
        assert_eq!((c.width(), c.height()), (30, 20));
        assert_eq!(c.region(), Some(Region::new(5, 5, 30, 20)));
        assert_eq!(c.monitor(), 1);
    }

    #[test]
    fn lookup_reports_not_found() {
        let s = store();
        assert!(matches!(s.lookup("missing"), Err(Error::NotFound(id)) if id == "missing"));
        assert!(!s.delete("missing"));
    }

    #[test]
    fn latest_and_empty() {
        let s = store();
        assert!(s.latest().is_none());
        assert!(s.is_empty());
        s.create_from_screen(0, None, None);
        let second = s.create_from_screen(0, None, None);
        assert_eq!(s.latest().unwrap().id(), second.id());
        s.clear_all();
        assert!(s.is_empty());
        assert!(s.latest().is_none());
    }

    #[test]
    fn bad_payload_creates_nothing() {
        let s = store();
        assert!(s.create_from_encoded_image("data:image/png;base64,%%%", None).is_err());
        assert!(s.create_from_image_bytes(b"not an image", None).is_err());
        assert!(s.is_empty());
        // A failed decode does not consume an ID.
        assert_eq!(s.create_from_screen(0, None, None).id(), "capture_001");
    }

    #[test]
    fn concurrent_creation_yields_unique_ids() {
        let s = Arc::new(store());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = Arc::clone(&s);
                std::thread::spawn(move || {
                    (0..10)
                        .map(|_| s.create_from_screen(0, None, None).id().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids: Vec<String> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40);
        assert_eq!(s.len(), 40);
    }
}
