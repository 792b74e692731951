//! Screen acquisition boundary.
//!
//! This is the infrastructure layer: the only code that talks to the OS.
//! Everything behind `ScreenSource` may fail; the store decides what to do
//! about it.

use super::region::{CropError, Region};
use image::RgbaImage;

/// Something that can produce a raster image of the screen.
pub trait ScreenSource: Send + Sync {
    /// Grab `monitor` (0 = every monitor combined, n = the n-th monitor),
    /// optionally cut down to `region` in desktop coordinates.
    fn grab(&self, monitor: u32, region: Option<&Region>)
        -> Result<RgbaImage, AcquisitionError>;
}

/// A source for hosts with no display. Every grab fails with `Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl ScreenSource for NoDisplay {
    fn grab(
        &self,
        _monitor: u32,
        _region: Option<&Region>,
    ) -> Result<RgbaImage, AcquisitionError> {
        Err(AcquisitionError::Unavailable)
    }
}

/// Default source for this build: the OS display when compiled with
/// `native-capture`, otherwise `NoDisplay`.
pub fn default_source() -> Box<dyn ScreenSource> {
    #[cfg(feature = "native-capture")]
    {
        Box::new(native::XcapSource)
    }
    #[cfg(not(feature = "native-capture"))]
    {
        Box::new(NoDisplay)
    }
}

/// Whether the process appears to have a display to grab from.
pub fn display_available() -> bool {
    if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")) {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Screen capture is not available on this host")]
    Unavailable,

    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("Monitor {requested} not found. Available monitors: {available}")]
    MonitorNotFound { requested: u32, available: usize },

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    Crop(#[from] CropError),
}

#[cfg(feature = "native-capture")]
pub use native::XcapSource;

#[cfg(feature = "native-capture")]
mod native {
    use super::{AcquisitionError, Region, ScreenSource};
    use crate::capture::region::crop_region;
    use image::RgbaImage;
    use xcap::Monitor;

    /// Grabs the real screen through `xcap`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct XcapSource;

    struct Grabbed {
        image: RgbaImage,
        x: i32,
        y: i32,
    }

    impl ScreenSource for XcapSource {
        fn grab(
            &self,
            monitor: u32,
            region: Option<&Region>,
        ) -> Result<RgbaImage, AcquisitionError> {
            let monitors = Monitor::all()
                .map_err(|e| AcquisitionError::MonitorEnumeration(e.to_string()))?;

            let grabbed = if monitor == 0 {
                virtual_desktop(&monitors)?
            } else {
                let m = monitors.get(monitor as usize - 1).ok_or(
                    AcquisitionError::MonitorNotFound {
                        requested: monitor,
                        available: monitors.len(),
                    },
                )?;
                grab_one(m)?
            };

            match region {
                Some(r) => Ok(crop_region(&grabbed.image, (grabbed.x, grabbed.y), r)?),
                None => Ok(grabbed.image),
            }
        }
    }

    fn grab_one(monitor: &Monitor) -> Result<Grabbed, AcquisitionError> {
        let image = monitor
            .capture_image()
            .map_err(|e| AcquisitionError::CaptureFailed(e.to_string()))?;
        Ok(Grabbed {
            image,
            x: monitor.x().unwrap_or(0),
            y: monitor.y().unwrap_or(0),
        })
    }

    /// Every monitor pasted onto one canvas at its desktop offset.
    fn virtual_desktop(monitors: &[Monitor]) -> Result<Grabbed, AcquisitionError> {
        let shots = monitors
            .iter()
            .map(grab_one)
            .collect::<Result<Vec<_>, _>>()?;

        let min_x = shots.iter().map(|s| s.x).min().ok_or(AcquisitionError::MonitorNotFound {
            requested: 0,
            available: 0,
        })?;
        let min_y = shots.iter().map(|s| s.y).min().unwrap_or(0);
        let max_x = shots.iter().map(|s| s.x + s.image.width() as i32).max().unwrap_or(0);
        let max_y = shots.iter().map(|s| s.y + s.image.height() as i32).max().unwrap_or(0);

        let mut canvas = RgbaImage::new((max_x - min_x) as u32, (max_y - min_y) as u32);
        for shot in &shots {
            image::imageops::replace(
                &mut canvas,
                &shot.image,
                (shot.x - min_x) as i64,
                (shot.y - min_y) as i64,
            );
        }

        log::debug!(
            "[CAPTURE] Virtual desktop {}x{} from {} monitor(s)",
            canvas.width(),
            canvas.height(),
            shots.len()
        );

        Ok(Grabbed {
            image: canvas,
            x: min_x,
            y: min_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_display_always_fails() {
        let err = NoDisplay.grab(0, None).unwrap_err();
        assert!(matches!(err, AcquisitionError::Unavailable));
        let err = NoDisplay.grab(2, Some(&Region::new(0, 0, 10, 10))).unwrap_err();
        assert!(matches!(err, AcquisitionError::Unavailable));
    }

    #[test]
    fn crop_errors_convert() {
        let err: AcquisitionError = CropError::ZeroDimension.into();
        assert_eq!(err.to_string(), "Crop rectangle has zero width or height");
    }
}
