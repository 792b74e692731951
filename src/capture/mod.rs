//! Screen acquisition domain: public API.
//!
//! Owns everything that produces a base image from the screen: the
//! `ScreenSource` boundary, region cropping, and the placeholder that
//! stands in when no display can be grabbed.

mod placeholder;
mod region;
mod screenshot;

pub use placeholder::{placeholder_image, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use region::{crop_region, CropError, Region};
pub use screenshot::{default_source, display_available, AcquisitionError, NoDisplay, ScreenSource};

#[cfg(feature = "native-capture")]
pub use screenshot::XcapSource;
