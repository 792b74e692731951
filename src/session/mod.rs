//! Capture sessions: the capture entity, its encodings, and the store
//! that owns them.

mod capture;
pub mod codec;
mod store;

pub use capture::{Capture, CaptureMetadata};
pub use codec::OutputFormat;
pub use store::CaptureStore;
