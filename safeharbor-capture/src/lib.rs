//! Capture decisions for SafeHarbor.
//!
//! The [`PrivacyGapDetector`] turns "is this a crisis resource" and "is this
//! inside a scheduled privacy gap" into a single opaque
//! [`CaptureSuppressResult`]. The [`CaptureAdapter`] wraps it for platform
//! capture pipelines and returns a [`CaptureDecision`].
//!
//! # Example
//!
//! ```
//! use safeharbor_capture::{
//!     CaptureAdapter, DetectorConfig, MemoryScheduleSource, PrivacyGapDetector,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let detector = PrivacyGapDetector::new(
//!     Arc::new(safeharbor_types::bundled_allowlist()),
//!     Arc::new(MemoryScheduleSource::new()),
//!     DetectorConfig::default(),
//! );
//! let adapter = CaptureAdapter::new(Arc::new(detector), "child-1", "android");
//!
//! assert!(!adapter.should_capture("https://988lifeline.org/chat").await.should_capture());
//! assert!(adapter.should_capture("https://example.com/").await.should_capture());
//! # }
//! ```

mod adapter;
mod decision;
mod detector;
mod error;
mod schedule;

pub use adapter::CaptureAdapter;
pub use decision::{CaptureDecision, CaptureSuppressResult};
pub use detector::{AllowlistProvider, DetectorConfig, PrivacyGapDetector};
pub use error::{CaptureError, CaptureResult};
pub use schedule::{MemoryScheduleSource, PrivacyGapSchedule, PrivacyGapWindow, ScheduleSource};
