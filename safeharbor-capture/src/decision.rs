//! Capture decision values.
//!
//! Both types carry exactly one private boolean. Whatever produced a
//! suppression, the resulting value is bit-for-bit and key-for-key the same,
//! so nothing downstream can tell a crisis page from a scheduled gap.

use serde::{Deserialize, Serialize};

/// The detector's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureSuppressResult {
    suppress: bool,
}

impl CaptureSuppressResult {
    /// Capture must not happen.
    pub const SUPPRESS: Self = Self { suppress: true };
    /// Capture may happen.
    pub const ALLOW: Self = Self { suppress: false };

    #[must_use]
    pub const fn new(suppress: bool) -> Self {
        Self { suppress }
    }

    #[must_use]
    pub const fn suppress(&self) -> bool {
        self.suppress
    }
}

/// The adapter's verdict, as consumed by platform capture pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureDecision {
    should_capture: bool,
}

impl CaptureDecision {
    #[must_use]
    pub const fn new(should_capture: bool) -> Self {
        Self { should_capture }
    }

    #[must_use]
    pub const fn should_capture(&self) -> bool {
        self.should_capture
    }
}

impl From<CaptureSuppressResult> for CaptureDecision {
    fn from(result: CaptureSuppressResult) -> Self {
        Self::new(!result.suppress())
    }
}
