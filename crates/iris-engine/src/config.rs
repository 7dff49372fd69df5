#![forbid(unsafe_code)]

//! Engine initialization options.
//!
//! The configuration object is passed through to the engine opaquely; the
//! adapter only compares it for the idempotency check and reads the
//! decoder set for one-time capability registration. JSON form (the demo
//! binary's `--engine-config`):
//!
//! ```json
//! {
//!   "decoders": "DICOM | JPEG2000",
//!   "workerPoolSize": 2,
//!   "defaultRenderMode": "2D"
//! }
//! ```
//!
//! Unknown fields are rejected; a zero worker pool fails deserialization.

use std::num::NonZeroUsize;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Decoders the engine should enable at initialization.
    ///
    /// These are the transfer syntaxes the external engine knows how to
    /// hand off to its decode workers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DecoderSet: u8 {
        /// Uncompressed DICOM pixel data.
        const DICOM = 1;
        /// JPEG baseline (8-bit lossy).
        const JPEG_BASELINE = 1 << 1;
        /// JPEG lossless.
        const JPEG_LOSSLESS = 1 << 2;
        /// JPEG 2000.
        const JPEG2000 = 1 << 3;
        /// Run-length encoding.
        const RLE = 1 << 4;
    }
}

/// How the engine presents imagery until a view asks otherwise.
///
/// Values are engine-defined; we pass them through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Single-slice 2D presentation.
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    /// Multi-planar reconstruction.
    #[serde(rename = "MPR")]
    Mpr,
    /// Volume rendering.
    #[serde(rename = "volume")]
    Volume,
}

/// The full engine initialization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Decoders to enable.
    #[serde(with = "bitflags::serde")]
    pub decoders: DecoderSet,
    /// Decode worker pool size. Must be positive.
    pub worker_pool_size: NonZeroUsize,
    /// Initial presentation mode.
    #[serde(default)]
    pub default_render_mode: RenderMode,
}

impl EngineConfig {
    /// Convenience constructor for programmatic setup.
    #[must_use]
    pub fn new(decoders: DecoderSet, worker_pool_size: NonZeroUsize) -> Self {
        Self {
            decoders,
            worker_pool_size,
            default_render_mode: RenderMode::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DecoderSet::DICOM, NonZeroUsize::MIN)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip() {
        let config = EngineConfig {
            decoders: DecoderSet::DICOM | DecoderSet::JPEG2000,
            worker_pool_size: NonZeroUsize::new(2).unwrap(),
            default_render_mode: RenderMode::Mpr,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn render_mode_defaults_to_2d() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"decoders": "DICOM", "workerPoolSize": 2}"#).unwrap();
        assert_eq!(config.default_render_mode, RenderMode::TwoD);
        assert_eq!(config.decoders, DecoderSet::DICOM);
        assert_eq!(config.worker_pool_size.get(), 2);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = serde_json::from_str::<EngineConfig>(
            r#"{"decoders": "DICOM", "workerPoolSize": 0}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = serde_json::from_str::<EngineConfig>(
            r#"{"decoders": "DICOM", "workerPoolSize": 1, "gpu": true}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn decoder_set_parses_multiple_flags() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"decoders": "JPEG_BASELINE | RLE", "workerPoolSize": 4, "defaultRenderMode": "volume"}"#,
        )
        .unwrap();
        assert!(config.decoders.contains(DecoderSet::JPEG_BASELINE));
        assert!(config.decoders.contains(DecoderSet::RLE));
        assert!(!config.decoders.contains(DecoderSet::DICOM));
        assert_eq!(config.default_render_mode, RenderMode::Volume);
    }
}
