#![forbid(unsafe_code)]

//! The opaque engine trait and its wire types.
//!
//! Everything behind [`ImagingEngine`] is the external engine's business:
//! worker scheduling, codec internals, render passes. We only see the
//! capability-registration side effect at initialization and the
//! decode result-or-error afterwards.

use crate::config::{DecoderSet, RenderMode};

/// A decoded image frame as handed back across the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub columns: u32,
    pub rows: u32,
    /// Bits allocated per sample.
    pub bits_allocated: u16,
    /// Raw pixel buffer, row-major.
    pub pixel_data: Vec<u8>,
}

/// Decode failures surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length payload.
    EmptyPayload,
    /// No enabled decoder handles this transfer syntax.
    UnsupportedTransferSyntax { uid: String },
    /// Engine-internal failure, reported as the engine phrased it.
    Engine(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "empty payload"),
            Self::UnsupportedTransferSyntax { uid } => {
                write!(f, "no enabled decoder for transfer syntax {uid}")
            }
            Self::Engine(msg) => write!(f, "engine error: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// The external imaging engine, seen from this side of the boundary.
///
/// Implementations are driven through an [`crate::EngineHandle`]; the
/// adapter guarantees `register_decoders` is called exactly once per
/// process, at initialization.
pub trait ImagingEngine {
    /// Register decode capabilities with the hosting environment.
    /// Observable process-wide; the adapter calls this exactly once.
    fn register_decoders(&self, decoders: DecoderSet);

    /// Decode one encapsulated frame.
    fn decode(&self, payload: &[u8]) -> Result<DecodedFrame, DecodeError>;

    /// The presentation mode the engine was initialized with.
    fn default_render_mode(&self) -> RenderMode;
}

/// Engine stand-in that registers capabilities but decodes nothing.
///
/// Used by the demo binary and anywhere the composition contract is under
/// test without a real engine present.
#[derive(Debug)]
pub struct NullEngine {
    render_mode: RenderMode,
}

impl NullEngine {
    #[must_use]
    pub fn new(render_mode: RenderMode) -> Self {
        Self { render_mode }
    }
}

impl ImagingEngine for NullEngine {
    fn register_decoders(&self, decoders: DecoderSet) {
        tracing::info!(?decoders, "null engine: decoder registration");
    }

    fn decode(&self, payload: &[u8]) -> Result<DecodedFrame, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }
        Err(DecodeError::Engine("null engine performs no decoding".into()))
    }

    fn default_render_mode(&self) -> RenderMode {
        self.render_mode
    }
}
