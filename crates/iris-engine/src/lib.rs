#![forbid(unsafe_code)]

//! Imaging engine boundary for IrisView.
//!
//! The engine that actually decodes and renders DICOM imagery is an
//! external collaborator. This crate owns everything on *our* side of
//! that boundary:
//!
//! - [`EngineConfig`]: the recognized initialization options (decoder
//!   set, worker pool size, default render mode), deserializable from
//!   JSON.
//! - [`ImagingEngine`]: the opaque trait the engine is driven through, so
//!   hosts can swap implementations and tests can stub it.
//! - [`EngineAdapter`]: the singleton lifecycle manager. Initialization
//!   is idempotent: identical re-initialization returns the same engine
//!   handle, conflicting re-initialization fails, and decoder
//!   registration happens exactly once per process.
//!
//! The adapter never decodes or renders; views obtain the
//! [`EngineHandle`] and talk to the engine directly.

pub mod adapter;
pub mod config;
pub mod engine;

pub use adapter::{EngineAdapter, EngineHandle};
pub use config::{DecoderSet, EngineConfig, RenderMode};
pub use engine::{DecodeError, DecodedFrame, ImagingEngine, NullEngine};
