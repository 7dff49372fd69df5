#![forbid(unsafe_code)]

//! Engine singleton lifecycle.
//!
//! [`EngineAdapter::initialize`] is the one way an engine comes to exist.
//! The contract:
//!
//! 1. First call constructs the engine via the injected factory and
//!    registers its decoders — both exactly once per process.
//! 2. A repeat call with an *identical* configuration returns a handle to
//!    the same engine instance (pointer identity, observable through
//!    [`EngineHandle::same_engine`]).
//! 3. A repeat call with a *different* configuration fails with
//!    [`ConfigurationError::ConflictingEngineConfig`] and leaves the
//!    running engine untouched.
//!
//! Conflict detection is adapter-local (`PartialEq` on the stored
//! config); the engine itself is never asked to arbitrate.

use std::cell::RefCell;
use std::rc::Rc;

use iris_core::ConfigurationError;
use tracing::info;

use crate::config::{EngineConfig, RenderMode};
use crate::engine::{DecodeError, DecodedFrame, ImagingEngine, NullEngine};

/// Shared handle to the initialized engine.
///
/// Cloning is cheap (reference count); all clones address the same engine
/// instance.
pub struct EngineHandle {
    engine: Rc<dyn ImagingEngine>,
}

impl Clone for EngineHandle {
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
        }
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle").finish_non_exhaustive()
    }
}

impl EngineHandle {
    /// Do two handles address the same engine instance?
    #[must_use]
    pub fn same_engine(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine)
    }

    /// Decode one frame through the engine.
    pub fn decode(&self, payload: &[u8]) -> Result<DecodedFrame, DecodeError> {
        self.engine.decode(payload)
    }

    /// The engine's initial presentation mode.
    #[must_use]
    pub fn default_render_mode(&self) -> RenderMode {
        self.engine.default_render_mode()
    }
}

struct Initialized {
    config: EngineConfig,
    handle: EngineHandle,
}

/// Façade over the external engine's initialization entry point.
///
/// Owns the engine singleton for the process; constructed once alongside
/// the store and router, shared by handle (`Rc<EngineAdapter>`).
pub struct EngineAdapter {
    factory: Box<dyn Fn(&EngineConfig) -> Rc<dyn ImagingEngine>>,
    state: RefCell<Option<Initialized>>,
}

impl std::fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl EngineAdapter {
    /// Adapter over an engine constructed by `factory` on first
    /// initialization.
    #[must_use]
    pub fn new(factory: impl Fn(&EngineConfig) -> Rc<dyn ImagingEngine> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            state: RefCell::new(None),
        }
    }

    /// Adapter backed by [`NullEngine`] — for demos and tests.
    #[must_use]
    pub fn with_null_engine() -> Self {
        Self::new(|config| Rc::new(NullEngine::new(config.default_render_mode)))
    }

    /// Initialize the engine, idempotently.
    pub fn initialize(&self, config: EngineConfig) -> Result<EngineHandle, ConfigurationError> {
        let mut state = self.state.borrow_mut();
        if let Some(initialized) = state.as_ref() {
            if initialized.config == config {
                return Ok(initialized.handle.clone());
            }
            return Err(ConfigurationError::ConflictingEngineConfig {
                active: format!("{:?}", initialized.config),
                requested: format!("{config:?}"),
            });
        }

        let engine = (self.factory)(&config);
        engine.register_decoders(config.decoders);
        info!(
            decoders = ?config.decoders,
            workers = config.worker_pool_size.get(),
            mode = ?config.default_render_mode,
            "imaging engine initialized"
        );
        let handle = EngineHandle { engine };
        *state = Some(Initialized {
            config,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Has the engine been initialized?
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Handle to the running engine, if initialized.
    #[must_use]
    pub fn handle(&self) -> Option<EngineHandle> {
        self.state.borrow().as_ref().map(|i| i.handle.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
