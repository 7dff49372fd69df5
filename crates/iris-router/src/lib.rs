#![forbid(unsafe_code)]

//! Client-side view router for IrisView.
//!
//! Maps URL-like paths to view identifiers plus bound parameters:
//!
//! - [`RoutePattern`]: parsed `/`-separated pattern; `:name` segments
//!   capture one path segment each.
//! - [`Router`]: ordered route table, resolved first-match-wins, with an
//!   optional fallback for unmatched paths.
//! - [`ActiveRoute`]: the current resolution, published atomically through
//!   a [`iris_store::Signal`] so readers never see a torn view-id/params
//!   pair.
//!
//! # Invariants
//!
//! 1. The route table is immutable after [`RouterBuilder::build`].
//! 2. Entries are tested in registration order; the first match wins,
//!    even when a later entry is a more specific literal match. This is
//!    deliberate policy, not an error.
//! 3. Navigation is synchronous; the active route always reflects the
//!    most recent completed navigation.

pub mod pattern;
pub mod router;

pub use pattern::{ParamKind, ParamSchema, RoutePattern};
pub use router::{ActiveRoute, RouteEntry, Router, RouterBuilder};
