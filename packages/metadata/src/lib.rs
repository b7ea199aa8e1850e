//! # Stencil element metadata
//!
//! Read-only per-frame snapshots of the rendered element tree (measured
//! frames, computed layout modes, tree relationships) plus the authored
//! property store. Both are replaced wholesale by the external measurement
//! and commit pipelines; the interaction engine only reads them.

pub mod element_metadata;
pub mod props;

pub use element_metadata::*;
pub use props::*;
