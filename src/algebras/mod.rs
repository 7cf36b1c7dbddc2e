//! Capability algebras for notion-site-map.
//!
//! This module defines algebraic traits that represent **capabilities**,
//! not implementations. Each trait is:
//!
//! - **Object-safe**: can be used as `dyn Trait`
//! - **Documented with laws**: properties that all implementations must satisfy
//! - **Async via `async_trait`**
//!
//! # Architecture
//!
//! ```text
//! Site map builder (site_map/)
//!         ↓
//! Algebras (algebras/)
//!         ↓
//! Interpreters (api/)
//! ```
//!
//! # Capability Traits
//!
//! - [`PageSource`]: load one page's record map
//! - [`ContentGraph`]: discover every page reachable from a root
//! - [`VisitTracker`]: visit tracking for cycle detection

pub mod content;
pub mod error;
pub mod state;

// Re-exports for convenience
pub use content::{ContentGraph, PageSource};
pub use error::{FetchError, TrackError};
pub use state::{InMemoryVisitTracker, VisitTracker};
