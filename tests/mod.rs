// tests/mod.rs
//! Test suite organization for notion-site-map
//!
//! Unit tests exercise single components through the public API; integration
//! tests drive whole builds against an in-memory workspace assembled from the
//! fixtures under `tests/fixtures`.

#[cfg(test)]
pub mod unit;

#[cfg(test)]
pub mod integration;
