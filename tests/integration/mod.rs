// tests/integration/mod.rs
//! Integration tests for notion-site-map
//!
//! Builds run the real crawler, builder and renderers; only the page source
//! is replaced by [`workspace::FakeWorkspace`].

#[cfg(test)]
pub mod workspace;

#[cfg(test)]
mod site_map_build;

#[cfg(test)]
mod memoization;
