// tests/unit/mod.rs
//! Unit tests for notion-site-map components
//!
//! These focus on individual components in isolation, without I/O.

#[cfg(test)]
mod api_parsing;

#[cfg(test)]
mod types;
