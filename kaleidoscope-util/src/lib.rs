//! # Kaleidoscope
//!
//! Shared utilities for the Kaleidoscope front end.

pub mod source;

#[cfg(test)]
mod tests;
