//! Cross-platform utilities
//!
//! - [`fs`] - reading generated files and rewriting them atomically
//! - [`platform`] - host-independent path string normalization

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, read_text_file};
pub use platform::{normalize_root, normalize_separators};
