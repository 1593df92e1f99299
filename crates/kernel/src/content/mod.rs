//! Content resolution module.
//!
//! This module provides:
//! - ContentResolver: Resolves stored entries through their bound provider

mod resolver;

pub use resolver::ContentResolver;
