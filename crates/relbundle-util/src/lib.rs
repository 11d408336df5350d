//! Shared utilities for relbundle.
//!
//! Cross-cutting concerns used by the other relbundle crates: the error
//! type, filesystem helpers, MD5/SHA-1 hashing, process spawning, and
//! terminal status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod process;
pub mod progress;
