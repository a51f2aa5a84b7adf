//! Handler-local request and response types
//!
//! Course and collection payloads live in `educa_applications::types`.

pub mod common;

pub use common::*;
