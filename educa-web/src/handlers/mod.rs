//! HTTP request handlers, grouped by resource

pub mod collections;
pub mod courses;
pub mod health;
pub mod types;

pub use collections::*;
pub use courses::*;
pub use health::*;

pub use types::*;
