//! Application services layer.

pub mod convert;
pub mod error;
pub mod render;
