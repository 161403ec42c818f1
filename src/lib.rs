pub mod diag;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod scene;
pub mod settings;

pub use error::{Result, ZonetapeError};
