// Shared domain models and error taxonomy for manga-den.

pub use crate::error::*;
pub use crate::models::*;

pub mod error;
pub mod models;
