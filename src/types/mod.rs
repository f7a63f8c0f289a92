use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid session token: {reason}")]
    InvalidToken { reason: String },

    #[error("Unknown post status: {0}")]
    UnknownStatus(String),

    #[error("Unknown post type: {0}")]
    UnknownType(String),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: usize, min: usize, max: usize },
}
