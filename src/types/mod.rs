use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
