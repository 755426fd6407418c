use thiserror::Error;

mod api_key;
mod colors;
mod ids;
mod rich_text;

pub use api_key::*;
pub use colors::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },
}
