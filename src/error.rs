use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Failure of a call against the channel directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Request rejected: {0}")]
    Rejected(String),
}
