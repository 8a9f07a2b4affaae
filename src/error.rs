//! Outcomes of a fetch that did not print a post
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No account identifier was given")]
    NoInput,

    #[error("Failed to retrieve posts: {0:#}")]
    RetrievalFailed(anyhow::Error),

    #[error("No post other than replies or retweets was found")]
    NoMatch,

    #[error("Failed to write the result: {0}")]
    Output(#[from] std::io::Error),
}
