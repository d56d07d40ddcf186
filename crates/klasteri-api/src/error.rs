//! Error taxonomy for API calls.
//!
//! Transport failures and unexpected statuses surface to the UI as a banner;
//! expected absences (no summary today, empty result lists) are modelled as
//! `Ok` values by the client, not as errors. There is no retry logic — every
//! failure is terminal for its request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("kërkesa dështoi: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serveri u përgjigj me {status} për {url}")]
    Status { status: u16, url: String },

    #[error("grupi i lajmeve {0} nuk u gjet")]
    ClusterNotFound(i64),

    #[error("termi i kërkimit duhet të ketë të paktën 2 karaktere")]
    QueryTooShort,
}

pub type Result<T> = std::result::Result<T, ApiError>;
