mod client;
mod error;
mod types;

pub use client::{QuranApiClient, QuranApiClientBuilder};
pub use error::Error;
pub use types::{Pagination, TajweedVerse, VerseKey, VersesResponse};
