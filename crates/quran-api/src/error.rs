#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("API returned status {status}")]
    Api { status: u16 },
    #[error("invalid verse key: {0}")]
    InvalidVerseKey(String),
    #[error("surah number out of range: {0}")]
    InvalidSurah(u16),
}
