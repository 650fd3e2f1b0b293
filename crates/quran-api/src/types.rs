use crate::error::Error;

/// One verse of the `uthmani_tajweed` endpoint response.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TajweedVerse {
    pub verse_key: String,
    pub text_uthmani_tajweed: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Pagination {
    pub per_page: u32,
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub total_pages: u32,
    pub total_records: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VersesResponse {
    pub verses: Vec<TajweedVerse>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Parsed form of the API's `"surah:verse"` key, e.g. `"2:255"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VerseKey {
    pub surah: u16,
    pub verse: u16,
}

impl std::str::FromStr for VerseKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidVerseKey(s.to_string());
        let (surah, verse) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            surah: surah.parse().map_err(|_| invalid())?,
            verse: verse.parse().map_err(|_| invalid())?,
        })
    }
}

impl std::fmt::Display for VerseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.surah, self.verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verse_key() {
        let key: VerseKey = "2:255".parse().unwrap();
        assert_eq!(key, VerseKey { surah: 2, verse: 255 });
        assert_eq!(key.to_string(), "2:255");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["", "2", "2:", ":5", "a:b", "1:2:3"] {
            assert!(
                bad.parse::<VerseKey>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
