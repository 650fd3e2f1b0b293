use std::collections::BTreeMap;

use noor_tajweed::TajweedSegment;

use crate::error::Error;
use crate::types::{TajweedVerse, VerseKey, VersesResponse};

const DEFAULT_API_BASE: &str = "https://api.quran.foundation/api/v4";
const PER_PAGE: u32 = 50;

/// Client for the Quran.Foundation verse API.
pub struct QuranApiClient {
    api_base: String,
    http: reqwest::Client,
}

#[derive(Default)]
pub struct QuranApiClientBuilder {
    api_base: Option<String>,
    http: Option<reqwest::Client>,
}

impl QuranApiClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn http(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> QuranApiClient {
        QuranApiClient {
            api_base: self
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            http: self.http.unwrap_or_default(),
        }
    }
}

impl QuranApiClient {
    pub fn builder() -> QuranApiClientBuilder {
        QuranApiClientBuilder::default()
    }

    /// Fetch every page of tajweed-annotated verses for one surah. The API
    /// paginates, so pages are followed until `next_page` runs out.
    pub async fn fetch_tajweed_verses(&self, surah: u16) -> Result<Vec<TajweedVerse>, Error> {
        if !(1..=114).contains(&surah) {
            return Err(Error::InvalidSurah(surah));
        }

        let mut verses = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/quran/verses/uthmani_tajweed?chapter_number={surah}&per_page={PER_PAGE}&page={page}",
                self.api_base
            );
            let response = self.http.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(Error::Api {
                    status: response.status().as_u16(),
                });
            }

            let body: VersesResponse = response.json().await?;
            verses.extend(body.verses);

            match body.pagination.and_then(|p| p.next_page) {
                Some(next) => page = next,
                None => break,
            }
        }

        tracing::debug!(surah, verses = verses.len(), "tajweed_verses_fetched");
        Ok(verses)
    }

    /// Fetch a surah and parse each verse's markup into renderable
    /// segments, keyed by verse number.
    pub async fn fetch_tajweed_segments(
        &self,
        surah: u16,
    ) -> Result<BTreeMap<u16, Vec<TajweedSegment>>, Error> {
        let verses = self.fetch_tajweed_verses(surah).await?;

        let mut map = BTreeMap::new();
        for verse in verses {
            let key: VerseKey = verse.verse_key.parse()?;
            map.insert(key.verse, noor_tajweed::parse(&verse.text_uthmani_tajweed));
        }
        Ok(map)
    }
}
