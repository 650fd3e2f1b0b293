/// Snapshot of sequencer playback state, published to subscribers on every
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct WordAudioState {
    pub is_playing: bool,
    /// 0-based index of the word being loaded or played, -1 when none.
    pub current_word_index: i32,
    pub total_words: u32,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for WordAudioState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_word_index: -1,
            total_words: 0,
            is_loading: false,
            error: None,
        }
    }
}

impl WordAudioState {
    /// `total_words` is informational and not part of idleness.
    pub(crate) fn is_idle(&self) -> bool {
        !self.is_playing
            && !self.is_loading
            && self.current_word_index == -1
            && self.error.is_none()
    }
}
