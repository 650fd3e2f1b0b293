/// Quran.com CDN prefix for word-level audio clips.
pub const CDN_BASE: &str = "https://audio.qurancdn.com/wbw";

/// Deterministic CDN URL for one word's clip.
///
/// Path components are zero-padded to three digits; the word component is
/// 1-based on the wire while `word_index` is 0-based.
pub fn word_audio_url(surah: u16, verse: u16, word_index: usize) -> String {
    format!(
        "{CDN_BASE}/{surah:03}_{verse:03}_{word:03}.mp3",
        word = word_index + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_word_of_fatiha() {
        assert_eq!(
            word_audio_url(1, 1, 0),
            "https://audio.qurancdn.com/wbw/001_001_001.mp3"
        );
    }

    #[test]
    fn pads_every_component() {
        assert_eq!(
            word_audio_url(114, 6, 3),
            "https://audio.qurancdn.com/wbw/114_006_004.mp3"
        );
    }

    #[test]
    fn wide_components_are_not_truncated() {
        assert_eq!(
            word_audio_url(2, 255, 120),
            "https://audio.qurancdn.com/wbw/002_255_121.mp3"
        );
    }
}
