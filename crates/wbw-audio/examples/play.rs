use std::time::Duration;

use wbw_audio::{RodioPlayer, WordAudioSequencer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let surah: u16 = args.next().as_deref().unwrap_or("1").parse()?;
    let verse: u16 = args.next().as_deref().unwrap_or("1").parse()?;
    let word_count: usize = args.next().as_deref().unwrap_or("4").parse()?;

    let stream = rodio::OutputStreamBuilder::open_default_stream()?;
    let sequencer = WordAudioSequencer::new(RodioPlayer::new(stream.mixer().clone()));

    let _subscription = sequencer.subscribe(|state| {
        eprintln!(
            "[state] playing={} loading={} word={}/{} error={:?}",
            state.is_playing,
            state.is_loading,
            state.current_word_index,
            state.total_words,
            state.error
        );
    });

    eprintln!("playing {surah}:{verse} word by word ({word_count} words)");
    sequencer.play_all_words(surah, verse, word_count).await;

    // let the final transition land before tearing the stream down
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
