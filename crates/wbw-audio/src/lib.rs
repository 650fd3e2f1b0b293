mod player;
mod sequencer;
mod state;
mod url;

#[cfg(feature = "rodio-backend")]
mod rodio;

pub use player::{AudioHandle, AudioPlayer, PlayerError};
pub use sequencer::{Subscription, WordAudioSequencer};
pub use state::WordAudioState;
pub use url::{CDN_BASE, word_audio_url};

#[cfg(feature = "rodio-backend")]
pub use self::rodio::RodioPlayer;
