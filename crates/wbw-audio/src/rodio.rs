use std::io::Cursor;
use std::time::Duration;

use ::rodio::mixer::Mixer;
use ::rodio::{Decoder, Sink};

use crate::player::{AudioHandle, AudioPlayer, PlayerError};

const FINISH_POLL: Duration = Duration::from_millis(20);

/// [`AudioPlayer`] backed by rodio playback and reqwest clip fetching.
///
/// The caller keeps the `rodio::OutputStream` alive for the lifetime of the
/// player (the stream is not `Send`); the player itself only holds a mixer
/// handle and can be shared freely across tasks.
pub struct RodioPlayer {
    mixer: Mixer,
    http: reqwest::Client,
}

impl RodioPlayer {
    pub fn new(mixer: Mixer) -> Self {
        Self::with_http(mixer, reqwest::Client::new())
    }

    pub fn with_http(mixer: Mixer, http: reqwest::Client) -> Self {
        Self { mixer, http }
    }
}

pub struct RodioHandle {
    sink: Sink,
}

impl AudioPlayer for RodioPlayer {
    type Handle = RodioHandle;

    async fn load(&self, url: &str) -> Result<RodioHandle, PlayerError> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let decoder = Decoder::new(Cursor::new(bytes))?;
        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.append(decoder);
        Ok(RodioHandle { sink })
    }
}

impl AudioHandle for RodioHandle {
    async fn play(&self) -> Result<(), PlayerError> {
        self.sink.play();
        Ok(())
    }

    async fn finished(&self) -> Result<(), PlayerError> {
        // Sink has no async completion signal; poll the queue instead of
        // blocking a worker thread in sleep_until_end.
        while !self.sink.empty() {
            tokio::time::sleep(FINISH_POLL).await;
        }
        Ok(())
    }

    fn stop(&self) {
        self.sink.stop();
    }
}
