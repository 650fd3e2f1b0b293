use std::future::Future;

/// Error produced by an audio backend. Boxed so any backend's error type can
/// flow through the capability surface.
pub type PlayerError = Box<dyn std::error::Error + Send + Sync>;

/// Capability surface for platform audio playback.
///
/// The sequencer owns every handle it loads and pairs each acquisition with
/// a `stop`; backends only need to fetch, decode, start, and halt clips.
pub trait AudioPlayer: Send + Sync + 'static {
    type Handle: AudioHandle;

    /// Fetch and decode the clip at `url`. The returned handle is ready to
    /// start but not yet audible.
    fn load(&self, url: &str) -> impl Future<Output = Result<Self::Handle, PlayerError>> + Send;
}

pub trait AudioHandle: Send + Sync + 'static {
    /// Begin playback. Resolves once playback has started, not when the
    /// clip completes.
    fn play(&self) -> impl Future<Output = Result<(), PlayerError>> + Send;

    /// Resolves when the clip reaches its natural end, or promptly after
    /// `stop` was called.
    fn finished(&self) -> impl Future<Output = Result<(), PlayerError>> + Send;

    /// Halt playback and release the underlying resource. Idempotent.
    fn stop(&self);
}
