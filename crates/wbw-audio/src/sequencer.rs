use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use futures_util::future::join_all;

use crate::player::{AudioHandle, AudioPlayer};
use crate::state::WordAudioState;
use crate::url::word_audio_url;

/// How many upcoming clips `play_all_words` keeps loaded ahead of the word
/// currently playing.
const PRELOAD_AHEAD: usize = 3;

type Listener = Arc<dyn Fn(&WordAudioState) + Send + Sync>;

struct Subscribers {
    state: WordAudioState,
    listeners: Vec<(u64, Listener)>,
}

impl Subscribers {
    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

struct Shared<P: AudioPlayer> {
    player: P,
    /// Monotonic request token. Bumped by every play request and by `stop`;
    /// an async continuation whose token no longer matches the counter is
    /// superseded and must not touch state.
    request_seq: AtomicU64,
    next_listener_id: AtomicU64,
    subscribers: Arc<Mutex<Subscribers>>,
    current: tokio::sync::Mutex<Option<Arc<P::Handle>>>,
    /// Clips loaded ahead of playback, keyed by URL so a stale entry for a
    /// different verse is merely unused rather than played by mistake.
    preloaded: tokio::sync::Mutex<HashMap<String, Arc<P::Handle>>>,
}

/// Word-by-word playback controller for a single verse at a time.
///
/// At most one playback session is active per sequencer: a new
/// `play_word`/`play_all_words` call supersedes whatever is in flight,
/// halting and releasing its clip before loading the next. State
/// transitions are published to subscribers in order, none skipped.
///
/// Cloning is cheap and shares the same playback session.
pub struct WordAudioSequencer<P: AudioPlayer> {
    shared: Arc<Shared<P>>,
}

impl<P: AudioPlayer> Clone for WordAudioSequencer<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let mut inner = subscribers.lock().unwrap();
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<P: AudioPlayer> WordAudioSequencer<P> {
    pub fn new(player: P) -> Self {
        Self {
            shared: Arc::new(Shared {
                player,
                request_seq: AtomicU64::new(0),
                next_listener_id: AtomicU64::new(0),
                subscribers: Arc::new(Mutex::new(Subscribers {
                    state: WordAudioState::default(),
                    listeners: Vec::new(),
                })),
                current: tokio::sync::Mutex::new(None),
                preloaded: tokio::sync::Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Synchronous snapshot of the current playback state.
    pub fn state(&self) -> WordAudioState {
        self.shared.subscribers.lock().unwrap().state.clone()
    }

    /// Register a listener invoked on every state transition, in transition
    /// order. The listener is called immediately with the current state and
    /// unregistered when the returned [`Subscription`] is dropped.
    ///
    /// Callbacks run while the sequencer's state lock is held; do not call
    /// back into the sequencer from inside a listener.
    pub fn subscribe(
        &self,
        listener: impl Fn(&WordAudioState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);

        let mut inner = self.shared.subscribers.lock().unwrap();
        listener(&inner.state);
        inner.listeners.push((id, listener));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.shared.subscribers),
        }
    }

    /// Play a single word's clip. Returns once playback has started; the
    /// transition back to idle happens when the clip finishes on its own.
    /// Failures surface through the `error` field, never a return value.
    pub async fn play_word(&self, surah: u16, verse: u16, word_index: usize) {
        let token = self.begin_request().await;
        self.commit(token, |state| {
            state.is_loading = true;
            state.is_playing = false;
            state.error = None;
            state.current_word_index = word_index as i32;
        });

        let Some(handle) = self.acquire(token, surah, verse, word_index).await else {
            return;
        };
        if !self.start(token, &handle).await {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            if handle.finished().await.is_err() {
                return;
            }
            if this.commit(token, |state| {
                state.is_playing = false;
                state.current_word_index = -1;
            }) {
                this.release_if_current(token).await;
            }
        });
    }

    /// Play words `0..word_count` in order, auto-advancing as each clip
    /// finishes, preloading up to [`PRELOAD_AHEAD`] clips ahead. The whole
    /// sequence aborts on the first failure; it never skips a word. Returns
    /// when the sequence ends, fails, or is superseded.
    pub async fn play_all_words(&self, surah: u16, verse: u16, word_count: usize) {
        let token = self.begin_request().await;

        if word_count == 0 {
            self.reset_if_active(token);
            return;
        }

        for word_index in 0..word_count {
            if !self.commit(token, |state| {
                state.is_loading = true;
                state.is_playing = false;
                state.error = None;
                state.total_words = word_count as u32;
                state.current_word_index = word_index as i32;
            }) {
                return;
            }

            self.spawn_preload_window(surah, verse, word_index + 1, word_count);

            let Some(handle) = self.acquire(token, surah, verse, word_index).await else {
                return;
            };
            if !self.start(token, &handle).await {
                return;
            }

            match handle.finished().await {
                Ok(()) => {
                    if !self.is_current(token) {
                        return;
                    }
                }
                Err(error) => {
                    self.commit(token, |state| {
                        state.is_playing = false;
                        state.is_loading = false;
                        state.error = Some(error.to_string());
                    });
                    return;
                }
            }
        }

        if self.commit(token, |state| {
            state.is_playing = false;
            state.is_loading = false;
            state.current_word_index = -1;
        }) {
            self.release_if_current(token).await;
        }
    }

    /// Warm the clip cache for words `0..word_count` ahead of playback,
    /// loading concurrently. Failures are non-critical; missing words load
    /// on demand.
    pub async fn preload_words(&self, surah: u16, verse: u16, word_count: usize) {
        join_all((0..word_count).map(|word_index| self.preload_one(surah, verse, word_index)))
            .await;
    }

    /// Halt any in-flight or playing clip, release preloaded clips, and
    /// return to idle with `current_word_index = -1`. Safe from any state;
    /// from idle it fires no transition.
    pub async fn stop(&self) {
        let token = self.shared.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.release_current().await;
        self.clear_preloaded().await;
        self.reset_if_active(token);
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Supersede whatever is in flight and halt its clip. Returns the token
    /// of the new request.
    async fn begin_request(&self) -> u64 {
        let token = self.shared.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.release_current().await;
        token
    }

    fn is_current(&self, token: u64) -> bool {
        self.shared.request_seq.load(Ordering::SeqCst) == token
    }

    /// Applies `mutate` and notifies subscribers, unless `token` is stale.
    /// The staleness check runs under the state lock, so a concurrent
    /// `stop` or newer request cannot interleave between check and commit.
    fn commit(&self, token: u64, mutate: impl FnOnce(&mut WordAudioState)) -> bool {
        let mut inner = self.shared.subscribers.lock().unwrap();
        if !self.is_current(token) {
            return false;
        }
        mutate(&mut inner.state);
        inner.notify();
        true
    }

    /// Reset to idle and notify, unless already idle or superseded.
    fn reset_if_active(&self, token: u64) {
        let mut inner = self.shared.subscribers.lock().unwrap();
        if !self.is_current(token) || inner.state.is_idle() {
            return;
        }
        inner.state = WordAudioState::default();
        inner.notify();
    }

    /// Load the clip for one word, preferring a preloaded handle, and make
    /// it the active clip. Returns `None` if the request was superseded or
    /// the load failed (committing the error state in the latter case).
    async fn acquire(
        &self,
        token: u64,
        surah: u16,
        verse: u16,
        word_index: usize,
    ) -> Option<Arc<P::Handle>> {
        let url = word_audio_url(surah, verse, word_index);

        let preloaded = self.shared.preloaded.lock().await.remove(&url);
        let handle = match preloaded {
            Some(handle) => handle,
            None => match self.shared.player.load(&url).await {
                Ok(handle) => Arc::new(handle),
                Err(error) => {
                    tracing::warn!(%url, %error, "wbw_load_failed");
                    self.commit(token, |state| {
                        state.is_loading = false;
                        state.is_playing = false;
                        state.error = Some(error.to_string());
                    });
                    return None;
                }
            },
        };

        if !self.install_current(token, Arc::clone(&handle)).await {
            return None;
        }
        Some(handle)
    }

    /// Start the active clip and commit the playing transition.
    async fn start(&self, token: u64, handle: &Arc<P::Handle>) -> bool {
        if let Err(error) = handle.play().await {
            handle.stop();
            self.commit(token, |state| {
                state.is_loading = false;
                state.is_playing = false;
                state.error = Some(error.to_string());
            });
            return false;
        }
        self.commit(token, |state| {
            state.is_loading = false;
            state.is_playing = true;
        })
    }

    /// Swap `handle` in as the active clip, halting the previous one. A
    /// stale request's handle is stopped and discarded instead.
    async fn install_current(&self, token: u64, handle: Arc<P::Handle>) -> bool {
        let mut current = self.shared.current.lock().await;
        if !self.is_current(token) {
            handle.stop();
            return false;
        }
        if let Some(previous) = current.take() {
            previous.stop();
        }
        *current = Some(handle);
        true
    }

    async fn release_current(&self) {
        if let Some(handle) = self.shared.current.lock().await.take() {
            handle.stop();
        }
    }

    /// Release the active clip only if `token` still owns it; a newer
    /// request's clip is left untouched.
    async fn release_if_current(&self, token: u64) {
        let mut current = self.shared.current.lock().await;
        if self.is_current(token) {
            if let Some(handle) = current.take() {
                handle.stop();
            }
        }
    }

    async fn clear_preloaded(&self) {
        let mut preloaded = self.shared.preloaded.lock().await;
        for (_, handle) in preloaded.drain() {
            handle.stop();
        }
    }

    async fn preload_one(&self, surah: u16, verse: u16, word_index: usize) {
        let url = word_audio_url(surah, verse, word_index);
        if self.shared.preloaded.lock().await.contains_key(&url) {
            return;
        }
        match self.shared.player.load(&url).await {
            Ok(handle) => {
                self.shared
                    .preloaded
                    .lock()
                    .await
                    .insert(url, Arc::new(handle));
            }
            Err(error) => {
                tracing::warn!(%url, %error, "wbw_preload_failed");
            }
        }
    }

    fn spawn_preload_window(&self, surah: u16, verse: u16, from: usize, word_count: usize) {
        let upto = (from + PRELOAD_AHEAD).min(word_count);
        if from >= upto {
            return;
        }
        let this = self.clone();
        tokio::spawn(async move {
            for word_index in from..upto {
                this.preload_one(surah, verse, word_index).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerError;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const CLIP: Duration = Duration::from_millis(100);

    #[derive(Default)]
    struct FakeLog {
        loads: Mutex<Vec<String>>,
    }

    impl FakeLog {
        fn loads(&self) -> Vec<String> {
            self.loads.lock().unwrap().clone()
        }
    }

    struct FakePlayer {
        log: Arc<FakeLog>,
        fail_urls: Vec<String>,
    }

    struct FakeHandle {
        cancel: CancellationToken,
    }

    impl AudioPlayer for FakePlayer {
        type Handle = FakeHandle;

        async fn load(&self, url: &str) -> Result<FakeHandle, PlayerError> {
            self.log.loads.lock().unwrap().push(url.to_string());
            if self.fail_urls.iter().any(|fail| fail == url) {
                return Err(format!("load failed: {url}").into());
            }
            Ok(FakeHandle {
                cancel: CancellationToken::new(),
            })
        }
    }

    impl AudioHandle for FakeHandle {
        async fn play(&self) -> Result<(), PlayerError> {
            Ok(())
        }

        async fn finished(&self) -> Result<(), PlayerError> {
            tokio::select! {
                _ = tokio::time::sleep(CLIP) => {}
                _ = self.cancel.cancelled() => {}
            }
            Ok(())
        }

        fn stop(&self) {
            self.cancel.cancel();
        }
    }

    type Transitions = Arc<Mutex<Vec<WordAudioState>>>;

    fn harness(
        fail_urls: &[&str],
    ) -> (
        WordAudioSequencer<FakePlayer>,
        Arc<FakeLog>,
        Transitions,
        Subscription,
    ) {
        let log = Arc::new(FakeLog::default());
        let player = FakePlayer {
            log: Arc::clone(&log),
            fail_urls: fail_urls.iter().map(|s| s.to_string()).collect(),
        };
        let sequencer = WordAudioSequencer::new(player);

        let transitions: Transitions = Arc::new(Mutex::new(Vec::new()));
        let subscription = sequencer.subscribe({
            let transitions = Arc::clone(&transitions);
            move |state| transitions.lock().unwrap().push(state.clone())
        });
        // drop the initial snapshot so tests only see transitions
        transitions.lock().unwrap().clear();

        (sequencer, log, transitions, subscription)
    }

    fn recorded(transitions: &Transitions) -> Vec<WordAudioState> {
        transitions.lock().unwrap().clone()
    }

    async fn wait_until(
        sequencer: &WordAudioSequencer<FakePlayer>,
        predicate: impl Fn(&WordAudioState) -> bool,
    ) {
        for _ in 0..1000 {
            if predicate(&sequencer.state()) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("sequencer never reached expected state");
    }

    #[tokio::test(start_paused = true)]
    async fn play_word_loads_plays_then_idles() {
        let (sequencer, _log, transitions, _sub) = harness(&[]);

        sequencer.play_word(1, 1, 2).await;

        let after_start = recorded(&transitions);
        assert_eq!(after_start.len(), 2);
        assert!(after_start[0].is_loading);
        assert_eq!(after_start[0].current_word_index, 2);
        assert!(!after_start[0].is_playing);
        assert!(after_start[1].is_playing);
        assert!(!after_start[1].is_loading);
        assert_eq!(after_start[1].current_word_index, 2);

        tokio::time::sleep(CLIP * 2).await;

        let all = recorded(&transitions);
        assert_eq!(all.len(), 3);
        assert!(!all[2].is_playing);
        assert_eq!(all[2].current_word_index, -1);
        assert!(all[2].error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn play_all_words_advances_in_order() {
        let (sequencer, log, transitions, _sub) = harness(&[]);

        sequencer.play_all_words(1, 1, 3).await;

        let all = recorded(&transitions);
        let indices: Vec<i32> = all.iter().map(|s| s.current_word_index).collect();
        assert_eq!(indices, [0, 0, 1, 1, 2, 2, -1]);

        // every word is announced as loading before it plays
        for pair in all.chunks(2).take(3) {
            assert!(pair[0].is_loading && !pair[0].is_playing);
            assert!(pair[1].is_playing && !pair[1].is_loading);
            assert_eq!(pair[0].total_words, 3);
        }
        assert!(all.last().unwrap().is_idle());

        let mut urls = log.loads();
        urls.sort();
        urls.dedup();
        assert_eq!(
            urls,
            [
                word_audio_url(1, 1, 0),
                word_audio_url(1, 1, 1),
                word_audio_url(1, 1, 2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn play_all_words_aborts_on_first_load_failure() {
        let fail = word_audio_url(1, 1, 1);
        let (sequencer, _log, transitions, _sub) = harness(&[&fail]);

        sequencer.play_all_words(1, 1, 3).await;

        let all = recorded(&transitions);
        let last = all.last().unwrap();
        assert!(last.error.as_deref().unwrap().contains("load failed"));
        assert!(!last.is_playing && !last.is_loading);

        // the sequence never reaches word 2
        assert!(all.iter().all(|s| s.current_word_index < 2));
    }

    #[tokio::test(start_paused = true)]
    async fn new_request_preempts_running_sequence() {
        let (sequencer, _log, transitions, _sub) = harness(&[]);

        let background = sequencer.clone();
        let sequence = tokio::spawn(async move { background.play_all_words(1, 1, 5).await });
        wait_until(&sequencer, |s| s.is_playing && s.current_word_index == 0).await;

        sequencer.play_word(1, 1, 2).await;
        sequence.await.unwrap();

        let all = recorded(&transitions);
        let preempt = all
            .iter()
            .position(|s| s.is_loading && s.current_word_index == 2)
            .expect("preempting request must announce loading");

        // nothing from the superseded sequence appears after the preemption
        assert!(
            all[preempt..]
                .iter()
                .all(|s| s.current_word_index == 2 || s.current_word_index == -1)
        );
        assert!(all.iter().all(|s| s.current_word_index < 3));

        tokio::time::sleep(CLIP * 2).await;
        assert_eq!(sequencer.state().current_word_index, -1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_from_idle_fires_no_transition() {
        let (sequencer, _log, transitions, _sub) = harness(&[]);

        sequencer.stop().await;

        assert!(recorded(&transitions).is_empty());
        assert_eq!(sequencer.state(), WordAudioState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_playing_resets_synchronously() {
        let (sequencer, _log, transitions, _sub) = harness(&[]);

        sequencer.play_word(1, 1, 0).await;
        sequencer.stop().await;

        let all = recorded(&transitions);
        let last = all.last().unwrap();
        assert_eq!(last, &WordAudioState::default());

        // the halted clip's completion must not resurface
        tokio::time::sleep(CLIP * 2).await;
        assert_eq!(recorded(&transitions).len(), all.len());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_clears_error_state() {
        let fail = word_audio_url(1, 1, 0);
        let (sequencer, _log, _transitions, _sub) = harness(&[&fail]);

        sequencer.play_word(1, 1, 0).await;
        assert!(sequencer.state().error.is_some());

        sequencer.stop().await;
        assert_eq!(sequencer.state(), WordAudioState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_word_sequence_settles_idle() {
        let fail = word_audio_url(1, 1, 0);
        let (sequencer, _log, transitions, _sub) = harness(&[&fail]);

        // from idle: nothing to do, nothing emitted
        sequencer.play_all_words(1, 1, 0).await;
        assert!(recorded(&transitions).is_empty());

        // from an error state: settles back to idle
        sequencer.play_word(1, 1, 0).await;
        sequencer.play_all_words(1, 1, 0).await;
        assert_eq!(sequencer.state(), WordAudioState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn preloaded_clips_are_not_loaded_twice() {
        let (sequencer, log, _transitions, _sub) = harness(&[]);

        sequencer.preload_words(1, 1, 2).await;
        assert_eq!(log.loads().len(), 2);

        sequencer.play_all_words(1, 1, 2).await;
        assert_eq!(log.loads().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn preload_failure_is_non_critical() {
        let fail = word_audio_url(1, 1, 1);
        let (sequencer, _log, _transitions, _sub) = harness(&[&fail]);

        sequencer.preload_words(1, 1, 3).await;
        assert_eq!(sequencer.state(), WordAudioState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_delivers_current_state_immediately() {
        let (sequencer, _log, _transitions, _sub) = harness(&[]);

        let seen: Transitions = Arc::new(Mutex::new(Vec::new()));
        let subscription = sequencer.subscribe({
            let seen = Arc::clone(&seen);
            move |state| seen.lock().unwrap().push(state.clone())
        });

        assert_eq!(recorded(&seen), [WordAudioState::default()]);

        drop(subscription);
        sequencer.play_word(1, 1, 0).await;
        assert_eq!(recorded(&seen).len(), 1);
    }
}
