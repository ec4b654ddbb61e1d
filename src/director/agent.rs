use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backend::{InferenceBackend, InferenceError};
use super::directive::Directive;
use super::fallback::FallbackSequence;
use super::history::{ChatMessage, ConversationHistory};
use super::parse::parse_directive;
use super::prompt::{system_prompt, AutoPrompts, Prompt};

pub const MIN_SPEAKING: Duration = Duration::from_secs(2);
pub const MAX_SPEAKING: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorConfig {
    /// Longest wait for a viewer message before an autonomous prompt.
    pub think_interval: Duration,
    /// Bound on a single model call, independent of `think_interval`.
    pub call_timeout: Duration,
    pub rows: usize,
    pub cols: usize,
    pub max_height: f64,
    pub speaking_secs_per_word: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            think_interval: Duration::from_secs(15),
            call_timeout: Duration::from_secs(30),
            rows: 30,
            cols: 30,
            max_height: 100.0,
            speaking_secs_per_word: 0.35,
        }
    }
}

/// How long the table shows the voice waveform for a line of narration.
pub fn speaking_duration(text: &str, secs_per_word: f64) -> Duration {
    let words = text.split_whitespace().count() as f64;
    let secs = words * secs_per_word;
    if !secs.is_finite() {
        return MIN_SPEAKING;
    }
    Duration::from_secs_f64(secs.clamp(MIN_SPEAKING.as_secs_f64(), MAX_SPEAKING.as_secs_f64()))
}

/// Whether the last cycle reached the model. Re-evaluated every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected { fallback_index: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectorStats {
    pub cycles: u64,
    pub user_messages: u64,
    pub decisions: u64,
    pub fallbacks: u64,
    pub parse_failures: u64,
}

/// Immutable view of the director, replaced wholesale on every change.
#[derive(Debug, Clone)]
pub struct DirectorSnapshot {
    pub directive: Arc<Directive>,
    pub state: LinkState,
    pub fallback_index: usize,
    pub stats: DirectorStats,
    pub speaking_until: Option<Instant>,
}

impl DirectorSnapshot {
    /// Snapshot of a director that has not reached the model yet.
    pub fn new(directive: Directive) -> Self {
        Self {
            directive: Arc::new(directive),
            state: LinkState::Disconnected { fallback_index: 0 },
            fallback_index: 0,
            stats: DirectorStats::default(),
            speaking_until: None,
        }
    }

    pub fn speaking_for(mut self, duration: Duration) -> Self {
        self.speaking_until = Some(Instant::now() + duration);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking_at(Instant::now())
    }

    pub fn speaking_at(&self, now: Instant) -> bool {
        matches!(self.speaking_until, Some(until) if now < until)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The model answered with a usable directive.
    Decided,
    /// The model answered, but not with a usable directive. Nothing changed.
    Unparsable,
    /// The model was unreachable; the fallback cycle moved to `index`.
    Fallback { index: usize },
}

/// Cheap, cloneable access to a running director.
#[derive(Debug, Clone)]
pub struct DirectorHandle {
    inbox: mpsc::UnboundedSender<String>,
    snapshot: watch::Receiver<Arc<DirectorSnapshot>>,
    cancel: CancellationToken,
}

impl DirectorHandle {
    pub fn snapshot(&self) -> Arc<DirectorSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn current(&self) -> Arc<Directive> {
        self.snapshot().directive.clone()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DirectorSnapshot>> {
        self.snapshot.clone()
    }

    /// Queues a viewer message. Never blocks. Blank messages are dropped.
    pub fn receive_message(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.inbox.send(text.to_string()).is_ok()
    }

    /// Asks the loop to finish. Observed at the next wait boundary; an
    /// in-flight model call still runs to completion or timeout.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_connected(&self) -> bool {
        self.snapshot().is_connected()
    }

    pub fn is_speaking(&self) -> bool {
        self.snapshot().is_speaking()
    }
}

/// The creative director: decides what the table expresses.
///
/// Owns the current directive, the conversation and the fallback cursor.
/// Each cycle waits for a viewer message (or the think interval), consults
/// the model, and publishes a new snapshot.
pub struct CreativeDirector<B> {
    config: DirectorConfig,
    backend: B,
    system_prompt: String,
    history: ConversationHistory,
    fallback: FallbackSequence,
    fallback_index: usize,
    state: LinkState,
    offline_announced: bool,
    auto_prompts: AutoPrompts,
    current: Arc<Directive>,
    speaking_until: Option<Instant>,
    stats: DirectorStats,
    inbox: mpsc::UnboundedReceiver<String>,
    publisher: watch::Sender<Arc<DirectorSnapshot>>,
    handle: DirectorHandle,
}

impl<B: InferenceBackend> CreativeDirector<B> {
    pub fn new(config: DirectorConfig, backend: B) -> Self {
        let fallback = FallbackSequence::curated(config.rows, config.cols);
        Self::with_fallback(config, backend, fallback)
    }

    pub fn with_fallback(config: DirectorConfig, backend: B, fallback: FallbackSequence) -> Self {
        let initial = DirectorSnapshot::new(fallback.first().clone());
        let current = initial.directive.clone();
        let (publisher, snapshot) = watch::channel(Arc::new(initial));
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let handle = DirectorHandle {
            inbox: inbox_tx,
            snapshot,
            cancel: CancellationToken::new(),
        };

        Self {
            system_prompt: system_prompt(config.rows, config.cols, config.max_height),
            config,
            backend,
            history: ConversationHistory::new(),
            fallback,
            fallback_index: 0,
            state: LinkState::Disconnected { fallback_index: 0 },
            offline_announced: false,
            auto_prompts: AutoPrompts::new(),
            current,
            speaking_until: None,
            stats: DirectorStats::default(),
            inbox,
            publisher,
            handle,
        }
    }

    pub fn handle(&self) -> DirectorHandle {
        self.handle.clone()
    }

    pub fn current(&self) -> Arc<Directive> {
        self.current.clone()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn fallback_index(&self) -> usize {
        self.fallback_index
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn stats(&self) -> DirectorStats {
        self.stats
    }

    /// Starts the thinking loop on its own task.
    pub fn spawn(self) -> (DirectorHandle, JoinHandle<()>) {
        let handle = self.handle();
        let task = tokio::spawn(self.run());
        (handle, task)
    }

    pub async fn run(mut self) {
        info!(
            think_interval = ?self.config.think_interval,
            call_timeout = ?self.config.call_timeout,
            "Creative director started"
        );

        while let Some(prompt) = self.next_prompt().await {
            self.think(prompt).await;
            if self.handle.is_stopped() {
                break;
            }
        }

        info!(cycles = self.stats.cycles, decisions = self.stats.decisions, "Creative director stopped");
    }

    /// Waits up to the think interval for a viewer message. A message ends
    /// the wait at once; otherwise the next autonomous prompt is used.
    /// `None` once the director has been stopped.
    pub async fn next_prompt(&mut self) -> Option<Prompt> {
        let cancel = self.handle.cancel.clone();
        if cancel.is_cancelled() {
            return None;
        }

        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            received = tokio::time::timeout(self.config.think_interval, self.inbox.recv()) => received,
        };

        match received {
            Ok(Some(text)) => {
                self.stats.user_messages += 1;
                info!(chars = text.len(), "Viewer message received");
                Some(Prompt::User(text))
            }
            // The handle keeps a sender alive, so `None` only shows up during teardown.
            Ok(None) | Err(_) => Some(Prompt::Auto(self.auto_prompts.next_prompt())),
        }
    }

    /// One consultation of the model, start to finish.
    pub async fn think(&mut self, prompt: Prompt) -> CycleOutcome {
        self.stats.cycles += 1;
        let user = ChatMessage::user(prompt.content());
        let request = self.history.request_with(&self.system_prompt, &user);
        debug!(messages = request.len(), from_viewer = prompt.is_user(), "Consulting model");

        let timeout = self.config.call_timeout;
        let reply = match tokio::time::timeout(timeout, self.backend.chat(&request)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::Timeout(timeout)),
        };

        let outcome = match reply {
            Ok(text) => self.accept_reply(user, text),
            Err(err) if err.is_unreachable() => self.fall_back(err),
            Err(err) => self.reject_reply(&err),
        };
        self.publish();
        outcome
    }

    /// The model answered with nothing usable. Nothing changes.
    fn reject_reply(&mut self, err: &dyn std::error::Error) -> CycleOutcome {
        self.stats.parse_failures += 1;
        warn!(error = %err, "Could not parse response; keeping current pattern");
        CycleOutcome::Unparsable
    }

    fn accept_reply(&mut self, user: ChatMessage, text: String) -> CycleOutcome {
        let directive = match parse_directive(&text) {
            Ok(directive) => directive,
            Err(err) => return self.reject_reply(&err),
        };

        info!(mood = %directive.mood, pattern = %directive.pattern, "New mood");
        self.speaking_until = if directive.has_text() {
            info!(target: "voice", "{}", directive.text);
            let duration = speaking_duration(&directive.text, self.config.speaking_secs_per_word);
            Some(Instant::now() + duration)
        } else {
            None
        };

        self.history.push(user);
        self.history.push(ChatMessage::assistant(text));
        self.current = Arc::new(directive);
        self.state = LinkState::Connected;
        self.offline_announced = false;
        self.stats.decisions += 1;
        CycleOutcome::Decided
    }

    fn fall_back(&mut self, err: InferenceError) -> CycleOutcome {
        if self.offline_announced {
            debug!(error = %err, "Model still unreachable");
        } else {
            warn!(error = %err, "Model not reachable; cycling built-in patterns");
            self.offline_announced = true;
        }

        let index = self.fallback.next_index(self.fallback_index);
        let directive = self.fallback.get(index).clone();
        info!(mood = %directive.mood, pattern = %directive.pattern, index, "Fallback");

        self.fallback_index = index;
        self.current = Arc::new(directive);
        self.speaking_until = None;
        self.state = LinkState::Disconnected { fallback_index: index };
        self.stats.fallbacks += 1;
        CycleOutcome::Fallback { index }
    }

    fn publish(&self) {
        let snapshot = DirectorSnapshot {
            directive: self.current.clone(),
            state: self.state,
            fallback_index: self.fallback_index,
            stats: self.stats,
            speaking_until: self.speaking_until,
        };
        self.publisher.send_replace(Arc::new(snapshot));
    }
}
