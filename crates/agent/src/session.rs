//! Session lifecycle orchestration
//!
//! One session is one continuous cooperative pipeline over a channel:
//!
//! ```text
//! ┌─────────┐    ┌─────┐    ┌─────┐    ┌───────────────┐    ┌─────┐
//! │ Channel │───▶│ VAD │───▶│ STT │───▶│ LLM + tools   │───▶│ TTS │──▶ Channel
//! └─────────┘    └─────┘    └─────┘    └───────────────┘    └─────┘
//! ```
//!
//! Lifecycle: `Idle → Starting → Active → Closing → Closed`, with `Failed`
//! terminal on capability loss. Tool-call failures are results, never
//! session faults; capability failures name the capability responsible.
//! Closing the channel cancels whatever capability call is in flight, and
//! capability handles are released on every exit path.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};

use parlance_config::SessionSettings;
use parlance_core::{
    AudioBuffer, AudioChannel, AudioFrame, CapabilityError, CapabilityKind, CapabilityProvider,
    CapabilitySet, Channels, Conversation, SampleRate, Turn, VadEvent,
};
use parlance_tools::{RecordedCall, ToolCallTracker, ToolContext, ToolInvoker};

use crate::{Agent, AgentError};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started
    Idle,
    /// Acquiring capability handles
    Starting,
    /// Processing the conversation loop
    Active,
    /// Channel closed, releasing resources
    Closing,
    /// Terminal: closed cleanly
    Closed,
    /// Terminal: a capability was lost
    Failed,
}

/// Events emitted over a session's lifetime
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Session entered the active loop
    Started { session_id: String },
    /// State transition
    StateChanged { old: SessionState, new: SessionState },
    /// Final transcript for one utterance
    Transcript { text: String },
    /// A tool call was dispatched
    ToolCall { name: String },
    /// A tool call completed
    ToolResult { name: String, success: bool },
    /// Assistant response about to be spoken
    Response { text: String },
    /// Session failed; the report names the capability
    Failed(CapabilityError),
    /// Session closed
    Ended { reason: String },
}

/// Starts sessions against a capability provider
pub struct SessionOrchestrator {
    provider: Arc<dyn CapabilityProvider>,
    settings: SessionSettings,
}

impl SessionOrchestrator {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            provider,
            settings: SessionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Start a session over a channel with one bound agent
    ///
    /// Acquires the four capability handles, issues the initial greeting,
    /// then hands the conversation loop to a background task. Returns once
    /// the greeting is on the channel, so callers observe `Active` with
    /// exactly one outbound utterance before any inbound audio is read.
    pub async fn start(
        &self,
        channel: Arc<dyn AudioChannel>,
        agent: Arc<Agent>,
    ) -> Result<Session, AgentError> {
        if channel.is_closed() {
            return Err(AgentError::Channel("channel already closed".to_string()));
        }

        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (event_tx, _) = broadcast::channel(256);

        let inner = Arc::new(SessionInner {
            id: uuid::Uuid::new_v4().to_string(),
            settings: self.settings.clone(),
            agent,
            channel,
            state_tx,
            failure: RwLock::new(None),
            event_tx,
            tracker: Mutex::new(ToolCallTracker::new(64)),
        });

        inner.set_state(SessionState::Starting);
        tracing::info!(
            session = %inner.id,
            channel = %inner.channel.id(),
            agent = %inner.agent.name(),
            "starting session"
        );

        let caps = match self.acquire_capabilities().await {
            Ok(caps) => caps,
            Err(report) => {
                inner.fail(report.clone());
                return Err(AgentError::Capability(report));
            }
        };

        let mut conversation =
            Conversation::new().with_max_turns(self.settings.max_history_turns);
        conversation.push(Turn::system(inner.agent.instructions()));

        inner.set_state(SessionState::Active);
        let _ = inner.event_tx.send(SessionEvent::Started {
            session_id: inner.id.clone(),
        });

        // Exactly one system-initiated utterance before inbound audio
        if let Err(report) = inner.greet(&caps, &mut conversation).await {
            inner.fail(report.clone());
            return Err(AgentError::Capability(report));
        }

        let session = Session {
            inner: Arc::clone(&inner),
            state: state_rx,
        };

        tokio::spawn(run_loop(inner, caps, conversation));

        Ok(session)
    }

    /// Acquire all four capability handles, naming the one that fails
    async fn acquire_capabilities(&self) -> Result<CapabilitySet, CapabilityError> {
        let stt = self
            .provider
            .acquire_stt()
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Stt, e.message))?;
        let llm = self
            .provider
            .acquire_llm()
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Llm, e.message))?;
        let tts = self
            .provider
            .acquire_tts()
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Tts, e.message))?;
        let vad = self
            .provider
            .acquire_vad()
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Vad, e.message))?;

        tracing::debug!(
            stt = stt.model_name(),
            llm = llm.model_name(),
            tts = tts.voice(),
            "capability handles acquired"
        );

        Ok(CapabilitySet { stt, llm, tts, vad })
    }
}

/// Handle to a running session
pub struct Session {
    inner: Arc<SessionInner>,
    state: watch::Receiver<SessionState>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Failure report, if the session failed
    pub fn failure(&self) -> Option<CapabilityError> {
        self.inner.failure.read().clone()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Tool invocations recorded so far
    pub fn tool_calls(&self) -> Vec<RecordedCall> {
        self.inner.tracker.lock().all().cloned().collect()
    }

    /// Close the session's channel
    pub async fn close(&self) {
        self.inner.channel.close().await;
    }

    /// Wait until the session reaches a terminal state
    pub async fn wait_terminal(&self) -> SessionState {
        let mut rx = self.state.clone();
        let terminal = rx
            .wait_for(|s| matches!(s, SessionState::Closed | SessionState::Failed))
            .await
            .map(|state| *state);
        match terminal {
            Ok(state) => state,
            Err(_) => *rx.borrow(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

struct SessionInner {
    id: String,
    settings: SessionSettings,
    agent: Arc<Agent>,
    channel: Arc<dyn AudioChannel>,
    state_tx: watch::Sender<SessionState>,
    failure: RwLock<Option<CapabilityError>>,
    event_tx: broadcast::Sender<SessionEvent>,
    tracker: Mutex<ToolCallTracker>,
}

impl SessionInner {
    fn set_state(&self, new: SessionState) {
        let old = self.state_tx.send_replace(new);
        if old != new {
            tracing::debug!(session = %self.id, ?old, ?new, "session state changed");
            let _ = self.event_tx.send(SessionEvent::StateChanged { old, new });
        }
    }

    fn fail(&self, report: CapabilityError) {
        tracing::error!(
            session = %self.id,
            capability = %report.kind,
            error = %report.message,
            "session failed"
        );
        *self.failure.write() = Some(report.clone());
        self.set_state(SessionState::Failed);
        let _ = self.event_tx.send(SessionEvent::Failed(report));
    }

    /// Issue the one system-initiated greeting
    async fn greet(
        &self,
        caps: &CapabilitySet,
        conversation: &mut Conversation,
    ) -> Result<(), CapabilityError> {
        conversation.push(Turn::system(&self.settings.greeting));
        let text = self.llm_exchange(caps, conversation).await?;
        self.speak(caps, conversation, text).await
    }

    /// Classify one inbound frame, running a full turn on utterance end
    async fn handle_frame(
        &self,
        caps: &CapabilitySet,
        conversation: &mut Conversation,
        buffer: &mut AudioBuffer,
        utterance_seq: &mut u64,
        frame: AudioFrame,
    ) -> Result<(), CapabilityError> {
        let event = caps
            .vad
            .classify(&frame)
            .map_err(|e| CapabilityError::new(CapabilityKind::Vad, e.to_string()))?;

        match event {
            VadEvent::Silence => {}
            VadEvent::SpeechStart | VadEvent::Speech => buffer.push(&frame),
            VadEvent::UtteranceEnd => {
                buffer.push(&frame);
                if !buffer.is_empty() {
                    *utterance_seq += 1;
                    let utterance = buffer.take_frame(*utterance_seq);
                    self.handle_utterance(caps, conversation, utterance).await?;
                }
            }
        }

        Ok(())
    }

    /// STT → LLM (with tool dispatch) → TTS for one utterance
    async fn handle_utterance(
        &self,
        caps: &CapabilitySet,
        conversation: &mut Conversation,
        utterance: AudioFrame,
    ) -> Result<(), CapabilityError> {
        let transcript = caps
            .stt
            .transcribe(&utterance)
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Stt, e.to_string()))?;

        if transcript.is_empty() {
            tracing::debug!(session = %self.id, "empty transcript, skipping turn");
            return Ok(());
        }

        tracing::info!(session = %self.id, text = %transcript.text, "utterance transcribed");
        let _ = self.event_tx.send(SessionEvent::Transcript {
            text: transcript.text.clone(),
        });
        conversation.push(Turn::user(transcript.text));

        let response = self.llm_exchange(caps, conversation).await?;
        self.speak(caps, conversation, response).await
    }

    /// Run model turns until the model produces plain text
    ///
    /// Tool calls within one turn are dispatched concurrently and joined
    /// before the next model turn; a failing tool call becomes a tool
    /// turn, never a session fault.
    async fn llm_exchange(
        &self,
        caps: &CapabilitySet,
        conversation: &mut Conversation,
    ) -> Result<String, CapabilityError> {
        let definitions = self.agent.tool_definitions();
        let context = ToolContext::new(&self.id);

        for _round in 0..self.settings.max_tool_rounds {
            let completion = caps
                .llm
                .complete(conversation.turns(), &definitions)
                .await
                .map_err(|e| CapabilityError::new(CapabilityKind::Llm, e.to_string()))?;

            if !completion.has_tool_calls() {
                return Ok(completion.text);
            }

            for call in &completion.tool_calls {
                let _ = self.event_tx.send(SessionEvent::ToolCall {
                    name: call.name.clone(),
                });
            }

            let results =
                ToolInvoker::invoke_all(self.agent.tools(), &completion.tool_calls, &context)
                    .await;

            for (call, result) in completion.tool_calls.iter().zip(results) {
                let _ = self.event_tx.send(SessionEvent::ToolResult {
                    name: call.name.clone(),
                    success: result.success,
                });
                conversation.push(result.as_turn(call));
                self.tracker.lock().record(call, result);
            }
        }

        // Tool budget exhausted: ask for plain text over the collected results
        tracing::warn!(
            session = %self.id,
            rounds = self.settings.max_tool_rounds,
            "tool round budget exhausted, forcing plain completion"
        );
        let completion = caps
            .llm
            .complete(conversation.turns(), &[])
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Llm, e.to_string()))?;
        Ok(completion.text)
    }

    /// Synthesize a response and put it on the channel
    async fn speak(
        &self,
        caps: &CapabilitySet,
        conversation: &mut Conversation,
        text: String,
    ) -> Result<(), CapabilityError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        conversation.push(Turn::assistant(text.clone()));
        let _ = self.event_tx.send(SessionEvent::Response { text: text.clone() });

        let audio = caps
            .tts
            .synthesize(&text)
            .await
            .map_err(|e| CapabilityError::new(CapabilityKind::Tts, e.to_string()))?;

        if let Err(err) = self.channel.send_audio(audio).await {
            // Outbound audio can race channel teardown; the loop handles closure
            tracing::debug!(session = %self.id, error = %err, "audio send after close");
        }

        Ok(())
    }
}

/// The active loop: frames in, turns out, until the channel closes
///
/// Owns the capability set; every exit path drops it, releasing the
/// handles. Channel closure cancels whatever capability call is in flight.
async fn run_loop(inner: Arc<SessionInner>, caps: CapabilitySet, mut conversation: Conversation) {
    let mut buffer = AudioBuffer::new(
        SampleRate::Hz16000,
        Channels::Mono,
        Duration::from_secs(inner.settings.utterance_max_secs),
    );
    let mut utterance_seq: u64 = 0;

    loop {
        let frame = tokio::select! {
            frame = inner.channel.receive_audio() => frame,
            _ = inner.channel.closed() => None,
        };

        let Some(frame) = frame else { break };

        let outcome = tokio::select! {
            res = inner.handle_frame(&caps, &mut conversation, &mut buffer, &mut utterance_seq, frame) => Some(res),
            _ = inner.channel.closed() => None,
        };

        match outcome {
            Some(Ok(())) => {}
            Some(Err(report)) => {
                drop(caps);
                inner.fail(report);
                return;
            }
            None => break,
        }
    }

    inner.set_state(SessionState::Closing);
    drop(caps);
    inner.set_state(SessionState::Closed);
    let _ = inner.event_tx.send(SessionEvent::Ended {
        reason: "channel closed".to_string(),
    });
    tracing::info!(session = %inner.id, "session closed");
}
