//! Chat session coordinator
//!
//! [`ChatSession`] is the single owner of application state: the current
//! persona, the toggles, both stores and the in-flight guard. Sending is
//! split in two so a front end can run the model call wherever it likes:
//!
//! 1. [`ChatSession::begin_send`] appends the user message and returns a
//!    [`PendingTurn`] holding the model request.
//! 2. [`ChatSession::complete_send`] turns the model's outcome into exactly
//!    one assistant message.
//!
//! [`ChatSession::send`] composes both for callers that can simply await.

use std::sync::Arc;
use chrono::{Local, NaiveDate};

use crate::chat::{
    build_instruction_context, detect_fact_candidates, ConversationStore, FactObserver,
    MemoryNote, MemoryStore, Message, NoteId,
};
use crate::core::KvStore;
use crate::error::{OmniError, OmniResult};
use crate::model::{ChatModel, ModelReply, ModelRequest};
use crate::persona::{Persona, PersonaRegistry};
use crate::Config;

/// Content of an assistant message when the model returned no text
pub const EMPTY_REPLY: &str = "No response.";

/// A send that has been accepted but not yet answered.
///
/// Only the turn most recently returned by [`ChatSession::begin_send`] can
/// be completed, and only once.
#[derive(Debug)]
pub struct PendingTurn {
    id: u64,
    pub request: ModelRequest,
    /// Persona key captured at send time
    pub mode: String,
}

pub struct ChatSession {
    registry: PersonaRegistry,
    persona: &'static str,
    web_search: bool,
    memory_enabled: bool,
    conversation: ConversationStore,
    memory: MemoryStore,
    total_tokens: u64,
    /// Id of the outstanding turn, if any
    in_flight: Option<u64>,
    next_turn: u64,
    fact_observer: Option<Arc<dyn FactObserver>>,
}

impl ChatSession {
    /// Open a session over `store`, hydrating history and notes from it
    pub fn open(store: Arc<dyn KvStore>, config: &Config) -> Self {
        let registry = PersonaRegistry::builtin();
        if !registry.contains(&config.persona) {
            tracing::warn!("Unknown persona '{}', using '{}'", config.persona, registry.default_persona().key);
        }
        let persona = registry.get(&config.persona).key;

        let conversation = ConversationStore::load(store.clone());
        let memory = MemoryStore::load(store);
        tracing::info!(
            "Session opened: persona={}, {} messages, {} notes",
            persona,
            conversation.len(),
            memory.len()
        );

        Self {
            registry,
            persona,
            web_search: config.web_search,
            memory_enabled: config.memory_enabled,
            conversation,
            memory,
            total_tokens: 0,
            in_flight: None,
            next_turn: 0,
            fact_observer: None,
        }
    }

    /// Install an observer for fact candidates found in assistant replies
    pub fn with_fact_observer(mut self, observer: Arc<dyn FactObserver>) -> Self {
        self.fact_observer = Some(observer);
        self
    }

    /// Accept a user message and build the model request for it.
    ///
    /// Returns `None` without side effects for blank input or while another
    /// turn is outstanding.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingTurn> {
        self.begin_send_on(input, Local::now().date_naive())
    }

    pub(crate) fn begin_send_on(&mut self, input: &str, date: NaiveDate) -> Option<PendingTurn> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        if self.in_flight.is_some() {
            tracing::debug!("Send ignored: a reply is still pending");
            return None;
        }

        let mode = self.persona.to_string();
        self.conversation.append(Message::user(text, mode.clone()));
        let id = self.next_turn;
        self.next_turn = self.next_turn.wrapping_add(1);
        self.in_flight = Some(id);

        let request = ModelRequest {
            instructions: self.instruction_context(date),
            messages: self.conversation.api_messages(),
            web_search: self.web_search,
        };
        Some(PendingTurn { id, request, mode })
    }

    /// Record the outcome of a pending turn as one assistant message.
    ///
    /// Returns `None` and changes nothing when `turn` is not the outstanding
    /// one.
    pub fn complete_send(
        &mut self,
        turn: PendingTurn,
        result: OmniResult<ModelReply>,
    ) -> Option<&Message> {
        if self.in_flight != Some(turn.id) {
            tracing::warn!("Ignoring completion for turn {} that is not outstanding", turn.id);
            return None;
        }
        self.in_flight = None;

        let message = match result {
            Ok(reply) => {
                if let Some(usage) = reply.usage {
                    self.total_tokens = self.total_tokens.saturating_add(usage.total());
                }
                let text = if reply.text.trim().is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    reply.text
                };
                Message::assistant(text, turn.mode, reply.searched)
            }
            Err(e) => {
                tracing::warn!("Model call failed: {}", e);
                Message::error(error_detail(&e), turn.mode)
            }
        };

        if !message.is_error {
            self.observe_facts(&message);
        }
        Some(self.conversation.append(message))
    }

    /// Send `input` to `model` and wait for the reply
    pub async fn send(&mut self, input: &str, model: &dyn ChatModel) -> Option<&Message> {
        let turn = self.begin_send(input)?;
        let result = model.complete(turn.request.clone()).await;
        self.complete_send(turn, result)
    }

    fn observe_facts(&self, message: &Message) {
        if !self.memory_enabled {
            return;
        }
        let candidates = detect_fact_candidates(&message.content);
        if candidates.is_empty() {
            return;
        }
        for candidate in &candidates {
            tracing::debug!("Fact candidate ({}): {}", candidate.trigger, candidate.text);
        }
        if let Some(observer) = &self.fact_observer {
            observer.observe(message, &candidates);
        }
    }

    fn instruction_context(&self, date: NaiveDate) -> String {
        build_instruction_context(self.persona(), self.memory.notes(), self.memory_enabled, date)
    }

    /// Switch persona. Unregistered keys are rejected and leave state as is.
    pub fn set_persona(&mut self, key: &str) -> OmniResult<&Persona> {
        let persona = self
            .registry
            .find(key)
            .ok_or_else(|| OmniError::UnknownPersona(key.to_string()))?;
        self.persona = persona.key;
        tracing::debug!("Persona set to {}", persona.key);
        Ok(persona)
    }

    pub fn persona(&self) -> &Persona {
        self.registry.get(self.persona)
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn set_web_search(&mut self, enabled: bool) {
        self.web_search = enabled;
    }

    pub fn web_search(&self) -> bool {
        self.web_search
    }

    pub fn set_memory_enabled(&mut self, enabled: bool) {
        self.memory_enabled = enabled;
    }

    pub fn memory_enabled(&self) -> bool {
        self.memory_enabled
    }

    pub fn add_note(&mut self, text: &str) -> Option<NoteId> {
        self.memory.add_note(text)
    }

    pub fn remove_note(&mut self, id: NoteId) -> bool {
        self.memory.remove_note(id)
    }

    pub fn notes(&self) -> &[MemoryNote] {
        self.memory.notes()
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Tokens reported by the model since the session was opened
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }
}

/// Model failures are shown by their message alone
fn error_detail(error: &OmniError) -> String {
    match error {
        OmniError::Model(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FactCandidate, Role};
    use crate::core::MemoryKvStore;
    use crate::model::{ScriptedModel, ScriptedReply, Usage};
    use std::sync::Mutex;

    fn session() -> (Arc<MemoryKvStore>, ChatSession) {
        let kv = Arc::new(MemoryKvStore::new());
        let session = ChatSession::open(kv.clone(), &Config::default());
        (kv, session)
    }

    fn reply(text: &str, tokens: Option<(u64, u64)>) -> ScriptedReply {
        ScriptedReply::Reply(ModelReply {
            text: text.into(),
            searched: false,
            usage: tokens.map(|(input_tokens, output_tokens)| Usage { input_tokens, output_tokens }),
        })
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<FactCandidate>>);

    impl FactObserver for Recorder {
        fn observe(&self, _message: &Message, candidates: &[FactCandidate]) {
            if let Ok(mut seen) = self.0.lock() {
                seen.extend_from_slice(candidates);
            }
        }
    }

    #[tokio::test]
    async fn test_send_appends_user_and_assistant() {
        let (_, mut session) = session();
        let model = ScriptedModel::new(vec![reply("Hi **there**", Some((10, 5)))]);

        let answer = session.send("  hello  ", &model).await.unwrap();
        assert_eq!(answer.role, Role::Assistant);
        assert_eq!(answer.content, "Hi **there**");
        assert_eq!(answer.mode, "omni");

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].content, "hello");
        assert_eq!(session.total_tokens(), 15);
        assert!(!session.is_waiting());

        let request = model.last_request().unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let (_, mut session) = session();
        let model = ScriptedModel::always_text("unused");
        assert!(session.send("   ", &model).await.is_none());
        assert!(session.messages().is_empty());
        assert_eq!(model.remaining(), 1);
    }

    #[test]
    fn test_second_send_rejected_while_pending() {
        let (_, mut session) = session();
        let turn = session.begin_send("first").unwrap();
        assert!(session.is_waiting());
        assert!(session.begin_send("second").is_none());
        assert_eq!(session.messages().len(), 1);

        session.complete_send(turn, Ok(ModelReply::text("done")));
        assert!(session.begin_send("third").is_some());
    }

    #[test]
    fn test_only_outstanding_turn_completes() {
        let (_, mut session) = session();
        let turn = session.begin_send("hi").unwrap();
        let stale = PendingTurn {
            id: turn.id.wrapping_add(1),
            request: turn.request.clone(),
            mode: turn.mode.clone(),
        };
        let replay = PendingTurn {
            id: turn.id,
            request: turn.request.clone(),
            mode: turn.mode.clone(),
        };

        assert!(session.complete_send(stale, Ok(ModelReply::text("wrong"))).is_none());
        assert!(session.is_waiting());
        assert_eq!(session.messages().len(), 1);

        assert!(session.complete_send(turn, Ok(ModelReply::text("a"))).is_some());
        assert!(session.complete_send(replay, Ok(ModelReply::text("b"))).is_none());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "a");
    }

    #[tokio::test]
    async fn test_failure_becomes_error_message() {
        let (_, mut session) = session();
        let model = ScriptedModel::new(vec![ScriptedReply::Fail("network down".into())]);

        let answer = session.send("hi", &model).await.unwrap();
        assert!(answer.is_error);
        assert_eq!(answer.content, "**Error:** network down");
        assert!(!session.is_waiting());
        assert_eq!(session.total_tokens(), 0);
    }

    #[tokio::test]
    async fn test_empty_reply_placeholder() {
        let (_, mut session) = session();
        let model = ScriptedModel::new(vec![reply("", None)]);
        let answer = session.send("hi", &model).await.unwrap();
        assert_eq!(answer.content, EMPTY_REPLY);
        assert!(!answer.is_error);
    }

    #[tokio::test]
    async fn test_mode_captured_at_send_time() {
        let (_, mut session) = session();
        let turn = session.begin_send("write me a poem").unwrap();
        session.set_persona("creative").unwrap();
        session.complete_send(turn, Ok(ModelReply::text("roses")));

        let modes: Vec<&str> = session.messages().iter().map(|m| m.mode.as_str()).collect();
        assert_eq!(modes, vec!["omni", "omni"]);

        let model = ScriptedModel::always_text("ok");
        let answer = session.send("again", &model).await.unwrap();
        assert_eq!(answer.mode, "creative");
    }

    #[test]
    fn test_unknown_persona_rejected() {
        let (_, mut session) = session();
        session.set_persona("coder").unwrap();
        assert!(matches!(session.set_persona("pirate"), Err(OmniError::UnknownPersona(_))));
        assert_eq!(session.persona().key, "coder");
    }

    #[test]
    fn test_request_carries_context_and_flags() {
        let (_, mut session) = session();
        session.add_note("user is left-handed");
        session.set_web_search(true);
        session.set_persona("analyst").unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let turn = session.begin_send_on("hi", date).unwrap();
        assert!(turn.request.web_search);
        assert_eq!(turn.mode, "analyst");
        assert!(turn.request.instructions.contains("1. user is left-handed"));
        assert!(turn.request.instructions.ends_with("Current mode: ANALYST. Date: 2025-01-02."));

        session.complete_send(turn, Ok(ModelReply::text("ok")));
        session.set_memory_enabled(false);
        let turn = session.begin_send_on("again", date).unwrap();
        assert!(!turn.request.instructions.contains("left-handed"));
    }

    #[tokio::test]
    async fn test_fact_observer_notified_without_saving() {
        let recorder = Arc::new(Recorder::default());
        let (_, session) = session();
        let mut session = session.with_fact_observer(recorder.clone());
        let model = ScriptedModel::always_text("Sure.\nImportant: keep backups");

        session.send("tips?", &model).await.unwrap();
        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].text, "keep backups");
        assert!(session.notes().is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let (kv, mut session) = session();
        let model = ScriptedModel::always_text("pong");
        session.send("ping", &model).await.unwrap();
        session.add_note("likes tea");

        let reopened = ChatSession::open(kv, &Config::default());
        assert_eq!(reopened.messages().len(), 2);
        assert_eq!(reopened.notes().len(), 1);
        assert_eq!(reopened.total_tokens(), 0);
    }

    #[test]
    fn test_open_with_unknown_persona_falls_back() {
        let kv = Arc::new(MemoryKvStore::new());
        let config = Config { persona: "pirate".into(), ..Config::default() };
        let session = ChatSession::open(kv, &config);
        assert_eq!(session.persona().key, "omni");
    }
}
