//! State machine for one viewer session.
//!
//! Wraps a `Session` record and applies deterministic transitions to the
//! discrete events the rendering host delivers. Every transition returns a
//! `SessionPatch` describing exactly what changed, which the caller forwards
//! to re-render subscribers.

use chrono::Utc;
use vitrine_types::chat::ChatTurn;
use vitrine_types::error::SessionError;
use vitrine_types::event::{CounterButton, SessionEvent};
use vitrine_types::session::{Session, SessionPatch};

/// Manages the state of a single viewer session.
///
/// The registry serializes access per session, so every method here runs
/// with exclusive access: the two appends of a chat echo are atomic with
/// respect to any reader.
#[derive(Debug)]
pub struct SessionState {
    session: Session,
}

impl SessionState {
    /// Create a fresh session.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Access the underlying session record.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get a mutable reference to the underlying session record.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// `counter += 1`. Total; no upper bound.
    pub fn increment(&mut self) -> SessionPatch {
        self.session.counter += 1;
        self.touch();
        SessionPatch::counter(self.session.counter)
    }

    /// `counter -= 1`. Total; no floor, the counter may go negative.
    pub fn decrement(&mut self) -> SessionPatch {
        self.session.counter -= 1;
        self.touch();
        SessionPatch::counter(self.session.counter)
    }

    /// `counter := 0`, regardless of prior value.
    pub fn reset(&mut self) -> SessionPatch {
        self.session.counter = 0;
        self.touch();
        SessionPatch::counter(self.session.counter)
    }

    /// Append a user turn and its synchronous assistant echo.
    ///
    /// Both turns land in one exclusive call, so the transcript length is
    /// even whenever anyone can observe it. Callers validate non-emptiness;
    /// see [`SessionState::apply`].
    pub fn submit_chat_message(&mut self, text: &str) -> SessionPatch {
        let user = ChatTurn::user(text);
        let reply = ChatTurn::assistant(format!("Echo: {text}"));
        self.session.messages.push(user.clone());
        self.session.messages.push(reply.clone());
        self.touch();
        SessionPatch::appended(vec![user, reply])
    }

    /// Apply one host event, returning the resulting state diff.
    ///
    /// The host widget promises non-empty chat submissions; a blank
    /// `TextSubmitted` is refused with `EmptyMessage` rather than trusted.
    pub fn apply(&mut self, event: &SessionEvent) -> Result<SessionPatch, SessionError> {
        match event {
            SessionEvent::ButtonPressed { button } => Ok(match button {
                CounterButton::Increment => self.increment(),
                CounterButton::Decrement => self.decrement(),
                CounterButton::Reset => self.reset(),
            }),
            SessionEvent::TextSubmitted { value } => {
                if value.trim().is_empty() {
                    return Err(SessionError::EmptyMessage);
                }
                Ok(self.submit_chat_message(value))
            }
        }
    }

    fn touch(&mut self) {
        self.session.last_active_at = Utc::now();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::chat::ChatRole;

    #[test]
    fn test_new_session_counter_zero() {
        let state = SessionState::new();
        assert_eq!(state.session().counter, 0);
        assert!(state.session().messages.is_empty());
    }

    #[test]
    fn test_increment_increment_decrement() {
        let mut state = SessionState::new();
        state.increment();
        state.increment();
        state.decrement();
        assert_eq!(state.session().counter, 1);
    }

    #[test]
    fn test_counter_is_net_sum_of_steps() {
        let mut state = SessionState::new();
        let steps: [i64; 7] = [1, 1, -1, 1, -1, -1, -1];
        for step in steps {
            if step > 0 {
                state.increment();
            } else {
                state.decrement();
            }
        }
        assert_eq!(state.session().counter, steps.iter().sum::<i64>());
    }

    #[test]
    fn test_decrement_goes_negative() {
        let mut state = SessionState::new();
        state.decrement();
        state.decrement();
        assert_eq!(state.session().counter, -2);
    }

    #[test]
    fn test_reset_after_five_increments() {
        let mut state = SessionState::new();
        for _ in 0..5 {
            state.increment();
        }
        assert_eq!(state.session().counter, 5);
        state.reset();
        assert_eq!(state.session().counter, 0);
    }

    #[test]
    fn test_reset_from_negative() {
        let mut state = SessionState::new();
        state.decrement();
        state.reset();
        assert_eq!(state.session().counter, 0);
    }

    #[test]
    fn test_chat_echo_appends_pair() {
        let mut state = SessionState::new();
        let patch = state.submit_chat_message("hi");

        let messages = &state.session().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "Echo: hi");

        assert_eq!(patch.counter, None);
        assert_eq!(patch.appended, *messages);
    }

    #[test]
    fn test_transcript_append_only() {
        let mut state = SessionState::new();
        state.submit_chat_message("first");
        let before = state.session().messages.clone();

        state.submit_chat_message("second");
        state.increment();

        // Prior entries are untouched and in place
        assert_eq!(&state.session().messages[..2], &before[..]);
        assert_eq!(state.session().messages.len(), 4);
    }

    #[test]
    fn test_transcript_even_after_each_echo() {
        let mut state = SessionState::new();
        for text in ["a", "b", "c"] {
            state.submit_chat_message(text);
            assert_eq!(state.session().messages.len() % 2, 0);
        }
    }

    #[test]
    fn test_apply_button_events() {
        let mut state = SessionState::new();
        let press = |button| SessionEvent::ButtonPressed { button };

        let patch = state.apply(&press(CounterButton::Increment)).unwrap();
        assert_eq!(patch.counter, Some(1));
        let patch = state.apply(&press(CounterButton::Decrement)).unwrap();
        assert_eq!(patch.counter, Some(0));
        let patch = state.apply(&press(CounterButton::Reset)).unwrap();
        assert_eq!(patch.counter, Some(0));
    }

    #[test]
    fn test_apply_text_submitted() {
        let mut state = SessionState::new();
        let patch = state
            .apply(&SessionEvent::TextSubmitted {
                value: "hello".to_string(),
            })
            .unwrap();
        assert_eq!(patch.appended.len(), 2);
        assert_eq!(patch.appended[1].content, "Echo: hello");
    }

    #[test]
    fn test_apply_rejects_blank_text() {
        let mut state = SessionState::new();
        for value in ["", "   ", "\n\t"] {
            let err = state
                .apply(&SessionEvent::TextSubmitted {
                    value: value.to_string(),
                })
                .unwrap_err();
            assert_eq!(err, SessionError::EmptyMessage);
        }
        assert!(state.session().messages.is_empty());
    }

    #[test]
    fn test_apply_refreshes_last_active() {
        let mut state = SessionState::new();
        let before = state.session().last_active_at;
        state.increment();
        assert!(state.session().last_active_at >= before);
    }
}
