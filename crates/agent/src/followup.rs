//! The "anything else?" loop of the interactive chat, as a state machine.
//!
//! After each answer the user is asked whether they want more detail. A
//! yes re-asks the model with a canned follow-up, a no hands control back
//! for a new question. The machine only decides what happens next and
//! records the canned turns in the session log; sending requests is the
//! caller's job.
//!
//! ```text
//!   AwaitingInput ──Question──▶ AwaitingInput (Request)
//!   AwaitingInput ──AnswerDelivered──▶ AwaitingConfirmation (AskForMore)
//!   AwaitingConfirmation ──MoreInfo──▶ AwaitingInput (Request)
//!   AwaitingConfirmation ──NoMoreInfo──▶ AwaitingInput (Prompt)
//!   AwaitingConfirmation ──Question──▶ AwaitingInput (Request)
//!   any ──Quit──▶ Done (Stop)
//! ```

use crate::session::ChatSession;
use tracing::trace;

/// User turn appended when more detail is requested.
pub const MORE_INFO_REQUEST: &str = "Can you give more information on that?";

/// Assistant turn appended when the user declines more detail.
pub const NEXT_QUESTION_PROMPT: &str = "What question can I help you with?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpState {
    AwaitingInput,
    AwaitingConfirmation,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpEvent {
    Question(String),
    AnswerDelivered,
    MoreInfo,
    NoMoreInfo,
    Quit,
}

/// What the caller should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpAction {
    /// Send the session log to the model.
    Request,
    /// Ask the user whether they want more information.
    AskForMore,
    /// Show this text and wait for a new question.
    Prompt(String),
    Stop,
    /// The event does not apply in the current state.
    Ignore,
}

#[derive(Debug, Clone)]
pub struct FollowUp {
    state: FollowUpState,
}

impl FollowUp {
    pub fn new() -> Self {
        Self {
            state: FollowUpState::AwaitingInput,
        }
    }

    pub fn state(&self) -> FollowUpState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == FollowUpState::Done
    }

    /// Apply an event, recording any resulting turn in `session`.
    pub fn handle(&mut self, event: FollowUpEvent, session: &mut ChatSession) -> FollowUpAction {
        use FollowUpAction as A;
        use FollowUpEvent as E;
        use FollowUpState as S;

        let (next, action) = match (self.state, event) {
            (_, E::Quit) => (S::Done, A::Stop),
            (S::Done, _) => (S::Done, A::Ignore),

            (S::AwaitingInput | S::AwaitingConfirmation, E::Question(question)) => {
                session.push_user(question);
                (S::AwaitingInput, A::Request)
            }
            (S::AwaitingInput, E::AnswerDelivered) => (S::AwaitingConfirmation, A::AskForMore),

            (S::AwaitingConfirmation, E::MoreInfo) => {
                session.push_user(MORE_INFO_REQUEST);
                (S::AwaitingInput, A::Request)
            }
            (S::AwaitingConfirmation, E::NoMoreInfo) => {
                session.push_assistant(NEXT_QUESTION_PROMPT);
                (S::AwaitingInput, A::Prompt(NEXT_QUESTION_PROMPT.to_string()))
            }

            (state, _) => (state, A::Ignore),
        };

        trace!(from = ?self.state, to = ?next, action = ?action, "Follow-up transition");
        self.state = next;
        action
    }

    /// Interpret a line of user input for the current state.
    ///
    /// Blank input maps to nothing. While confirming, `y`/`yes` and
    /// `n`/`no` answer the question and anything else is a new question.
    pub fn interpret(&self, input: &str) -> Option<FollowUpEvent> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_ascii_lowercase();
        if matches!(lower.as_str(), "exit" | "quit" | "/quit" | "/exit") {
            return Some(FollowUpEvent::Quit);
        }

        if self.state == FollowUpState::AwaitingConfirmation {
            match lower.as_str() {
                "y" | "yes" => return Some(FollowUpEvent::MoreInfo),
                "n" | "no" => return Some(FollowUpEvent::NoMoreInfo),
                _ => {}
            }
        }

        Some(FollowUpEvent::Question(trimmed.to_string()))
    }
}

impl Default for FollowUp {
    fn default() -> Self {
        Self::new()
    }
}
