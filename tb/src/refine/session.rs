//! Refinement session state machine
//!
//! Tracks one request through up to `max_rounds` of question answering.
//! The session never talks to the completion client itself: callers run a
//! briefing pass while the session is Processing and report back whether
//! an instruction was produced. There are no automatic retries at the
//! round level.

use thiserror::Error;
use tracing::debug;

use super::request::RequestText;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the operator to answer the current questions
    AwaitingAnswer,
    /// A briefing pass is running over the accumulated request
    Processing,
    /// An instruction was produced
    Success,
    /// The operator declined to answer
    Abandoned,
    /// max rounds of passes produced no instruction
    RoundLimitReached,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Success | SessionState::Abandoned | SessionState::RoundLimitReached
        )
    }
}

/// Misuse and limit errors from the state machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Answer would grow the request to {would_be} chars, over the {cap} cap")]
    AnswerTooLong { would_be: usize, cap: usize },

    #[error("Not awaiting an answer (state: {0:?})")]
    NotAwaitingAnswer(SessionState),

    #[error("No briefing pass in flight to record (state: {0:?})")]
    NotProcessing(SessionState),
}

/// One request's journey through refinement rounds
///
/// The request text only grows; an answer that would push it over the cap
/// is rejected whole, never truncated.
#[derive(Debug, Clone)]
pub struct RefineSession {
    request: RequestText,
    state: SessionState,
    round: u32,
    max_rounds: u32,
    max_request_chars: usize,
}

impl RefineSession {
    pub fn new(initial: impl Into<String>, max_rounds: u32, max_request_chars: usize) -> Self {
        let request = RequestText::new(initial);
        debug!(
            len = request.len(),
            max_rounds, max_request_chars, "RefineSession::new: called"
        );
        Self {
            request,
            state: SessionState::AwaitingAnswer,
            round: 1,
            max_rounds,
            max_request_chars,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn request(&self) -> &RequestText {
        &self.request
    }

    /// Take the operator's answer for the current round
    ///
    /// An empty answer abandons the session. An over-cap answer is
    /// rejected: the error carries the sizes and the session stays in
    /// AwaitingAnswer with the request text untouched.
    pub fn submit_answer(&mut self, answer: &str) -> Result<SessionState, SessionError> {
        debug!(
            round = self.round,
            answer_len = answer.len(),
            "RefineSession::submit_answer: called"
        );
        if self.state != SessionState::AwaitingAnswer {
            return Err(SessionError::NotAwaitingAnswer(self.state));
        }

        let answer = answer.trim();
        if answer.is_empty() {
            debug!("RefineSession::submit_answer: empty answer, abandoning");
            self.state = SessionState::Abandoned;
            return Ok(self.state);
        }

        let would_be = self.request.char_count_with(self.round, answer);
        if would_be > self.max_request_chars {
            debug!(
                would_be,
                cap = self.max_request_chars,
                "RefineSession::submit_answer: answer over cap, rejecting"
            );
            return Err(SessionError::AnswerTooLong {
                would_be,
                cap: self.max_request_chars,
            });
        }

        self.request.append_refinement(self.round, answer);
        self.state = SessionState::Processing;
        Ok(self.state)
    }

    /// Record the outcome of the briefing pass for the current round
    pub fn record_outcome(&mut self, instruction_present: bool) -> Result<SessionState, SessionError> {
        debug!(
            round = self.round,
            instruction_present, "RefineSession::record_outcome: called"
        );
        if self.state != SessionState::Processing {
            return Err(SessionError::NotProcessing(self.state));
        }

        if instruction_present {
            debug!("RefineSession::record_outcome: instruction present, success");
            self.state = SessionState::Success;
        } else if self.round < self.max_rounds {
            self.round += 1;
            debug!(round = self.round, "RefineSession::record_outcome: next round");
            self.state = SessionState::AwaitingAnswer;
        } else {
            debug!("RefineSession::record_outcome: round limit reached");
            self.state = SessionState::RoundLimitReached;
        }

        Ok(self.state)
    }
}
