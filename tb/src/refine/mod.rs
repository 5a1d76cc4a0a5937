//! Progressive request refinement
//!
//! A vague request enters a refinement session: each round the operator
//! answers the clarifying questions, the answers are appended to the
//! request as a labeled `[Refinement N]` block, and the grown text goes
//! back through a briefing pass. The session ends when an instruction
//! arrives, the operator stops answering, or the round limit is hit.

mod request;
mod session;

pub use request::RequestText;
pub use session::{RefineSession, SessionError, SessionState};
