//! Briefing pipeline
//!
//! One briefing pass over a request text: analyze specificity, generate
//! clarifying questions, and synthesize a ready-to-use instruction when
//! the request is specific enough.

mod briefer;
mod outcome;

pub use briefer::Briefer;
pub use outcome::{Analysis, BriefOutcome, parse_analysis};
