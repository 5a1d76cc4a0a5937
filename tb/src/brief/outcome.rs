//! Briefing pass products

use tracing::debug;

/// Specificity analysis verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// The request names enough concrete detail to act on
    Sufficient,
    /// Too vague; the reason is the model's reply text
    Insufficient(String),
}

impl Analysis {
    pub fn is_sufficient(&self) -> bool {
        matches!(self, Analysis::Sufficient)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Analysis::Sufficient => None,
            Analysis::Insufficient(reason) => Some(reason),
        }
    }
}

/// Parse an analyze reply into a verdict
///
/// Prefers an `ANSWER:` line; absent the marker, scans the whole reply.
/// The request is sufficient iff the scanned text contains YES
/// (case-insensitive). Anything else, including an empty reply, is
/// insufficient with the reply as the reason.
pub fn parse_analysis(reply: &str) -> Analysis {
    debug!(reply_len = reply.len(), "parse_analysis: called");
    let verdict = reply
        .lines()
        .find_map(|line| {
            line.trim()
                .to_uppercase()
                .strip_prefix("ANSWER:")
                .map(|rest| rest.trim().to_string())
        })
        .unwrap_or_else(|| {
            debug!("parse_analysis: no ANSWER line, scanning whole reply");
            reply.to_uppercase()
        });

    if verdict.contains("YES") {
        debug!("parse_analysis: sufficient");
        Analysis::Sufficient
    } else {
        debug!("parse_analysis: insufficient");
        Analysis::Insufficient(reply.trim().to_string())
    }
}

/// One briefing pass's products
#[derive(Debug, Clone)]
pub struct BriefOutcome {
    /// Specificity verdict for the request as analyzed
    pub analysis: Analysis,

    /// Clarifying questions (absent only when the clarify call failed)
    pub questions: Option<String>,

    /// Ready-to-use instruction (absent when the request was insufficient
    /// or the instruct call failed)
    pub instruction: Option<String>,

    /// Operator-facing descriptions of completion calls that failed
    pub failures: Vec<String>,
}

impl BriefOutcome {
    pub fn instruction_present(&self) -> bool {
        self.instruction.is_some()
    }
}
