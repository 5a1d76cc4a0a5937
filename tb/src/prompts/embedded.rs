//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Specificity analysis prompt
pub const ANALYZE: &str = include_str!("../../prompts/analyze.pmt");

/// Clarifying questions prompt
pub const CLARIFY: &str = include_str!("../../prompts/clarify.pmt");

/// Final instruction prompt
pub const INSTRUCT: &str = include_str!("../../prompts/instruct.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "analyze" => {
            debug!("get_embedded: matched analyze");
            Some(ANALYZE)
        }
        "clarify" => {
            debug!("get_embedded: matched clarify");
            Some(CLARIFY)
        }
        "instruct" => {
            debug!("get_embedded: matched instruct");
            Some(INSTRUCT)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
