//! Accumulated request text
//!
//! The request only grows: each refinement round appends one labeled
//! block. Nothing is ever rewritten or truncated.

use std::fmt;

use tracing::debug;

/// The block appended for one round's answers
fn refinement_block(round: u32, answer: &str) -> String {
    format!("\n\n[Refinement {}]: {}", round, answer)
}

/// The growing request text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestText(String);

impl RequestText {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        debug!(len = initial.len(), "RequestText::new: called");
        Self(initial)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Character count of the accumulated text (the cap unit)
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Character count the text would have after appending this round's
    /// answer
    pub fn char_count_with(&self, round: u32, answer: &str) -> usize {
        self.char_count() + refinement_block(round, answer).chars().count()
    }

    /// Append one round's answers as a labeled block
    pub fn append_refinement(&mut self, round: u32, answer: &str) {
        debug!(round, answer_len = answer.len(), "RequestText::append_refinement: called");
        self.0.push_str(&refinement_block(round, answer));
    }
}

impl fmt::Display for RequestText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_refinement_exact_format() {
        let mut request = RequestText::new("fix the bug");
        request.append_refinement(1, "data_processor.py, memory usage");

        assert_eq!(
            request.as_str(),
            "fix the bug\n\n[Refinement 1]: data_processor.py, memory usage"
        );
    }

    #[test]
    fn test_appends_preserve_order() {
        let mut request = RequestText::new("make the parser compliant with robots.txt");
        request.append_refinement(1, "focus on src/parser.rs");
        request.append_refinement(2, "success is all fixtures passing");
        request.append_refinement(3, "no new dependencies");

        let text = request.as_str();
        assert!(text.starts_with("make the parser compliant with robots.txt"));
        let p1 = text.find("[Refinement 1]: focus on src/parser.rs").unwrap();
        let p2 = text.find("[Refinement 2]: success is all fixtures passing").unwrap();
        let p3 = text.find("[Refinement 3]: no new dependencies").unwrap();
        assert!(p1 < p2 && p2 < p3);
    }

    #[test]
    fn test_char_count_with_matches_actual_append() {
        let mut request = RequestText::new("fix the bug");
        let predicted = request.char_count_with(1, "in src/lib.rs");
        request.append_refinement(1, "in src/lib.rs");
        assert_eq!(request.char_count(), predicted);
    }

    #[test]
    fn test_char_count_is_characters_not_bytes() {
        let request = RequestText::new("d\u{e9}j\u{e0} vu \u{20ac}5");
        assert_eq!(request.char_count(), 10);
        assert!(request.len() > request.char_count());
    }

    #[test]
    fn test_display_matches_as_str() {
        let mut request = RequestText::new("initial");
        request.append_refinement(1, "more");
        assert_eq!(format!("{}", request), request.as_str());
    }
}
