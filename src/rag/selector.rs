//! Tool selection state machine
//!
//! Entered fresh for every query:
//!
//! 1. Start → NoContext  (on: evidence empty)      → tool `none`
//! 2. Start → HasContext (on: evidence non-empty)  → tool `RAG`
//!
//! The decision depends only on whether the evidence set is empty; chunk
//! count, scores and query text have no influence.

use serde::{Deserialize, Serialize};

use crate::types::{EvidenceSet, ToolUsed};

/// Selector states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorState {
    /// Evidence not yet evaluated
    Start,
    /// No usable context (terminal)
    NoContext,
    /// Evidence available (terminal)
    HasContext,
}

impl SelectorState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SelectorState::NoContext | SelectorState::HasContext)
    }

    /// Evaluate evidence; terminal states are self-loops
    pub fn evaluate(self, evidence: &EvidenceSet) -> SelectorState {
        match self {
            SelectorState::Start if evidence.is_empty() => SelectorState::NoContext,
            SelectorState::Start => SelectorState::HasContext,
            terminal => terminal,
        }
    }

    /// Tool implied by a terminal state
    pub fn tool(&self) -> Option<ToolUsed> {
        match self {
            SelectorState::Start => None,
            SelectorState::NoContext => Some(ToolUsed::None),
            SelectorState::HasContext => Some(ToolUsed::Rag),
        }
    }
}

/// Chooses grounded or ungrounded generation for one query
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolSelector;

impl ToolSelector {
    pub fn new() -> Self {
        Self
    }

    /// Run the state machine from `Start` and return the terminal state
    pub fn decide(&self, evidence: &EvidenceSet) -> SelectorState {
        SelectorState::Start.evaluate(evidence)
    }

    /// Tool chosen for this evidence
    ///
    /// `decide` always ends in a terminal state, so the fallback is never taken.
    pub fn select(&self, evidence: &EvidenceSet) -> ToolUsed {
        self.decide(evidence).tool().unwrap_or(ToolUsed::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::filter::RelevanceFilter;
    use crate::types::{Chunk, ChunkMetadata, RetrievalResult};

    fn evidence(scores: &[f32]) -> EvidenceSet {
        let result: RetrievalResult = scores
            .iter()
            .map(|s| Chunk::new("text", ChunkMetadata::new("doc.md"), *s))
            .collect::<Vec<_>>()
            .into();
        RelevanceFilter::new(0.0).filter(result)
    }

    #[test]
    fn test_empty_evidence_selects_none() {
        let selector = ToolSelector::new();
        let empty = evidence(&[]);

        assert_eq!(selector.decide(&empty), SelectorState::NoContext);
        assert_eq!(selector.select(&empty), ToolUsed::None);
    }

    #[test]
    fn test_any_evidence_selects_rag() {
        let selector = ToolSelector::new();

        assert_eq!(selector.select(&evidence(&[0.41])), ToolUsed::Rag);
        assert_eq!(selector.select(&evidence(&[0.99, 0.98, 0.97])), ToolUsed::Rag);
        assert_eq!(selector.decide(&evidence(&[0.5])), SelectorState::HasContext);
    }

    #[test]
    fn test_terminal_states_self_loop() {
        let full = evidence(&[0.9]);
        let empty = evidence(&[]);

        assert_eq!(SelectorState::NoContext.evaluate(&full), SelectorState::NoContext);
        assert_eq!(SelectorState::HasContext.evaluate(&empty), SelectorState::HasContext);
        assert!(SelectorState::NoContext.is_terminal());
        assert!(!SelectorState::Start.is_terminal());
    }

    #[test]
    fn test_state_tool_mapping() {
        assert_eq!(SelectorState::Start.tool(), None);
        assert_eq!(SelectorState::NoContext.tool(), Some(ToolUsed::None));
        assert_eq!(SelectorState::HasContext.tool(), Some(ToolUsed::Rag));
    }

    #[test]
    fn test_select_follows_decided_state() {
        let selector = ToolSelector::new();
        for scores in [&[][..], &[0.7][..], &[0.9, 0.2][..]] {
            let ev = evidence(scores);
            let state = selector.decide(&ev);
            assert!(state.is_terminal());
            assert_eq!(Some(selector.select(&ev)), state.tool());
        }
    }
}
