//! Instruction/content pairing for grounded and ungrounded answers

use serde::{Deserialize, Serialize};

use crate::types::EvidenceSet;

/// Separator placed between evidence chunks in the grounded context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

const UNGROUNDED_INSTRUCTION: &str = "You are a helpful AI assistant. Answer the user's question \
based on your knowledge. If the question seems nonsensical, say so.";

const GROUNDED_INSTRUCTION: &str = "You are an AI assistant with access to the following \
information. Use only this information to answer the user's question. If the information \
doesn't contain the answer, say so. Do not make up information. If the question seems \
nonsensical, say so.";

/// Which kind of answer the model is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    /// General-knowledge answer, no retrieved content
    Ungrounded,
    /// Answer restricted to the supplied context
    Grounded,
}

/// System instruction plus the user's query, ready for a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub mode: GenerationMode,
    pub system_instruction: String,
    pub user_content: String,
}

impl Prompt {
    /// Build the prompt for a query; empty or absent evidence is ungrounded
    pub fn for_query(query: &str, context: Option<&EvidenceSet>) -> Self {
        match context {
            Some(evidence) if !evidence.is_empty() => Self::grounded(query, evidence),
            _ => Self::ungrounded(query),
        }
    }

    pub fn ungrounded(query: &str) -> Self {
        Self {
            mode: GenerationMode::Ungrounded,
            system_instruction: UNGROUNDED_INSTRUCTION.to_string(),
            user_content: query.to_string(),
        }
    }

    pub fn grounded(query: &str, evidence: &EvidenceSet) -> Self {
        Self {
            mode: GenerationMode::Grounded,
            system_instruction: format!(
                "{}\n\nCONTEXT INFORMATION:\n{}",
                GROUNDED_INSTRUCTION,
                context_text(evidence)
            ),
            user_content: query.to_string(),
        }
    }
}

/// Evidence contents in evidence order, joined by [`CONTEXT_SEPARATOR`]
pub fn context_text(evidence: &EvidenceSet) -> String {
    evidence
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::filter::RelevanceFilter;
    use crate::types::{Chunk, ChunkMetadata, RetrievalResult};

    fn evidence(contents: &[&str]) -> EvidenceSet {
        let result: RetrievalResult = contents
            .iter()
            .map(|c| Chunk::new(*c, ChunkMetadata::new("doc.md"), 0.9))
            .collect::<Vec<_>>()
            .into();
        RelevanceFilter::default().filter(result)
    }

    #[test]
    fn test_ungrounded_prompt_has_no_context() {
        let prompt = Prompt::for_query("What is Rust?", None);

        assert_eq!(prompt.mode, GenerationMode::Ungrounded);
        assert_eq!(prompt.user_content, "What is Rust?");
        assert!(!prompt.system_instruction.contains("CONTEXT INFORMATION"));
        assert!(prompt.system_instruction.contains("nonsensical"));
    }

    #[test]
    fn test_empty_evidence_is_ungrounded() {
        let prompt = Prompt::for_query("q", Some(&evidence(&[])));
        assert_eq!(prompt.mode, GenerationMode::Ungrounded);
    }

    #[test]
    fn test_grounded_prompt_preserves_evidence_order() {
        let prompt = Prompt::for_query("q", Some(&evidence(&["first part.", "second part."])));

        assert_eq!(prompt.mode, GenerationMode::Grounded);
        assert!(prompt
            .system_instruction
            .ends_with("CONTEXT INFORMATION:\nfirst part.\n\nsecond part."));
        assert!(prompt.system_instruction.contains("Do not make up information"));
        assert!(prompt.system_instruction.contains("doesn't contain the answer"));
    }

    #[test]
    fn test_context_text_separator() {
        assert_eq!(context_text(&evidence(&["a", "b", "c"])), "a\n\nb\n\nc");
    }
}
