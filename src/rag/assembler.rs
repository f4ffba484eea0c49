// Response assembly and the single-slot "last response" holder
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use crate::types::{EvidenceSet, LastTrace, ResponseRecord, RetrievedChunk, ToolUsed};

/// Builds one [`ResponseRecord`] while the pipeline runs
///
/// The trace is append-only and local to this invocation. Dropping the
/// assembler (e.g. on a failed step) discards everything it collected.
#[derive(Debug)]
pub struct ResponseAssembler {
    query: String,
    trace: Vec<String>,
    selection: Option<(ToolUsed, Vec<RetrievedChunk>)>,
}

impl ResponseAssembler {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            trace: Vec::new(),
            selection: None,
        }
    }

    /// Append a trace entry
    pub fn record(&mut self, entry: impl Into<String>) {
        self.trace.push(entry.into());
    }

    /// Store the selected tool together with the evidence that justified it
    pub fn select(&mut self, tool: ToolUsed, evidence: &EvidenceSet) {
        debug_assert_eq!(tool == ToolUsed::Rag, !evidence.is_empty());
        let chunks = evidence.iter().map(RetrievedChunk::from).collect();
        self.selection = Some((tool, chunks));
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Seal the record with the generated text
    pub fn finish(self, result: String) -> ResponseRecord {
        let (tool_used, retrieved_chunks) = self
            .selection
            .unwrap_or((ToolUsed::None, Vec::new()));

        ResponseRecord {
            id: Uuid::new_v4(),
            query: self.query,
            tool_used,
            retrieved_chunks,
            result,
            trace: self.trace,
            created_at: Utc::now(),
        }
    }
}

/// Holds the most recent completed [`ResponseRecord`]
///
/// Last writer wins. The slot is only written with fully assembled
/// records, so a failed query leaves the previous contents in place.
/// Concurrent queries against one pipeline are not supported: the slot
/// ends up holding whichever query finished last.
#[derive(Debug, Default)]
pub struct LastResponseSlot {
    inner: Mutex<Option<ResponseRecord>>,
}

impl LastResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held record
    pub fn store(&self, record: ResponseRecord) {
        *self.lock() = Some(record);
    }

    /// Clone of the held record, if any query has completed
    pub fn latest(&self) -> Option<ResponseRecord> {
        self.lock().clone()
    }

    /// Trace of the held record
    pub fn trace(&self) -> LastTrace {
        match self.lock().as_ref() {
            Some(record) => LastTrace::Trace(record.trace.clone()),
            None => LastTrace::NoPriorQuery,
        }
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ResponseRecord>> {
        // A panic while holding the lock cannot leave a half-written record
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
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
            .map(|s| Chunk::new("content", ChunkMetadata::new("faq.md"), *s))
            .collect::<Vec<_>>()
            .into();
        RelevanceFilter::default().filter(result)
    }

    #[test]
    fn test_assembler_records_trace_in_order() {
        let mut asm = ResponseAssembler::new("q");
        asm.record("one");
        asm.record("two".to_string());
        asm.select(ToolUsed::None, &evidence(&[]));

        let record = asm.finish("answer".to_string());
        assert_eq!(record.trace, vec!["one", "two"]);
        assert_eq!(record.query, "q");
        assert_eq!(record.result, "answer");
        assert_eq!(record.tool_used, ToolUsed::None);
        assert!(record.retrieved_chunks.is_empty());
    }

    #[test]
    fn test_assembler_copies_evidence() {
        let mut asm = ResponseAssembler::new("q");
        asm.select(ToolUsed::Rag, &evidence(&[0.9, 0.6]));

        let record = asm.finish("answer".to_string());
        assert_eq!(record.tool_used, ToolUsed::Rag);
        assert_eq!(record.retrieved_chunks.len(), 2);
        assert_eq!(record.retrieved_chunks[0].source, "faq.md");
        assert_eq!(record.retrieved_chunks[1].relevance_score, 0.6);
    }

    #[test]
    fn test_slot_starts_empty() {
        let slot = LastResponseSlot::new();
        assert_eq!(slot.trace(), LastTrace::NoPriorQuery);
        assert!(slot.latest().is_none());
    }

    #[test]
    fn test_slot_last_writer_wins() {
        let slot = LastResponseSlot::new();

        let mut first = ResponseAssembler::new("first");
        first.record("first trace");
        slot.store(first.finish("a".to_string()));

        let mut second = ResponseAssembler::new("second");
        second.record("second trace");
        slot.store(second.finish("b".to_string()));

        assert_eq!(slot.trace(), LastTrace::Trace(vec!["second trace".to_string()]));
        assert_eq!(slot.latest().unwrap().query, "second");

        slot.clear();
        assert_eq!(slot.trace(), LastTrace::NoPriorQuery);
    }
}
