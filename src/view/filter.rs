//! Search filtering over the full message list.
//!
//! The displayed set never copies messages: it keeps the shared message list
//! plus the indices that matched, in their original (chronological) order.

use std::sync::Arc;

use crate::types::Message;

/// A normalised search query (trimmed, lower-cased)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, message: &Message) -> bool {
        self.is_empty() || message.matches(&self.0)
    }
}

/// Indices of `messages` matching `query`, in order
pub fn filter_indices(messages: &[Message], query: &SearchQuery) -> Vec<usize> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| query.matches(m))
        .map(|(i, _)| i)
        .collect()
}

/// Chronological subsequence of a transcript currently on display
#[derive(Debug, Clone)]
pub struct DisplayedSet {
    source: Arc<[Message]>,
    indices: Arc<[usize]>,
}

impl DisplayedSet {
    /// Every message, in order
    pub fn all(source: Arc<[Message]>) -> Self {
        let indices: Arc<[usize]> = (0..source.len()).collect();
        Self { source, indices }
    }

    /// Messages of `source` matching `query`; an empty query is the identity
    pub fn filtered(source: Arc<[Message]>, query: &SearchQuery) -> Self {
        if query.is_empty() {
            return Self::all(source);
        }
        let indices: Arc<[usize]> = filter_indices(&source, query).into();
        Self { source, indices }
    }

    /// Filter this set further, keeping the same source list
    pub fn refine(&self, query: &SearchQuery) -> Self {
        let indices: Arc<[usize]> = self
            .indices
            .iter()
            .copied()
            .filter(|&i| query.matches(&self.source[i]))
            .collect();
        Self {
            source: Arc::clone(&self.source),
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Message> {
        self.indices.get(position).map(|&i| &self.source[i])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> + ExactSizeIterator + '_ {
        self.indices.iter().map(move |&i| &self.source[i])
    }

    /// Messages at displayed positions `range`
    pub fn slice(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = &Message> + '_ {
        let end = range.end.min(self.indices.len());
        let start = range.start.min(end);
        self.indices[start..end].iter().map(move |&i| &self.source[i])
    }

    /// Indices into the source list
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn source(&self) -> &Arc<[Message]> {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, RawMessage};

    fn msg(from: &str, text: &str) -> Message {
        let raw = RawMessage {
            from: Some(from.to_string()),
            text: crate::types::RawText::Plain(text.to_string()),
            ..Default::default()
        };
        Message::normalize(&raw, None)
    }

    fn sample() -> Arc<[Message]> {
        vec![
            msg("Alice", "Lunch tomorrow?"),
            msg("Bob", "sure, where"),
            msg("Alice", "the usual LUNCH place"),
            msg("Carol", "count me in"),
        ]
        .into()
    }

    #[test]
    fn test_query_normalised() {
        assert_eq!(SearchQuery::new("  LuNcH \n").as_str(), "lunch");
        assert!(SearchQuery::new("   ").is_empty());
    }

    #[test]
    fn test_empty_query_is_identity() {
        let source = sample();
        let set = DisplayedSet::filtered(Arc::clone(&source), &SearchQuery::new(""));
        assert_eq!(set.len(), source.len());
        for (shown, original) in set.iter().zip(source.iter()) {
            assert_eq!(shown, original);
        }
    }

    #[test]
    fn test_filter_case_insensitive_order_preserving() {
        let set = DisplayedSet::filtered(sample(), &SearchQuery::new("lunch"));
        assert_eq!(set.indices(), &[0, 2]);

        let by_sender = DisplayedSet::filtered(sample(), &SearchQuery::new("ALICE"));
        assert_eq!(by_sender.indices(), &[0, 2]);
    }

    #[test]
    fn test_filter_idempotent() {
        let query = SearchQuery::new("e");
        let once = DisplayedSet::filtered(sample(), &query);
        let twice = once.refine(&query);
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn test_no_match_is_empty() {
        let set = DisplayedSet::filtered(sample(), &SearchQuery::new("zebra"));
        assert!(set.is_empty());
        assert!(set.get(0).is_none());
    }

    #[test]
    fn test_slice_clamps() {
        let set = DisplayedSet::all(sample());
        assert_eq!(set.slice(2..10).count(), 2);
        assert_eq!(set.slice(10..20).count(), 0);
    }
}
