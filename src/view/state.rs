use std::fmt;

use crate::types::{Message, Transcript};

use super::filter::{DisplayedSet, SearchQuery};
use super::pagination::{Pagination, DEFAULT_PAGE_SIZE};

/// Page navigation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    Next,
    Prev,
    First,
    Last,
}

/// Everything the renderers need to know about what is on screen.
///
/// A `ViewState` is never mutated; loads, searches and page moves produce a
/// new one. Message storage is shared, so transitions only copy indices.
#[derive(Debug, Clone)]
pub struct ViewState {
    transcript: Transcript,
    query_text: String,
    query: SearchQuery,
    displayed: DisplayedSet,
    pagination: Pagination,
}

impl ViewState {
    /// Nothing loaded yet
    pub fn new(page_size: usize) -> Self {
        Self::for_transcript(Transcript::empty(), page_size)
    }

    fn for_transcript(transcript: Transcript, page_size: usize) -> Self {
        let displayed = DisplayedSet::all(transcript.messages.clone());
        let mut pagination = Pagination::new(displayed.len(), page_size);
        pagination.go_to_last();
        Self {
            transcript,
            query_text: String::new(),
            query: SearchQuery::default(),
            displayed,
            pagination,
        }
    }

    /// Show a freshly loaded transcript from its newest page, query cleared
    pub fn load(&self, transcript: Transcript) -> Self {
        Self::for_transcript(transcript, self.pagination.page_size())
    }

    /// Re-filter the full transcript with `raw_query` and land on the last page
    pub fn with_query(&self, raw_query: &str) -> Self {
        let query = SearchQuery::new(raw_query);
        let displayed = DisplayedSet::filtered(self.transcript.messages.clone(), &query);
        let mut pagination = Pagination::new(displayed.len(), self.pagination.page_size());
        pagination.go_to_last();

        log::debug!(
            "Filter {:?}: {} of {} messages",
            query.as_str(),
            displayed.len(),
            self.transcript.len()
        );

        Self {
            transcript: self.transcript.clone(),
            query_text: raw_query.to_string(),
            query,
            displayed,
            pagination,
        }
    }

    /// Move between pages; `None` when already at the requested boundary
    pub fn navigate(&self, nav: PageNav) -> Option<Self> {
        let mut pagination = self.pagination;
        let changed = match nav {
            PageNav::Next => pagination.next(),
            PageNav::Prev => pagination.prev(),
            PageNav::First => pagination.go_to_first(),
            PageNav::Last => pagination.go_to_last(),
        };
        if !changed {
            return None;
        }
        log::debug!(
            "Page {} of {}",
            pagination.current_page() + 1,
            pagination.total_pages()
        );
        Some(Self {
            pagination,
            ..self.clone()
        })
    }

    /// Same view with a different page size, current page clamped
    pub fn with_page_size(&self, page_size: usize) -> Self {
        let mut pagination = self.pagination;
        pagination.set_page_size(page_size);
        Self {
            pagination,
            ..self.clone()
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn chat_name(&self) -> &str {
        &self.transcript.name
    }

    /// Query as the user typed it
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn displayed(&self) -> &DisplayedSet {
        &self.displayed
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Messages on the current page, oldest first
    pub fn page_messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.displayed.slice(self.pagination.page_range())
    }

    /// `Page x of y`
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {}",
            self.pagination.current_page() + 1,
            self.pagination.total_pages()
        )
    }

    pub fn stats(&self) -> ViewStats {
        let shown = if self.displayed.is_empty() {
            (0, 0)
        } else {
            self.pagination.shown_range()
        };
        ViewStats {
            total: self.transcript.len(),
            found: (!self.query.is_empty()).then_some(self.displayed.len()),
            participants: self.transcript.participant_count(),
            shown,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Status-line figures for the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewStats {
    pub total: usize,
    /// Match count, only while a query is active
    pub found: Option<usize>,
    pub participants: usize,
    pub shown: (usize, usize),
}

impl fmt::Display for ViewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total messages: {}", self.total)?;
        if let Some(found) = self.found {
            write!(f, " | Found: {}", found)?;
        }
        write!(
            f,
            " | Participants: {} | Showing: {}-{}",
            self.participants, self.shown.0, self.shown.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawMessage, RawText};

    fn transcript(count: usize) -> Transcript {
        let messages = (0..count)
            .map(|i| {
                let raw = RawMessage {
                    from: Some(if i % 2 == 0 { "Alice" } else { "Bob" }.to_string()),
                    text: RawText::Plain(format!("message {}", i + 1)),
                    ..Default::default()
                };
                Message::normalize(&raw, None)
            })
            .collect();
        Transcript::new("Test chat", messages)
    }

    #[test]
    fn test_load_lands_on_last_page() {
        let view = ViewState::new(20).load(transcript(45));
        assert_eq!(view.pagination().total_pages(), 3);
        assert_eq!(view.pagination().current_page(), 2);
        let bodies: Vec<_> = view.page_messages().map(|m| m.body.clone()).collect();
        assert_eq!(bodies.first().unwrap(), "message 41");
        assert_eq!(bodies.last().unwrap(), "message 45");
        assert_eq!(view.page_label(), "Page 3 of 3");
    }

    #[test]
    fn test_query_resets_to_last_page() {
        let view = ViewState::new(5).load(transcript(45));
        let view = view.navigate(PageNav::First).unwrap();
        assert_eq!(view.pagination().current_page(), 0);

        // "message 1" matches 1, 10-19 = 11 messages -> 3 pages of 5
        let filtered = view.with_query("  MESSAGE 1");
        assert_eq!(filtered.displayed().len(), 11);
        assert_eq!(filtered.pagination().current_page(), 2);
        assert_eq!(filtered.query_text(), "  MESSAGE 1");

        // The previous state is untouched
        assert_eq!(view.displayed().len(), 45);
    }

    #[test]
    fn test_participants_fixed_across_transitions() {
        let view = ViewState::new(5).load(transcript(45));
        assert_eq!(view.stats().participants, 2);

        // Counts the whole chat, not the matches
        let filtered = view.with_query("message 1");
        assert_eq!(filtered.stats().participants, 2);
        let first = filtered.navigate(PageNav::First).unwrap();
        assert_eq!(first.stats().participants, 2);
        let empty = view.with_query("nothing like this");
        assert_eq!(empty.stats().participants, 2);
    }

    #[test]
    fn test_page_size_change_keeps_query_and_clamps() {
        let view = ViewState::new(5).load(transcript(45)).with_query("message");
        assert_eq!(view.pagination().current_page(), 8);

        let resized = view.with_page_size(20);
        assert_eq!(resized.pagination().page_size(), 20);
        assert_eq!(resized.pagination().total_pages(), 3);
        assert_eq!(resized.pagination().current_page(), 2);
        assert_eq!(resized.query_text(), "message");
        assert_eq!(resized.displayed().len(), 45);
        assert_eq!(resized.page_messages().count(), 5);

        // Original untouched
        assert_eq!(view.pagination().page_size(), 5);
    }

    #[test]
    fn test_navigate_boundaries() {
        let view = ViewState::new(20).load(transcript(45));
        assert!(view.navigate(PageNav::Next).is_none());
        assert!(view.navigate(PageNav::Last).is_none());
        let prev = view.navigate(PageNav::Prev).unwrap();
        assert_eq!(prev.pagination().current_page(), 1);
    }

    #[test]
    fn test_stats_line() {
        let view = ViewState::new(20).load(transcript(45));
        assert_eq!(
            view.stats().to_string(),
            "Total messages: 45 | Participants: 2 | Showing: 41-45"
        );
        let filtered = view.with_query("message 4");
        assert_eq!(
            filtered.stats().to_string(),
            "Total messages: 45 | Found: 7 | Participants: 2 | Showing: 1-7"
        );
        let none = view.with_query("zzz");
        assert_eq!(none.stats().shown, (0, 0));
        assert_eq!(none.pagination().total_pages(), 1);
    }
}
