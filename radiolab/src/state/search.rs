use radiolab_api::endpoints::{projects::Project, reports::Report};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trimmed, lowercased form of a search term. `None` means "no filter".
pub fn normalize(raw: &str) -> Option<String> {
    let term = raw.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

/// Entities that can be matched against a search term.
pub trait Searchable {
    /// Text fields the search term is matched against.
    fn search_fields(&self) -> Vec<String>;

    fn matches(&self, term: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<String> {
        vec![self.name.clone(), self.patient_id.clone()]
    }
}

impl Searchable for Report {
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.display_name(),
            self.project_name.clone(),
            self.patient_id.clone(),
            self.date.clone(),
            self.id.to_string(),
        ]
    }
}

/// Items matching `raw`, in their original order. An empty term keeps everything.
pub fn filter<'a, T: Searchable>(items: &'a [T], raw: &str) -> Vec<&'a T> {
    match normalize(raw) {
        None => items.iter().collect(),
        Some(term) => items.iter().filter(|item| item.matches(&term)).collect(),
    }
}

/// Search input whose value is only committed after typing pauses.
///
/// Edits change the draft and restart the quiet period; `poll` commits the draft once
/// the quiet period has elapsed since the last edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounced {
    draft: String,
    committed: String,
    last_edit: Option<Instant>,
    quiet: Duration,
}

impl Debounced {
    pub fn new(quiet: Duration) -> Self {
        Self {
            draft: String::new(),
            committed: String::new(),
            last_edit: None,
            quiet,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.draft.push(c);
        self.last_edit = Some(now);
    }

    pub fn pop(&mut self, now: Instant) {
        if self.draft.pop().is_some() {
            self.last_edit = Some(now);
        }
    }

    /// Commits the draft if the quiet period has passed. Returns the new committed
    /// value when it changed.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let last_edit = self.last_edit?;
        if now.saturating_duration_since(last_edit) < self.quiet {
            return None;
        }
        self.commit()
    }

    /// Commits the draft immediately.
    pub fn flush(&mut self) -> Option<&str> {
        self.commit()
    }

    /// Empties the input and commits the empty value immediately.
    pub fn clear(&mut self) -> Option<&str> {
        self.draft.clear();
        self.commit()
    }

    fn commit(&mut self) -> Option<&str> {
        self.last_edit = None;
        if self.committed == self.draft {
            return None;
        }
        self.committed = self.draft.clone();
        Some(&self.committed)
    }
}

impl Default for Debounced {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
