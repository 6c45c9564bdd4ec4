pub mod client;
pub mod gviz;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the gviz wire format
// ---------------------------------------------------------------------------

/// Public spreadsheet export the lucky draw reads its participants from.
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/197i1zCv6JqRYI_8ztVl-uRCYYnpeaWyDECxWnPbqq6s/gviz/tq?tqx=out:json";

/// Zero-based column holding the participant label in every row.
pub const LABEL_COLUMN: usize = 1;

/// Ordered participant labels, in spreadsheet row order.
///
/// Built once from the feed and never mutated afterwards; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantList {
    labels: Vec<String>,
}

impl ParticipantList {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl FromIterator<String> for ParticipantList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
