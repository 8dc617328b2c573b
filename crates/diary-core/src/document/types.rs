//! Journal data model.
//!
//! A journal is an ordered list of entries; each entry is an append-only,
//! never-empty history of revisions. The serialized form is the JSON that
//! gets encrypted into the blob.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DiaryError, Result};

/// One immutable snapshot of an entry's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Revision {
    /// Entry text
    pub content: String,

    /// Creation time, epoch milliseconds
    #[serde(rename = "date")]
    pub timestamp: i64,
}

impl Revision {
    pub fn new(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            timestamp,
        }
    }
}

/// Append-only revision history for one journal item.
///
/// The history is private so it can only grow; it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    history: Vec<Revision>,

    /// Optional display flag, independent of history
    pub hidden: Option<bool>,

    /// Optional numeric metadata carried through unchanged
    pub version: Option<u64>,
}

impl JournalEntry {
    /// Start a new entry with its first revision.
    pub fn new(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            history: vec![Revision::new(content, timestamp)],
            hidden: None,
            version: None,
        }
    }

    /// Rebuild an entry from a stored history.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::MalformedDocument` if `history` is empty.
    pub fn from_history(history: Vec<Revision>) -> Result<Self> {
        if history.is_empty() {
            return Err(DiaryError::MalformedDocument(
                "Entry has an empty revision history".to_string(),
            ));
        }
        Ok(Self {
            history,
            hidden: None,
            version: None,
        })
    }

    /// Push a new revision; earlier revisions are left untouched.
    pub fn append_revision(&mut self, content: impl Into<String>, timestamp: i64) -> &Revision {
        self.history.push(Revision::new(content, timestamp));
        self.latest()
    }

    /// The current revision (last in history).
    pub fn latest(&self) -> &Revision {
        // Non-empty by construction: `new`, `from_history` and deserialization
        // all refuse empty histories, and nothing removes revisions.
        &self.history[self.history.len() - 1]
    }

    /// The first revision, i.e. when the entry was created.
    pub fn first(&self) -> &Revision {
        &self.history[0]
    }

    /// Full history, oldest first.
    pub fn history(&self) -> &[Revision] {
        &self.history
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

/// Ordered collection of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries not flagged hidden, with their positions in the journal.
    pub fn visible_entries(&self) -> impl Iterator<Item = (usize, &JournalEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_hidden())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JournalEntry> {
        self.entries.get(index)
    }

    /// Append a new entry at the end of the journal; returns its index.
    pub fn add_entry(&mut self, content: impl Into<String>, timestamp: i64) -> usize {
        self.entries.push(JournalEntry::new(content, timestamp));
        self.entries.len() - 1
    }

    /// Record an edit of the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::NotFound` if `index` is out of range.
    pub fn append_revision(
        &mut self,
        index: usize,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Result<&Revision> {
        Ok(self.entry_mut(index)?.append_revision(content, timestamp))
    }

    /// Set or clear the hidden flag of the entry at `index`.
    pub fn set_hidden(&mut self, index: usize, hidden: bool) -> Result<()> {
        self.entry_mut(index)?.hidden = Some(hidden);
        Ok(())
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut JournalEntry> {
        let len = self.entries.len();
        self.entries.get_mut(index).ok_or_else(|| {
            DiaryError::NotFound(format!("Entry {} (journal has {} entries)", index, len))
        })
    }
}

/// Wire shapes for an entry: a bare revision array, or an object carrying
/// metadata next to the history.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Bare(Vec<Revision>),
    Tagged {
        history: Vec<Revision>,
        #[serde(default)]
        hidden: Option<bool>,
        #[serde(default)]
        version: Option<u64>,
    },
}

impl Serialize for JournalEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.hidden.is_none() && self.version.is_none() {
            return serializer.collect_seq(&self.history);
        }

        #[derive(Serialize)]
        struct Tagged<'a> {
            history: &'a [Revision],
            #[serde(skip_serializing_if = "Option::is_none")]
            hidden: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            version: Option<u64>,
        }

        Tagged {
            history: &self.history,
            hidden: self.hidden,
            version: self.version,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JournalEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (history, hidden, version) = match EntryRepr::deserialize(deserializer)? {
            EntryRepr::Bare(history) => (history, None, None),
            EntryRepr::Tagged {
                history,
                hidden,
                version,
            } => (history, hidden, version),
        };

        let mut entry = JournalEntry::from_history(history).map_err(serde::de::Error::custom)?;
        entry.hidden = hidden;
        entry.version = version;
        Ok(entry)
    }
}
