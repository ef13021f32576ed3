//! In-memory note store.

use crate::error::{IssueError, Result};
use crate::store::NoteStore;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;

/// Minimum prefix length accepted by [`MemoryNoteStore::resolve_reference`].
const MIN_ABBREV: usize = 4;

/// A [`NoteStore`] held in memory.
///
/// Anchor ids are SHA-256 digests of the anchor content. Notes are listed
/// in the order they were first written.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    objects: RefCell<HashMap<String, String>>,
    notes: RefCell<Vec<(String, String)>>,
}

impl MemoryNoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a raw body to `reference` without validation or encoding.
    pub fn insert_raw(&self, reference: impl Into<String>, body: impl Into<String>) {
        let reference = reference.into();
        let body = body.into();
        let mut notes = self.notes.borrow_mut();
        if let Some(entry) = notes.iter_mut().find(|(r, _)| *r == reference) {
            entry.1 = body;
        } else {
            notes.push((reference, body));
        }
    }

    /// Number of notes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.borrow().is_empty()
    }
}

impl NoteStore for MemoryNoteStore {
    fn list_references(&self) -> Result<Vec<String>> {
        Ok(self.notes.borrow().iter().map(|(r, _)| r.clone()).collect())
    }

    fn read_note(&self, reference: &str) -> Result<String> {
        self.notes
            .borrow()
            .iter()
            .find(|(r, _)| r == reference)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| IssueError::IssueNotFound {
                reference: reference.to_string(),
            })
    }

    fn write_anchor(&self, content: &str) -> Result<String> {
        let hash = format!("{:x}", Sha256::digest(content.as_bytes()));
        self.objects
            .borrow_mut()
            .insert(hash.clone(), content.to_string());
        Ok(hash)
    }

    fn write_note(&self, reference: &str, body: &str, overwrite: bool) -> Result<()> {
        let exists = self.notes.borrow().iter().any(|(r, _)| r == reference);
        if exists && !overwrite {
            return Err(IssueError::NoteExists {
                hash: reference.to_string(),
            });
        }
        self.insert_raw(reference, body);
        Ok(())
    }

    fn resolve_reference(&self, partial: &str) -> Result<String> {
        let not_found = || IssueError::IssueNotFound {
            reference: partial.to_string(),
        };

        let objects = self.objects.borrow();
        let notes = self.notes.borrow();
        let known = notes
            .iter()
            .map(|(r, _)| r.as_str())
            .chain(objects.keys().map(String::as_str));

        if partial.len() < MIN_ABBREV {
            return known
                .into_iter()
                .find(|r| *r == partial)
                .map(str::to_string)
                .ok_or_else(not_found);
        }

        let mut matches: Vec<&str> = known.filter(|r| r.starts_with(partial)).collect();
        matches.sort_unstable();
        matches.dedup();
        if let Some(exact) = matches.iter().find(|r| **r == partial) {
            return Ok((*exact).to_string());
        }
        match matches.as_slice() {
            [single] => Ok((*single).to_string()),
            _ => Err(not_found()),
        }
    }
}
