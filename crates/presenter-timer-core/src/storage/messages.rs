//! Predefined message list, stored as a JSON array of strings.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{data_dir, MESSAGES_FILE};
use crate::error::{MessageError, Result};

/// Written when the list is missing, empty or unreadable.
pub const DEFAULT_MESSAGES: [&str; 2] = ["Please Wrap Up", "Time is up"];

/// Ordered list of predefined messages backed by a file.
#[derive(Debug, Clone)]
pub struct MessageStore {
    path: PathBuf,
    messages: Vec<String>,
}

impl MessageStore {
    /// Store rooted in `dir`, loaded immediately.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let mut store = Self {
            path: dir.as_ref().join(MESSAGES_FILE),
            messages: Vec::new(),
        };
        store.load();
        store
    }

    /// Store in the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::in_dir(data_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(String::as_str)
    }

    /// Re-read the file. Falls back to [`DEFAULT_MESSAGES`] (and writes them)
    /// when the file is missing, empty or unreadable.
    pub fn load(&mut self) -> &[String] {
        let loaded = match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(list) => list,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "error loading messages; using defaults");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "error loading messages; using defaults");
                Vec::new()
            }
        };

        if loaded.is_empty() {
            self.messages = DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect();
            if let Err(e) = self.save() {
                warn!(error = %e, "could not write default messages");
            }
        } else {
            self.messages = loaded;
        }
        &self.messages
    }

    /// Persist the in-memory list.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.messages)?;
        fs::write(&self.path, json).map_err(|e| MessageError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Append a message and save.
    pub fn add(&mut self, text: &str) -> Result<usize> {
        let text = non_blank(text)?;
        self.messages.push(text);
        self.persist_or_rollback(|list| {
            list.pop();
        })?;
        Ok(self.messages.len() - 1)
    }

    /// Replace the message at `index` and save.
    pub fn edit(&mut self, index: usize, text: &str) -> Result<()> {
        let text = non_blank(text)?;
        let len = self.messages.len();
        let slot = self
            .messages
            .get_mut(index)
            .ok_or(MessageError::OutOfBounds { index, len })?;
        let previous = std::mem::replace(slot, text);
        self.persist_or_rollback(move |list| list[index] = previous)
    }

    /// Remove the message at `index` and save. Returns the removed text.
    pub fn delete(&mut self, index: usize) -> Result<String> {
        let len = self.messages.len();
        if index >= len {
            return Err(MessageError::OutOfBounds { index, len }.into());
        }
        let removed = self.messages.remove(index);
        let restore = removed.clone();
        self.persist_or_rollback(move |list| list.insert(index, restore))?;
        Ok(removed)
    }

    /// Replace the whole list with the defaults and save.
    pub fn reset(&mut self) -> Result<()> {
        self.messages = DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect();
        self.save()
    }

    /// Save; on failure undo the in-memory change so memory matches disk.
    fn persist_or_rollback(&mut self, undo: impl FnOnce(&mut Vec<String>)) -> Result<()> {
        if let Err(e) = self.save() {
            warn!(error = %e, "message save failed; change rolled back");
            undo(&mut self.messages);
            return Err(e);
        }
        Ok(())
    }
}

fn non_blank(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(MessageError::Blank.into());
    }
    Ok(text.to_string())
}
