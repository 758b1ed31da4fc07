//! Word list lookups.

use log::{error, info};
use std::collections::HashSet;
use std::path::Path;

/// Decides whether a word is playable. Matches only ever see this trait.
pub trait WordValidator: Send + Sync {
    fn is_valid(&self, word: &str) -> bool;
}

/// Read-only, case-insensitive set of known words.
#[derive(Debug, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Loads a newline-delimited word list. An unreadable file is logged and
    /// yields an empty dictionary, which rejects every word.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let dictionary = Self::from_words(contents.lines());
                info!(
                    "Loaded {} words from {}",
                    dictionary.len(),
                    path.display()
                );
                dictionary
            }
            Err(e) => {
                error!("Error reading word list {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordValidator for Dictionary {
    fn is_valid(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}
