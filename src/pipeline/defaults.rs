use std::collections::HashSet;
use std::path::Path;

use crate::alignment::grouping::group_components;
use crate::alignment::tokenization::tokenize_whitespace;
use crate::error::GroupingError;
use crate::pipeline::traits::{Grouper, ProfanityWordlist, Tokenizer};
use crate::types::{AlignmentEdge, Group};

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize_whitespace(text)
    }
}

pub struct BipartiteGrouper;

impl Grouper for BipartiteGrouper {
    fn group(&self, source_len: usize, target_len: usize, edges: &[AlignmentEdge]) -> Vec<Group> {
        group_components(source_len, target_len, edges)
    }
}

/// Case-insensitive whole-word profanity test.
///
/// Text is split on every non-alphanumeric character, so punctuation glued
/// to a word does not hide it. Entries are single words.
#[derive(Debug, Clone, Default)]
pub struct WordlistProfanity {
    words: HashSet<String>,
}

impl WordlistProfanity {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load one word per line; blank lines and `#` comments are ignored.
    pub fn load(path: &Path) -> Result<Self, GroupingError> {
        if !path.exists() {
            return Err(GroupingError::missing_input("profanity wordlist", path));
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| GroupingError::io("read profanity wordlist", e))?;
        Ok(Self::from_words(
            data.lines().filter(|line| !line.trim_start().starts_with('#')),
        ))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ProfanityWordlist for WordlistProfanity {
    fn contains_profanity(&self, text: &str) -> Result<bool, GroupingError> {
        Ok(text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.words.contains(&w.to_lowercase())))
    }
}
