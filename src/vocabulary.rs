use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

/// Characters that separate words in addition to whitespace
pub static FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// A mapping from words to the embedding row that represents them. Index 0 is reserved for
/// padding and is never assigned to a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    word_index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Wrap an externally supplied word index
    pub fn from_word_index(word_index: HashMap<String, usize>) -> Result<Self, VocabularyError> {
        let mut seen: HashMap<usize, &str> = HashMap::with_capacity(word_index.len());

        for (word, &index) in word_index.iter() {
            if index == 0 {
                return Err(VocabularyError::ReservedIndex(word.clone()));
            }

            if let Some(first) = seen.insert(index, word) {
                return Err(VocabularyError::DuplicateIndex {
                    index,
                    first: first.to_string(),
                    second: word.clone(),
                });
            }
        }

        Ok(Self { word_index })
    }

    /// Build a vocabulary from a corpus. Words are ranked by descending frequency, with ties
    /// broken by first occurrence, and numbered from 1. When `max_words` is given only that
    /// many of the most frequent words are kept.
    pub fn fit<'a, I>(texts: I, max_words: Option<usize>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        // word -> (count, first occurrence)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for text in texts {
            for word in split_words(text) {
                let seen = counts.len();
                counts.entry(word).or_insert((0, seen)).0 += 1;
            }
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|(_, (a_count, a_seen)), (_, (b_count, b_seen))| {
            b_count.cmp(a_count).then(a_seen.cmp(b_seen))
        });

        let word_index = ranked
            .into_iter()
            .take(max_words.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(i, (word, _))| (word, i + 1))
            .collect();

        Self { word_index }
    }

    /// Convert a text into a sequence of word indexes, skipping unknown words
    pub fn encode(&self, text: &str) -> Vec<usize> {
        split_words(text)
            .filter_map(|word| self.word_index.get(&word).copied())
            .collect()
    }

    /// The index of a word, if known
    pub fn get(&self, word: &str) -> Option<usize> {
        self.word_index.get(word).copied()
    }

    /// Iterate over `(word, index)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.word_index
            .iter()
            .map(|(word, &index)| (word.as_str(), index))
    }

    /// The number of words
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    /// Whether there are no words at all
    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// The largest assigned index, or 0 for an empty vocabulary
    pub fn max_index(&self) -> usize {
        self.word_index.values().copied().max().unwrap_or(0)
    }

    /// Save the vocabulary as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VocabularyError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::to_writer(BufWriter::new(file), self).map_err(|source| {
            VocabularyError::Json {
                path: path.display().to_string(),
                source,
            }
        })
    }

    /// Load a vocabulary previously written by [`Vocabulary::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let vocabulary: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                VocabularyError::Json {
                    path: path.display().to_string(),
                    source,
                }
            })?;

        Self::from_word_index(vocabulary.word_index)
    }
}

/// Lowercase a text and split it into words on whitespace and [`FILTERS`]
pub fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || FILTERS.contains(c))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
}

/// Vocabulary Error
#[derive(thiserror::Error, Debug)]
pub enum VocabularyError {
    /// A word was mapped to the padding index
    #[error("index 0 is reserved for padding, but was assigned to {0:?}")]
    ReservedIndex(String),

    /// Two words share the same index
    #[error("index {index} is assigned to both {first:?} and {second:?}")]
    DuplicateIndex {
        /// The shared index
        index: usize,
        /// The first word seen with the index
        first: String,
        /// The second word seen with the index
        second: String,
    },

    /// The vocabulary file could not be read or written
    #[error("unable to access vocabulary file {path}: {source}")]
    Io {
        /// The file path
        path: String,
        /// The underlying error
        source: std::io::Error,
    },

    /// The vocabulary file is not valid JSON
    #[error("unable to parse vocabulary file {path}: {source}")]
    Json {
        /// The file path
        path: String,
        /// The underlying error
        source: serde_json::Error,
    },
}
