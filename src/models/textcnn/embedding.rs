//! Building the frozen embedding matrix from a pretrained word-vector file
//!
//! The file holds one word per line followed by its vector components, all separated by
//! whitespace, as in the GloVe text releases:
//!
//! ```text
//! the 0.418 0.24968 -0.41242 0.1217
//! cat 0.45281 -0.50108 -0.53714 -0.015697
//! ```

use std::{
    collections::HashMap,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use burn::tensor::{backend::Backend, Data, ElementConversion, Shape, Tensor};

use crate::{utils::files::file_reader, vocabulary::Vocabulary};

/// The directory, relative to the data directory, that holds pretrained vector files
pub static EMBEDDINGS_DIR: &str = "datasets";

/// Resolve the location of a pretrained vector file
pub fn embeddings_path(data_dir: &str, embedding_model_name: &str) -> PathBuf {
    Path::new(data_dir)
        .join(EMBEDDINGS_DIR)
        .join(embedding_model_name)
}

/// A dense `[vocab_size + 1, embedding_dim]` matrix. Row `i` holds the vector for the word with
/// index `i`; row 0 and the rows of words missing from the pretrained source are zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    vocab_size: usize,
    embedding_dim: usize,
    weights: Vec<f32>,
}

impl EmbeddingMatrix {
    /// An all-zero matrix
    pub fn zeros(vocab_size: usize, embedding_dim: usize) -> Self {
        Self {
            vocab_size,
            embedding_dim,
            weights: vec![0.0; (vocab_size + 1) * embedding_dim],
        }
    }

    /// Build the matrix from vectors already in memory
    pub fn from_vectors(
        vectors: &HashMap<String, Vec<f32>>,
        vocabulary: &Vocabulary,
        vocab_size: usize,
        embedding_dim: usize,
    ) -> Result<Self, EmbeddingError> {
        let mut matrix = Self::zeros(vocab_size, embedding_dim);

        for (word, index) in vocabulary.iter() {
            let Some(vector) = vectors.get(word) else {
                continue;
            };

            if index == 0 || index > vocab_size {
                return Err(EmbeddingError::IndexOutOfRange {
                    word: word.to_string(),
                    index,
                    vocab_size,
                });
            }

            if vector.len() != embedding_dim {
                return Err(EmbeddingError::Dimension {
                    word: word.to_string(),
                    expected: embedding_dim,
                    found: vector.len(),
                });
            }

            let start = index * embedding_dim;
            matrix.weights[start..start + embedding_dim].copy_from_slice(vector);
        }

        Ok(matrix)
    }

    /// Read a pretrained vector file and build the matrix for the given vocabulary. Every line
    /// of the file must be well formed, even for words outside the vocabulary.
    pub async fn load<P: AsRef<Path>>(
        path: P,
        vocabulary: &Vocabulary,
        vocab_size: usize,
        embedding_dim: usize,
    ) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        let io_error = |source| EmbeddingError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut lines = file_reader(path).await.map_err(io_error)?;
        let mut vectors = HashMap::new();
        let mut line_number = 0;

        while let Some(line) = lines.next_line().await.map_err(io_error)? {
            line_number += 1;

            if let Some((word, vector)) = parse_line(&line, line_number, embedding_dim)? {
                if vocabulary.get(&word).is_some() {
                    vectors.insert(word, vector);
                }
            }
        }

        log::info!(
            "Found pretrained vectors for {} of {} words in {}",
            vectors.len(),
            vocabulary.len(),
            path.display()
        );

        Self::from_vectors(&vectors, vocabulary, vocab_size, embedding_dim)
    }

    /// The matrix shape, `[vocab_size + 1, embedding_dim]`
    pub fn shape(&self) -> [usize; 2] {
        [self.vocab_size + 1, self.embedding_dim]
    }

    /// The number of words the matrix can represent, excluding the padding row
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// The width of each vector
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// A single row
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.embedding_dim;

        &self.weights[start..start + self.embedding_dim]
    }

    /// All rows in index order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.weights.chunks(self.embedding_dim.max(1))
    }

    /// Copy the matrix into a tensor on the given device
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let values: Vec<B::FloatElem> = self.weights.iter().map(|value| value.elem()).collect();

        Tensor::from_data(Data::new(values, Shape::new(self.shape())), device)
    }
}

/// Parse one line of a pretrained vector file. Blank lines yield `None`.
pub fn parse_line(
    line: &str,
    line_number: usize,
    embedding_dim: usize,
) -> Result<Option<(String, Vec<f32>)>, EmbeddingError> {
    let mut tokens = line.split_whitespace();

    let Some(word) = tokens.next() else {
        return Ok(None);
    };

    let vector = tokens
        .map(|value| {
            value
                .parse::<f32>()
                .map_err(|source| EmbeddingError::ParseFloat {
                    line: line_number,
                    word: word.to_string(),
                    value: value.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if vector.len() != embedding_dim {
        return Err(EmbeddingError::Malformed {
            line: line_number,
            word: word.to_string(),
            expected: embedding_dim,
            found: vector.len(),
        });
    }

    Ok(Some((word.to_string(), vector)))
}

/// Embedding Error
#[derive(thiserror::Error, Debug)]
pub enum EmbeddingError {
    /// The vector file could not be read
    #[error("unable to read pretrained vectors from {path}: {source}")]
    Io {
        /// The file path
        path: String,
        /// The underlying error
        source: std::io::Error,
    },

    /// A vector component is not a number
    #[error("line {line}: invalid component {value:?} in the vector for {word:?}: {source}")]
    ParseFloat {
        /// The 1-based line number
        line: usize,
        /// The word on the line
        word: String,
        /// The offending token
        value: String,
        /// The underlying error
        source: ParseFloatError,
    },

    /// A line has the wrong number of components
    #[error("line {line}: expected {expected} components in the vector for {word:?}, found {found}")]
    Malformed {
        /// The 1-based line number
        line: usize,
        /// The word on the line
        word: String,
        /// The configured embedding dimension
        expected: usize,
        /// The number of components on the line
        found: usize,
    },

    /// An in-memory vector has the wrong width
    #[error("expected {expected} components in the vector for {word:?}, found {found}")]
    Dimension {
        /// The word
        word: String,
        /// The configured embedding dimension
        expected: usize,
        /// The vector width
        found: usize,
    },

    /// A word's index does not fit in the matrix
    #[error("word {word:?} has index {index}, outside of 1..={vocab_size}")]
    IndexOutOfRange {
        /// The word
        word: String,
        /// Its vocabulary index
        index: usize,
        /// The configured vocabulary size
        vocab_size: usize,
    },
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_word_index(HashMap::from([
            ("the".to_string(), 1),
            ("cat".to_string(), 2),
            ("sat".to_string(), 3),
            ("on".to_string(), 4),
            ("mat".to_string(), 5),
        ]))
        .unwrap()
    }

    fn write_vectors(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let data_dir = dir.to_str().unwrap();
        let path = embeddings_path(data_dir, name);

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();

        path
    }

    #[test]
    fn test_embeddings_path() {
        assert_eq!(
            embeddings_path(".", "glove.6B.100d.txt"),
            Path::new(".").join("datasets").join("glove.6B.100d.txt")
        );
    }

    #[tokio::test]
    async fn test_load_copies_known_words_and_zeroes_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(
            dir.path(),
            "vectors.txt",
            "cat 0.1 0.2 0.3 0.4\ndog 1.0 1.0 1.0 1.0\nmat -0.5 0.0 0.5 1.5\n",
        );

        let matrix = EmbeddingMatrix::load(&path, &vocabulary(), 5, 4)
            .await
            .unwrap();

        assert_eq!(matrix.shape(), [6, 4]);
        assert_eq!(matrix.row(0), &[0.0; 4]);
        assert_eq!(matrix.row(2), &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(matrix.row(5), &[-0.5, 0.0, 0.5, 1.5]);

        for index in [1, 3, 4] {
            assert_eq!(matrix.row(index), &[0.0; 4]);
        }

        let non_zero = matrix
            .rows()
            .filter(|row| row.iter().any(|value| *value != 0.0))
            .count();

        assert_eq!(non_zero, 2);
    }

    #[tokio::test]
    async fn test_load_shape_does_not_depend_on_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(dir.path(), "empty.txt", "\n");

        let matrix = EmbeddingMatrix::load(&path, &vocabulary(), 8, 3)
            .await
            .unwrap();

        assert_eq!(matrix.shape(), [9, 3]);
        assert!(matrix.rows().all(|row| row.iter().all(|value| *value == 0.0)));
    }

    #[tokio::test]
    async fn test_load_keeps_the_last_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(dir.path(), "dupes.txt", "on 1 1\non 2 3\n");

        let matrix = EmbeddingMatrix::load(&path, &vocabulary(), 5, 2)
            .await
            .unwrap();

        assert_eq!(matrix.row(4), &[2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_load_rejects_non_numeric_components() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(dir.path(), "bad.txt", "cat 0.1 0.2\nsat 0.3 x\n");

        let err = EmbeddingMatrix::load(&path, &vocabulary(), 5, 2)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::ParseFloat { line: 2, ref value, .. } if value == "x"
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_lines_with_the_wrong_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(dir.path(), "short.txt", "dog 0.1 0.2 0.3\n");

        let err = EmbeddingMatrix::load(&path, &vocabulary(), 5, 4)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::Malformed {
                line: 1,
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_indexes_beyond_the_vocab_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(dir.path(), "vectors.txt", "mat 1 2\n");

        let err = EmbeddingMatrix::load(&path, &vocabulary(), 3, 2)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::IndexOutOfRange {
                index: 5,
                vocab_size: 3,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = EmbeddingMatrix::load(dir.path().join("missing.txt"), &vocabulary(), 5, 4)
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::Io { .. }));
    }

    #[test]
    fn test_to_tensor() {
        let vectors = HashMap::from([("the".to_string(), vec![1.0, 2.0])]);
        let matrix = EmbeddingMatrix::from_vectors(&vectors, &vocabulary(), 5, 2).unwrap();

        let tensor = matrix.to_tensor::<NdArray>(&Default::default());

        assert_eq!(tensor.dims(), [6, 2]);

        let values = tensor.into_data().convert::<f32>().value;
        assert_eq!(&values[..4], &[0.0, 0.0, 1.0, 2.0]);
    }
}
