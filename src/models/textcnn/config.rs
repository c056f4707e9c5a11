use std::collections::BTreeMap;

use burn::{
    module::{Module, Param},
    nn::{EmbeddingConfig, EmbeddingRecord, LinearConfig},
    tensor::backend::Backend,
};

use super::{channel::NGramChannelConfig, embedding::EmbeddingMatrix, Model};

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// The length every input sequence is padded or truncated to
    pub max_seq_length: usize,

    /// The width of the pretrained word vectors
    pub embedding_dim: usize,

    /// The number of words in the vocabulary; the embedding has one more row for padding
    pub vocab_size: usize,

    /// File name of the pretrained word vectors the embedding was built from
    pub embedding_model_name: String,

    /// A map from label ids to label names
    pub id2label: BTreeMap<usize, String>,

    /// Window size of each convolution channel
    #[config(default = "super::DEFAULT_NGRAM_SIZES.to_vec()")]
    pub ngram_sizes: Vec<usize>,

    /// Number of filters in each channel
    #[config(default = 1)]
    pub filters: usize,
}

impl Config {
    /// Create a configuration with labels named in id order
    pub fn new_with_labels(
        max_seq_length: usize,
        embedding_dim: usize,
        vocab_size: usize,
        embedding_model_name: String,
        labels: &[String],
    ) -> Self {
        let id2label = labels
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.trim().to_string()))
            .collect();

        Config::new(
            max_seq_length,
            embedding_dim,
            vocab_size,
            embedding_model_name,
            id2label,
        )
    }

    /// The number of independent labels, which is the width of the output layer
    pub fn n_labels(&self) -> usize {
        self.id2label.len()
    }

    /// The shape the embedding matrix must have
    pub fn embedding_shape(&self) -> [usize; 2] {
        [self.vocab_size + 1, self.embedding_dim]
    }

    /// Check that the layers described by this configuration can be assembled
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("max_seq_length", self.max_seq_length),
            ("embedding_dim", self.embedding_dim),
            ("vocab_size", self.vocab_size),
            ("filters", self.filters),
        ] {
            if value == 0 {
                return Err(ModelError::Zero(name));
            }
        }

        if self.ngram_sizes.is_empty() {
            return Err(ModelError::NoChannels);
        }

        if let Some(&ngram) = self
            .ngram_sizes
            .iter()
            .find(|&&ngram| ngram == 0 || ngram > self.max_seq_length)
        {
            return Err(ModelError::NGramSize {
                ngram,
                max_seq_length: self.max_seq_length,
            });
        }

        if self.id2label.is_empty() {
            return Err(ModelError::NoLabels);
        }

        Ok(())
    }

    /// The configuration of each convolution channel
    pub fn channel_configs(&self) -> Vec<NGramChannelConfig> {
        self.ngram_sizes
            .iter()
            .map(|&ngram| {
                NGramChannelConfig::new(ngram, self.max_seq_length, self.embedding_dim)
                    .with_filters(self.filters)
            })
            .collect()
    }

    /// Initialize the model with a frozen, untrained embedding. Used to receive saved weights.
    ///
    /// Panics if the configuration does not pass [`Config::validate`].
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let [n_embedding, d_model] = self.embedding_shape();

        let embedding = EmbeddingConfig::new(n_embedding, d_model)
            .init(device)
            .no_grad();

        let channels = self
            .channel_configs()
            .iter()
            .map(|config| config.init(device))
            .collect();

        let output = LinearConfig::new(self.ngram_sizes.len() * self.filters, self.n_labels())
            .init(device);

        Model {
            embedding,
            channels,
            output,
            embedding_dim: self.embedding_dim,
        }
    }

    /// Initialize the model around a pretrained embedding matrix, which is frozen
    pub fn init_with_embeddings<B: Backend>(
        &self,
        embeddings: &EmbeddingMatrix,
        device: &B::Device,
    ) -> Result<Model<B>, ModelError> {
        self.validate()?;

        if embeddings.shape() != self.embedding_shape() {
            return Err(ModelError::EmbeddingShape {
                expected: self.embedding_shape(),
                found: embeddings.shape(),
            });
        }

        let model = self.init::<B>(device);

        let embedding = model
            .embedding
            .load_record(EmbeddingRecord {
                weight: Param::from_tensor(embeddings.to_tensor(device)),
            })
            .no_grad();

        Ok(Model { embedding, ..model })
    }
}

/// Model Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// A size that must be positive is zero
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// No convolution channel is configured
    #[error("at least one n-gram channel is required")]
    NoChannels,

    /// A convolution window does not fit in the sequence
    #[error("n-gram size {ngram} must be between 1 and the sequence length {max_seq_length}")]
    NGramSize {
        /// The window size
        ngram: usize,
        /// The sequence length
        max_seq_length: usize,
    },

    /// No labels are configured
    #[error("labels are not defined in the model configuration")]
    NoLabels,

    /// The embedding matrix does not match the vocabulary size and embedding width
    #[error("embedding matrix has shape {found:?}, expected {expected:?}")]
    EmbeddingShape {
        /// `[vocab_size + 1, embedding_dim]`
        expected: [usize; 2],
        /// The shape of the matrix provided
        found: [usize; 2],
    },
}
