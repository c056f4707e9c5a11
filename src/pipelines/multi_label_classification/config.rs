use std::{collections::BTreeMap, path::PathBuf};

use burn::LearningRate;

use crate::models::textcnn::embedding::embeddings_path;

use super::PIPELINE;

/// The common model configuration properties needed for the pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// The length every input sequence is truncated or padded to
    pub max_seq_length: usize,

    /// A mapping from label ids to label names
    pub id2label: BTreeMap<usize, String>,
}

impl Config {
    /// The number of independent labels
    pub fn n_labels(&self) -> usize {
        self.id2label.len()
    }
}

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Training {
    /// Maximum sequence length
    #[config(default = 100)]
    pub max_seq_length: usize,

    /// The width of the pretrained word vectors
    #[config(default = 100)]
    pub embedding_dim: usize,

    /// File name of the pretrained word vectors, inside `<data_dir>/datasets`
    #[config(default = "\"glove.6B.100d.txt\".to_string()")]
    pub embedding_model_name: String,

    /// Number of words to keep in the vocabulary. Defaults to every word in the training set.
    pub vocab_size: Option<usize>,

    /// Optimizer identifier (e.g., "adam", "rmsprop")
    #[config(default = "\"adam\".to_string()")]
    pub optimizer: String,

    /// Learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,

    /// Batch size
    #[config(default = 32)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 1)]
    pub num_epochs: usize,

    /// Seed for weight initialization and shuffling
    #[config(default = 42)]
    pub seed: u64,

    /// The location of the top-level data directory
    #[config(default = "\".\".to_string()")]
    pub data_dir: String,

    /// Model name (e.g., "textcnn")
    pub model_name: String,

    /// The Dataset to use (e.g., "toxic")
    pub dataset_name: String,

    /// Label names for the selected dataset
    pub labels: Vec<String>,
}

impl Training {
    /// The location of the pretrained word vectors
    pub fn embeddings_path(&self) -> PathBuf {
        embeddings_path(&self.data_dir, &self.embedding_model_name)
    }

    /// The directory that receives checkpoints, configs and the trained model
    pub fn artifact_dir(&self) -> String {
        artifact_dir(&self.data_dir, &self.model_name)
    }
}

/// The artifact directory for a model trained with this pipeline
pub fn artifact_dir(data_dir: &str, model_name: &str) -> String {
    format!("{}/{}/{}", data_dir, PIPELINE, model_name)
}

#[cfg(test)]
mod tests {
    use burn::config::Config as _;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_training_defaults() {
        let config = Training::new("textcnn".to_string(), "toxic".to_string(), vec![]);

        assert_eq!(config.max_seq_length, 100);
        assert_eq!(config.optimizer, "adam");
        assert_eq!(config.vocab_size, None);
        assert_eq!(
            config.embeddings_path(),
            PathBuf::from(".").join("datasets").join("glove.6B.100d.txt")
        );
        assert_eq!(
            config.artifact_dir(),
            "./multi-label-classification/textcnn"
        );
    }

    #[test]
    fn test_training_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");

        let config = Training::new(
            "textcnn".to_string(),
            "toxic".to_string(),
            vec!["toxic".to_string()],
        )
        .with_vocab_size(Some(20_000))
        .with_optimizer("rmsprop".to_string());

        config.save(&path).unwrap();
        let loaded = Training::load(&path).unwrap();

        assert_eq!(loaded.vocab_size, Some(20_000));
        assert_eq!(loaded.optimizer, "rmsprop");
        assert_eq!(loaded.labels, vec!["toxic"]);
    }
}
