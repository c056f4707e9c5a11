//! Adapt TextCNN to the Multi-Label Classification pipeline

use burn::tensor::{backend::AutodiffBackend, Tensor};

use crate::pipelines::multi_label_classification::{self, batcher, Output, Training};

use super::{Config, EmbeddingMatrix, Model};

impl<B: AutodiffBackend> multi_label_classification::Model<B> for Model<B> {
    /// The model configuration
    type Config = Config;

    /// Perform a forward pass
    fn forward(&self, item: batcher::Train<B>) -> Output<B> {
        self.forward(item.input.tokens, item.targets)
    }

    /// Defines forward pass for inference
    fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 2> {
        self.infer(input.tokens)
    }

    fn init(device: &B::Device, config: &Self::Config) -> anyhow::Result<Self> {
        config.validate()?;

        Ok(config.init(device))
    }

    fn from_embeddings(
        device: &B::Device,
        embeddings: &EmbeddingMatrix,
        config: &Self::Config,
    ) -> anyhow::Result<Self> {
        Ok(config.init_with_embeddings(embeddings, device)?)
    }
}

impl multi_label_classification::ModelConfig for Config {
    fn new_for_training(config: &Training, vocab_size: usize) -> anyhow::Result<Self> {
        let model_config = Config::new_with_labels(
            config.max_seq_length,
            config.embedding_dim,
            vocab_size,
            config.embedding_model_name.clone(),
            &config.labels,
        );

        model_config.validate()?;

        Ok(model_config)
    }

    fn get_config(&self) -> multi_label_classification::Config {
        multi_label_classification::Config {
            max_seq_length: self.max_seq_length,
            id2label: self.id2label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{Autodiff, NdArray},
        module::Module,
    };
    use pretty_assertions::assert_eq;

    use crate::{
        models::textcnn::ModelError,
        pipelines::multi_label_classification::{Model as _, ModelConfig as _},
    };

    use super::*;

    type TestBackend = Autodiff<NdArray>;

    fn training(labels: &[&str]) -> Training {
        let mut config = Training::new(
            "textcnn".to_string(),
            "toxic".to_string(),
            labels.iter().map(|s| s.to_string()).collect(),
        );
        config.max_seq_length = 12;
        config.embedding_dim = 4;

        config
    }

    #[test]
    fn test_new_for_training() {
        let config = Config::new_for_training(&training(&["toxic", "insult"]), 30).unwrap();

        assert_eq!(config.max_seq_length, 12);
        assert_eq!(config.embedding_dim, 4);
        assert_eq!(config.vocab_size, 30);
        assert_eq!(config.embedding_model_name, "glove.6B.100d.txt");
        assert_eq!(config.id2label.get(&1), Some(&"insult".to_string()));

        let pipeline_config = config.get_config();
        assert_eq!(pipeline_config.max_seq_length, 12);
        assert_eq!(pipeline_config.n_labels(), 2);
    }

    #[test]
    fn test_new_for_training_requires_labels() {
        let err = Config::new_for_training(&training(&[]), 30).err().unwrap();

        assert_eq!(err.downcast_ref::<ModelError>(), Some(&ModelError::NoLabels));
    }

    #[test]
    fn test_from_embeddings_rejects_a_mismatched_matrix() {
        let device = Default::default();
        let config = Config::new_for_training(&training(&["toxic"]), 30).unwrap();

        let result =
            Model::<TestBackend>::from_embeddings(&device, &EmbeddingMatrix::zeros(10, 4), &config);

        assert!(result.is_err());
    }

    #[test]
    fn test_init_matches_from_embeddings() {
        let device = Default::default();
        let config = Config::new_for_training(&training(&["toxic"]), 30).unwrap();

        let untrained = <Model<TestBackend> as multi_label_classification::Model<_>>::init(
            &device, &config,
        )
        .unwrap();
        let pretrained =
            Model::<TestBackend>::from_embeddings(&device, &EmbeddingMatrix::zeros(30, 4), &config)
                .unwrap();

        assert_eq!(untrained.num_params(), pretrained.num_params());
    }

    #[test]
    fn test_init_rejects_a_window_longer_than_the_sequence() {
        let device = Default::default();
        let mut config = Config::new_for_training(&training(&["toxic"]), 30).unwrap();
        config.max_seq_length = 4;

        let err = <Model<TestBackend> as multi_label_classification::Model<_>>::init(
            &device, &config,
        )
        .err()
        .unwrap();

        assert_eq!(
            err.downcast_ref::<ModelError>(),
            Some(&ModelError::NGramSize {
                ngram: 5,
                max_seq_length: 4
            })
        );
    }
}
