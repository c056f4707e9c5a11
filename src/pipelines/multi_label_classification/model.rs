use std::fmt::Display;

use burn::{
    module::AutodiffModule,
    tensor::{backend::AutodiffBackend, Tensor},
    train::TrainStep,
};

use crate::models::textcnn::embedding::EmbeddingMatrix;

use super::{
    batcher::{Infer, Train},
    config, Output,
};

/// A trait for models that can be used for Multi-Label Classification
pub trait Model<B>: AutodiffModule<B> + TrainStep<Train<B>, Output<B>> + Display
where
    B: AutodiffBackend,
{
    /// The model configuration
    type Config: ModelConfig;

    /// Perform a forward pass, computing the loss against the batch targets
    fn forward(&self, item: Train<B>) -> Output<B>;

    /// Defines forward pass for inference, returning per-label probabilities
    fn infer(&self, input: Infer<B>) -> Tensor<B, 2>;

    /// Build the architecture with untrained weights, ready to receive a saved record. Fails
    /// when the configuration cannot describe a valid model.
    fn init(device: &B::Device, config: &Self::Config) -> anyhow::Result<Self>;

    /// Build the model around a pretrained embedding matrix
    fn from_embeddings(
        device: &B::Device,
        embeddings: &EmbeddingMatrix,
        config: &Self::Config,
    ) -> anyhow::Result<Self>;
}

/// A trait for configs that can be used for Multi-Label Classification models
pub trait ModelConfig: burn::config::Config + Clone {
    /// Derive the model configuration from the experiment configuration
    fn new_for_training(config: &config::Training, vocab_size: usize) -> anyhow::Result<Self>;

    /// Return the Config needed for the multi-label classification pipeline
    fn get_config(&self) -> config::Config;
}
