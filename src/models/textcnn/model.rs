use burn::{
    module::Module,
    nn::{Embedding, Linear},
    tensor::{activation::sigmoid, backend::Backend, Int, Tensor},
};

use crate::pipelines::multi_label_classification::{
    loss::binary_cross_entropy_with_logits, Output,
};

use super::channel::NGramChannel;

/// Multi-channel convolutional network for multi-label text classification
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Frozen lookup of pretrained word vectors
    pub embedding: Embedding<B>,

    /// One channel per n-gram window size, all reading the same embedded sequence
    pub channels: Vec<NGramChannel<B>>,

    /// Linear layer producing one score per label
    pub output: Linear<B>,

    /// The width of each word vector
    pub embedding_dim: usize,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Compute one raw score per label: `[batch_size, max_seq_length]` -> `[batch_size, n_labels]`
    pub fn forward_logits(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, seq_length] = tokens.dims();

        // [batch_size, seq_length, embedding_dim]
        let embedded = self.embedding.forward(tokens);

        // Add a single input channel for the 2D convolutions
        let embedded = embedded.reshape([batch_size, 1, seq_length, self.embedding_dim]);

        let features = self
            .channels
            .iter()
            .map(|channel| channel.forward(embedded.clone()))
            .collect::<Vec<_>>();

        // [batch_size, n_channels * filters]
        let features = Tensor::cat(features, 1);

        self.output.forward(features)
    }

    /// Defines forward pass for training
    pub fn forward(&self, tokens: Tensor<B, 2, Int>, targets: Tensor<B, 2, Int>) -> Output<B> {
        let logits = self.forward_logits(tokens);
        let targets = targets.to_device(&logits.device());

        let loss = binary_cross_entropy_with_logits(logits.clone(), targets.clone());

        Output {
            loss,
            output: sigmoid(logits),
            targets,
        }
    }

    /// Defines forward pass for inference, returning independent per-label probabilities
    pub fn infer(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        sigmoid(self.forward_logits(tokens))
    }
}
