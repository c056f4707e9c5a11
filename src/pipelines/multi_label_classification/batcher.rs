use std::sync::Arc;

use burn::{
    data::dataloader,
    tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor},
};
use derive_new::new;

use crate::{
    pipelines::multi_label_classification, utils::tensors::pad_to, vocabulary::Vocabulary,
};

use super::Item;

/// The index used to pad sequences, matching the reserved zero row of the embedding matrix
pub const PAD_INDEX: usize = 0;

/// An inference batch for multi-label classification
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Word indexes as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,
}

/// A training batch for multi-label classification
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// Multi-hot targets: [batch_size, n_labels]
    pub targets: Tensor<B, 2, Int>,
}

/// Struct for batching multi-label classification items
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Vocabulary for converting text to word indexes
    pub vocabulary: Arc<Vocabulary>,

    /// Maximum sequence length for encoded text
    pub max_seq_length: usize,

    /// The number of labels
    pub n_labels: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        config: multi_label_classification::Config,
        device: B::Device,
    ) -> Self {
        Self {
            vocabulary,
            max_seq_length: config.max_seq_length,
            n_labels: config.n_labels(),
            device,
        }
    }

    /// Encode, truncate and pad a list of texts
    pub fn encode(&self, items: Vec<String>) -> Infer<B> {
        let token_ids_list = items
            .iter()
            .map(|input| self.vocabulary.encode(input))
            .collect();

        Infer {
            tokens: pad_to(
                PAD_INDEX,
                token_ids_list,
                self.max_seq_length,
                &self.device,
            ),
        }
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<String, Infer<B>> for Batcher<B> {
    /// Collects a vector of texts into an inference batch
    fn batch(&self, items: Vec<String>) -> Infer<B> {
        self.encode(items)
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend, I: Item> dataloader::batcher::Batcher<I, Train<B>> for Batcher<B> {
    /// Collects a vector of multi-label classification items into a training batch
    fn batch(&self, items: Vec<I>) -> Train<B> {
        let batch_size = items.len();

        let mut targets: Vec<B::IntElem> = Vec::with_capacity(batch_size * self.n_labels);

        for item in &items {
            let labels = item.labels();

            debug_assert_eq!(
                labels.len(),
                self.n_labels,
                "item has {} label flags, expected {}",
                labels.len(),
                self.n_labels
            );

            targets.extend(labels.into_iter().map(|flag| (flag as i64).elem::<B::IntElem>()));
        }

        let input = self.encode(items.iter().map(|item| item.input().to_string()).collect());

        let targets = Tensor::from_data(
            Data::new(targets, Shape::new([batch_size, self.n_labels])),
            &self.device,
        );

        // Create and return training batch
        Train { input, targets }
    }
}
