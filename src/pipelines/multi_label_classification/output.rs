use burn::{
    tensor::{backend::Backend, Int, Tensor},
    train::metric::{Adaptor, LossInput},
};
use derive_new::new;

use super::metric::BinaryAccuracyInput;

/// Multi-label classification output adapted for multiple metrics.
#[derive(new)]
pub struct Output<B: Backend> {
    /// The loss.
    pub loss: Tensor<B, 1>,

    /// Per-label probabilities: [batch_size, n_labels]
    pub output: Tensor<B, 2>,

    /// Multi-hot targets: [batch_size, n_labels]
    pub targets: Tensor<B, 2, Int>,
}

impl<B: Backend> Adaptor<BinaryAccuracyInput<B>> for Output<B> {
    fn adapt(&self) -> BinaryAccuracyInput<B> {
        BinaryAccuracyInput::new(self.output.clone(), self.targets.clone())
    }
}

impl<B: Backend> Adaptor<LossInput<B>> for Output<B> {
    fn adapt(&self) -> LossInput<B> {
        LossInput::new(self.loss.clone())
    }
}
