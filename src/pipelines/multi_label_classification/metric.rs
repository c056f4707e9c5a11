use core::marker::PhantomData;

use burn::{
    tensor::{backend::Backend, ElementConversion, Int, Tensor},
    train::metric::{
        state::{FormatOptions, NumericMetricState},
        Metric, MetricEntry, MetricMetadata, Numeric,
    },
};
use derive_new::new;

/// The default probability a label must exceed to count as predicted
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// The input of the [`BinaryAccuracyMetric`]
#[derive(new)]
pub struct BinaryAccuracyInput<B: Backend> {
    /// Per-label probabilities: [batch_size, n_labels]
    pub outputs: Tensor<B, 2>,

    /// Multi-hot targets: [batch_size, n_labels]
    pub targets: Tensor<B, 2, Int>,
}

/// The share of individual label decisions that match their targets
pub struct BinaryAccuracyMetric<B: Backend> {
    state: NumericMetricState,
    threshold: f64,
    _b: PhantomData<B>,
}

impl<B: Backend> BinaryAccuracyMetric<B> {
    /// Creates the metric with the default threshold
    pub fn new() -> Self {
        Self {
            state: NumericMetricState::new(),
            threshold: DEFAULT_THRESHOLD,
            _b: PhantomData,
        }
    }

    /// Sets the probability threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

impl<B: Backend> Default for BinaryAccuracyMetric<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Metric for BinaryAccuracyMetric<B> {
    const NAME: &'static str = "Binary Accuracy";

    type Input = BinaryAccuracyInput<B>;

    fn update(&mut self, input: &BinaryAccuracyInput<B>, _metadata: &MetricMetadata) -> MetricEntry {
        let [batch_size, _n_labels] = input.outputs.dims();

        let accuracy = binary_accuracy(
            input.outputs.clone(),
            input.targets.clone(),
            self.threshold,
        );

        self.state.update(
            100.0 * accuracy,
            batch_size,
            FormatOptions::new(Self::NAME).unit("%").precision(2),
        )
    }

    fn clear(&mut self) {
        self.state.reset()
    }
}

impl<B: Backend> Numeric for BinaryAccuracyMetric<B> {
    fn value(&self) -> f64 {
        self.state.value()
    }
}

/// The fraction of label decisions (`probability > threshold`) that match the targets
pub fn binary_accuracy<B: Backend>(
    outputs: Tensor<B, 2>,
    targets: Tensor<B, 2, Int>,
    threshold: f64,
) -> f64 {
    let [batch_size, n_labels] = outputs.dims();
    let total = batch_size * n_labels;

    if total == 0 {
        return 0.0;
    }

    let targets = targets.to_device(&outputs.device());
    let predictions = outputs.greater_elem(threshold).int();

    let correct = predictions
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<f64>();

    correct / total as f64
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn test_binary_accuracy_counts_every_label() {
        let device = Default::default();

        let outputs = Tensor::<TestBackend, 1>::from_floats([0.9, 0.2, 0.6, 0.4, 0.1, 0.7], &device)
            .reshape([2, 3]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 1, 0, 1], &device)
            .reshape([2, 3]);

        let accuracy = binary_accuracy(outputs, targets, DEFAULT_THRESHOLD);

        assert!((accuracy - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_binary_accuracy_uses_the_threshold() {
        let device = Default::default();

        let outputs = Tensor::<TestBackend, 1>::from_floats([0.3, 0.3], &device).reshape([1, 2]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 1], &device).reshape([1, 2]);

        assert_eq!(binary_accuracy(outputs.clone(), targets.clone(), 0.5), 0.0);
        assert_eq!(binary_accuracy(outputs, targets, 0.25), 1.0);
    }

    #[test]
    fn test_binary_accuracy_treats_the_threshold_as_negative() {
        let device = Default::default();

        let outputs = Tensor::<TestBackend, 1>::from_floats([0.5, 0.5], &device).reshape([1, 2]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device).reshape([1, 2]);

        assert_eq!(binary_accuracy(outputs, targets, DEFAULT_THRESHOLD), 0.5);
    }
}
