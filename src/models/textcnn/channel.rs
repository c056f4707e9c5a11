use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
    },
    tensor::{activation::relu, backend::Backend, Tensor},
};

/// Configuration for a single n-gram channel
#[derive(Config, Debug)]
pub struct NGramChannelConfig {
    /// The number of consecutive tokens covered by the convolution window
    pub ngram: usize,

    /// The (padded) length of the input sequences
    pub max_seq_length: usize,

    /// The width of each token vector
    pub embedding_dim: usize,

    /// The number of convolution filters, which is also the width of the channel output
    #[config(default = 1)]
    pub filters: usize,
}

impl NGramChannelConfig {
    /// Initialize the channel. The window must fit in the sequence: `ngram <= max_seq_length`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> NGramChannel<B> {
        let conv = Conv2dConfig::new([1, self.filters], [self.ngram, self.embedding_dim])
            .init(device);

        // Pool over every window position left after the convolution
        let pool = MaxPool2dConfig::new([self.max_seq_length - self.ngram + 1, 1]).init();

        NGramChannel {
            conv,
            pool,
            ngram: self.ngram,
        }
    }
}

/// Detects the strongest match of learned n-gram patterns anywhere in a sequence
#[derive(Module, Debug)]
pub struct NGramChannel<B: Backend> {
    /// Convolution spanning `ngram` tokens and the full embedding width
    pub conv: Conv2d<B>,

    /// Max-pooling across the whole sequence axis
    pub pool: MaxPool2d,

    /// The window size
    pub ngram: usize,
}

impl<B: Backend> NGramChannel<B> {
    /// Input: `[batch_size, 1, max_seq_length, embedding_dim]`.
    /// Output: `[batch_size, filters]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        // [batch_size, filters, max_seq_length - ngram + 1, 1]
        let features = relu(self.conv.forward(input));

        // [batch_size, filters, 1, 1]
        let pooled = self.pool.forward(features);

        pooled.flatten(1, 3)
    }
}
