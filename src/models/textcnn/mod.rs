/// Pretrained embedding matrix
pub mod embedding;

/// N-gram convolution channels
pub mod channel;

/// The model configuration
pub mod config;

/// Multi-channel convolutional model
pub mod model;

/// Training and validation steps
pub mod training;

/// Adapt the model to the Multi-Label Classification pipeline
pub mod multi_label_classification;

pub use channel::{NGramChannel, NGramChannelConfig};
pub use config::{Config, ModelError};
pub use embedding::{EmbeddingError, EmbeddingMatrix};
pub use model::{Model, ModelRecord};

/// The base model name
pub static MODEL_TYPE: &str = "textcnn";

/// The n-gram window sizes of the three channels
pub const DEFAULT_NGRAM_SIZES: [usize; 3] = [3, 4, 5];
