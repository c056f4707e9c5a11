/// Common config for Multi-Label Classification
pub mod config;

/// Batcher
pub mod batcher;

/// Multi-Label Classification Items
pub mod item;

/// Binary cross-entropy over independent labels
pub mod loss;

/// Training and validation output
pub mod output;

/// Metrics
pub mod metric;

/// Optimizer selection
pub mod optimizer;

/// Common model traits for multi-label classification
pub mod model;

/// Training
pub mod training;

/// Inference
pub mod inference;

pub use batcher::Batcher;
pub use config::{Config, Training};
pub use inference::infer;
pub use item::Item;
pub use model::{Model, ModelConfig};
pub use output::Output;
pub use training::train;

/// The unique string token that identifies this pipeline
pub static PIPELINE: &str = "multi-label-classification";
