/// CLI Indexes: the Model enum
pub mod index;

/// CLI Indexes: TextCNN models
pub mod textcnn;

pub use index::{Model, ModelError};
