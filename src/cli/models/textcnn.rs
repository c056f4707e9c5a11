/// Model Variants
/// --------------

/// The base model type
pub use crate::models::textcnn::MODEL_TYPE;

/// TextCNN with three channels over pretrained GloVe vectors
pub static TEXTCNN: &str = "textcnn";

/// All available TextCNN models
pub static ALL_MODELS: &[&str; 1] = &[TEXTCNN];

/// Multi-Label Classification
/// --------------------------

/// Available models to use with TextCNN for Multi-Label Classification
pub static MULTI_LABEL_CLASSIFICATION_MODELS: &[&str; 1] = &[TEXTCNN];

/// The default model to use
pub static DEFAULT_MULTI_LABEL_CLASSIFICATION_MODEL: &str = TEXTCNN;
