use std::fmt::Display;

use crate::cli::pipelines::Pipeline;

use super::textcnn;

/// Available Models
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Model {
    /// The TextCNN family of models, with the specific model name contained within
    TextCnn(String),
}

impl Model {
    /// Get the model type
    pub fn model_type(&self) -> &str {
        match self {
            Model::TextCnn(_) => textcnn::MODEL_TYPE,
        }
    }

    /// Check if the model is valid for the given pipeline
    pub fn is_supported(&self, pipeline: &Pipeline) -> bool {
        match self {
            Model::TextCnn(model_name) => match pipeline {
                Pipeline::MultiLabelClassification => textcnn::MULTI_LABEL_CLASSIFICATION_MODELS
                    .contains(&model_name.as_str()),
            },
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Model::TextCnn(name) = self;

        write!(f, "{}", name)
    }
}

impl TryFrom<&str> for Model {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.to_lowercase();

        if textcnn::ALL_MODELS.contains(&name.as_str()) {
            Ok(Model::TextCnn(name))
        } else {
            Err(ModelError::Unknown(value.to_string()))
        }
    }
}

/// Model Error
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// No model found for the given string
    #[error("no model found for {0}")]
    Unknown(String),

    /// The model exists, but cannot be used with the pipeline
    #[error("model {model} does not support the {pipeline} pipeline")]
    Unsupported {
        /// The requested model
        model: String,
        /// The requested pipeline
        pipeline: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_try_from() {
        let model = Model::try_from("TextCNN").unwrap();

        assert_eq!(model, Model::TextCnn("textcnn".to_string()));
        assert_eq!(model.model_type(), "textcnn");
        assert_eq!(model.to_string(), "textcnn");
        assert!(model.is_supported(&Pipeline::MultiLabelClassification));
    }

    #[test]
    fn test_try_from_unknown() {
        assert!(matches!(
            Model::try_from("fasttext"),
            Err(ModelError::Unknown(name)) if name == "fasttext"
        ));
    }
}
