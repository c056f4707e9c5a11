use std::fmt::Display;

use crate::pipelines::multi_label_classification;

use super::models::{textcnn, Model, ModelError};

/// Available Pipelines
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Pipeline {
    /// Multi-Label Classification
    MultiLabelClassification,
}

impl Pipeline {
    /// Get the default model variant for the given pipeline
    pub fn default_model(&self) -> Model {
        match self {
            Pipeline::MultiLabelClassification => {
                Model::TextCnn(textcnn::DEFAULT_MULTI_LABEL_CLASSIFICATION_MODEL.to_string())
            }
        }
    }

    /// Resolve the requested model, falling back to the default for this pipeline
    pub fn resolve_model(&self, model: Option<&str>) -> anyhow::Result<Model> {
        let Some(name) = model else {
            return Ok(self.default_model());
        };

        let model = Model::try_from(name)?;

        if !model.is_supported(self) {
            return Err(ModelError::Unsupported {
                model: model.to_string(),
                pipeline: self.to_string(),
            }
            .into());
        }

        Ok(model)
    }
}

impl TryFrom<&str> for Pipeline {
    type Error = PipelineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == multi_label_classification::PIPELINE {
            Ok(Pipeline::MultiLabelClassification)
        } else {
            Err(PipelineError::Unknown(value.to_string()))
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pipeline::MultiLabelClassification => multi_label_classification::PIPELINE,
        };

        write!(f, "{}", name)
    }
}

/// Pipeline Error
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No pipeline found for the given string
    #[error("no pipeline found for {0}")]
    Unknown(String),
}
