use std::fmt::Display;

/// Optimizers that can be selected by identifier
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum OptimizerKind {
    /// Adam
    Adam,
    /// Adam with decoupled weight decay
    AdamW,
    /// Stochastic gradient descent
    Sgd,
    /// RMSProp
    RmsProp,
    /// AdaGrad
    AdaGrad,
}

impl OptimizerKind {
    /// Get the unique string token that identifies this optimizer
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerKind::Adam => "adam",
            OptimizerKind::AdamW => "adamw",
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::RmsProp => "rmsprop",
            OptimizerKind::AdaGrad => "adagrad",
        }
    }
}

impl TryFrom<&str> for OptimizerKind {
    type Error = OptimizerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "adam" => Ok(OptimizerKind::Adam),
            "adamw" => Ok(OptimizerKind::AdamW),
            "sgd" => Ok(OptimizerKind::Sgd),
            "rmsprop" => Ok(OptimizerKind::RmsProp),
            "adagrad" => Ok(OptimizerKind::AdaGrad),
            _ => Err(OptimizerError::Unknown(value.to_string())),
        }
    }
}

impl Display for OptimizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optimizer Error
#[derive(thiserror::Error, Debug)]
pub enum OptimizerError {
    /// No optimizer found for the given string
    #[error("no optimizer found for {0}")]
    Unknown(String),
}
