use std::fmt::Display;

use crate::datasets::toxic;

/// The Dataset enum
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dataset {
    /// Jigsaw toxic comment dataset
    Toxic,
}

impl Dataset {
    /// The label names of the dataset, in target order
    pub fn labels(&self) -> Vec<String> {
        match self {
            Dataset::Toxic => toxic::Dataset::labels(),
        }
    }
}

impl TryFrom<&str> for Dataset {
    type Error = DatasetError;

    /// Try to convert a string to a Dataset
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.to_lowercase() == toxic::DATASET {
            Ok(Dataset::Toxic)
        } else {
            Err(Self::Error::Unknown(value.to_string()))
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dataset::Toxic => toxic::DATASET,
        };

        write!(f, "{}", name)
    }
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// No dataset found for the given string
    #[error("no dataset found for {0}")]
    Unknown(String),
}
