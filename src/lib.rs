//! # Burn TextCNN
//!
//! Multi-label text classification with a multi-channel convolutional network over frozen,
//! pretrained word embeddings.
#![forbid(unsafe_code)]

/// Word vocabulary
pub mod vocabulary;

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// Utilities
pub mod utils;

/// CLI indexes and utilities
pub mod cli;

/// Error macros
#[macro_use]
extern crate anyhow;
