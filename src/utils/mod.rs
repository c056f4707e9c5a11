/// File utilities
pub mod files;

/// Tensor Utilities
pub mod tensors;

/// Renderer Utilities
pub mod renderer;

/// Backend selection for the binaries
pub mod backend;
