#[cfg(not(feature = "tch"))]
mod selected {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    /// The autodiff backend used by the binaries
    pub type DefaultBackend = Autodiff<NdArray>;

    /// The device used by the binaries
    pub fn default_device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }
}

#[cfg(feature = "tch")]
mod selected {
    use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};

    /// The autodiff backend used by the binaries
    pub type DefaultBackend = Autodiff<LibTorch>;

    /// The device used by the binaries
    pub fn default_device() -> LibTorchDevice {
        LibTorchDevice::Cuda(0)
    }
}

pub use selected::{default_device, DefaultBackend};
