// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Inference engine abstraction.
//!
//! The driver only needs two things from an engine: import a serialized
//! model from a byte stream onto a device, and describe the imported
//! model's interface. [`crate::model::OrtEngine`] implements this on top of
//! ONNX Runtime.

use std::io::Read;

use crate::error::Result;
use crate::inference::EngineConfig;
use crate::metadata::PortInfo;

/// A model imported onto a device.
pub trait CompiledModel {
    /// Model inputs in declaration order.
    fn inputs(&self) -> Vec<PortInfo>;

    /// Model outputs in declaration order.
    fn outputs(&self) -> Vec<PortInfo>;
}

/// An inference engine able to import serialized models.
pub trait InferenceEngine {
    /// Handle to an imported model.
    type Model: CompiledModel;

    /// Names of devices usable on this machine.
    fn available_devices(&self) -> Vec<String>;

    /// Import a serialized model onto `device`.
    ///
    /// Model format and device compatibility are checked here and nowhere else.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BenchmarkError::Engine`] if the model cannot be read,
    /// is malformed, or cannot run on the requested device.
    fn import_model(&self, model: &mut dyn Read, device: &str, config: &EngineConfig) -> Result<Self::Model>;
}
