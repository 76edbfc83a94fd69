// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! ONNX Runtime backed inference engine.
//!
//! This module provides [`OrtEngine`], which imports serialized models into
//! ONNX Runtime sessions on the device named by a [`DeviceTarget`].

use std::io::Read;

use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    DirectMLExecutionProvider, ExecutionProvider, ExecutionProviderDispatch,
    OpenVINOExecutionProvider, ROCmExecutionProvider, TensorRTExecutionProvider,
    XNNPACKExecutionProvider,
};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::tensor::TensorElementType;
use ort::value::ValueType;

use crate::device::{Device, DeviceTarget};
use crate::engine::{CompiledModel, InferenceEngine};
use crate::error::{BenchmarkError, Result};
use crate::inference::EngineConfig;
use crate::metadata::PortInfo;

/// Inference engine built on ONNX Runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrtEngine;

impl OrtEngine {
    /// Create a new engine handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// A model imported into an ONNX Runtime session.
pub struct OrtModel {
    /// ONNX Runtime session.
    session: Session,
    /// Device target the session was built for.
    target: DeviceTarget,
}

impl OrtModel {
    /// Device target the model was imported onto.
    #[must_use]
    pub const fn target(&self) -> &DeviceTarget {
        &self.target
    }
}

impl std::fmt::Debug for OrtModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtModel")
            .field("target", &self.target)
            .field("inputs", &self.session.inputs.len())
            .field("outputs", &self.session.outputs.len())
            .finish()
    }
}

impl CompiledModel for OrtModel {
    fn inputs(&self) -> Vec<PortInfo> {
        self.session
            .inputs
            .iter()
            .map(|input| port_info(&input.name, &input.input_type))
            .collect()
    }

    fn outputs(&self) -> Vec<PortInfo> {
        self.session
            .outputs
            .iter()
            .map(|output| port_info(&output.name, &output.output_type))
            .collect()
    }
}

impl InferenceEngine for OrtEngine {
    type Model = OrtModel;

    fn available_devices(&self) -> Vec<String> {
        let providers: [(&str, bool); 7] = [
            ("CUDA", available(&CUDAExecutionProvider::default())),
            ("TensorRT", available(&TensorRTExecutionProvider::default())),
            ("ROCm", available(&ROCmExecutionProvider::default())),
            ("DirectML", available(&DirectMLExecutionProvider::default())),
            ("CoreML", available(&CoreMLExecutionProvider::default())),
            ("OpenVINO", available(&OpenVINOExecutionProvider::default())),
            ("XNNPACK", available(&XNNPACKExecutionProvider::default())),
        ];

        std::iter::once("CPU".to_string())
            .chain(providers.into_iter().filter(|(_, ok)| *ok).map(|(name, _)| name.to_string()))
            .collect()
    }

    fn import_model(&self, model: &mut dyn Read, device: &str, config: &EngineConfig) -> Result<OrtModel> {
        let target: DeviceTarget = device.parse().map_err(BenchmarkError::Engine)?;

        let mut bytes = Vec::new();
        model
            .read_to_end(&mut bytes)
            .map_err(|e| BenchmarkError::Engine(format!("Failed to read model stream: {e}")))?;

        let providers = execution_providers(&target)?;

        let mut builder = Session::builder()
            .map_err(|e| BenchmarkError::Engine(format!("Failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| BenchmarkError::Engine(format!("Failed to set optimization level: {e}")))?
            .with_parallel_execution(config.parallel_execution)
            .map_err(|e| BenchmarkError::Engine(format!("Failed to set execution mode: {e}")))?
            .with_execution_providers(providers)
            .map_err(|e| BenchmarkError::Engine(format!("Failed to register execution providers for {target}: {e}")))?;

        if config.num_threads > 0 {
            builder = builder
                .with_intra_threads(config.num_threads)
                .map_err(|e| BenchmarkError::Engine(format!("Failed to set intra-thread count: {e}")))?;
        }

        let session = builder
            .commit_from_memory(&bytes)
            .map_err(|e| BenchmarkError::Engine(format!("Failed to import model: {e}")))?;

        Ok(OrtModel { session, target })
    }
}

/// One execution provider to register, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProviderSlot {
    device: Device,
    /// Session creation fails if this provider cannot be registered.
    required: bool,
}

/// Providers to register for a device target, highest priority first.
///
/// A single device must be usable; aggregates fall back silently and always
/// end with the CPU provider.
fn provider_plan(target: &DeviceTarget) -> Vec<ProviderSlot> {
    let required = !target.is_aggregate();
    let mut plan: Vec<ProviderSlot> = target
        .devices()
        .iter()
        .map(|device| ProviderSlot { device: device.clone(), required })
        .collect();

    if target.is_aggregate() && !target.devices().contains(&Device::Cpu) {
        plan.push(ProviderSlot { device: Device::Cpu, required: false });
    }
    plan
}

fn execution_providers(target: &DeviceTarget) -> Result<Vec<ExecutionProviderDispatch>> {
    provider_plan(target)
        .iter()
        .map(|slot| {
            let provider = execution_provider(&slot.device)?;
            Ok(if slot.required { provider.error_on_failure() } else { provider })
        })
        .collect()
}

fn execution_provider(device: &Device) -> Result<ExecutionProviderDispatch> {
    let provider = match device {
        Device::Cpu => CPUExecutionProvider::default().build(),
        Device::Cuda(index) => CUDAExecutionProvider::default().with_device_id(device_id(*index)?).build(),
        Device::TensorRt(index) => TensorRTExecutionProvider::default().with_device_id(device_id(*index)?).build(),
        Device::Rocm(index) => ROCmExecutionProvider::default().with_device_id(device_id(*index)?).build(),
        Device::DirectMl(index) => DirectMLExecutionProvider::default().with_device_id(device_id(*index)?).build(),
        Device::CoreMl => CoreMLExecutionProvider::default().build(),
        Device::Xnnpack => XNNPACKExecutionProvider::default().build(),
        Device::OpenVino(None) => OpenVINOExecutionProvider::default().build(),
        Device::OpenVino(Some(kind)) => OpenVINOExecutionProvider::default().with_device_type(kind).build(),
    };
    Ok(provider)
}

fn device_id(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| BenchmarkError::Engine(format!("Device index {index} is out of range")))
}

fn available(provider: &impl ExecutionProvider) -> bool {
    provider.is_available().unwrap_or(false)
}

fn port_info(name: &str, value_type: &ValueType) -> PortInfo {
    match (value_type.tensor_type(), value_type.tensor_shape()) {
        (Some(ty), Some(shape)) => PortInfo::tensor(name, element_type_name(ty), shape.iter().copied().collect()),
        _ => PortInfo::opaque(name, value_type.to_string()),
    }
}

fn element_type_name(ty: TensorElementType) -> String {
    let name = match ty {
        TensorElementType::Bfloat16 => "bf16",
        TensorElementType::Bool => "boolean",
        TensorElementType::Float16 => "f16",
        TensorElementType::Float32 => "f32",
        TensorElementType::Float64 => "f64",
        TensorElementType::Int8 => "i8",
        TensorElementType::Int16 => "i16",
        TensorElementType::Int32 => "i32",
        TensorElementType::Int64 => "i64",
        TensorElementType::Uint8 => "u8",
        TensorElementType::Uint16 => "u16",
        TensorElementType::Uint32 => "u32",
        TensorElementType::Uint64 => "u64",
        TensorElementType::String => "string",
        #[allow(unreachable_patterns)]
        other => return format!("{other:?}").to_lowercase(),
    };
    name.to_string()
}
