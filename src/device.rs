// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Hardware device support and abstraction.
//!
//! A target passed with `-d` is either a single device (`CPU`, `cuda:1`,
//! `openvino:GPU`) or an aggregator listing devices in priority order
//! (`MULTI:cuda,cpu`, `AUTO`, `HETERO:npu,cpu`).
use std::fmt;
use std::str::FromStr;

/// Hardware device for inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// CPU (Central Processing Unit).
    Cpu,
    /// CUDA (Compute Unified Device Architecture) for NVIDIA GPUs.
    /// The argument specifies the device index (e.g., 0 for the first GPU).
    Cuda(usize),
    /// `CoreML` (Apple Core Machine Learning).
    CoreMl,
    /// `DirectML` (Direct Machine Learning) for Windows.
    /// The argument specifies the device index.
    DirectMl(usize),
    /// `OpenVINO` for Intel hardware, optionally pinned to an `OpenVINO` device type
    /// such as `CPU`, `GPU` or `NPU`.
    OpenVino(Option<String>),
    /// XNNPACK (optimized floating-point neural network inference operators) for CPU.
    Xnnpack,
    /// `TensorRT` (NVIDIA `TensorRT`) for high-performance deep learning inference.
    /// The argument specifies the device index.
    TensorRt(usize),
    /// `ROCm` (Radeon Open Compute) for AMD GPUs.
    /// The argument specifies the device index.
    Rocm(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(i) => write!(f, "cuda:{i}"),
            Self::CoreMl => write!(f, "coreml"),
            Self::DirectMl(i) => write!(f, "directml:{i}"),
            Self::OpenVino(None) => write!(f, "openvino"),
            Self::OpenVino(Some(kind)) => write!(f, "openvino:{kind}"),
            Self::Xnnpack => write!(f, "xnnpack"),
            Self::TensorRt(i) => write!(f, "tensorrt:{i}"),
            Self::Rocm(i) => write!(f, "rocm:{i}"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "cpu" => return Ok(Self::Cpu),
            "coreml" | "mps" => return Ok(Self::CoreMl),
            "xnnpack" => return Ok(Self::Xnnpack),
            // Intel NPU, formerly shipped as the VPUX plugin
            "npu" | "vpux" => return Ok(Self::OpenVino(Some("NPU".to_string()))),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("openvino") {
            return match rest.strip_prefix(':') {
                Some(kind) if !kind.is_empty() => Ok(Self::OpenVino(Some(kind.to_uppercase()))),
                _ if rest.is_empty() => Ok(Self::OpenVino(None)),
                _ => Err(format!("Unknown device: {s}")),
            };
        }

        // OpenVINO vocabulary: GPU is the Intel GPU plugin, GPU.1 the second one
        if let Some(rest) = s.strip_prefix("gpu") {
            return match parse_device_index(rest) {
                Some(_) if rest.is_empty() => Ok(Self::OpenVino(Some("GPU".to_string()))),
                Some(index) => Ok(Self::OpenVino(Some(format!("GPU.{index}")))),
                None => Err(format!("Invalid device index in '{s}'")),
            };
        }

        let indexed: [(&str, fn(usize) -> Self); 4] = [
            ("cuda", Self::Cuda),
            ("directml", Self::DirectMl),
            ("tensorrt", Self::TensorRt),
            ("rocm", Self::Rocm),
        ];
        for (prefix, make) in indexed {
            if let Some(rest) = s.strip_prefix(prefix) {
                return parse_device_index(rest)
                    .map(make)
                    .ok_or_else(|| format!("Invalid device index in '{s}'"));
            }
        }

        Err(format!("Unknown device: {s}"))
    }
}

/// Helper to parse device index from string (e.g. ":0" or ".1").
/// An empty suffix selects device 0.
fn parse_device_index(s: &str) -> Option<usize> {
    if s.is_empty() {
        return Some(0);
    }
    s.strip_prefix(':')
        .or_else(|| s.strip_prefix('.'))
        .and_then(|index_str| index_str.parse::<usize>().ok())
}

/// Virtual devices that spread a model over several real devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregator {
    /// Run on all listed devices.
    Multi,
    /// Let the engine pick from the listed devices (or from everything available).
    Auto,
    /// Split the graph across the listed devices, first one preferred.
    Hetero,
}

impl Aggregator {
    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Multi => "MULTI",
            Self::Auto => "AUTO",
            Self::Hetero => "HETERO",
        }
    }
}

/// Parsed value of the `-d` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    /// A single concrete device.
    Single(Device),
    /// An aggregator over devices in priority order.
    Aggregate {
        /// Aggregation kind.
        kind: Aggregator,
        /// Devices, highest priority first.
        devices: Vec<Device>,
    },
}

impl DeviceTarget {
    /// Devices in priority order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        match self {
            Self::Single(device) => std::slice::from_ref(device),
            Self::Aggregate { devices, .. } => devices,
        }
    }

    /// Whether the target aggregates several devices.
    #[must_use]
    pub const fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate { .. })
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(device) => write!(f, "{device}"),
            Self::Aggregate { kind, devices } => {
                let list: Vec<String> = devices.iter().map(ToString::to_string).collect();
                if list.is_empty() {
                    write!(f, "{}", kind.as_str())
                } else {
                    write!(f, "{}:{}", kind.as_str(), list.join(","))
                }
            }
        }
    }
}

impl FromStr for DeviceTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (head, tail) = trimmed
            .split_once(':')
            .map_or((trimmed, None), |(head, tail)| (head, Some(tail)));

        let kind = match head.to_uppercase().as_str() {
            "MULTI" => Aggregator::Multi,
            "AUTO" => Aggregator::Auto,
            "HETERO" => Aggregator::Hetero,
            _ => return trimmed.parse().map(Self::Single),
        };

        let devices = tail
            .unwrap_or_default()
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Device>, _>>()?;

        if devices.is_empty() && kind != Aggregator::Auto {
            return Err(format!("{} requires a device list, e.g. {}:CPU", kind.as_str(), kind.as_str()));
        }

        Ok(Self::Aggregate { kind, devices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device() {
        assert_eq!(Device::from_str("cpu").unwrap(), Device::Cpu);
        assert_eq!(Device::from_str("CPU").unwrap(), Device::Cpu);
        assert_eq!(Device::from_str("cuda").unwrap(), Device::Cuda(0));
        assert_eq!(Device::from_str("cuda:0").unwrap(), Device::Cuda(0));
        assert_eq!(Device::from_str("cuda:1").unwrap(), Device::Cuda(1));
        assert_eq!(Device::from_str("mps").unwrap(), Device::CoreMl);
        assert_eq!(Device::from_str("directml").unwrap(), Device::DirectMl(0));
        assert_eq!(Device::from_str("directml:1").unwrap(), Device::DirectMl(1));
        assert_eq!(Device::from_str("openvino").unwrap(), Device::OpenVino(None));
        assert_eq!(
            Device::from_str("openvino:gpu").unwrap(),
            Device::OpenVino(Some("GPU".to_string()))
        );
    }

    #[test]
    fn test_gpu_maps_to_openvino_gpu() {
        assert_eq!(
            Device::from_str("GPU").unwrap(),
            Device::OpenVino(Some("GPU".to_string()))
        );
        assert_eq!(
            Device::from_str("GPU.1").unwrap(),
            Device::OpenVino(Some("GPU.1".to_string()))
        );
        assert!(Device::from_str("GPU.x").is_err());
    }

    #[test]
    fn test_vpux_maps_to_openvino_npu() {
        assert_eq!(
            Device::from_str("VPUX").unwrap(),
            Device::OpenVino(Some("NPU".to_string()))
        );
    }

    #[test]
    fn test_unknown_device() {
        assert!(Device::from_str("fpga").is_err());
        assert!(Device::from_str("cuda:x").is_err());
    }

    #[test]
    fn test_parse_aggregate_target() {
        let target = DeviceTarget::from_str("MULTI:cuda:1,CPU").unwrap();
        assert!(target.is_aggregate());
        assert_eq!(target.devices(), &[Device::Cuda(1), Device::Cpu]);
        assert_eq!(target.to_string(), "MULTI:cuda:1,cpu");
    }

    #[test]
    fn test_auto_without_devices() {
        let target = DeviceTarget::from_str("AUTO").unwrap();
        assert!(target.devices().is_empty());
        assert!(DeviceTarget::from_str("MULTI").is_err());
    }

    #[test]
    fn test_single_target() {
        let target = DeviceTarget::from_str("CPU").unwrap();
        assert!(!target.is_aggregate());
        assert_eq!(target.devices(), &[Device::Cpu]);
    }
}
