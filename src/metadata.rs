// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model interface metadata.
//!
//! Describes the inputs and outputs of an imported model and renders the
//! short I/O summary printed after a successful import.

use std::fmt;

/// One input or output of an imported model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Port name.
    pub name: String,
    /// Element type (e.g. `f32`), or the full type for non-tensor values.
    pub element_type: String,
    /// Tensor dimensions, `-1` marking a dynamic dimension. `None` for
    /// sequences and maps.
    pub shape: Option<Vec<i64>>,
}

impl PortInfo {
    /// Create a tensor port.
    #[must_use]
    pub fn tensor(name: impl Into<String>, element_type: impl Into<String>, shape: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            element_type: element_type.into(),
            shape: Some(shape),
        }
    }

    /// Create a port holding a non-tensor value.
    #[must_use]
    pub fn opaque(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element_type: value_type.into(),
            shape: None,
        }
    }

    /// Whether any dimension is only known at run time.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.shape.as_ref().is_some_and(|dims| dims.iter().any(|&d| d < 0))
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Some(dims) => write!(f, "{} : {} / {}", self.name, self.element_type, format_shape(dims)),
            None => write!(f, "{} : {}", self.name, self.element_type),
        }
    }
}

/// Render dimensions as `[1,3,?,?]`.
#[must_use]
pub fn format_shape(dims: &[i64]) -> String {
    let parts: Vec<String> = dims
        .iter()
        .map(|&d| if d < 0 { "?".to_string() } else { d.to_string() })
        .collect();
    format!("[{}]", parts.join(","))
}

/// Short summary of a model's inputs and outputs, one port per line.
#[must_use]
pub fn io_summary(inputs: &[PortInfo], outputs: &[PortInfo]) -> String {
    let mut summary = String::new();
    for (title, ports) in [("Network inputs:", inputs), ("Network outputs:", outputs)] {
        summary.push_str(title);
        summary.push('\n');
        if ports.is_empty() {
            summary.push_str("    (none)\n");
        }
        for port in ports {
            summary.push_str(&format!("    {port}\n"));
        }
    }
    summary
}
