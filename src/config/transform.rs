use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_INPUT_BYTES, DEFAULT_QUALITY};

/// Settings of the built-in transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Quality for lossy formats when the request has no `q`
    #[serde(default = "default_quality")]
    pub default_quality: u8,

    /// Largest original accepted for transformation, in bytes
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_quality: default_quality(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl TransformConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=100).contains(&self.default_quality) {
            return Err(format!(
                "transform.default_quality {} must be 1-100",
                self.default_quality
            ));
        }
        if self.max_input_bytes == 0 {
            return Err("transform.max_input_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}
