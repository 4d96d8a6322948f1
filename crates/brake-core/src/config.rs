use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Default sample log file name
pub const DEFAULT_LOG_FILE: &str = "bending_data.txt";

/// Gauges the shop floor UI offers by default
pub const DEFAULT_GAUGES: [u32; 4] = [16, 18, 20, 24];

/// Decimal places shown for a predicted BND offset
pub const DEFAULT_DISPLAY_DECIMALS: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Sample log location, relative to the host's data directory
    pub log_file: String,
    /// Gauges the operator may pick from. The engine itself accepts any gauge.
    pub supported_gauges: Vec<u32>,
    pub display_decimals: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            log_file: String::from(DEFAULT_LOG_FILE),
            supported_gauges: DEFAULT_GAUGES.to_vec(),
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
        }
    }
}

impl CalculatorConfig {
    pub fn supports(&self, gauge: u32) -> bool {
        self.supported_gauges.contains(&gauge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shop_gauges() {
        let config = CalculatorConfig::default();
        assert_eq!(config.supported_gauges, DEFAULT_GAUGES);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert!(config.supports(18));
        assert!(!config.supports(22));
    }
}
