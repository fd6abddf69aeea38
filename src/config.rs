use serde::Deserialize;

/// Configuration for [`BufferPool`](crate::pool::BufferPool).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Capacity given to buffers allocated without an explicit size.
    ///
    /// Default: 1 KiB.
    pub default_capacity: usize,

    /// Upper bound for any allocation or growth.
    ///
    /// Default: 64 MiB.
    pub max_capacity: usize,

    /// Multiplier applied to the current capacity when an add runs out of
    /// space and the caller asks the pool to grow the buffer.
    ///
    /// Default: 2.
    pub growth_factor: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_capacity: 1024,
            max_capacity: 64 * 1024 * 1024,
            growth_factor: 2,
        }
    }
}

impl PoolConfig {
    /// Parse from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PoolConfig::from_json_str(r#"{ "default_capacity": 256 }"#).unwrap();
        assert_eq!(config.default_capacity, 256);
        assert_eq!(config.max_capacity, PoolConfig::default().max_capacity);
        assert_eq!(config.growth_factor, 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(PoolConfig::from_json_str(r#"{ "growth_factor": "big" }"#).is_err());
    }
}
