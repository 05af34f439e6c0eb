//! Configuration for the chunker

use serde::{Deserialize, Serialize};

/// Size limits for chunk packing, all measured in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Flush once the buffer reaches this many characters
    pub max_chars: usize,

    /// Trailing characters carried into the next chunk
    pub overlap_chars: usize,

    /// Shortest chunk an unforced flush may emit
    pub min_chars: usize,
}

impl ChunkConfig {
    /// Validate the configuration
    ///
    /// The chunker itself never raises on a bad configuration; callers that
    /// take limits from users check them here first.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars == 0 {
            return Err("max_chars must be greater than 0".to_string());
        }
        if self.overlap_chars >= self.max_chars {
            return Err(format!(
                "overlap_chars ({}) must be smaller than max_chars ({})",
                self.overlap_chars, self.max_chars
            ));
        }
        if self.min_chars > self.max_chars {
            return Err(format!(
                "min_chars ({}) cannot exceed max_chars ({})",
                self.min_chars, self.max_chars
            ));
        }
        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: 2500,
            overlap_chars: 300,
            min_chars: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChunkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_max() {
        let config = ChunkConfig {
            max_chars: 100,
            overlap_chars: 100,
            min_chars: 10,
        };
        assert!(config.validate().unwrap_err().contains("overlap_chars"));
    }

    #[test]
    fn test_min_cannot_exceed_max() {
        let config = ChunkConfig {
            max_chars: 100,
            overlap_chars: 0,
            min_chars: 101,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_is_invalid() {
        let config = ChunkConfig {
            max_chars: 0,
            overlap_chars: 0,
            min_chars: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ChunkConfig = serde_json::from_str(r#"{"max_chars": 800}"#).unwrap();
        assert_eq!(config.max_chars, 800);
        assert_eq!(config.overlap_chars, 300);
        assert_eq!(config.min_chars, 300);
    }
}
