//! Store configuration: a plain `serde`-derived struct validated with
//! `validator`. There is no `path`/`max_size` pair here since this store
//! keeps no durable on-disk environment; what's left to configure is arena
//! preallocation and local cache sizing.
//!
//! Field-level `#[validate(range(...))]` needs `Into<f64>`, which `usize`
//! doesn't implement, so (matching `MmapFileConfig`'s own
//! `#[validate(schema(function = "..."))]` in the teacher) cache-size
//! bounds are checked with one schema-level validation function instead.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_config"))]
pub struct StoreConfig {
    pub initial_file_capacity: usize,
    pub initial_parse_capacity: usize,
    pub initial_module_capacity: usize,
    pub ast_cache_size: usize,
    pub aloc_table_cache_size: usize,
}

fn validate_config(config: &StoreConfig) -> Result<(), ValidationError> {
    if config.ast_cache_size == 0 {
        return Err(ValidationError::new("ast_cache_size must be at least 1"));
    }
    if config.aloc_table_cache_size == 0 {
        return Err(ValidationError::new("aloc_table_cache_size must be at least 1"));
    }
    Ok(())
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            initial_file_capacity: 1024,
            initial_parse_capacity: 1024,
            initial_module_capacity: 256,
            ast_cache_size: 256,
            aloc_table_cache_size: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_cache_size_is_rejected() {
        let mut cfg = StoreConfig::default();
        cfg.ast_cache_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = StoreConfig::default();
        let json = serde_json::to_string(&cfg).expect("config serializes");
        let back: StoreConfig = serde_json::from_str(&json).expect("config deserializes");
        assert_eq!(back.ast_cache_size, cfg.ast_cache_size);
        assert_eq!(back.aloc_table_cache_size, cfg.aloc_table_cache_size);
    }
}
