// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: numeric ranges, non-empty
//! paths, and distinct transcript labels.

use crate::diagnostic::ConfigError;
use crate::model::TranslandaConfig;

/// Validate a deserialized configuration.
///
/// Collects every violation instead of failing on the first one.
pub fn validate_config(config: &TranslandaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let threshold = config.knowledge.similarity_threshold;
    if !(-1.0..=1.0).contains(&threshold) {
        fail(format!(
            "knowledge.similarity_threshold must be between -1.0 and 1.0, got {threshold}"
        ));
    }

    if config.memory.max_lines == 0 {
        fail("memory.max_lines must be at least 1".to_string());
    }

    if config.memory.memory_file.trim().is_empty() {
        fail("memory.memory_file must not be empty".to_string());
    }

    if config.knowledge.responses_file.trim().is_empty() {
        fail("knowledge.responses_file must not be empty".to_string());
    }

    if config.memory.user_label.trim().is_empty() || config.memory.model_label.trim().is_empty() {
        fail("memory.user_label and memory.model_label must not be empty".to_string());
    } else if config.memory.user_label == config.memory.model_label {
        fail(format!(
            "memory.user_label and memory.model_label must differ, both are `{}`",
            config.memory.user_label
        ));
    }

    if config.liveness.enabled {
        if config.liveness.host.trim().is_empty() {
            fail("liveness.host must not be empty".to_string());
        }
        if config.liveness.port == 0 {
            fail("liveness.port must be non-zero when liveness is enabled".to_string());
        }
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&TranslandaConfig::default()).is_ok());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut config = TranslandaConfig::default();
        config.knowledge.similarity_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("similarity_threshold"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = TranslandaConfig::default();
        config.memory.max_lines = 0;
        config.memory.memory_file = " ".into();
        config.liveness.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn identical_labels_are_rejected() {
        let mut config = TranslandaConfig::default();
        config.memory.model_label = config.memory.user_label.clone();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn disabled_liveness_skips_port_check() {
        let mut config = TranslandaConfig::default();
        config.liveness.enabled = false;
        config.liveness.port = 0;
        assert!(validate_config(&config).is_ok());
    }
}
