//! Engine configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wayfarer_core::error::DomainError;

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of choices a normal generation round aims for.
    pub target_choice_count: usize,
    /// Pressure at which only desperate choices are generated.
    pub desperate_pressure_threshold: i32,
    /// Pressure ceiling used when deriving pressure requirements.
    pub pressure_requirement_cap: i32,
    /// Number of matching templates the selector picks from.
    pub template_shortlist_size: usize,
    /// Seed for the session RNG; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_choice_count: 9,
            desperate_pressure_threshold: 9,
            pressure_requirement_cap: 20,
            template_shortlist_size: 3,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a variable is set but cannot
    /// be parsed, or if the resulting configuration is invalid.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a value cannot be parsed, or
    /// if the resulting configuration is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Self::default();
        let config = Self {
            target_choice_count: parse_or(&lookup, "ENCOUNTER_TARGET_CHOICES", defaults.target_choice_count)?,
            desperate_pressure_threshold: parse_or(
                &lookup,
                "ENCOUNTER_DESPERATE_PRESSURE",
                defaults.desperate_pressure_threshold,
            )?,
            pressure_requirement_cap: parse_or(&lookup, "ENCOUNTER_PRESSURE_CAP", defaults.pressure_requirement_cap)?,
            template_shortlist_size: parse_or(
                &lookup,
                "ENCOUNTER_TEMPLATE_SHORTLIST",
                defaults.template_shortlist_size,
            )?,
            seed: lookup("ENCOUNTER_SEED")
                .map(|raw| parse("ENCOUNTER_SEED", &raw))
                .transpose()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a count is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.target_choice_count == 0 {
            return Err(DomainError::Configuration(
                "target_choice_count must be at least 1".to_owned(),
            ));
        }
        if self.template_shortlist_size == 0 {
            return Err(DomainError::Configuration(
                "template_shortlist_size must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DomainError::Configuration(format!("{key} must be a valid number: {e}")))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| parse(key, &raw))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_variables_keep_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("ENCOUNTER_TARGET_CHOICES", "6"),
            ("ENCOUNTER_PRESSURE_CAP", "8"),
            ("ENCOUNTER_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.target_choice_count, 6);
        assert_eq!(config.pressure_requirement_cap, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.desperate_pressure_threshold, 9);
    }

    #[test]
    fn test_malformed_variable_is_configuration_error() {
        let result = EngineConfig::from_lookup(lookup(&[("ENCOUNTER_SEED", "soon")]));
        assert!(matches!(result, Err(DomainError::Configuration(msg)) if msg.contains("ENCOUNTER_SEED")));
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let result = EngineConfig::from_lookup(lookup(&[("ENCOUNTER_TARGET_CHOICES", "0")]));
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: EngineConfig = serde_yaml::from_str("target_choice_count: 5\n").unwrap();
        assert_eq!(config.target_choice_count, 5);
        assert_eq!(config.template_shortlist_size, 3);
    }
}
