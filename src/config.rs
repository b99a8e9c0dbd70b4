//! Mapping configuration
//!
//! Column names of the budget export and suffixes of the template metric
//! columns. Defaults follow the standard budget export; a YAML file can
//! override any subset:
//!
//! ```yaml
//! budget:
//!   segment: MKT_GROUP
//! template:
//!   revenue_suffix: _REVENUE
//! ```

use crate::error::{MapperError, MapperResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub budget: BudgetColumns,
    pub template: TemplateColumns,
}

/// Required budget columns
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BudgetColumns {
    pub hotel: String,
    pub date: String,
    pub segment: String,
    pub room_nights: String,
    pub room_revenue: String,
}

impl Default for BudgetColumns {
    fn default() -> Self {
        Self {
            hotel: "HOTEL".to_string(),
            date: "GIORNO".to_string(),
            segment: "MKT_OPERA".to_string(),
            room_nights: "RN".to_string(),
            room_revenue: "RR".to_string(),
        }
    }
}

impl BudgetColumns {
    /// Column names in the order they are validated and reported.
    pub fn required(&self) -> [&str; 5] {
        [
            &self.hotel,
            &self.date,
            &self.segment,
            &self.room_nights,
            &self.room_revenue,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateColumns {
    pub room_nights_suffix: String,
    pub revenue_suffix: String,
}

impl Default for TemplateColumns {
    fn default() -> Self {
        Self {
            room_nights_suffix: "_RN".to_string(),
            revenue_suffix: "_REV".to_string(),
        }
    }
}

impl MappingConfig {
    pub fn from_yaml_str(content: &str) -> MapperResult<Self> {
        let config: MappingConfig = serde_yaml::from_str(content)
            .map_err(|e| MapperError::Config(format!("Invalid mapping config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> MapperResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> MapperResult<Self> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> MapperResult<()> {
        if self.budget.required().iter().any(|c| c.trim().is_empty()) {
            return Err(MapperError::Config(
                "budget column names must not be empty".to_string(),
            ));
        }
        let t = &self.template;
        if t.room_nights_suffix.is_empty() || t.revenue_suffix.is_empty() {
            return Err(MapperError::Config(
                "template suffixes must not be empty".to_string(),
            ));
        }
        if t.room_nights_suffix == t.revenue_suffix {
            return Err(MapperError::Config(
                "room nights and revenue suffixes must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_budget_export() {
        let config = MappingConfig::default();
        assert_eq!(
            config.budget.required(),
            ["HOTEL", "GIORNO", "MKT_OPERA", "RN", "RR"]
        );
        assert_eq!(config.template.room_nights_suffix, "_RN");
        assert_eq!(config.template.revenue_suffix, "_REV");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = MappingConfig::from_yaml_str("budget:\n  segment: MKT_GROUP\n").unwrap();
        assert_eq!(config.budget.segment, "MKT_GROUP");
        assert_eq!(config.budget.hotel, "HOTEL");
        assert_eq!(config.template.revenue_suffix, "_REV");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = MappingConfig::from_yaml_str("budgett:\n  hotel: H\n");
        assert!(matches!(result, Err(MapperError::Config(_))));
    }

    #[test]
    fn test_equal_suffixes_rejected() {
        let yaml = "template:\n  room_nights_suffix: _X\n  revenue_suffix: _X\n";
        assert!(MappingConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_load_none_is_default() {
        assert_eq!(MappingConfig::load(None).unwrap(), MappingConfig::default());
    }
}
