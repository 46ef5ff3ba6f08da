//! Enumerated field options and optional TOML configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub languages: Vec<String>,
    pub locations: Vec<String>,
    pub projects: Vec<String>,
    pub lpo_references: Vec<String>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            languages: owned(&["English", "Arabic", "Spanish", "French", "German"]),
            locations: owned(&[
                "Warehouse A",
                "Warehouse B",
                "Warehouse C",
                "Distribution Center",
            ]),
            projects: owned(&[
                "Project Alpha",
                "Project Beta",
                "Project Gamma",
                "Project Delta",
            ]),
            lpo_references: owned(&["LPO-001", "LPO-002", "LPO-003", "LPO-004"]),
        }
    }
}

impl FieldOptions {
    /// Options for a choice field, or `None` for free-form fields.
    pub fn for_field(&self, field: crate::model::Field) -> Option<&[String]> {
        use crate::model::Field;
        match field {
            Field::Language => Some(&self.languages),
            Field::Location => Some(&self.locations),
            Field::Project => Some(&self.projects),
            Field::LpoReference => Some(&self.lpo_references),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, list) in [
            ("languages", &self.languages),
            ("locations", &self.locations),
            ("projects", &self.projects),
            ("lpo_references", &self.lpo_references),
        ] {
            if list.is_empty() {
                anyhow::bail!("option list `{name}` must contain at least one entry");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Start the session with the two sample requests.
    pub seed_demo: bool,
    pub options: FieldOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_demo: true,
            options: FieldOptions::default(),
        }
    }
}

/// `<config dir>/schedule-requests/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("schedule-requests").join("config.toml"))
}

pub fn parse_config(raw: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(raw).context("parse config TOML")?;
    cfg.options.validate()?;
    Ok(cfg)
}

/// Load configuration from an explicit path, else the default location if it exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(AppConfig::default()),
        },
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg = parse_config(&raw).with_context(|| format!("load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn defaults_match_builtin_lists() {
        let opts = FieldOptions::default();
        assert_eq!(opts.languages[0], "English");
        assert_eq!(opts.locations.len(), 4);
        assert_eq!(opts.for_field(Field::LpoReference).unwrap()[3], "LPO-004");
        assert!(opts.for_field(Field::Planner).is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse_config(
            r#"
seed_demo = false

[options]
languages = ["German", "English"]
"#,
        )
        .unwrap();
        assert!(!cfg.seed_demo);
        assert_eq!(cfg.options.languages, vec!["German", "English"]);
        assert_eq!(cfg.options.projects, FieldOptions::default().projects);
    }

    #[test]
    fn empty_option_list_is_rejected() {
        let err = parse_config("[options]\nprojects = []\n").unwrap_err();
        assert!(format!("{err:#}").contains("projects"));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let p = std::env::temp_dir().join("schedule-requests-no-such-config.toml");
        assert!(load_config(Some(&p)).is_err());
    }
}
