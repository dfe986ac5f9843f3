//! Configuration for the inspection engine module

use serde::Deserialize;

/// Inspection engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Template id used when a requested body type has no active template
    #[serde(default = "default_template")]
    pub default_template: String,

    /// Client-side photo compression limits
    #[serde(default)]
    pub photo: PhotoConfig,

    /// Report defaults applied when a request does not specify them
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_template: default_template(),
            photo: PhotoConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoConfig {
    /// Longest edge after downscaling (px)
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Encoded size the JPEG quality step-down aims for
    #[serde(default = "default_target_bytes")]
    pub target_bytes: usize,

    #[serde(default = "default_initial_quality")]
    pub initial_quality: u8,

    #[serde(default = "default_min_quality")]
    pub min_quality: u8,

    #[serde(default = "default_max_photos_per_part")]
    pub max_photos_per_part: usize,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            target_bytes: default_target_bytes(),
            initial_quality: default_initial_quality(),
            min_quality: default_min_quality(),
            max_photos_per_part: default_max_photos_per_part(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// `ar` or `en`
    #[serde(default = "default_language")]
    pub language: String,

    /// `a4` or `letter`
    #[serde(default = "default_page_size")]
    pub page_size: String,

    #[serde(default = "default_true")]
    pub include_photos: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            page_size: default_page_size(),
            include_photos: true,
        }
    }
}

fn default_template() -> String {
    "sedan".to_string()
}

fn default_max_dimension() -> u32 {
    1600
}

fn default_target_bytes() -> usize {
    300 * 1024
}

fn default_initial_quality() -> u8 {
    85
}

fn default_min_quality() -> u8 {
    40
}

fn default_max_photos_per_part() -> usize {
    10
}

fn default_language() -> String {
    "ar".to_string()
}

fn default_page_size() -> String {
    "a4".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = serde_json::from_value(serde_json::json!({
            "photo": { "max_dimension": 1024 }
        }))
        .unwrap();
        assert_eq!(cfg.default_template, "sedan");
        assert_eq!(cfg.photo.max_dimension, 1024);
        assert_eq!(cfg.photo.min_quality, 40);
        assert_eq!(cfg.report.page_size, "a4");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> =
            serde_json::from_value(serde_json::json!({ "colour": "red" }));
        assert!(result.is_err());
    }
}
