use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Styling defaults applied to generated content for one business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandPresets {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub default_hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl BrandPresets {
    /// Presets carrying only a name; used when no presets file entry matches.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandPresetsFile {
    pub brand_presets: Vec<BrandPresets>,
}

impl BrandPresetsFile {
    /// Case-insensitive lookup by brand name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&BrandPresets> {
        self.brand_presets
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Load and validate brand presets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brand_presets(path: &Path) -> Result<BrandPresetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandPresetsIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_brand_presets(&content)
}

fn parse_brand_presets(content: &str) -> Result<BrandPresetsFile, ConfigError> {
    let file: BrandPresetsFile = serde_yaml::from_str(content)?;
    validate_brand_presets(&file)?;
    Ok(file)
}

fn validate_brand_presets(file: &BrandPresetsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for brand in &file.brand_presets {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if let Some(bad) = brand.colors.iter().find(|c| !is_hex_color(c)) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has invalid color '{bad}'; expected #RRGGBB",
                brand.name
            )));
        }

        if !seen_names.insert(brand.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }
    }

    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
brand_presets:
  - name: Addis Cafe
    tone: playful
    colors: ["#6F4E37", "#FFF"]
    default_hashtags: [AddisAbebaCafe, EthiopianCoffee]
    footer_text: "Bole Road, Addis Ababa"
  - name: Lulu Salon
"##;

    #[test]
    fn parses_sample_file() {
        let file = parse_brand_presets(SAMPLE).unwrap();
        assert_eq!(file.brand_presets.len(), 2);
        let cafe = file.find("addis cafe").expect("lookup is case-insensitive");
        assert_eq!(cafe.tone.as_deref(), Some("playful"));
        assert_eq!(cafe.default_hashtags.len(), 2);
        let salon = file.find("Lulu Salon").unwrap();
        assert!(salon.colors.is_empty());
        assert!(salon.footer_text.is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let yaml = "brand_presets:\n  - name: Cafe\n  - name: cafe\n";
        let err = parse_brand_presets(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate brand name"));
    }

    #[test]
    fn rejects_invalid_color() {
        let yaml = "brand_presets:\n  - name: Cafe\n    colors: [brown]\n";
        let err = parse_brand_presets(yaml).unwrap_err();
        assert!(err.to_string().contains("invalid color 'brown'"));
    }

    #[test]
    fn rejects_empty_name() {
        let yaml = "brand_presets:\n  - name: '  '\n";
        let err = parse_brand_presets(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_brand_presets(Path::new("/nonexistent/brands.yaml")).unwrap_err();
        assert!(
            matches!(err, ConfigError::BrandPresetsIo { ref path, .. } if path.contains("brands.yaml"))
        );
    }
}
