use crate::core::ConfigProvider;
use crate::domain::model::{ImpactVector, WeightVector};
use crate::utils::error::{Result, TopsisError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scoring job described in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    pub criteria: CriteriaConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local path or http(s) URL.
    pub location: String,
    pub has_header: Option<bool>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaConfig {
    /// Same syntax as the command line, e.g. "1,1,2,1".
    pub weights: String,
    /// e.g. "+,+,-,+".
    pub impacts: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_name: Option<String>,
    pub output_formats: Vec<String>,
    pub precision: Option<usize>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

const DEFAULT_OUTPUT_NAME: &str = "topsis_result";

impl TomlConfig {
    /// Loads a job from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TopsisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a job from TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TopsisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TopsisError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("job.name", &self.job.name)?;
        validate_location("source.location", &self.source.location)?;
        if let Some(delimiter) = self.source.delimiter {
            validate_delimiter("source.delimiter", delimiter)?;
        }

        WeightVector::parse(&self.criteria.weights)?;
        ImpactVector::parse(&self.criteria.impacts)?;

        validate_path("load.output_path", &self.load.output_path)?;
        validate_non_empty_string("load.output_name", self.output_name())?;
        validate_output_formats("load.output_formats", &self.load.output_formats)?;
        if let Some(precision) = self.load.precision {
            validate_range("load.precision", precision, 0, 15)?;
        }
        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validate_non_empty_string("load.compression.filename", &compression.filename)?;
            }
        }

        Ok(())
    }

    pub fn output_name(&self) -> &str {
        self.load.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME)
    }

    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_location(&self) -> &str {
        &self.source.location
    }

    fn weights(&self) -> &str {
        &self.criteria.weights
    }

    fn impacts(&self) -> &str {
        &self.criteria.impacts
    }

    fn has_header(&self) -> Option<bool> {
        self.source.has_header
    }

    fn delimiter(&self) -> Option<u8> {
        self.source.delimiter.filter(char::is_ascii).map(|c| c as u8)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_name(&self) -> &str {
        TomlConfig::output_name(self)
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn precision(&self) -> Option<usize> {
        self.load.precision
    }

    fn bundle_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "phones"
description = "Shortlist phones"
version = "1.0.0"

[source]
location = "data/phones.csv"

[criteria]
weights = "0.25,0.25,0.25,0.25"
impacts = "-,+,+,+"

[load]
output_path = "./results"
output_formats = ["csv", "json"]
precision = 4
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.job.name, "phones");
        assert_eq!(config.input_location(), "data/phones.csv");
        assert_eq!(config.impacts(), "-,+,+,+");
        assert_eq!(config.output_name(), "topsis_result");
        assert_eq!(config.precision(), Some(4));
        assert_eq!(config.has_header(), None);
        assert_eq!(config.bundle_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TOPSIS_TEST_DATA_DIR", "/srv/tables");

        let toml_content = r#"
[job]
name = "env"

[source]
location = "${TOPSIS_TEST_DATA_DIR}/cars.csv"

[criteria]
weights = "1"
impacts = "+"

[load]
output_path = "${TOPSIS_TEST_UNSET_VAR}"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.location, "/srv/tables/cars.csv");
        assert_eq!(config.load.output_path, "${TOPSIS_TEST_UNSET_VAR}");

        std::env::remove_var("TOPSIS_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let invalid = BASIC.replace("-,+,+,+", "-,+,*,+");
        let config = TomlConfig::from_toml_str(&invalid).unwrap();
        assert!(config.validate().is_err());

        let invalid = BASIC.replace("[\"csv\", \"json\"]", "[\"xml\"]");
        let config = TomlConfig::from_toml_str(&invalid).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_sets_bundle_name() {
        let content = format!(
            "{}\n[load.compression]\nenabled = true\nfilename = \"phones.zip\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();

        assert!(config.compression_enabled());
        assert_eq!(config.bundle_name(), Some("phones.zip"));
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let err = TomlConfig::from_toml_str("[job]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, TopsisError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "phones");
    }
}
