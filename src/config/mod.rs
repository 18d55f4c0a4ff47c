use crate::domain::model::CarrierApi;
use crate::utils::error::{DispatchError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_postal_codes, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_archive_prefix() -> String {
    "carrier".to_string()
}

/// Module configuration as the host deploys it: which carrier APIs exist
/// and how label output is handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Prefix for the multi-label archive file name, typically the
    /// database or company name.
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Persist printed labels through the attachment store.
    #[serde(default)]
    pub attach_label: bool,

    #[serde(default, rename = "carrier_api")]
    pub carrier_apis: Vec<CarrierApi>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            archive_prefix: default_archive_prefix(),
            attach_label: false,
            carrier_apis: Vec::new(),
        }
    }
}

impl DispatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DispatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let config: Self =
            toml::from_str(&processed).map_err(|e| DispatchError::ConfigError {
                field: "toml_parsing".to_string(),
                reason: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `${VAR}` placeholders with environment values, leaving
    /// unknown placeholders untouched so the parse error names them.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("archive_prefix", &self.archive_prefix)?;
        for api in &self.carrier_apis {
            validate_non_empty_string("carrier_api.name", &api.name)?;
            if let Some(endpoint) = api.endpoint.as_deref() {
                validate_url(&format!("carrier_api.{}.endpoint", api.name), endpoint)?;
            }
            validate_postal_codes(
                &format!("carrier_api.{}.excluded_postal_codes", api.name),
                &api.excluded_postal_codes,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CarrierMethod, WeightUnit};

    const SAMPLE: &str = r#"
archive_prefix = "acme"
attach_label = true

[[carrier_api]]
name = "Seur"
method = "seur"
carriers = ["seur"]
excluded_postal_codes = ["07001", "35001"]
endpoint = "https://ws.seur.example/shipping"
weight_unit = "kilogram"
print_report = "label_printer"

[[carrier_api]]
name = "MRW"
method = "mrw"
carriers = ["mrw"]

[[carrier_api.services]]
code = "0005"
name = "Urgente 10"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = DispatchConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.archive_prefix, "acme");
        assert!(config.attach_label);
        assert_eq!(config.carrier_apis.len(), 2);

        let seur = &config.carrier_apis[0];
        assert_eq!(seur.method, CarrierMethod::Seur);
        assert!(seur.excludes_postal_code("07001"));
        assert_eq!(seur.weight_unit, WeightUnit::Kilogram);
        assert_eq!(seur.print_report.as_deref(), Some("label_printer"));

        let mrw = &config.carrier_apis[1];
        assert_eq!(mrw.method, CarrierMethod::Mrw);
        assert_eq!(mrw.services.len(), 1);
        assert_eq!(mrw.services[0].code, "0005");
    }

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::from_toml_str("").unwrap();
        assert_eq!(config.archive_prefix, "carrier");
        assert!(!config.attach_label);
        assert!(config.carrier_apis.is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CARRIER_TEST_ENDPOINT", "https://ws.test.example");
        let content = r#"
[[carrier_api]]
name = "Seur"
method = "seur"
endpoint = "${CARRIER_TEST_ENDPOINT}"
"#;
        let config = DispatchConfig::from_toml_str(content).unwrap();
        assert_eq!(
            config.carrier_apis[0].endpoint.as_deref(),
            Some("https://ws.test.example")
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let content = r#"
[[carrier_api]]
name = "Seur"
method = "seur"
endpoint = "ftp://ws.seur.example"
"#;
        assert!(DispatchConfig::from_toml_str(content).is_err());
    }

    #[test]
    fn test_unknown_method_rejected() {
        let content = r#"
[[carrier_api]]
name = "Nope"
method = "pigeon"
"#;
        let err = DispatchConfig::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }
}
