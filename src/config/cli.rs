use crate::config::SourceSpec;
use crate::core::render::{PageLayout, DEFAULT_TITLE};
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, UnitConflictPolicy};
use crate::utils::error::{BuylistError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "buylist")]
#[command(about = "Build a consolidated shopping list from the recipes in a cart")]
pub struct CliConfig {
    #[arg(long, help = "Cart export to read (.json or .csv)", conflicts_with = "api_endpoint")]
    pub input: Option<String>,

    #[arg(long, help = "Backend endpoint returning the cart's ingredient lines")]
    pub api_endpoint: Option<String>,

    #[arg(long, help = "API token sent as 'Authorization: Token <token>'")]
    pub token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "text")]
    pub formats: Vec<OutputFormat>,

    #[arg(long, default_value = "buylist")]
    pub basename: String,

    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    #[arg(long)]
    pub lines_per_page: Option<usize>,

    #[arg(long, help = "Fail when an ingredient appears under two different units")]
    pub strict_units: bool,

    #[arg(long, help = "Bundle all outputs into this zip file")]
    pub archive: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn source_spec(&self) -> Result<SourceSpec> {
        match (&self.input, &self.api_endpoint) {
            (Some(path), None) => Ok(SourceSpec::File { path: path.clone() }),
            (None, Some(endpoint)) => Ok(SourceSpec::Api {
                endpoint: endpoint.clone(),
                token: self.token.clone(),
                timeout_seconds: self.timeout_seconds,
            }),
            (Some(_), Some(_)) => Err(BuylistError::ConfigError {
                message: "use either --input or --api-endpoint, not both".to_string(),
            }),
            (None, None) => Err(BuylistError::MissingConfigError {
                field: "--input or --api-endpoint".to_string(),
            }),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.clone()
    }

    fn output_basename(&self) -> &str {
        &self.basename
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn page_layout(&self) -> Result<PageLayout> {
        self.lines_per_page
            .map_or_else(|| Ok(PageLayout::default()), PageLayout::with_lines_per_page)
    }

    fn unit_policy(&self) -> UnitConflictPolicy {
        if self.strict_units {
            UnitConflictPolicy::Reject
        } else {
            UnitConflictPolicy::FirstWins
        }
    }

    fn archive_filename(&self) -> Option<&str> {
        self.archive.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.source_spec()? {
            SourceSpec::File { path } => {
                validation::validate_path("input", &path)?;
                validation::validate_file_extension("input", &path, &["json", "csv"])?;
            }
            SourceSpec::Api { endpoint, .. } => validation::validate_url("api_endpoint", &endpoint)?,
        }

        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("basename", &self.basename)?;
        validation::validate_non_empty_string("title", &self.title)?;
        if let Some(lines) = self.lines_per_page {
            validation::validate_positive_number("lines_per_page", lines, 1)?;
        }
        if let Some(archive) = &self.archive {
            validation::validate_file_extension("archive", archive, &["zip"])?;
        }
        self.page_layout()?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_source_flags() {
        let config = CliConfig::parse_from([
            "buylist",
            "--input",
            "cart.json",
            "--formats",
            "text,pdf",
            "--lines-per-page",
            "50",
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.output_formats(), vec![OutputFormat::Text, OutputFormat::Pdf]);
        assert_eq!(config.page_layout().unwrap().lines_per_page(), 50);
        assert_eq!(config.title(), "Ingredient list:");
        assert_eq!(config.unit_policy(), UnitConflictPolicy::FirstWins);
    }

    #[test]
    fn test_parse_api_source_flags() {
        let config = CliConfig::parse_from([
            "buylist",
            "--api-endpoint",
            "http://localhost:8000/api/recipes/download_shopping_cart/",
            "--token",
            "abc",
            "--strict-units",
            "--archive",
            "buylist.zip",
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.unit_policy(), UnitConflictPolicy::Reject);
        assert_eq!(config.archive_filename(), Some("buylist.zip"));
        assert!(matches!(config.source_spec().unwrap(), SourceSpec::Api { .. }));
    }

    #[test]
    fn test_oversized_lines_per_page_is_invalid() {
        let config = CliConfig::parse_from(["buylist", "--input", "cart.json", "--lines-per-page", "300000000"]);
        assert!(matches!(
            config.validate(),
            Err(BuylistError::ConfigValidationError { .. })
        ));
        assert!(config.page_layout().is_err());
    }

    #[test]
    fn test_missing_source_is_invalid() {
        let config = CliConfig::parse_from(["buylist"]);
        assert!(matches!(
            config.validate(),
            Err(BuylistError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_conflicting_sources_are_rejected_by_clap() {
        let parsed = CliConfig::try_parse_from([
            "buylist",
            "--input",
            "cart.json",
            "--api-endpoint",
            "http://localhost:8000/cart",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_bad_archive_name_is_invalid() {
        let config = CliConfig::parse_from(["buylist", "--input", "cart.csv", "--archive", "out.tar"]);
        assert!(config.validate().is_err());
    }
}
