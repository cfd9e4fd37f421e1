use crate::config::SourceSpec;
use crate::core::render::{PageLayout, DEFAULT_TITLE};
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, UnitConflictPolicy};
use crate::utils::error::{BuylistError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
    #[serde(default)]
    pub render: RenderConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// "file" 或 "api"
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub unit_conflict: Option<UnitConflictPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    pub title: Option<String>,
    /// Shortcut for a default layout whose body holds this many lines.
    pub lines_per_page: Option<usize>,
    pub layout: Option<PageLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub basename: Option<String>,
    pub archive: Option<ArchiveConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub filename: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BuylistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BUYLIST_API_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BuylistError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_spec(&self) -> Result<SourceSpec> {
        match self.source.r#type.as_str() {
            "file" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                Ok(SourceSpec::File { path: path.clone() })
            }
            "api" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                Ok(SourceSpec::Api {
                    endpoint: endpoint.clone(),
                    token: self.source.token.clone(),
                    timeout_seconds: self.source.timeout_seconds,
                })
            }
            other => Err(BuylistError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Valid source types: file, api".to_string(),
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;

        match self.source_spec()? {
            SourceSpec::File { path } => {
                validation::validate_path("source.path", &path)?;
                validation::validate_file_extension("source.path", &path, &["json", "csv"])?;
            }
            SourceSpec::Api { endpoint, .. } => {
                validation::validate_url("source.endpoint", &endpoint)?;
            }
        }

        if let Some(title) = &self.render.title {
            validation::validate_non_empty_string("render.title", title)?;
        }
        if let Some(lines) = self.render.lines_per_page {
            validation::validate_positive_number("render.lines_per_page", lines, 1)?;
        }
        self.page_layout()?.validate()?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("load.output_formats", self.load.output_formats.len(), 1)?;
        if let Some(archive) = self.load.archive.as_ref().filter(|a| a.enabled) {
            validation::validate_file_extension("load.archive.filename", &archive.filename, &["zip"])?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load.output_formats.clone()
    }

    fn output_basename(&self) -> &str {
        self.load.basename.as_deref().unwrap_or("buylist")
    }

    fn title(&self) -> &str {
        self.render.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    fn page_layout(&self) -> Result<PageLayout> {
        // 明確的 layout 優先於 lines_per_page
        match (self.render.layout, self.render.lines_per_page) {
            (Some(layout), _) => Ok(layout),
            (None, Some(lines)) => PageLayout::with_lines_per_page(lines),
            (None, None) => Ok(PageLayout::default()),
        }
    }

    fn unit_policy(&self) -> UnitConflictPolicy {
        self.aggregate.unit_conflict.unwrap_or_default()
    }

    fn archive_filename(&self) -> Option<&str> {
        self.load
            .archive
            .as_ref()
            .filter(|archive| archive.enabled)
            .map(|archive| archive.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
