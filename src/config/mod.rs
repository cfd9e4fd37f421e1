#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

/// Where the cart lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File {
        path: String,
    },
    Api {
        endpoint: String,
        token: Option<String>,
        timeout_seconds: Option<u64>,
    },
}

impl SourceSpec {
    pub fn describe(&self) -> String {
        match self {
            SourceSpec::File { path } => format!("file {}", path),
            SourceSpec::Api { endpoint, token, .. } => format!(
                "API {}{}",
                endpoint,
                if token.is_some() { " (token auth)" } else { "" }
            ),
        }
    }
}
