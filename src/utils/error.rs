use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuylistError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    ApiStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("Ingredient '{name}' appears with unit '{unit}' but was first seen with '{first_unit}'")]
    UnitConflictError {
        name: String,
        first_unit: String,
        unit: String,
    },

    #[error("Rendering failed at line {line}: {reason}")]
    RenderingError { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Storage,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BuylistError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuylistError::ApiError(_) | BuylistError::ApiStatusError { .. } => {
                ErrorCategory::Network
            }
            BuylistError::CsvError(_)
            | BuylistError::SerializationError(_)
            | BuylistError::InvalidInputError { .. }
            | BuylistError::UnitConflictError { .. } => ErrorCategory::Data,
            BuylistError::ConfigError { .. }
            | BuylistError::ConfigValidationError { .. }
            | BuylistError::InvalidConfigValueError { .. }
            | BuylistError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BuylistError::ZipError(_) | BuylistError::IoError(_) => ErrorCategory::Storage,
            BuylistError::RenderingError { .. } => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Rendering => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BuylistError::ApiError(_) => "Check that the backend is reachable and the endpoint URL is correct",
            BuylistError::ApiStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check the API token; the cart endpoint requires an authenticated user"
            }
            BuylistError::ApiStatusError { .. } => "Check the endpoint path and the backend logs",
            BuylistError::CsvError(_) => "Make sure the CSV file has a 'name,unit,amount' header",
            BuylistError::SerializationError(_) => {
                "Make sure the input is a JSON array of {name, unit, amount} objects"
            }
            BuylistError::InvalidInputError { .. } => "Fix the offending ingredient line in the cart data",
            BuylistError::UnitConflictError { .. } => {
                "Use one measurement unit per ingredient, or disable strict unit checking"
            }
            BuylistError::RenderingError { .. } => {
                "Shorten the ingredient name or unit, raise max_line_chars, or use the text format"
            }
            BuylistError::ConfigError { .. }
            | BuylistError::ConfigValidationError { .. }
            | BuylistError::InvalidConfigValueError { .. }
            | BuylistError::MissingConfigError { .. } => "Review the configuration file or command line flags",
            BuylistError::IoError(_) | BuylistError::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch the shopping cart: {}", self),
            ErrorCategory::Data => format!("The shopping cart data is invalid: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Storage => format!("Could not write the shopping list: {}", self),
            ErrorCategory::Rendering => format!("Could not render the shopping list: {}", self),
        }
    }

    /// 依嚴重程度對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuylistError>;
