use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No symbol provided")]
    MissingSymbol,

    #[error("API Limit Reached or Invalid Symbol: {symbol}")]
    InvalidSymbol { symbol: String },

    #[error("Quarterly financial data unavailable for {symbol}")]
    FinancialsUnavailable { symbol: String },

    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Client,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::UpstreamStatus { .. } => ErrorCategory::Upstream,
            Self::MissingSymbol | Self::InvalidSymbol { .. } | Self::FinancialsUnavailable { .. } => {
                ErrorCategory::Client
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::DataUnavailable { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Data,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應的 HTTP 狀態碼 (資料不可用視為 client error)
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            ErrorCategory::Data => match self {
                Self::DataUnavailable { .. } => 400,
                _ => 500,
            },
            ErrorCategory::Network | ErrorCategory::Upstream => 502,
            ErrorCategory::Configuration | ErrorCategory::System => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingSymbol => "No symbol provided".to_string(),
            Self::InvalidSymbol { .. } => "API Limit Reached or Invalid Symbol".to_string(),
            Self::FinancialsUnavailable { .. } => "Quarterly financial data unavailable".to_string(),
            Self::ApiError(_) | Self::UpstreamStatus { .. } => {
                format!("Fetch failed: {}", self)
            }
            Self::MissingConfigError { field } if field.contains("api_key") => {
                "API key not configured".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the upstream base URL",
            ErrorCategory::Upstream => "The upstream API rejected the request; try again later",
            ErrorCategory::Client => "Check the ticker symbol or wait for the API rate limit to reset",
            ErrorCategory::Configuration => "Review the TOML configuration and CLI arguments",
            ErrorCategory::Data => "Verify the data files match the expected JSON layout",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
