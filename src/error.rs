use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReputeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("not a whitelisted client: {0}")]
    NotWhitelisted(String),

    #[error("caller is not the owner: {0}")]
    NotOwner(String),

    #[error("token not found: {0}")]
    TokenNotFound(u64),

    #[error("owner index out of bounds: {owner} has {balance} token(s), index {index}")]
    IndexOutOfRange {
        owner: String,
        index: u64,
        balance: u64,
    },

    #[error("ledger not deployed: {0}")]
    LedgerNotDeployed(String),

    #[error("ledger already deployed: {0} (use --force to replace it)")]
    LedgerExists(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("http client error: {0}")]
    HttpClient(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReputeError {
    /// Ledger access-control rejections, surfaced with their own exit code.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::NotWhitelisted(_) | Self::NotOwner(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReputeError>;
