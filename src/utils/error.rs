use thiserror::Error;

#[derive(Error, Debug)]
pub enum LmsError {
    #[error("Identifier already registered: {id}")]
    DuplicateIdError { id: String },

    #[error("Unknown identifier: {id}")]
    NotFoundError { id: String },

    #[error("No copies of item {id} left to lend")]
    CapacityError { id: String },

    #[error("Return of item {id} would exceed its capacity")]
    OverReturnError { id: String },

    #[error("Patron {patron_id} does not hold item {item_id}")]
    NotHeldError { patron_id: String, item_id: String },

    #[error("Patron {patron_id} already holds item {item_id}")]
    AlreadyHeldError { patron_id: String, item_id: String },

    #[error("Patron {id} still holds {count} item(s)")]
    NonEmptyHoldingsError { id: String, count: usize },

    #[error("Item {id} has {outstanding} outstanding loan(s)")]
    OutstandingLoansError { id: String, outstanding: u32 },

    #[error("Corrupt catalog data in {context}: {reason}")]
    CorruptDataError { context: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, LmsError>;
