use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'shipinvoice init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invalid rate {0}: the per-kilogram rate must be greater than zero")]
    InvalidRate(f64),

    #[error("Unknown currency '{0}'. Use 'primary' or 'secondary'.")]
    UnknownCurrency(String),

    #[error("The cart is empty. Use 'shipinvoice add' to add cargo items.")]
    EmptyInvoice,

    #[error("Client {0} is required. Use 'shipinvoice client --{0} <value>' to set it.")]
    MissingClientField(&'static str),

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidItem {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Item description must not be empty")]
    EmptyDescription,

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Failed to save session file {path}: {reason}")]
    Session { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
