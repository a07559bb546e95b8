pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;

pub use config::{CargoItem, ClientRecord, Config, PricingConfig, Session};
pub use error::{InvoiceError, Result};
pub use invoice::{build_invoice, compute_line, generate_invoice, InvoiceLayout, InvoiceTotals};
pub use pdf::{Renderer, TypstRenderer};
