use serde::{Deserialize, Serialize};

use crate::error::{InvoiceError, Result};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ClientRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub destination_country: String,
}

impl ClientRecord {
    /// Name and phone are required before an invoice can be issued.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(InvoiceError::MissingClientField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(InvoiceError::MissingClientField("phone"));
        }
        Ok(())
    }
}
