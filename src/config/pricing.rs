use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{InvoiceError, Result};

/// The `[pricing]` table: two currencies, each with its own default rate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricingSettings {
    #[serde(default)]
    pub default: CurrencyChoice,
    pub primary: CurrencySetting,
    pub secondary: CurrencySetting,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CurrencySetting {
    pub label: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyChoice {
    #[default]
    Primary,
    Secondary,
}

impl FromStr for CurrencyChoice {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            _ => Err(InvoiceError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for CurrencyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

impl PricingSettings {
    pub fn setting(&self, choice: CurrencyChoice) -> &CurrencySetting {
        match choice {
            CurrencyChoice::Primary => &self.primary,
            CurrencyChoice::Secondary => &self.secondary,
        }
    }

    /// Resolve the pricing for one invoice. A currency choice may be given
    /// either as `primary`/`secondary` or as one of the configured labels.
    pub fn resolve(&self, currency: Option<&str>, rate: Option<f64>) -> Result<PricingConfig> {
        let choice = match currency {
            Some(c) if c == self.primary.label => CurrencyChoice::Primary,
            Some(c) if c == self.secondary.label => CurrencyChoice::Secondary,
            Some(c) => c.parse()?,
            None => self.default,
        };
        let setting = self.setting(choice);
        PricingConfig::new(rate.unwrap_or(setting.rate), &setting.label)
    }
}

/// Rate and currency in effect for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingConfig {
    pub rate_per_kg: f64,
    pub currency_label: String,
}

impl PricingConfig {
    pub fn new(rate_per_kg: f64, currency_label: &str) -> Result<Self> {
        validate_rate(rate_per_kg)?;
        Ok(Self {
            rate_per_kg,
            currency_label: currency_label.to_string(),
        })
    }
}

pub(crate) fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(InvoiceError::InvalidRate(rate));
    }
    Ok(())
}
