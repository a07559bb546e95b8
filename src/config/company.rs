use serde::{Deserialize, Serialize};

use super::pricing::PricingSettings;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub company: Company,
    pub footer: Footer,
    #[serde(default)]
    pub theme: Theme,
    pub pricing: PricingSettings,
    pub pdf: PdfSettings,
}

/// Branding shown in the invoice header.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    /// Logo image, relative to the config directory unless absolute
    #[serde(default)]
    pub logo: Option<String>,
    /// Route line printed above the contacts (e.g. "Aruba ⇌ Colombia")
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Contact {
    pub region: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Footer {
    pub message: String,
    #[serde(default)]
    pub socials: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Theme {
    pub primary: String,
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#1F2658".to_string(),
            accent: "#A8182D".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PdfSettings {
    pub output_dir: String,
}
