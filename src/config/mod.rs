mod client;
mod company;
mod item;
pub mod pricing;
mod session;

pub use client::ClientRecord;
pub use company::{Company, Config, Contact, Footer, PdfSettings, Theme};
pub use item::CargoItem;
pub use pricing::{CurrencyChoice, CurrencySetting, PricingConfig, PricingSettings};
pub use session::Session;

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, or ~/.shipinvoice/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "shipinvoice") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".shipinvoice"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a configured path; relative paths are taken from the config directory.
pub fn resolve_path(path: &str, cfg_dir: &Path) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        cfg_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join("config.toml");
    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Load session.toml (empty session if missing)
pub fn load_session(cfg_dir: &Path) -> Result<Session> {
    let path = cfg_dir.join("session.toml");
    if !path.exists() {
        return Ok(Session::default());
    }
    let content = fs::read_to_string(&path)?;
    let session: Session =
        toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })?;
    for item in session.items() {
        item.validate()?;
    }
    Ok(session)
}

/// Save session.toml
pub fn save_session(cfg_dir: &Path, session: &Session) -> Result<()> {
    let path = cfg_dir.join("session.toml");
    let content = toml::to_string_pretty(session).map_err(|e| InvoiceError::Session {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r##"[company]
name = "ENVÍOS ANGELITOS"
logo = "logo.png"          # optional, relative to this directory
route = "Aruba ⇌ Colombia"

[[company.contacts]]
region = "Aruba"
phone = "+297 5637658"

[[company.contacts]]
region = "Colombia"
phone = "+57 316 6981780"

[footer]
message = "Thank you for trusting us! We ship your goods with care."
socials = ["Instagram: @envios.angelitos", "Facebook: @envios Angelito aruba-colombia"]

[theme]
primary = "#1F2658"
accent = "#A8182D"

[pricing]
default = "primary"        # primary or secondary
primary = { label = "Fl", rate = 20.0 }
secondary = { label = "COP", rate = 45000.0 }

[pdf]
output_dir = "output"      # relative to this directory, or ~/path
"##;
