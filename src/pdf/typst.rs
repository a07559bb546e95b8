use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use super::Renderer;
use crate::error::{InvoiceError, Result};
use crate::invoice::InvoiceLayout;

/// Embedded Typst template for the shipping invoice.
/// Reads the layout from `data.json` next to it; every figure arrives
/// pre-formatted, the template only places it.
const INVOICE_TEMPLATE: &str = r##"// Shipping invoice template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#let primary = rgb(data.theme.primary)
#let accent = rgb(data.theme.accent)
#let to-pt(x) = x * 1pt
#let page-width = to-pt(data.page.width)
#let row-height = to-pt(data.page.row_height)
#let band-height = 25pt
#let panel-height = 85pt
// Header space left for branding once the band, panel and column headings are placed
#let branding-height = to-pt(data.page.header_height) - band-height - panel-height - row-height
#let margin-x = 30pt

#set page(
  width: page-width,
  height: to-pt(data.page.height),
  margin: (x: margin-x, top: 0pt, bottom: 0pt),
)
#set text(font: "Helvetica", size: 10pt)
#set block(spacing: 0pt)

// Colour band across the top edge
#place(top + left, dx: -margin-x, rect(width: page-width, height: band-height, fill: primary))
#block(height: band-height, width: 100%)

// Branding: logo or company name, contacts on the right
#block(height: branding-height, width: 100%, clip: true, grid(
  columns: (1fr, auto),
  rows: branding-height,
  align: (left + horizon, right + horizon),
  if data.logo != none {
    image(data.logo, width: 250pt, height: branding-height - 8pt, fit: "contain")
  } else {
    text(size: 28pt, weight: "bold", fill: primary, data.header.company)
  },
  {
    if data.header.route != none {
      text(weight: "bold", data.header.route)
      linebreak()
    }
    for contact in data.header.contacts {
      contact
      linebreak()
    }
  },
))

// Client and invoice details
#block(height: panel-height, width: 100%, clip: true, rect(
  width: 100%,
  height: panel-height - 5pt,
  radius: 8pt,
  fill: rgb("#F4F6F7"),
  stroke: none,
  inset: (x: 15pt, y: 8pt),
  grid(
    columns: (1fr, 1fr),
    align: (left, right),
    {
      text(size: 11pt, weight: "bold", fill: primary, data.client.title)
      linebreak()
      for entry in data.client.lines {
        text(size: 9pt, entry)
        linebreak()
      }
    },
    {
      text(size: 11pt, weight: "bold", fill: primary, data.details.title)
      linebreak()
      text(size: 9pt, data.details.number)
      linebreak()
      text(size: 9pt, data.details.date)
      linebreak()
      text(size: 9pt, fill: accent, data.details.rate)
    },
  ),
))

// Items and breakdown
#let body-rows = data.rows.len()
#let last-row = body-rows + data.breakdown.len()
#let light-rule = rgb("#D0D3D4")

#table(
  columns: (9fr, 3.5fr, 2.5fr, 4fr),
  rows: row-height,
  align: center + horizon,
  inset: (x: 5pt, y: 0pt),
  fill: (x, y) => if y == 0 or y > body-rows { primary } else if calc.odd(y) { white } else { rgb("#EBF5FB") },
  stroke: (x, y) => if y > body-rows and y < last-row {
    (bottom: 1pt + white)
  } else if y >= 1 and y <= body-rows and x > 0 {
    (left: 0.5pt + light-rule)
  } else {
    none
  },

  table.header(..data.columns.map(c => text(fill: white, weight: "bold", c))),

  ..data.rows.map(r => (r.description, r.value, r.weight, r.tax)).flatten(),

  ..data.breakdown.map(b => {
    let size = if b.emphasis { 12pt } else { 10pt }
    (
      table.cell(colspan: 3, align: right + horizon, text(fill: white, weight: "bold", size: size, b.label)),
      text(fill: white, weight: "bold", size: size, b.value),
    )
  }).flatten(),
)

// Footer
#place(bottom + center, dy: -to-pt(data.page.footer_height) / 3, align(center, {
  text(size: 9pt, style: "italic", fill: luma(110), data.footer.message)
  if data.footer.socials.len() > 0 {
    linebreak()
    text(size: 8pt, weight: "bold", data.footer.socials.join("    |    "))
  }
}))
"##;

/// What the template reads: the layout plus the staged logo file name.
#[derive(Serialize)]
struct TemplateData<'a> {
    #[serde(flatten)]
    layout: &'a InvoiceLayout,
    logo: Option<&'a str>,
}

/// Renders through the Typst CLI in a scratch directory.
#[derive(Debug, Clone)]
pub struct TypstRenderer {
    binary: PathBuf,
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("typst"),
        }
    }
}

impl TypstRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn ensure_available(&self) -> Result<()> {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|_| ())
            .map_err(|_| InvoiceError::TypstNotFound)
    }

    fn compile(&self, layout: &InvoiceLayout, logo: Option<&Path>) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("shipinvoice-")
            .tempdir()?;
        let dir = scratch.path();

        let logo_name = logo.and_then(|path| stage_logo(path, dir));
        let json_data = template_json(layout, logo_name.as_deref())?;
        fs::write(dir.join("data.json"), json_data)?;

        let template_content = INVOICE_TEMPLATE.replace("DATA_JSON_PATH", "data.json");
        fs::write(dir.join("invoice.typ"), template_content)?;

        let output = Command::new(&self.binary)
            .current_dir(dir)
            .arg("compile")
            .arg("--root")
            .arg(dir)
            .arg("invoice.typ")
            .arg("invoice.pdf")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvoiceError::PdfGeneration(stderr.trim().to_string()));
        }

        let pdf = fs::read(dir.join("invoice.pdf"))?;
        debug!(bytes = pdf.len(), "typst compiled invoice");
        Ok(pdf)
    }
}

impl Renderer for TypstRenderer {
    fn render(&self, layout: &InvoiceLayout, logo: Option<&Path>) -> Result<Vec<u8>> {
        self.ensure_available()?;

        match logo {
            Some(path) => match self.compile(layout, Some(path)) {
                Err(InvoiceError::PdfGeneration(reason)) if blames_logo(&reason) => {
                    warn!(logo = %path.display(), %reason, "logo could not be rendered, using company name");
                    self.compile(layout, None)
                }
                result => result,
            },
            None => self.compile(layout, None),
        }
    }
}

/// Whether a compile error points at the staged logo: either the `logo.<ext>`
/// file itself or the template line that places it.
fn blames_logo(reason: &str) -> bool {
    reason.contains("logo.") || reason.contains("image(data.logo")
}

/// Copy the logo next to the template. `None` if it cannot be read.
fn stage_logo(path: &Path, dir: &Path) -> Option<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_ascii_lowercase();
    let name = format!("logo.{ext}");

    match fs::copy(path, dir.join(&name)) {
        Ok(_) => Some(name),
        Err(e) => {
            warn!(logo = %path.display(), error = %e, "logo unreadable, using company name");
            None
        }
    }
}

fn template_json(layout: &InvoiceLayout, logo: Option<&str>) -> Result<String> {
    serde_json::to_string(&TemplateData { layout, logo })
        .map_err(|e| InvoiceError::PdfGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CargoItem, ClientRecord, Config, PricingConfig, CONFIG_TEMPLATE};
    use crate::invoice::InvoiceMeta;
    use chrono::NaiveDate;

    fn layout() -> InvoiceLayout {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let client = ClientRecord {
            name: "Ana".to_string(),
            phone: "555".to_string(),
            ..Default::default()
        };
        let items = [CargoItem::new("Caja", 100.0, 2.0, 10.0, true).unwrap()];
        let pricing = PricingConfig::new(20.0, "Fl").unwrap();
        let meta = InvoiceMeta {
            number: 12345,
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        };
        InvoiceLayout::new(&config, &client, &items, &pricing, &meta).unwrap()
    }

    #[test]
    fn json_flattens_layout_fields() {
        let json = template_json(&layout(), Some("logo.png")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["logo"], "logo.png");
        assert_eq!(value["page"]["row_height"], 25.0);
        assert_eq!(value["rows"][0]["description"], "Caja");
        assert_eq!(value["breakdown"].as_array().unwrap().len(), 4);
        assert_eq!(value["breakdown"][3]["value"], "150 Fl");
        assert_eq!(value["breakdown"][3]["kind"], "grand_total");
    }

    #[test]
    fn json_without_logo_is_null() {
        let json = template_json(&layout(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["logo"].is_null());
    }

    #[test]
    fn template_reads_every_layout_section() {
        for key in [
            "data.page.height",
            "data.page.header_height",
            "data.page.footer_height",
            "data.page.row_height",
            "data.header.company",
            "data.client.lines",
            "data.details.rate",
            "data.columns",
            "data.rows",
            "data.breakdown",
            "data.footer.message",
            "data.logo",
        ] {
            assert!(INVOICE_TEMPLATE.contains(key), "template does not use {key}");
        }
    }

    #[test]
    fn json_carries_only_what_the_template_reads() {
        let json = template_json(&layout(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["page"]["header_height"], 250.0);
        assert_eq!(value["page"]["footer_height"], 120.0);
        assert!(value.get("totals").is_none());
        assert!(value.get("currency").is_none());
    }

    #[test]
    fn only_logo_errors_trigger_a_retry() {
        let decode = "error: failed to decode image (Format error decoding Png)\n  \
             ┌─ invoice.typ:48:4\n   │\n48 │     image(data.logo, width: 250pt)";
        assert!(blames_logo(decode));
        assert!(blames_logo("error: file not found (searched at logo.svg)"));

        let template = "error: unknown variable: colour\n  ┌─ invoice.typ:19:16";
        assert!(!blames_logo(template));
        assert!(!blames_logo("error: failed to load font Helvetica"));
    }

    #[test]
    fn missing_binary_is_reported() {
        let renderer = TypstRenderer::with_binary("/nonexistent/typst-binary");
        let err = renderer.render(&layout(), None).unwrap_err();
        assert!(matches!(err, InvoiceError::TypstNotFound));
    }

    #[test]
    fn unreadable_logo_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_logo(&dir.path().join("missing.png"), dir.path());
        assert!(staged.is_none());
    }

    #[test]
    fn logo_is_staged_with_its_extension() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let logo = src.path().join("Brand Logo.JPG");
        fs::write(&logo, b"not really a jpeg").unwrap();

        assert_eq!(stage_logo(&logo, dst.path()).as_deref(), Some("logo.jpg"));
        assert!(dst.path().join("logo.jpg").exists());
    }
}
