use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::calculator::InvoiceTotals;
use super::layout::{InvoiceLayout, InvoiceMeta};
use crate::config::{
    load_config, load_session, resolve_path, CargoItem, ClientRecord, Config, PricingConfig,
};
use crate::error::{InvoiceError, Result};
use crate::pdf::Renderer;

/// Lay out and render one invoice into a document buffer.
pub fn build_invoice<R: Renderer + ?Sized>(
    config: &Config,
    client: &ClientRecord,
    items: &[CargoItem],
    pricing: &PricingConfig,
    meta: &InvoiceMeta,
    logo: Option<&Path>,
    renderer: &R,
) -> Result<Vec<u8>> {
    let layout = InvoiceLayout::new(config, client, items, pricing, meta)?;
    renderer.render(&layout, logo)
}

/// The configured logo, if the file is there.
pub fn resolve_logo(config: &Config, cfg_dir: &Path) -> Option<PathBuf> {
    let logo = config.company.logo.as_deref()?;
    let path = resolve_path(logo, cfg_dir);
    if path.is_file() {
        Some(path)
    } else {
        warn!(logo = %path.display(), "logo not found, using company name");
        None
    }
}

/// `Invoice_<client name>.pdf` with spaces and path-unsafe characters replaced.
pub fn invoice_filename(client_name: &str) -> String {
    let safe: String = client_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("Invoice_{safe}.pdf")
}

/// Options for [`generate_invoice`].
#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    /// `primary`, `secondary`, or a configured currency label
    pub currency: Option<String>,
    /// Overrides the currency's default rate
    pub rate: Option<f64>,
    /// Custom output file path
    pub output: Option<PathBuf>,
}

/// Summary of a written invoice.
#[derive(Debug)]
pub struct GeneratedInvoice {
    pub path: PathBuf,
    pub number: u32,
    pub client: String,
    pub pricing: PricingConfig,
    pub totals: InvoiceTotals,
}

/// Generate the invoice for the current session and write it to disk.
pub fn generate_invoice<R: Renderer + ?Sized>(
    cfg_dir: &Path,
    options: &GenerateOptions,
    renderer: &R,
) -> Result<GeneratedInvoice> {
    let config = load_config(cfg_dir)?;
    let session = load_session(cfg_dir)?;

    session.client.ensure_complete()?;
    if session.is_empty() {
        return Err(InvoiceError::EmptyInvoice);
    }

    let pricing = config
        .pricing
        .resolve(options.currency.as_deref(), options.rate)?;
    let meta = InvoiceMeta::generate();
    let logo = resolve_logo(&config, cfg_dir);
    debug!(
        number = meta.number,
        rate = pricing.rate_per_kg,
        currency = %pricing.currency_label,
        "generating invoice"
    );

    let pdf = build_invoice(
        &config,
        &session.client,
        session.items(),
        &pricing,
        &meta,
        logo.as_deref(),
        renderer,
    )?;

    let path = match &options.output {
        Some(path) => path.clone(),
        None => {
            let output_dir = resolve_path(&config.pdf.output_dir, cfg_dir);
            fs::create_dir_all(&output_dir)?;
            output_dir.join(invoice_filename(&session.client.name))
        }
    };
    fs::write(&path, &pdf)?;
    info!(path = %path.display(), bytes = pdf.len(), "wrote invoice");

    Ok(GeneratedInvoice {
        path,
        number: meta.number,
        client: session.client.name.clone(),
        totals: InvoiceTotals::compute(session.items(), pricing.rate_per_kg),
        pricing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{save_session, Session, CONFIG_TEMPLATE};
    use crate::invoice::BreakdownKind;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Keeps the last layout it was asked to render.
    #[derive(Default)]
    struct RecordingRenderer {
        layout: RefCell<Option<InvoiceLayout>>,
        logo: RefCell<Option<PathBuf>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, layout: &InvoiceLayout, logo: Option<&Path>) -> Result<Vec<u8>> {
            *self.layout.borrow_mut() = Some(layout.clone());
            *self.logo.borrow_mut() = logo.map(Path::to_path_buf);
            Ok(b"%PDF-1.7 test".to_vec())
        }
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), CONFIG_TEMPLATE).unwrap();
        dir
    }

    fn session_with(items: &[CargoItem]) -> Session {
        let mut session = Session::default();
        session.client = ClientRecord {
            name: "Ana María Pérez".to_string(),
            address: "Calle 10".to_string(),
            phone: "+57 300 1234567".to_string(),
            destination_country: "Colombia".to_string(),
        };
        for item in items {
            session.add_item(item.clone());
        }
        session
    }

    fn caja(charge: bool) -> CargoItem {
        CargoItem::new("Caja", 100.0, 2.0, 10.0, charge).unwrap()
    }

    #[test]
    fn filename_replaces_unsafe_characters() {
        assert_eq!(invoice_filename("Ana María Pérez"), "Invoice_Ana_María_Pérez.pdf");
        assert_eq!(invoice_filename(" A/B:C "), "Invoice_A_B_C.pdf");
    }

    #[test]
    fn build_passes_layout_to_renderer() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let session = session_with(&[caja(true)]);
        let pricing = PricingConfig::new(20.0, "Fl").unwrap();
        let meta = InvoiceMeta {
            number: 10000,
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        };
        let renderer = RecordingRenderer::default();

        let pdf = build_invoice(
            &config,
            &session.client,
            session.items(),
            &pricing,
            &meta,
            None,
            &renderer,
        )
        .unwrap();

        assert!(pdf.starts_with(b"%PDF"));
        let layout = renderer.layout.borrow().clone().unwrap();
        assert_eq!(layout.totals.grand_total, 150.0);
        assert_eq!(
            layout.breakdown_row(BreakdownKind::DeclaredValue).unwrap().amount,
            100.0
        );
    }

    #[test]
    fn generate_writes_named_file() {
        let dir = setup();
        save_session(dir.path(), &session_with(&[caja(false)])).unwrap();
        let renderer = RecordingRenderer::default();

        let generated =
            generate_invoice(dir.path(), &GenerateOptions::default(), &renderer).unwrap();

        assert_eq!(
            generated.path,
            dir.path().join("output").join("Invoice_Ana_María_Pérez.pdf")
        );
        assert_eq!(fs::read(&generated.path).unwrap(), b"%PDF-1.7 test");
        assert_eq!(generated.totals.grand_total, 50.0);
        assert_eq!(generated.pricing.currency_label, "Fl");
        assert!((10_000..=99_999).contains(&generated.number));
    }

    #[test]
    fn generate_honours_currency_and_output() {
        let dir = setup();
        save_session(dir.path(), &session_with(&[caja(false)])).unwrap();
        let out = dir.path().join("custom.pdf");
        let options = GenerateOptions {
            currency: Some("secondary".to_string()),
            rate: Some(50_000.0),
            output: Some(out.clone()),
        };

        let generated = generate_invoice(dir.path(), &options, &RecordingRenderer::default())
            .unwrap();

        assert_eq!(generated.path, out);
        assert!(out.exists());
        assert_eq!(generated.pricing.currency_label, "COP");
        assert_eq!(generated.totals.grand_total, 100_010.0);
    }

    #[test]
    fn generate_refuses_empty_cart() {
        let dir = setup();
        let mut session = session_with(&[caja(false)]);
        session.clear();
        save_session(dir.path(), &session).unwrap();

        let err = generate_invoice(dir.path(), &GenerateOptions::default(), &RecordingRenderer::default())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::EmptyInvoice));
    }

    #[test]
    fn generate_requires_client_phone() {
        let dir = setup();
        let mut session = session_with(&[caja(false)]);
        session.client.phone.clear();
        save_session(dir.path(), &session).unwrap();

        let err = generate_invoice(dir.path(), &GenerateOptions::default(), &RecordingRenderer::default())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::MissingClientField("phone")));
    }

    #[test]
    fn generate_rejects_zero_rate() {
        let dir = setup();
        save_session(dir.path(), &session_with(&[caja(false)])).unwrap();
        let options = GenerateOptions {
            rate: Some(0.0),
            ..Default::default()
        };

        let err = generate_invoice(dir.path(), &options, &RecordingRenderer::default()).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidRate(_)));
    }

    #[test]
    fn logo_passed_only_when_present() {
        let dir = setup();
        save_session(dir.path(), &session_with(&[caja(false)])).unwrap();

        let renderer = RecordingRenderer::default();
        generate_invoice(dir.path(), &GenerateOptions::default(), &renderer).unwrap();
        assert!(renderer.logo.borrow().is_none());

        fs::write(dir.path().join("logo.png"), b"png").unwrap();
        generate_invoice(dir.path(), &GenerateOptions::default(), &renderer).unwrap();
        assert_eq!(
            renderer.logo.borrow().as_deref(),
            Some(dir.path().join("logo.png").as_path())
        );
    }
}
