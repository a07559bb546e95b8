//! Invoice layout: everything the renderer draws, already computed and
//! formatted. The page is a single sheet whose height follows the row count.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::calculator::InvoiceTotals;
use super::format::{format_money, format_quantity, format_whole};
use crate::config::pricing::validate_rate;
use crate::config::{CargoItem, ClientRecord, Config, PricingConfig, Theme};
use crate::error::{InvoiceError, Result};

/// A4 width in points.
pub const PAGE_WIDTH: f64 = 595.28;
/// Top colour band, branding, client panels and the table's column headings.
pub const HEADER_HEIGHT: f64 = 250.0;
pub const ROW_HEIGHT: f64 = 25.0;
pub const FOOTER_HEIGHT: f64 = 120.0;

/// Breakdown rows that are always present: weight charge, tax, grand total.
const BASE_BREAKDOWN_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub footer_height: f64,
}

impl PageGeometry {
    /// Size a page to hold `item_rows` item rows and `extra_rows` breakdown rows.
    pub fn for_rows(item_rows: usize, extra_rows: usize) -> Self {
        let height =
            HEADER_HEIGHT + (item_rows + extra_rows) as f64 * ROW_HEIGHT + FOOTER_HEIGHT;
        Self {
            width: PAGE_WIDTH,
            height,
            header_height: HEADER_HEIGHT,
            row_height: ROW_HEIGHT,
            footer_height: FOOTER_HEIGHT,
        }
    }
}

/// Invoice number and issue date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceMeta {
    pub number: u32,
    pub date: NaiveDate,
}

impl InvoiceMeta {
    /// A random five-digit number and today's date. The number is cosmetic:
    /// nothing records it, so it is not unique across invoices.
    pub fn generate() -> Self {
        Self {
            number: rand::random_range(10_000..=99_999),
            date: Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub company: String,
    pub route: Option<String>,
    /// "Region: phone" lines
    pub contacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPanel {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPanel {
    pub title: String,
    pub number: String,
    pub date: String,
    pub rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub description: String,
    pub value: String,
    pub weight: String,
    pub tax: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    WeightCharge,
    Tax,
    DeclaredValue,
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub kind: BreakdownKind,
    pub label: String,
    pub amount: f64,
    pub value: String,
    /// Drawn in the larger font
    pub emphasis: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterBlock {
    pub message: String,
    pub socials: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLayout {
    pub page: PageGeometry,
    pub theme: Theme,
    pub header: HeaderBlock,
    pub client: ClientPanel,
    pub details: DetailsPanel,
    pub columns: [String; 4],
    pub rows: Vec<ItemRow>,
    pub breakdown: Vec<BreakdownRow>,
    pub footer: FooterBlock,
    /// Unrounded figures behind the breakdown; the template only reads the formatted rows.
    #[serde(skip)]
    pub totals: InvoiceTotals,
}

impl InvoiceLayout {
    /// Lay out an invoice. Refuses an empty item list or a non-positive rate.
    pub fn new(
        config: &Config,
        client: &ClientRecord,
        items: &[CargoItem],
        pricing: &PricingConfig,
        meta: &InvoiceMeta,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(InvoiceError::EmptyInvoice);
        }
        validate_rate(pricing.rate_per_kg)?;

        let rate = pricing.rate_per_kg;
        let currency = pricing.currency_label.as_str();
        let totals = InvoiceTotals::compute(items, rate);
        let breakdown = breakdown_rows(&totals, rate, currency);
        let page = PageGeometry::for_rows(items.len(), breakdown.len());

        debug!(
            items = items.len(),
            grand_total = totals.grand_total,
            page_height = page.height,
            "laid out invoice"
        );

        Ok(Self {
            page,
            theme: config.theme.clone(),
            header: HeaderBlock {
                company: config.company.name.clone(),
                route: config.company.route.clone(),
                contacts: config
                    .company
                    .contacts
                    .iter()
                    .map(|c| format!("{}: {}", c.region, c.phone))
                    .collect(),
            },
            client: client_panel(client),
            details: DetailsPanel {
                title: "DETAILS:".to_string(),
                number: format!("Invoice No.: {}", meta.number),
                date: format!("Date: {}", meta.date.format("%Y-%m-%d")),
                rate: format!("Base rate: {} {} / Kg", format_quantity(rate), currency),
            },
            columns: [
                "DESCRIPTION".to_string(),
                format!("VALUE ({currency})"),
                "WEIGHT (Kg)".to_string(),
                format!("TAX ({currency})"),
            ],
            rows: items
                .iter()
                .map(|item| ItemRow {
                    description: item.description.clone(),
                    value: format_whole(item.declared_value),
                    weight: format!("{} Kg", format_quantity(item.weight_kg)),
                    tax: format_whole(item.tax),
                })
                .collect(),
            breakdown,
            footer: FooterBlock {
                message: config.footer.message.clone(),
                socials: config.footer.socials.clone(),
            },
            totals,
        })
    }

    /// Number of breakdown rows drawn under the items (3 or 4).
    pub fn extra_rows(&self) -> usize {
        self.breakdown.len()
    }

    pub fn breakdown_row(&self, kind: BreakdownKind) -> Option<&BreakdownRow> {
        self.breakdown.iter().find(|row| row.kind == kind)
    }
}

fn client_panel(client: &ClientRecord) -> ClientPanel {
    let mut lines = vec![
        format!("Client: {}", client.name),
        format!("Address: {}", client.address),
        format!("Phone: {}", client.phone),
    ];
    if !client.destination_country.trim().is_empty() {
        lines.push(format!("Destination: {}", client.destination_country));
    }
    ClientPanel {
        title: "BILLED TO:".to_string(),
        lines,
    }
}

fn breakdown_rows(totals: &InvoiceTotals, rate: f64, currency: &str) -> Vec<BreakdownRow> {
    let row = |kind: BreakdownKind, label: String, amount: f64| BreakdownRow {
        kind,
        label,
        amount,
        value: format_money(amount, currency),
        emphasis: kind == BreakdownKind::GrandTotal,
    };

    let mut rows = Vec::with_capacity(BASE_BREAKDOWN_ROWS + 1);
    rows.push(row(
        BreakdownKind::WeightCharge,
        format!(
            "Total weight ({} Kg x {})",
            format_quantity(totals.total_weight),
            format_quantity(rate)
        ),
        totals.total_shipping_by_weight,
    ));
    rows.push(row(BreakdownKind::Tax, "Total tax".to_string(), totals.total_tax));
    if totals.has_declared_value_charge() {
        rows.push(row(
            BreakdownKind::DeclaredValue,
            "Declared value charged".to_string(),
            totals.total_declared_value_charged,
        ));
    }
    rows.push(row(
        BreakdownKind::GrandTotal,
        "TOTAL DUE".to_string(),
        totals.grand_total,
    ));
    rows
}
