pub mod calculator;
pub mod format;
mod generator;
mod layout;

pub use calculator::{compute_line, InvoiceTotals, LineCost};
pub use generator::{
    build_invoice, generate_invoice, invoice_filename, resolve_logo, GenerateOptions,
    GeneratedInvoice,
};
pub use layout::{
    BreakdownKind, BreakdownRow, InvoiceLayout, InvoiceMeta, ItemRow, PageGeometry, FOOTER_HEIGHT,
    HEADER_HEIGHT, PAGE_WIDTH, ROW_HEIGHT,
};
