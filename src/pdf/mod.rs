mod typst;

pub use typst::TypstRenderer;

use std::path::Path;

use crate::error::Result;
use crate::invoice::InvoiceLayout;

/// Turns a finished layout into document bytes.
pub trait Renderer {
    /// `logo` is an existing image file; a renderer that cannot draw it
    /// falls back to the company name instead of failing.
    fn render(&self, layout: &InvoiceLayout, logo: Option<&Path>) -> Result<Vec<u8>>;
}
