use serde::{Deserialize, Serialize};

use crate::error::{InvoiceError, Result};

/// One line of cargo on the invoice.
///
/// Amounts are in the invoice currency and are expected to be non-negative;
/// [`CargoItem::new`] enforces this for user input.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CargoItem {
    pub description: String,
    pub declared_value: f64,
    pub weight_kg: f64,
    pub tax: f64,
    /// Whether the declared value is passed through to the customer
    #[serde(default)]
    pub charge_declared_value: bool,
}

impl CargoItem {
    pub fn new(
        description: &str,
        declared_value: f64,
        weight_kg: f64,
        tax: f64,
        charge_declared_value: bool,
    ) -> Result<Self> {
        let item = Self {
            description: description.trim().to_string(),
            declared_value,
            weight_kg,
            tax,
            charge_declared_value,
        };
        item.validate()?;
        Ok(item)
    }

    /// Check an item that did not come through [`CargoItem::new`], e.g. one
    /// read back from a hand-edited session file.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(InvoiceError::EmptyDescription);
        }
        check_amount("declared value", self.declared_value)?;
        check_amount("weight", self.weight_kg)?;
        check_amount("tax", self.tax)
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(InvoiceError::InvalidItem {
            field,
            value: value.to_string(),
            reason: "must be a number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(InvoiceError::InvalidItem {
            field,
            value: value.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_description() {
        let item = CargoItem::new("  Caja ", 100.0, 2.0, 10.0, false).unwrap();
        assert_eq!(item.description, "Caja");
    }

    #[test]
    fn rejects_blank_description() {
        assert!(matches!(
            CargoItem::new("   ", 1.0, 1.0, 0.0, false),
            Err(InvoiceError::EmptyDescription)
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = CargoItem::new("Caja", 1.0, -2.0, 0.0, false).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidItem { field: "weight", .. }));

        let err = CargoItem::new("Caja", 1.0, 2.0, f64::INFINITY, false).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidItem { field: "tax", .. }));
    }

    #[test]
    fn validate_catches_items_built_by_hand() {
        let mut item = CargoItem::new("Caja", 1.0, 2.0, 0.0, false).unwrap();
        assert!(item.validate().is_ok());

        item.declared_value = f64::NAN;
        let err = item.validate().unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidItem { field: "declared value", .. }));
    }

    #[test]
    fn zero_amounts_are_allowed() {
        assert!(CargoItem::new("Sobre", 0.0, 0.0, 0.0, true).is_ok());
    }
}
