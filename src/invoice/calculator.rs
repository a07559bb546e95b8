//! Shipping cost arithmetic.
//!
//! All values are kept at full precision; rounding belongs to display
//! formatting only.

use serde::Serialize;

use crate::config::CargoItem;

/// Cost of one cargo line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineCost {
    /// `weight_kg * rate + tax`
    pub shipping_cost: f64,
    /// Shipping cost plus the declared value when it is charged
    pub line_total: f64,
}

/// Compute the cost of a single line.
///
/// Expects `weight_kg`, `tax` and `declared_value` to be non-negative and
/// `rate` to be positive. No validation is done here.
pub fn compute_line(item: &CargoItem, rate: f64) -> LineCost {
    let shipping_cost = item.weight_kg * rate + item.tax;
    let line_total = if item.charge_declared_value {
        shipping_cost + item.declared_value
    } else {
        shipping_cost
    };

    LineCost {
        shipping_cost,
        line_total,
    }
}

/// Aggregate figures for a whole invoice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub total_weight: f64,
    pub total_tax: f64,
    pub total_declared_value_charged: f64,
    /// `total_weight * rate`
    pub total_shipping_by_weight: f64,
    /// Sum of every line total
    pub grand_total: f64,
}

impl InvoiceTotals {
    pub fn compute(items: &[CargoItem], rate: f64) -> Self {
        let total_weight: f64 = items.iter().map(|i| i.weight_kg).sum();
        let total_tax: f64 = items.iter().map(|i| i.tax).sum();
        let total_declared_value_charged: f64 = items
            .iter()
            .filter(|i| i.charge_declared_value)
            .map(|i| i.declared_value)
            .sum();
        let grand_total: f64 = items.iter().map(|i| compute_line(i, rate).line_total).sum();

        Self {
            total_weight,
            total_tax,
            total_declared_value_charged,
            total_shipping_by_weight: total_weight * rate,
            grand_total,
        }
    }

    /// The grand total rebuilt from the breakdown rows.
    ///
    /// Summing `w*r + t (+ v)` per line equals `(Σw)*r + Σt + Σv`, so this
    /// matches `grand_total` up to floating-point association.
    pub fn breakdown_total(&self) -> f64 {
        self.total_shipping_by_weight + self.total_tax + self.total_declared_value_charged
    }

    pub fn has_declared_value_charge(&self) -> bool {
        self.total_declared_value_charged > 0.0
    }
}
