//! Constrained farm area generation.
//!
//! Areas are drawn as whole cents and fractions as whole basis points, so every
//! step is exact decimal arithmetic and `arable + vegetation <= total` holds
//! by construction.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::values::ValueProvider;

/// Total area bounds in hundredths of a hectare: 10.00 ..= 5000.00
pub const TOTAL_AREA_CENTS: (i64, i64) = (1_000, 500_000);
/// Share of the total that is arable, in basis points: 0.30 ..= 0.85
pub const ARABLE_FRACTION_BP: (i64, i64) = (3_000, 8_500);
/// Share of the remainder under native vegetation: 0.15 ..= 0.95
pub const VEGETATION_FRACTION_BP: (i64, i64) = (1_500, 9_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaBreakdown {
    pub total: Decimal,
    pub arable: Decimal,
    pub vegetation: Decimal,
}

impl AreaBreakdown {
    /// Build the breakdown from raw draws (cents and basis points).
    pub fn from_draws(total_cents: i64, arable_bp: i64, vegetation_bp: i64) -> Self {
        let total = Decimal::new(total_cents, 2);
        let arable = round_area(total * Decimal::new(arable_bp, 4));
        let remaining = total - arable;
        let vegetation = round_area(remaining * Decimal::new(vegetation_bp, 4));
        Self {
            total,
            arable,
            vegetation,
        }
    }

    pub fn unused(&self) -> Decimal {
        self.total - self.arable - self.vegetation
    }

    pub fn is_consistent(&self) -> bool {
        self.arable + self.vegetation <= self.total
    }
}

fn round_area(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn generate_areas(values: &mut dyn ValueProvider) -> AreaBreakdown {
    let total_cents = values.between(TOTAL_AREA_CENTS.0, TOTAL_AREA_CENTS.1);
    let arable_bp = values.between(ARABLE_FRACTION_BP.0, ARABLE_FRACTION_BP.1);
    let vegetation_bp = values.between(VEGETATION_FRACTION_BP.0, VEGETATION_FRACTION_BP.1);
    AreaBreakdown::from_draws(total_cents, arable_bp, vegetation_bp)
}
