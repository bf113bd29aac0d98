use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Costs derived from the inputs by fixed rates rather than entered by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedCosts {
    /// Royalty on total turnover.
    pub royalty: Decimal,

    /// Declared payroll: the override when positive, otherwise a share of
    /// gross payroll.
    pub white_payroll: Decimal,

    /// Aggregator commission on aggregator turnover.
    pub aggregator_commission: Decimal,

    /// Fixed insurance contribution charged against this report.
    pub fixed_insurance: Decimal,

    /// Card-processing fee on non-aggregator turnover.
    pub acquiring: Decimal,
}

/// Outcome of one burden calculation.
///
/// Ratios are `None` when their denominator is zero or negative, meaning
/// "not applicable". Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub derived: DerivedCosts,

    /// Every cost line plus the derived costs, with gross payroll.
    pub expenses: Decimal,

    /// Gross profit minus expenses.
    pub profit_before_tax: Decimal,

    /// Gross profit over total turnover.
    pub margin: Option<Decimal>,

    /// Profit before tax over total turnover.
    pub profitability: Option<Decimal>,

    /// AUSN tax base: gross profit minus costs, with white payroll.
    pub taxable_profit: Decimal,

    /// AUSN tax: the larger of the profit rate and the turnover floor.
    pub ausn_tax: Decimal,

    /// NDFL withheld on white payroll.
    pub ndfl_tax: Decimal,

    /// AUSN + NDFL + fixed insurance.
    pub total_tax: Decimal,

    pub tax_burden_vs_turnover: Option<Decimal>,

    /// Not computed for a loss or break-even.
    pub tax_burden_vs_profit: Option<Decimal>,
}
