//! Tax burden calculation for a business on the AUSN scheme.
//!
//! The calculator turns one period's business figures into derived costs,
//! profit figures, the three tax components and the resulting burden ratios.
//!
//! # Calculation Steps
//!
//! | Step | Value | Formula |
//! |------|-------|---------|
//! | 1    | Royalty | turnover_total × 4% |
//! | 2    | White payroll | override if > 0, else payroll_total × 33% |
//! | 3    | Aggregator commission | turnover_aggregator × 35% |
//! | 4    | Fixed insurance | 2900 (or its monthly share) |
//! | 5    | Acquiring | (turnover_total − turnover_aggregator) × 1% × 95% |
//! | 6    | Expenses | every cost line + steps 1, 3, 4, 5 (gross payroll) |
//! | 7    | Profit before tax | gross_profit − expenses |
//! | 8    | Margin | gross_profit / turnover_total |
//! | 9    | Profitability | profit_before_tax / turnover_total |
//! | 10   | Taxable profit | gross_profit − cost lines − derived costs (white payroll) |
//! | 11   | AUSN tax | max(taxable_profit × 20%, turnover_total × 3%) |
//! | 12   | NDFL tax | white_payroll × 13% |
//! | 13   | Total tax | AUSN + NDFL + fixed insurance |
//! | 14   | Burden vs turnover | total_tax / turnover_total |
//! | 15   | Burden vs profit | total_tax / profit_before_tax |
//!
//! Ratios whose denominator is zero or negative are `None`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use burden_core::{CalculationInput, TaxCalculator};
//!
//! let input = CalculationInput {
//!     turnover_total: dec!(1000000),
//!     gross_profit: dec!(300000),
//!     turnover_aggregator: dec!(200000),
//!     payroll_total: dec!(200000),
//!     ..CalculationInput::default()
//! };
//!
//! let result = TaxCalculator::default().compute(&input);
//!
//! assert_eq!(result.derived.royalty, dec!(40000));
//! assert_eq!(result.derived.white_payroll, dec!(66000));
//! assert_eq!(result.ausn_tax, dec!(30000));
//! assert_eq!(result.margin, Some(dec!(0.3)));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{max, ratio};
use crate::{BurdenRates, CalculationInput, CalculationResult, DerivedCosts, RatesError};

/// Calculator for the tax burden report.
///
/// Holds a validated [`BurdenRates`]; computing a report cannot fail.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::{BurdenRates, FixedInsuranceBasis, TaxCalculator};
///
/// let rates = BurdenRates {
///     fixed_insurance_basis: FixedInsuranceBasis::Monthly,
///     ..BurdenRates::default()
/// };
///
/// let calculator = TaxCalculator::new(rates).unwrap();
///
/// assert_eq!(calculator.rates().fixed_insurance(), dec!(241.67));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    rates: BurdenRates,
}

impl TaxCalculator {
    /// Creates a calculator after validating the rates.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError`] if any rate is out of range.
    pub fn new(rates: BurdenRates) -> Result<Self, RatesError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &BurdenRates {
        &self.rates
    }

    /// Computes the complete burden report for one set of inputs.
    ///
    /// The input is expected to have passed [`CalculationInput::validate`];
    /// the arithmetic itself accepts any values.
    ///
    /// # Example: Zero Turnover
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use burden_core::{CalculationInput, TaxCalculator};
    ///
    /// let input = CalculationInput {
    ///     gross_profit: dec!(10000),
    ///     ..CalculationInput::default()
    /// };
    ///
    /// let result = TaxCalculator::default().compute(&input);
    ///
    /// assert_eq!(result.margin, None);
    /// assert_eq!(result.profitability, None);
    /// assert_eq!(result.tax_burden_vs_turnover, None);
    /// // 10000 - 2900 = 7100 taxable, 20% of it
    /// assert_eq!(result.ausn_tax, dec!(1420));
    /// ```
    pub fn compute(
        &self,
        input: &CalculationInput,
    ) -> CalculationResult {
        // Steps 1-5
        let derived = self.derive_costs(input);

        // Step 6
        let expenses = self.expenses(input, &derived);

        // Step 7
        let profit_before_tax = input.gross_profit - expenses;

        // Steps 8-9
        let margin = self.turnover_ratio("margin", input.gross_profit, input.turnover_total);
        let profitability =
            self.turnover_ratio("profitability", profit_before_tax, input.turnover_total);

        // Step 10
        let taxable_profit = self.taxable_profit(input, &derived);

        // Steps 11-13
        let ausn_tax = self.ausn_tax(taxable_profit, input.turnover_total);
        let ndfl_tax = self.ndfl_tax(derived.white_payroll);
        let total_tax = ausn_tax + ndfl_tax + derived.fixed_insurance;

        // Steps 14-15
        let tax_burden_vs_turnover =
            self.turnover_ratio("tax_burden_vs_turnover", total_tax, input.turnover_total);
        let tax_burden_vs_profit = self.burden_vs_profit(total_tax, profit_before_tax);

        debug!(
            expenses = %expenses,
            profit_before_tax = %profit_before_tax,
            taxable_profit = %taxable_profit,
            total_tax = %total_tax,
            "Computed tax burden"
        );

        CalculationResult {
            derived,
            expenses,
            profit_before_tax,
            margin,
            profitability,
            taxable_profit,
            ausn_tax,
            ndfl_tax,
            total_tax,
            tax_burden_vs_turnover,
            tax_burden_vs_profit,
        }
    }

    /// Calculates the five rate-based costs (steps 1-5).
    fn derive_costs(
        &self,
        input: &CalculationInput,
    ) -> DerivedCosts {
        DerivedCosts {
            royalty: input.turnover_total * self.rates.royalty_rate,
            white_payroll: self.white_payroll(input.payroll_total, input.white_payroll_override),
            aggregator_commission: input.turnover_aggregator
                * self.rates.aggregator_commission_rate,
            fixed_insurance: self.rates.fixed_insurance(),
            acquiring: self.acquiring(input.turnover_total, input.turnover_aggregator),
        }
    }

    /// Determines declared payroll (step 2).
    ///
    /// A positive override wins regardless of `payroll_total`; a zero or
    /// negative override is ignored.
    fn white_payroll(
        &self,
        payroll_total: Decimal,
        override_amount: Option<Decimal>,
    ) -> Decimal {
        match override_amount {
            Some(amount) if amount > Decimal::ZERO => {
                debug!(
                    override_amount = %amount,
                    payroll_total = %payroll_total,
                    "Using white payroll override"
                );
                amount
            }
            Some(amount) => {
                warn!(
                    override_amount = %amount,
                    "White payroll override is not positive; using payroll share"
                );
                payroll_total * self.rates.white_payroll_share
            }
            None => payroll_total * self.rates.white_payroll_share,
        }
    }

    /// Calculates card-processing fees on non-aggregator turnover (step 5).
    fn acquiring(
        &self,
        turnover_total: Decimal,
        turnover_aggregator: Decimal,
    ) -> Decimal {
        let card_turnover = turnover_total - turnover_aggregator;
        if card_turnover < Decimal::ZERO {
            warn!(
                turnover_total = %turnover_total,
                turnover_aggregator = %turnover_aggregator,
                "Aggregator turnover exceeds total turnover; acquiring is negative"
            );
        }

        card_turnover * self.rates.acquiring_rate * self.rates.acquiring_share
    }

    /// Sums every cost line and the derived costs, using gross payroll (step 6).
    fn expenses(
        &self,
        input: &CalculationInput,
        derived: &DerivedCosts,
    ) -> Decimal {
        input.rent
            + input.subrent
            + input.electricity
            + input.other_utilities
            + input.payroll_total
            + derived.royalty
            + derived.aggregator_commission
            + derived.fixed_insurance
            + derived.acquiring
            + input.office_supplies
            + input.other_purchases_outside_opticom
            + input.write_offs
            + input.meal_compensation
            + input.other_write_offs
            + overhead(input)
    }

    /// Calculates the AUSN tax base (step 10).
    ///
    /// Unlike [`Self::expenses`], payroll enters as white payroll.
    fn taxable_profit(
        &self,
        input: &CalculationInput,
        derived: &DerivedCosts,
    ) -> Decimal {
        let premises = input.rent
            + input.subrent
            + input.electricity
            + input.other_utilities
            + derived.royalty;

        let staff_and_purchases = derived.white_payroll
            + derived.aggregator_commission
            + derived.fixed_insurance
            + derived.acquiring
            + input.office_supplies
            + input.other_purchases_outside_opticom
            + input.write_offs
            + input.meal_compensation
            + input.other_write_offs;

        input.gross_profit - premises - staff_and_purchases - overhead(input)
    }

    /// Calculates AUSN tax as the larger of the profit-based amount and the
    /// turnover floor (step 11).
    fn ausn_tax(
        &self,
        taxable_profit: Decimal,
        turnover_total: Decimal,
    ) -> Decimal {
        let profit_based = taxable_profit * self.rates.ausn_profit_rate;
        let turnover_floor = turnover_total * self.rates.ausn_turnover_floor_rate;

        if profit_based < turnover_floor {
            debug!(
                profit_based = %profit_based,
                turnover_floor = %turnover_floor,
                "AUSN tax set by turnover floor"
            );
        }

        max(profit_based, turnover_floor)
    }

    /// Calculates NDFL withheld on declared payroll (step 12).
    fn ndfl_tax(
        &self,
        white_payroll: Decimal,
    ) -> Decimal {
        white_payroll * self.rates.ndfl_rate
    }

    /// Divides by total turnover, or `None` when there is no turnover.
    fn turnover_ratio(
        &self,
        name: &'static str,
        numerator: Decimal,
        turnover_total: Decimal,
    ) -> Option<Decimal> {
        let value = ratio(numerator, turnover_total);
        if value.is_none() {
            warn!(
                ratio = name,
                turnover_total = %turnover_total,
                "Turnover is zero or negative; ratio not applicable"
            );
        }
        value
    }

    /// Divides total tax by profit, or `None` for a loss or break-even (step 15).
    fn burden_vs_profit(
        &self,
        total_tax: Decimal,
        profit_before_tax: Decimal,
    ) -> Option<Decimal> {
        let value = ratio(total_tax, profit_before_tax);
        if value.is_none() {
            warn!(
                profit_before_tax = %profit_before_tax,
                "Profit before tax is zero or negative; burden vs profit not applicable"
            );
        }
        value
    }
}

/// Services and overhead lines, shared by expenses and the tax base.
fn overhead(input: &CalculationInput) -> Decimal {
    input.security
        + input.internet
        + input.maintenance
        + input.other_repairs
        + input.cash_service
        + input.mobile_connection
        + input.bank_services
        + input.uniform
        + input.fiscal_device
        + input.neo_service
        + input.garbage_cleaning
        + input.disinfection
        + input.promo_materials
        + input.inventory_result
}

/// Computes a burden report with the default rates.
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::{CalculationInput, compute};
///
/// let input = CalculationInput {
///     turnover_total: dec!(500000),
///     gross_profit: dec!(200000),
///     white_payroll_override: Some(dec!(40000)),
///     payroll_total: dec!(90000),
///     ..CalculationInput::default()
/// };
///
/// assert_eq!(compute(&input).derived.white_payroll, dec!(40000));
/// ```
pub fn compute(input: &CalculationInput) -> CalculationResult {
    TaxCalculator::default().compute(input)
}
