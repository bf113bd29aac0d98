use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::form::FieldError;
use crate::models::calculation_input::check_amount;

/// Errors raised when a [`BurdenRates`] configuration is out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatesError {
    /// A proportional rate is outside [0, 1].
    #[error("{name} must be between 0 and 1, got {value}")]
    RateOutOfRange { name: &'static str, value: Decimal },

    /// A rate is given to more than [`BurdenRates::MAX_RATE_SCALE`] decimals.
    #[error("{name} must have at most 4 decimal places, got {value}")]
    RateTooPrecise { name: &'static str, value: Decimal },

    /// The fixed insurance contribution must be a valid input amount.
    #[error("annual fixed insurance: {0}")]
    FixedInsurance(FieldError),
}

/// How the annual fixed insurance contribution is charged against one report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedInsuranceBasis {
    /// The whole annual amount is charged.
    #[default]
    Annual,
    /// One twelfth of the annual amount is charged (monthly reports).
    Monthly,
}

/// Rates and constants applied by the burden calculator.
///
/// Every field has a default, so a TOML rates file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurdenRates {
    /// Share of total turnover paid as royalty.
    pub royalty_rate: Decimal,

    /// Share of gross payroll treated as declared ("white") payroll.
    pub white_payroll_share: Decimal,

    /// Commission taken by delivery aggregators on their turnover.
    pub aggregator_commission_rate: Decimal,

    /// Fixed insurance contribution for a full year.
    pub annual_fixed_insurance: Decimal,

    pub fixed_insurance_basis: FixedInsuranceBasis,

    /// Card-processing fee on non-aggregator turnover.
    pub acquiring_rate: Decimal,

    /// Share of non-aggregator turnover paid by card.
    pub acquiring_share: Decimal,

    /// AUSN rate on taxable profit.
    pub ausn_profit_rate: Decimal,

    /// AUSN minimum, as a share of total turnover.
    pub ausn_turnover_floor_rate: Decimal,

    /// NDFL rate on white payroll.
    pub ndfl_rate: Decimal,
}

impl Default for BurdenRates {
    fn default() -> Self {
        Self {
            royalty_rate: dec!(0.04),
            white_payroll_share: dec!(0.33),
            aggregator_commission_rate: dec!(0.35),
            annual_fixed_insurance: dec!(2900),
            fixed_insurance_basis: FixedInsuranceBasis::Annual,
            acquiring_rate: dec!(0.01),
            acquiring_share: dec!(0.95),
            ausn_profit_rate: dec!(0.20),
            ausn_turnover_floor_rate: dec!(0.03),
            ndfl_rate: dec!(0.13),
        }
    }
}

impl BurdenRates {
    /// Rates are given in basis points at most.
    pub const MAX_RATE_SCALE: u32 = 4;

    /// Fixed insurance charged against one report, per [`FixedInsuranceBasis`].
    ///
    /// The monthly share is rounded to whole kopecks.
    pub fn fixed_insurance(&self) -> Decimal {
        match self.fixed_insurance_basis {
            FixedInsuranceBasis::Annual => self.annual_fixed_insurance,
            FixedInsuranceBasis::Monthly => {
                round_half_up(self.annual_fixed_insurance / dec!(12))
            }
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first problem found:
    /// - [`RatesError::RateOutOfRange`] for a rate outside [0, 1]
    /// - [`RatesError::RateTooPrecise`] for a rate finer than a basis point
    /// - [`RatesError::FixedInsurance`] for a contribution that is negative,
    ///   too large or not in whole kopecks
    pub fn validate(&self) -> Result<(), RatesError> {
        let rates = [
            ("royalty_rate", self.royalty_rate),
            ("white_payroll_share", self.white_payroll_share),
            ("aggregator_commission_rate", self.aggregator_commission_rate),
            ("acquiring_rate", self.acquiring_rate),
            ("acquiring_share", self.acquiring_share),
            ("ausn_profit_rate", self.ausn_profit_rate),
            ("ausn_turnover_floor_rate", self.ausn_turnover_floor_rate),
            ("ndfl_rate", self.ndfl_rate),
        ];

        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RatesError::RateOutOfRange { name, value });
            }
            if value.normalize().scale() > Self::MAX_RATE_SCALE {
                return Err(RatesError::RateTooPrecise { name, value });
            }
        }

        check_amount(self.annual_fixed_insurance, false).map_err(RatesError::FixedInsurance)
    }
}
