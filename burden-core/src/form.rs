//! Parsing and validation of raw form fields.
//!
//! A web form or CSV row arrives as text keyed by field name. [`parse_form`]
//! converts that text into a validated [`CalculationInput`], reporting every
//! bad field at once so the caller can show all messages together.
//!
//! # Number Format
//!
//! Amounts are written the way they are typed in a Russian-locale form:
//! spaces (including non-breaking ones) group thousands and a comma may be
//! used as the decimal separator.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use burden_core::form::parse_form;
//!
//! let fields = BTreeMap::from([
//!     ("turnover_total".to_string(), "1 000 000".to_string()),
//!     ("gross_profit".to_string(), "300 000,50".to_string()),
//!     ("white_payroll_override".to_string(), "".to_string()),
//! ]);
//!
//! let input = parse_form(&fields).unwrap();
//!
//! assert_eq!(input.turnover_total, dec!(1000000));
//! assert_eq!(input.gross_profit, dec!(300000.50));
//! assert_eq!(input.rent, dec!(0));
//! assert_eq!(input.white_payroll_override, None);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::CalculationInput;

/// Fields a form must fill in.
const REQUIRED_FIELDS: [&str; 2] = ["turnover_total", "gross_profit"];

/// Problem with a single form field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field is required")]
    Required,

    #[error("must be a number, got '{0}'")]
    NotANumber(String),

    #[error("must not be negative, got {0}")]
    Negative(Decimal),

    #[error("must not exceed {limit} in magnitude, got {value}")]
    TooLarge { value: Decimal, limit: Decimal },

    #[error("must be whole kopecks (at most 2 decimal places), got {0}")]
    TooPrecise(Decimal),

    /// Aggregator turnover is part of total turnover, so it cannot be larger.
    #[error("must not exceed total turnover ({limit}), got {value}")]
    ExceedsTurnover { value: Decimal, limit: Decimal },
}

/// Every field-level problem found in one form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid input: {}", self.summary())]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    /// Records an error for `field`, keeping the first one reported.
    pub fn insert(
        &mut self,
        field: &'static str,
        error: FieldError,
    ) {
        self.fields.entry(field).or_insert(error);
    }

    pub fn get(
        &self,
        field: &str,
    ) -> Option<&FieldError> {
        self.fields.get(field)
    }

    pub fn contains(
        &self,
        field: &str,
    ) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(field, error)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.fields.iter().map(|(field, error)| (*field, error))
    }

    /// One `field message` entry per error, separated by `; `.
    fn summary(&self) -> String {
        self.iter()
            .map(|(field, error)| format!("{field} {error}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}


/// Strips digit grouping and normalizes the decimal separator.
fn normalize_amount_input(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parses one amount as typed into the form.
///
/// Returns `Ok(None)` for blank input.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::form::parse_amount;
///
/// assert_eq!(parse_amount("1 234,5"), Ok(Some(dec!(1234.5))));
/// assert_eq!(parse_amount("-800"), Ok(Some(dec!(-800))));
/// assert_eq!(parse_amount("   "), Ok(None));
/// assert!(parse_amount("12a").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Option<Decimal>, FieldError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&normalized).map(Some).map_err(|e| {
        debug!(input = %s, "invalid amount: {}", e);
        FieldError::NotANumber(s.trim().to_string())
    })
}

/// Converts raw form fields into a validated [`CalculationInput`].
///
/// - `turnover_total` and `gross_profit` are required
/// - any other amount that is blank or missing counts as zero
/// - a blank or missing `white_payroll_override` means no override
/// - unknown field names are ignored
///
/// # Errors
///
/// Returns [`ValidationErrors`] holding every parse failure and every
/// violation found by [`CalculationInput::validate`]. Fields that failed to
/// parse are not also checked for sign.
pub fn parse_form(fields: &BTreeMap<String, String>) -> Result<CalculationInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let white_payroll_override = match fields
        .get("white_payroll_override")
        .map(|raw| parse_amount(raw))
        .transpose()
    {
        Ok(value) => value.flatten(),
        Err(error) => {
            errors.insert("white_payroll_override", error);
            None
        }
    };

    let mut amount = |name: &'static str| -> Decimal {
        let parsed = fields.get(name).map(|raw| parse_amount(raw)).transpose();
        match parsed {
            Ok(Some(Some(value))) => value,
            Ok(_) if REQUIRED_FIELDS.contains(&name) => {
                errors.insert(name, FieldError::Required);
                Decimal::ZERO
            }
            Ok(_) => Decimal::ZERO,
            Err(error) => {
                errors.insert(name, error);
                Decimal::ZERO
            }
        }
    };

    let input = CalculationInput {
        turnover_total: amount("turnover_total"),
        gross_profit: amount("gross_profit"),
        turnover_aggregator: amount("turnover_aggregator"),
        rent: amount("rent"),
        subrent: amount("subrent"),
        electricity: amount("electricity"),
        other_utilities: amount("other_utilities"),
        payroll_total: amount("payroll_total"),
        white_payroll_override,
        office_supplies: amount("office_supplies"),
        other_purchases_outside_opticom: amount("other_purchases_outside_opticom"),
        write_offs: amount("write_offs"),
        meal_compensation: amount("meal_compensation"),
        other_write_offs: amount("other_write_offs"),
        security: amount("security"),
        internet: amount("internet"),
        maintenance: amount("maintenance"),
        other_repairs: amount("other_repairs"),
        cash_service: amount("cash_service"),
        mobile_connection: amount("mobile_connection"),
        bank_services: amount("bank_services"),
        uniform: amount("uniform"),
        fiscal_device: amount("fiscal_device"),
        neo_service: amount("neo_service"),
        garbage_cleaning: amount("garbage_cleaning"),
        disinfection: amount("disinfection"),
        promo_materials: amount("promo_materials"),
        inventory_result: amount("inventory_result"),
    };

    if let Err(violations) = input.validate() {
        // An unparsable turnover was zeroed, so the aggregator check is meaningless.
        let turnover_unknown = errors.contains("turnover_total");
        for (field, error) in violations.fields {
            if turnover_unknown && matches!(error, FieldError::ExceedsTurnover { .. }) {
                continue;
            }
            errors.insert(field, error);
        }
    }

    errors.into_result().map(|()| input)
}
