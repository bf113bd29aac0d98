use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::form::{FieldError, ValidationErrors};

/// Business figures for one reporting period.
///
/// `turnover_total` and `gross_profit` are required when deserializing; every
/// other amount defaults to zero and `white_payroll_override` to absent.
/// Call [`CalculationInput::validate`] before trusting a deserialized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationInput {
    // Revenue and profit
    pub turnover_total: Decimal,
    /// Revenue minus purchases. May be negative.
    pub gross_profit: Decimal,
    #[serde(default)]
    pub turnover_aggregator: Decimal,

    // Premises
    #[serde(default)]
    pub rent: Decimal,
    /// Sublease balance. May be negative (income from subtenants).
    #[serde(default)]
    pub subrent: Decimal,
    #[serde(default)]
    pub electricity: Decimal,
    #[serde(default)]
    pub other_utilities: Decimal,

    // Staff and purchases
    #[serde(default)]
    pub payroll_total: Decimal,
    /// Declared payroll entered by hand. Used instead of the computed share
    /// of `payroll_total` when greater than zero.
    #[serde(default)]
    pub white_payroll_override: Option<Decimal>,
    #[serde(default)]
    pub office_supplies: Decimal,
    #[serde(default)]
    pub other_purchases_outside_opticom: Decimal,
    #[serde(default)]
    pub write_offs: Decimal,
    #[serde(default)]
    pub meal_compensation: Decimal,
    #[serde(default)]
    pub other_write_offs: Decimal,

    // Services and overhead
    #[serde(default)]
    pub security: Decimal,
    #[serde(default)]
    pub internet: Decimal,
    #[serde(default)]
    pub maintenance: Decimal,
    #[serde(default)]
    pub other_repairs: Decimal,
    #[serde(default)]
    pub cash_service: Decimal,
    #[serde(default)]
    pub mobile_connection: Decimal,
    #[serde(default)]
    pub bank_services: Decimal,
    #[serde(default)]
    pub uniform: Decimal,
    #[serde(default)]
    pub fiscal_device: Decimal,
    #[serde(default)]
    pub neo_service: Decimal,
    #[serde(default)]
    pub garbage_cleaning: Decimal,
    #[serde(default)]
    pub disinfection: Decimal,
    #[serde(default)]
    pub promo_materials: Decimal,
    /// Stock-take surplus or shortage. May be negative.
    #[serde(default)]
    pub inventory_result: Decimal,
}

impl CalculationInput {
    /// Every field name, in form order.
    pub const FIELD_NAMES: [&'static str; 28] = [
        "turnover_total",
        "gross_profit",
        "turnover_aggregator",
        "rent",
        "subrent",
        "electricity",
        "other_utilities",
        "payroll_total",
        "white_payroll_override",
        "office_supplies",
        "other_purchases_outside_opticom",
        "write_offs",
        "meal_compensation",
        "other_write_offs",
        "security",
        "internet",
        "maintenance",
        "other_repairs",
        "cash_service",
        "mobile_connection",
        "bank_services",
        "uniform",
        "fiscal_device",
        "neo_service",
        "garbage_cleaning",
        "disinfection",
        "promo_materials",
        "inventory_result",
    ];

    /// Largest magnitude accepted for any amount.
    ///
    /// Keeps every sum, product and ratio the calculator forms inside
    /// [`Decimal`]'s range.
    pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

    /// Amounts are whole kopecks.
    pub const MAX_AMOUNT_SCALE: u32 = 2;

    /// Fields that may legitimately be negative.
    const SIGNED_FIELDS: [&'static str; 3] = ["gross_profit", "subrent", "inventory_result"];

    /// Every plain amount, paired with its field name.
    fn amounts(&self) -> [(&'static str, Decimal); 27] {
        [
            ("turnover_total", self.turnover_total),
            ("gross_profit", self.gross_profit),
            ("turnover_aggregator", self.turnover_aggregator),
            ("rent", self.rent),
            ("subrent", self.subrent),
            ("electricity", self.electricity),
            ("other_utilities", self.other_utilities),
            ("payroll_total", self.payroll_total),
            ("office_supplies", self.office_supplies),
            (
                "other_purchases_outside_opticom",
                self.other_purchases_outside_opticom,
            ),
            ("write_offs", self.write_offs),
            ("meal_compensation", self.meal_compensation),
            ("other_write_offs", self.other_write_offs),
            ("security", self.security),
            ("internet", self.internet),
            ("maintenance", self.maintenance),
            ("other_repairs", self.other_repairs),
            ("cash_service", self.cash_service),
            ("mobile_connection", self.mobile_connection),
            ("bank_services", self.bank_services),
            ("uniform", self.uniform),
            ("fiscal_device", self.fiscal_device),
            ("neo_service", self.neo_service),
            ("garbage_cleaning", self.garbage_cleaning),
            ("disinfection", self.disinfection),
            ("promo_materials", self.promo_materials),
            ("inventory_result", self.inventory_result),
        ]
    }

    /// Checks size, precision and sign of every amount, and the
    /// aggregator/turnover relation.
    ///
    /// All violations are collected, so a form can flag every bad field at once.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each offending field when:
    /// - an amount exceeds [`Self::MAX_AMOUNT`] in magnitude
    /// - an amount has fractions of a kopeck
    /// - an amount other than `gross_profit`, `subrent` or `inventory_result` is negative
    /// - `white_payroll_override` is negative
    /// - `turnover_aggregator` exceeds `turnover_total`
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (name, value) in self.amounts() {
            if let Err(error) = check_amount(value, Self::SIGNED_FIELDS.contains(&name)) {
                errors.insert(name, error);
            }
        }

        if let Some(Err(error)) = self
            .white_payroll_override
            .map(|value| check_amount(value, false))
        {
            errors.insert("white_payroll_override", error);
        }

        if self.turnover_aggregator > self.turnover_total
            && !errors.contains("turnover_aggregator")
            && !errors.contains("turnover_total")
        {
            errors.insert(
                "turnover_aggregator",
                FieldError::ExceedsTurnover {
                    value: self.turnover_aggregator,
                    limit: self.turnover_total,
                },
            );
        }

        errors.into_result()
    }
}

/// Checks one amount against the size, precision and sign rules.
pub(crate) fn check_amount(
    value: Decimal,
    signed: bool,
) -> Result<(), FieldError> {
    if value.abs() > CalculationInput::MAX_AMOUNT {
        Err(FieldError::TooLarge {
            value,
            limit: CalculationInput::MAX_AMOUNT,
        })
    } else if value.normalize().scale() > CalculationInput::MAX_AMOUNT_SCALE {
        Err(FieldError::TooPrecise(value))
    } else if !signed && value < Decimal::ZERO {
        Err(FieldError::Negative(value))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn valid_input() -> CalculationInput {
        CalculationInput {
            turnover_total: dec!(1000000),
            gross_profit: dec!(300000),
            turnover_aggregator: dec!(200000),
            rent: dec!(100000),
            ..CalculationInput::default()
        }
    }

    #[test]
    fn validate_accepts_valid_input() {
        assert_eq!(valid_input().validate(), Ok(()));
    }

    #[test]
    fn validate_allows_negative_signed_fields() {
        let input = CalculationInput {
            gross_profit: dec!(-5000),
            subrent: dec!(-12000),
            inventory_result: dec!(-800),
            ..valid_input()
        };

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_collects_every_negative_field() {
        let input = CalculationInput {
            rent: dec!(-1),
            promo_materials: dec!(-2),
            white_payroll_override: Some(dec!(-3)),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("rent"), Some(&FieldError::Negative(dec!(-1))));
        assert_eq!(
            errors.get("promo_materials"),
            Some(&FieldError::Negative(dec!(-2)))
        );
        assert_eq!(
            errors.get("white_payroll_override"),
            Some(&FieldError::Negative(dec!(-3)))
        );
    }

    #[test]
    fn validate_rejects_aggregator_above_turnover() {
        let input = CalculationInput {
            turnover_aggregator: dec!(1000001),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();

        assert_eq!(
            errors.get("turnover_aggregator"),
            Some(&FieldError::ExceedsTurnover {
                value: dec!(1000001),
                limit: dec!(1000000),
            })
        );
    }

    #[test]
    fn validate_accepts_aggregator_equal_to_turnover() {
        let input = CalculationInput {
            turnover_aggregator: dec!(1000000),
            ..valid_input()
        };

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_amounts_at_limit() {
        let input = CalculationInput {
            turnover_total: CalculationInput::MAX_AMOUNT,
            gross_profit: -CalculationInput::MAX_AMOUNT,
            subrent: -CalculationInput::MAX_AMOUNT,
            rent: dec!(999999999999999.99),
            ..valid_input()
        };

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_amounts_beyond_limit() {
        let too_large = CalculationInput::MAX_AMOUNT + dec!(0.01);
        let input = CalculationInput {
            gross_profit: too_large,
            inventory_result: -too_large,
            white_payroll_override: Some(too_large),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("inventory_result"),
            Some(&FieldError::TooLarge {
                value: -too_large,
                limit: CalculationInput::MAX_AMOUNT,
            })
        );
        assert!(errors.contains("gross_profit"));
        assert!(errors.contains("white_payroll_override"));
    }

    #[test]
    fn validate_rejects_fractions_of_a_kopeck() {
        let input = CalculationInput {
            rent: dec!(100.005),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();

        assert_eq!(
            errors.get("rent"),
            Some(&FieldError::TooPrecise(dec!(100.005)))
        );
    }

    #[test]
    fn validate_skips_aggregator_check_for_invalid_turnover() {
        let input = CalculationInput {
            turnover_total: dec!(-1),
            turnover_aggregator: dec!(10),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("turnover_total"),
            Some(&FieldError::Negative(dec!(-1)))
        );
    }

    #[test]
    fn field_names_cover_every_serialized_field() {
        let value = serde_json::to_value(valid_input()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), CalculationInput::FIELD_NAMES.len());
        for name in CalculationInput::FIELD_NAMES {
            assert!(object.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn deserialize_defaults_optional_amounts() {
        let input: CalculationInput =
            serde_json::from_str(r#"{ "turnover_total": 500000, "gross_profit": "150000.50" }"#)
                .unwrap();

        assert_eq!(input.turnover_total, dec!(500000));
        assert_eq!(input.gross_profit, dec!(150000.50));
        assert_eq!(input.rent, Decimal::ZERO);
        assert_eq!(input.white_payroll_override, None);
    }

    #[test]
    fn deserialize_requires_turnover_total() {
        let result = serde_json::from_str::<CalculationInput>(r#"{ "gross_profit": 1 }"#);

        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<CalculationInput>(
            r#"{ "turnover_total": 1, "gross_profit": 1, "rnet": 5 }"#,
        );

        assert!(result.is_err());
    }
}
