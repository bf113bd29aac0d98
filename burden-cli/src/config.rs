//! TOML configuration and input files.
//!
//! A rates file overrides any subset of [`BurdenRates`]:
//!
//! ```toml
//! fixed_insurance_basis = "monthly"
//! ndfl_rate = 0.13
//! ```
//!
//! An input file holds one [`CalculationInput`], keyed by field name.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use burden_core::{BurdenRates, CalculationInput};
use tracing::info;

/// Loads rates from `path`, or the defaults when no path is given.
///
/// The result is validated before it is returned.
pub fn load_rates(path: Option<&Path>) -> Result<BurdenRates> {
    let rates = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read rates file: {}", path.display()))?;
            let rates = parse_rates(&contents)
                .with_context(|| format!("Invalid rates file: {}", path.display()))?;
            info!(path = %path.display(), "Loaded rates");
            rates
        }
        None => BurdenRates::default(),
    };

    rates.validate().context("Rates are out of range")?;
    Ok(rates)
}

/// Parses a rates document; keys that are absent keep their defaults.
pub fn parse_rates(contents: &str) -> Result<BurdenRates> {
    toml::from_str(contents).context("Failed to parse rates TOML")
}

/// Loads and validates one calculation input from a TOML file.
pub fn load_input(path: &Path) -> Result<CalculationInput> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    parse_input(&contents).with_context(|| format!("Invalid input file: {}", path.display()))
}

/// Parses and validates one calculation input from TOML text.
pub fn parse_input(contents: &str) -> Result<CalculationInput> {
    let input: CalculationInput =
        toml::from_str(contents).context("Failed to parse input TOML")?;
    input.validate()?;
    Ok(input)
}
