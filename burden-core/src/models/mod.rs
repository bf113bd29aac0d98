mod burden_rates;
mod calculation_input;
mod calculation_result;

pub use burden_rates::{BurdenRates, FixedInsuranceBasis, RatesError};
pub use calculation_input::CalculationInput;
pub use calculation_result::{CalculationResult, DerivedCosts};
