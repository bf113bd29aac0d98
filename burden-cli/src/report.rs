//! Rendering of calculation results as a table or JSON.

use anyhow::{Context, Result};
use burden_core::format::{format_money, format_percent};
use burden_core::{CalculationInput, CalculationResult};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "Item")]
    pub item: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl ReportRow {
    fn money(
        item: &'static str,
        value: rust_decimal::Decimal,
    ) -> Self {
        Self {
            item,
            value: format_money(Some(value)),
        }
    }

    fn percent(
        item: &'static str,
        value: Option<rust_decimal::Decimal>,
    ) -> Self {
        Self {
            item,
            value: format_percent(value),
        }
    }
}

/// One computed report, with the input it came from.
#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    /// 1-based CSV row, when the input came from a batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub input: &'a CalculationInput,
    pub result: &'a CalculationResult,
}

/// Lays out a result in display order, with amounts and ratios formatted.
pub fn report_rows(result: &CalculationResult) -> Vec<ReportRow> {
    let derived = &result.derived;
    vec![
        ReportRow::money("Royalty", derived.royalty),
        ReportRow::money("White payroll (белый ФОТ)", derived.white_payroll),
        ReportRow::money("Aggregator commission", derived.aggregator_commission),
        ReportRow::money("Fixed insurance", derived.fixed_insurance),
        ReportRow::money("Acquiring (эквайринг)", derived.acquiring),
        ReportRow::money("Expenses", result.expenses),
        ReportRow::money("Profit before tax", result.profit_before_tax),
        ReportRow::percent("Margin", result.margin),
        ReportRow::percent("Profitability", result.profitability),
        ReportRow::money("Taxable profit", result.taxable_profit),
        ReportRow::money("AUSN tax (АУСН)", result.ausn_tax),
        ReportRow::money("NDFL tax (НДФЛ)", result.ndfl_tax),
        ReportRow::money("Total tax", result.total_tax),
        ReportRow::percent("Tax burden vs turnover", result.tax_burden_vs_turnover),
        ReportRow::percent("Tax burden vs profit", result.tax_burden_vs_profit),
    ]
}

pub fn render_table(result: &CalculationResult) -> String {
    Table::new(report_rows(result))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

pub fn render_json(entries: &[ReportEntry<'_>]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("Failed to serialize report")
}
