use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A quantity that may legitimately have no finite value (payback that is
/// never reached, LCOE with zero energy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bounded {
    Finite(f64),
    Unbounded,
}

#[cfg(test)]
impl Bounded {
    pub fn finite(self) -> Option<f64> {
        match self {
            Bounded::Finite(v) => Some(v),
            Bounded::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Bounded::Unbounded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    Caution,
    NotRecommended,
}

/// Inputs of the discounted-cash-flow model. Rates are fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialParams {
    pub net_aep_mwh: f64,
    /// $/kWh
    pub electricity_price: f64,
    pub capex_per_kw: f64,
    /// $/MW/yr
    pub opex_per_mw: f64,
    pub rated_power_kw: f64,
    pub lifetime_years: u32,
    pub discount_rate: f64,
    pub degradation_rate: f64,
    pub inflation_rate: f64,
}

impl FinancialParams {
    pub const DEFAULT_LIFETIME_YEARS: u32 = 20;
    pub const DEFAULT_DISCOUNT_RATE: f64 = 0.08;
    pub const DEFAULT_DEGRADATION_RATE: f64 = 0.005;
    pub const DEFAULT_INFLATION_RATE: f64 = 0.02;

    /// Params with the default lifetime and rates.
    #[cfg(test)]
    pub fn new(
        net_aep_mwh: f64,
        electricity_price: f64,
        capex_per_kw: f64,
        opex_per_mw: f64,
        rated_power_kw: f64,
    ) -> Self {
        Self {
            net_aep_mwh,
            electricity_price,
            capex_per_kw,
            opex_per_mw,
            rated_power_kw,
            lifetime_years: Self::DEFAULT_LIFETIME_YEARS,
            discount_rate: Self::DEFAULT_DISCOUNT_RATE,
            degradation_rate: Self::DEFAULT_DEGRADATION_RATE,
            inflation_rate: Self::DEFAULT_INFLATION_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct YearlyCashFlow {
    pub year: u32,
    pub energy_mwh: f64,
    pub revenue: f64,
    pub opex: f64,
    pub net_cash_flow: f64,
    pub discounted_cash_flow: f64,
    /// Running sum starting from −capex
    pub cumulative_discounted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialResult {
    pub total_capex: f64,
    /// Year-1 opex
    pub annual_opex: f64,
    pub total_opex: f64,
    /// Year-1 revenue
    pub annual_revenue: f64,
    pub total_revenue: f64,
    pub npv: f64,
    /// Flat-annuity approximation, percent
    pub irr_percent: f64,
    /// False when Newton–Raphson stopped without reaching |NPV| < 0.01
    pub irr_converged: bool,
    pub roi_percent: f64,
    pub profit_margin_percent: f64,
    pub simple_payback_years: Bounded,
    pub discounted_payback_years: Bounded,
    /// $/MWh
    pub lcoe_per_mwh: Bounded,
    pub is_viable: bool,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub cash_flows: Vec<YearlyCashFlow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Request,
    CountryTable,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceQuote {
    pub price_per_kwh: f64,
    pub source: PriceSource,
    pub country_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_serializes_distinctly() {
        let finite = serde_json::to_value(Bounded::Finite(2.5)).unwrap();
        let unbounded = serde_json::to_value(Bounded::Unbounded).unwrap();
        assert_eq!(finite, serde_json::json!({ "kind": "finite", "value": 2.5 }));
        assert_eq!(unbounded, serde_json::json!({ "kind": "unbounded" }));
    }

    #[test]
    fn test_recommendation_wire_names() {
        let v = serde_json::to_value(Recommendation::NotRecommended).unwrap();
        assert_eq!(v, serde_json::json!("not_recommended"));
    }
}
