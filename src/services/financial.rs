//! Discounted-cash-flow model over the project lifetime.
//!
//! Year `y` (1-based) applies compounding degradation to energy and compounding
//! inflation to price and opex, both with exponent `y − 1`, and discounts by
//! `(1 + r)^y`. Two figures intentionally do not follow that path:
//!
//!  * IRR is solved on the flat average cash flow, not the yearly series.
//!  * LCOE discounts year-1 opex and undegraded energy.

use tracing::debug;

use crate::error::AnalysisError;
use crate::models::finance::{
    Bounded, FinancialParams, FinancialResult, Recommendation, RiskLevel, YearlyCashFlow,
};

const IRR_INITIAL_GUESS: f64 = 0.10;
const IRR_MAX_ITERATIONS: usize = 100;
const IRR_TOLERANCE: f64 = 0.01;
const IRR_MIN: f64 = -0.99;
const IRR_MAX: f64 = 1.0;

pub const MAX_LIFETIME_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrEstimate {
    /// Fraction, e.g. 0.12
    pub rate: f64,
    pub converged: bool,
    pub iterations: usize,
}

fn validate(params: &FinancialParams) -> Result<(), AnalysisError> {
    let finite = [
        ("net_aep_mwh", params.net_aep_mwh),
        ("electricity_price", params.electricity_price),
        ("capex_per_kw", params.capex_per_kw),
        ("opex_per_mw", params.opex_per_mw),
        ("rated_power_kw", params.rated_power_kw),
        ("discount_rate", params.discount_rate),
        ("degradation_rate", params.degradation_rate),
        ("inflation_rate", params.inflation_rate),
    ];
    for (name, value) in finite {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidParameters { name, reason: format!("must be finite, got {}", value) });
        }
    }
    if params.lifetime_years == 0 || params.lifetime_years > MAX_LIFETIME_YEARS {
        return Err(AnalysisError::InvalidParameters {
            name: "lifetime_years",
            reason: format!("must be 1..={} years, got {}", MAX_LIFETIME_YEARS, params.lifetime_years),
        });
    }
    if params.discount_rate <= -1.0 {
        return Err(AnalysisError::InvalidParameters {
            name: "discount_rate",
            reason: format!("must be greater than -1, got {}", params.discount_rate),
        });
    }
    Ok(())
}

/// NPV of `-capex` followed by `years` equal cash flows, and its derivative in `rate`.
fn annuity_npv(capex: f64, cash_flow: f64, years: u32, rate: f64) -> (f64, f64) {
    let mut npv = -capex;
    let mut d_npv = 0.0;
    for y in 1..=years {
        let y = y as f64;
        npv += cash_flow / (1.0 + rate).powf(y);
        d_npv -= y * cash_flow / (1.0 + rate).powf(y + 1.0);
    }
    (npv, d_npv)
}

/// Newton–Raphson IRR of a flat annuity. Stops once |NPV| < 0.01 or the
/// derivative vanishes; the rate is clamped to [−0.99, 1.0] after every step.
/// Without convergence the last iterate is returned with `converged = false`.
///
/// No root exists when a positive investment never earns a positive cash
/// flow, or a free investment does; those return the matching clamp bound.
pub fn irr_flat_annuity(capex: f64, cash_flow: f64, years: u32) -> IrrEstimate {
    if capex > 0.0 && cash_flow <= 0.0 {
        return IrrEstimate { rate: IRR_MIN, converged: false, iterations: 0 };
    }
    if capex <= 0.0 && cash_flow > 0.0 {
        return IrrEstimate { rate: IRR_MAX, converged: false, iterations: 0 };
    }

    let mut rate = IRR_INITIAL_GUESS;
    for i in 0..IRR_MAX_ITERATIONS {
        let (npv, d_npv) = annuity_npv(capex, cash_flow, years, rate);
        if npv.abs() < IRR_TOLERANCE {
            return IrrEstimate { rate, converged: true, iterations: i };
        }
        if d_npv == 0.0 {
            return IrrEstimate { rate, converged: false, iterations: i };
        }
        rate = (rate - npv / d_npv).clamp(IRR_MIN, IRR_MAX);
    }
    let (npv, _) = annuity_npv(capex, cash_flow, years, rate);
    IrrEstimate {
        rate,
        converged: npv.abs() < IRR_TOLERANCE,
        iterations: IRR_MAX_ITERATIONS,
    }
}

/// IRR thresholds in percent: ≥ 15 low, ≥ 8 medium, otherwise high.
pub fn classify_risk(irr_percent: f64) -> RiskLevel {
    if irr_percent < 8.0 {
        RiskLevel::High
    } else if irr_percent < 15.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn recommend(npv: f64, simple_payback_years: Bounded, lifetime_years: u32) -> Recommendation {
    if npv <= 0.0 {
        return Recommendation::NotRecommended;
    }
    match simple_payback_years {
        Bounded::Finite(p) if p < lifetime_years as f64 * 0.5 => Recommendation::Recommended,
        _ => Recommendation::Caution,
    }
}

pub fn calculate_financials(params: &FinancialParams) -> Result<FinancialResult, AnalysisError> {
    validate(params)?;

    let lifetime = params.lifetime_years;
    let total_capex = params.rated_power_kw * params.capex_per_kw;
    let annual_opex = params.opex_per_mw * (params.rated_power_kw / 1000.0);
    let base_revenue = params.net_aep_mwh * 1000.0 * params.electricity_price;

    let mut total_revenue = 0.0;
    let mut total_opex = 0.0;
    let mut npv = -total_capex;
    let mut discounted_payback: Option<u32> = None;
    let mut lcoe_cost = total_capex;
    let mut lcoe_energy = 0.0;
    let mut cash_flows = Vec::with_capacity(lifetime as usize);

    for year in 1..=lifetime {
        let growth_exp = (year - 1) as i32;
        let degradation = (1.0 - params.degradation_rate).powi(growth_exp);
        let inflation = (1.0 + params.inflation_rate).powi(growth_exp);
        let discount = (1.0 + params.discount_rate).powi(year as i32);

        let energy_mwh = params.net_aep_mwh * degradation;
        let revenue = energy_mwh * 1000.0 * params.electricity_price * inflation;
        let opex = annual_opex * inflation;
        let net_cash_flow = revenue - opex;
        let discounted_cash_flow = net_cash_flow / discount;

        total_revenue += revenue;
        total_opex += opex;
        npv += discounted_cash_flow;
        if discounted_payback.is_none() && npv >= 0.0 {
            discounted_payback = Some(year);
        }

        lcoe_cost += annual_opex / discount;
        lcoe_energy += params.net_aep_mwh / discount;

        cash_flows.push(YearlyCashFlow {
            year,
            energy_mwh,
            revenue,
            opex,
            net_cash_flow,
            discounted_cash_flow,
            cumulative_discounted: npv,
        });
    }

    let avg_cash_flow = (total_revenue - total_opex) / lifetime as f64;
    let irr = irr_flat_annuity(total_capex, avg_cash_flow, lifetime);
    let irr_percent = irr.rate * 100.0;

    let year1_net = base_revenue - annual_opex;
    let simple_payback_years = if year1_net > 0.0 {
        Bounded::Finite(total_capex / year1_net)
    } else {
        Bounded::Unbounded
    };

    let discounted_payback_years = match discounted_payback {
        Some(y) => Bounded::Finite(y as f64),
        None => Bounded::Unbounded,
    };

    let total_cost = total_capex + total_opex;
    let profit = total_revenue - total_cost;
    let roi_percent = if total_cost > 0.0 { profit / total_cost * 100.0 } else { 0.0 };
    let profit_margin_percent = if total_revenue > 0.0 { profit / total_revenue * 100.0 } else { 0.0 };

    let lcoe_per_mwh = if params.net_aep_mwh > 0.0 && lcoe_energy > 0.0 {
        Bounded::Finite(lcoe_cost / lcoe_energy)
    } else {
        Bounded::Unbounded
    };

    let risk_level = classify_risk(irr_percent);
    let recommendation = recommend(npv, simple_payback_years, lifetime);

    debug!(
        npv,
        irr_percent,
        irr_converged = irr.converged,
        irr_iterations = irr.iterations,
        ?recommendation,
        "financials computed"
    );

    Ok(FinancialResult {
        total_capex,
        annual_opex,
        total_opex,
        annual_revenue: base_revenue,
        total_revenue,
        npv,
        irr_percent,
        irr_converged: irr.converged,
        roi_percent,
        profit_margin_percent,
        simple_payback_years,
        discounted_payback_years,
        lcoe_per_mwh,
        is_viable: npv > 0.0,
        risk_level,
        recommendation,
        cash_flows,
    })
}
