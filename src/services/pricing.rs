use std::collections::HashMap;

use tracing::debug;

use crate::config::PricingConfig;
use crate::models::finance::{PriceQuote, PriceSource};

/// One step of the price fallback chain.
pub trait PriceProvider {
    fn quote(&self, country_code: Option<&str>) -> Option<PriceQuote>;
}

/// Caller-supplied price, wins over everything else.
pub struct RequestedPrice(pub Option<f64>);

impl PriceProvider for RequestedPrice {
    fn quote(&self, country_code: Option<&str>) -> Option<PriceQuote> {
        self.0.filter(|p| p.is_finite()).map(|price_per_kwh| PriceQuote {
            price_per_kwh,
            source: PriceSource::Request,
            country_code: country_code.map(str::to_string),
        })
    }
}

pub struct CountryTable<'a>(pub &'a HashMap<String, f64>);

impl PriceProvider for CountryTable<'_> {
    fn quote(&self, country_code: Option<&str>) -> Option<PriceQuote> {
        let code = country_code?.to_ascii_uppercase();
        self.0.get(&code).map(|&price_per_kwh| PriceQuote {
            price_per_kwh,
            source: PriceSource::CountryTable,
            country_code: Some(code),
        })
    }
}

pub struct DefaultPrice(pub f64);

impl PriceProvider for DefaultPrice {
    fn quote(&self, country_code: Option<&str>) -> Option<PriceQuote> {
        Some(PriceQuote {
            price_per_kwh: self.0,
            source: PriceSource::Default,
            country_code: country_code.map(str::to_string),
        })
    }
}

/// First provider with an answer wins.
pub fn resolve(providers: &[&dyn PriceProvider], country_code: Option<&str>) -> Option<PriceQuote> {
    providers.iter().find_map(|p| p.quote(country_code))
}

/// Request override → configured country table → configured default.
pub fn resolve_price(cfg: &PricingConfig, requested: Option<f64>, country_code: Option<&str>) -> PriceQuote {
    let requested = RequestedPrice(requested);
    let table = CountryTable(&cfg.country_prices);
    let default = DefaultPrice(cfg.default_price_per_kwh);

    let quote = resolve(&[&requested, &table, &default], country_code)
        .unwrap_or(PriceQuote {
            price_per_kwh: cfg.default_price_per_kwh,
            source: PriceSource::Default,
            country_code: None,
        });
    debug!(price = quote.price_per_kwh, source = ?quote.source, "electricity price resolved");
    quote
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PricingConfig {
        let mut country_prices = HashMap::new();
        country_prices.insert("TR".to_string(), 0.08);
        PricingConfig { default_price_per_kwh: 0.09, country_prices }
    }

    #[test]
    fn test_request_override_wins() {
        let q = resolve_price(&cfg(), Some(0.12), Some("TR"));
        assert_eq!(q.price_per_kwh, 0.12);
        assert_eq!(q.source, PriceSource::Request);
    }

    #[test]
    fn test_country_table_is_case_insensitive() {
        let q = resolve_price(&cfg(), None, Some("tr"));
        assert_eq!(q.price_per_kwh, 0.08);
        assert_eq!(q.source, PriceSource::CountryTable);
        assert_eq!(q.country_code.as_deref(), Some("TR"));
    }

    #[test]
    fn test_unknown_country_falls_back_to_default() {
        let q = resolve_price(&cfg(), None, Some("ZZ"));
        assert_eq!(q.price_per_kwh, 0.09);
        assert_eq!(q.source, PriceSource::Default);
        let q = resolve_price(&cfg(), None, None);
        assert_eq!(q.source, PriceSource::Default);
    }

    #[test]
    fn test_non_finite_override_ignored() {
        let q = resolve_price(&cfg(), Some(f64::NAN), None);
        assert_eq!(q.source, PriceSource::Default);
    }

    #[test]
    fn test_chain_stops_at_first_answer() {
        struct Never;
        impl PriceProvider for Never {
            fn quote(&self, _: Option<&str>) -> Option<PriceQuote> {
                None
            }
        }
        let q = resolve(&[&Never, &DefaultPrice(0.2), &DefaultPrice(0.3)], None).unwrap();
        assert_eq!(q.price_per_kwh, 0.2);
        assert!(resolve(&[&Never], None).is_none());
    }
}
