use crate::error::AnalysisError;
use crate::models::wind::{CurvePoint, Turbine};

const fn pt(wind_speed_ms: f64, power_kw: f64) -> CurvePoint {
    CurvePoint { wind_speed_ms, power_kw }
}

const GENERIC_2MW_CURVE: [CurvePoint; 26] = [
    pt(0.0, 0.0), pt(3.0, 0.0), pt(3.5, 25.0), pt(4.0, 82.0), pt(5.0, 174.0), pt(6.0, 321.0),
    pt(7.0, 532.0), pt(8.0, 815.0), pt(9.0, 1180.0), pt(10.0, 1580.0), pt(11.0, 1890.0),
    pt(12.0, 2000.0), pt(13.0, 2000.0), pt(14.0, 2000.0), pt(15.0, 2000.0), pt(16.0, 2000.0),
    pt(17.0, 2000.0), pt(18.0, 2000.0), pt(19.0, 2000.0), pt(20.0, 2000.0), pt(21.0, 2000.0),
    pt(22.0, 2000.0), pt(23.0, 2000.0), pt(24.0, 2000.0), pt(25.0, 2000.0), pt(25.1, 0.0),
];

const VESTAS_V110_CURVE: [CurvePoint; 27] = [
    pt(0.0, 0.0), pt(2.5, 0.0), pt(3.0, 20.0), pt(4.0, 115.0), pt(5.0, 248.0), pt(6.0, 442.0),
    pt(7.0, 710.0), pt(8.0, 1050.0), pt(9.0, 1430.0), pt(10.0, 1780.0), pt(11.0, 1960.0),
    pt(11.5, 2000.0), pt(12.0, 2000.0), pt(13.0, 2000.0), pt(14.0, 2000.0), pt(15.0, 2000.0),
    pt(16.0, 2000.0), pt(17.0, 2000.0), pt(18.0, 2000.0), pt(19.0, 2000.0), pt(20.0, 2000.0),
    pt(21.0, 2000.0), pt(22.0, 2000.0), pt(23.0, 2000.0), pt(24.0, 2000.0), pt(25.0, 2000.0),
    pt(25.1, 0.0),
];

const VESTAS_V150_CURVE: [CurvePoint; 27] = [
    pt(0.0, 0.0), pt(2.5, 0.0), pt(3.0, 50.0), pt(4.0, 220.0), pt(5.0, 520.0), pt(6.0, 920.0),
    pt(7.0, 1480.0), pt(8.0, 2180.0), pt(9.0, 2980.0), pt(10.0, 3680.0), pt(11.0, 4050.0),
    pt(12.0, 4180.0), pt(12.5, 4200.0), pt(13.0, 4200.0), pt(14.0, 4200.0), pt(15.0, 4200.0),
    pt(16.0, 4200.0), pt(17.0, 4200.0), pt(18.0, 4200.0), pt(19.0, 4200.0), pt(20.0, 4200.0),
    pt(21.0, 4200.0), pt(22.0, 4200.0), pt(23.0, 4200.0), pt(24.0, 4200.0), pt(25.0, 4200.0),
    pt(25.1, 0.0),
];

pub static CATALOG: [Turbine; 3] = [
    Turbine {
        key: "generic_2mw",
        name: "Generic 2 MW",
        rated_power_kw: 2000.0,
        hub_height_m: 80.0,
        rotor_diameter_m: 90.0,
        cut_in_ms: 3.5,
        rated_speed_ms: 12.0,
        cut_out_ms: 25.0,
        power_curve: &GENERIC_2MW_CURVE,
    },
    Turbine {
        key: "vestas_v110",
        name: "Vestas V110-2.0",
        rated_power_kw: 2000.0,
        hub_height_m: 95.0,
        rotor_diameter_m: 110.0,
        cut_in_ms: 3.0,
        rated_speed_ms: 11.5,
        cut_out_ms: 25.0,
        power_curve: &VESTAS_V110_CURVE,
    },
    Turbine {
        key: "vestas_v150",
        name: "Vestas V150-4.2",
        rated_power_kw: 4200.0,
        hub_height_m: 105.0,
        rotor_diameter_m: 150.0,
        cut_in_ms: 3.0,
        rated_speed_ms: 12.5,
        cut_out_ms: 25.0,
        power_curve: &VESTAS_V150_CURVE,
    },
];

/// Lookup by catalog key. Never substitutes a default model.
pub fn find_turbine(key: &str) -> Result<&'static Turbine, AnalysisError> {
    CATALOG
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| AnalysisError::UnknownTurbine(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(find_turbine("vestas_v150").unwrap().rated_power_kw, 4200.0);
        match find_turbine("enercon_e126") {
            Err(AnalysisError::UnknownTurbine(k)) => assert_eq!(k, "enercon_e126"),
            other => panic!("expected UnknownTurbine, got {:?}", other),
        }
    }

    #[test]
    fn test_curves_bracket_operating_range() {
        for t in CATALOG.iter() {
            let first = t.power_curve.first().unwrap();
            let last = t.power_curve.last().unwrap();
            assert_eq!(first.power_kw, 0.0, "{} curve must start at 0 kW", t.key);
            assert_eq!(last.power_kw, 0.0, "{} curve must end at 0 kW", t.key);
            assert!(last.wind_speed_ms >= t.cut_out_ms, "{} terminal point below cut-out", t.key);
            let peak = t.power_curve.iter().map(|p| p.power_kw).fold(0.0, f64::max);
            assert_eq!(peak, t.rated_power_kw, "{} peak must equal rated power", t.key);
        }
    }
}
