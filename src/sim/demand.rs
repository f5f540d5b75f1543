//! Demand model: arrival rate, session energy, and customer patience.
//!
//! All functions are pure apart from the RNG they are handed.

use super::rng::StationRng;
use super::types::StationParams;

/// Lower clamp of the temperature demand factor.
pub const MIN_TEMP_FACTOR: f64 = 0.5;
/// Upper clamp of the temperature demand factor.
pub const MAX_TEMP_FACTOR: f64 = 1.8;
/// Multiplier on mean session energy in December, January, and February.
pub const WINTER_ENERGY_BOOST: f64 = 1.10;
/// Floor applied to charging power before dividing by it.
pub const MIN_POWER_KW: f64 = 1e-6;

/// True for December, January, and February (0-based months).
pub fn is_winter(month: usize) -> bool {
    matches!(month, 11 | 0 | 1)
}

/// Constant-elasticity price response: `(p / p_ref)^(-elasticity)`.
///
/// Equals 1 at the reference price, decreases as the price rises, and stays
/// strictly positive for validated parameters.
pub fn demand_factor_from_price(price: f64, params: &StationParams) -> f64 {
    (price / params.p_ref).powf(-params.price_elasticity)
}

/// Seasonal temperature response, clamped to `[0.5, 1.8]`.
pub fn demand_factor_from_temp(month: usize, params: &StationParams) -> f64 {
    let temp = params.avg_temp_c_by_month[month];
    (1.0 + params.temp_sensitivity * (params.ref_temp_c - temp))
        .clamp(MIN_TEMP_FACTOR, MAX_TEMP_FACTOR)
}

/// Poisson rate of arrivals per operating hour in `month` at `price`.
pub fn arrivals_rate_per_hour(month: usize, price: f64, params: &StationParams) -> f64 {
    params.base_arrivals_per_hour_by_month[month]
        * demand_factor_from_price(price, params)
        * demand_factor_from_temp(month, params)
}

/// Draws the energy requested by one session (kWh).
pub fn sample_energy_kwh(rng: &mut StationRng, params: &StationParams, month: usize) -> f64 {
    let boost = if is_winter(month) {
        WINTER_ENERGY_BOOST
    } else {
        1.0
    };
    rng.normal(params.energy_kwh_mean * boost, params.energy_kwh_std)
        .clamp(params.energy_kwh_min, params.energy_kwh_max)
}

/// Draws how long a customer is willing to wait for a stall (minutes).
pub fn sample_wait_tolerance_min(rng: &mut StationRng, params: &StationParams) -> f64 {
    rng.normal(params.wait_tol_mean_min, params.wait_tol_std_min)
        .clamp(params.wait_tol_min_min, params.wait_tol_max_min)
}

/// Hours a stall is occupied delivering `energy_kwh`.
pub fn service_time_hours(energy_kwh: f64, params: &StationParams) -> f64 {
    energy_kwh / params.power_kw.max(MIN_POWER_KW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StationParams {
        StationParams::default()
    }

    #[test]
    fn price_factor_is_one_at_reference() {
        let p = params();
        assert!((demand_factor_from_price(p.p_ref, &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn price_factor_decreases_with_price() {
        let p = params();
        let mut previous = f64::INFINITY;
        for cents in 10..200 {
            let f = demand_factor_from_price(f64::from(cents) / 100.0, &p);
            assert!(f > 0.0);
            assert!(f <= previous);
            previous = f;
        }
    }

    #[test]
    fn temp_factor_is_clamped() {
        let mut p = params();
        p.temp_sensitivity = 1.0;
        p.avg_temp_c_by_month[0] = -40.0;
        p.avg_temp_c_by_month[6] = 60.0;
        assert_eq!(demand_factor_from_temp(0, &p), MAX_TEMP_FACTOR);
        assert_eq!(demand_factor_from_temp(6, &p), MIN_TEMP_FACTOR);
    }

    #[test]
    fn temp_factor_is_one_at_reference_temperature() {
        let mut p = params();
        p.avg_temp_c_by_month[3] = p.ref_temp_c;
        assert!((demand_factor_from_temp(3, &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn arrival_rate_combines_factors() {
        let p = params();
        let rate = arrivals_rate_per_hour(5, 0.70, &p);
        let expected = p.base_arrivals_per_hour_by_month[5]
            * demand_factor_from_price(0.70, &p)
            * demand_factor_from_temp(5, &p);
        assert_eq!(rate, expected);
        assert!(rate > 0.0);
    }

    #[test]
    fn energy_draws_stay_in_bounds() {
        let p = params();
        let mut rng = StationRng::new(11);
        for month in 0..12 {
            for _ in 0..500 {
                let e = sample_energy_kwh(&mut rng, &p, month);
                assert!((p.energy_kwh_min..=p.energy_kwh_max).contains(&e));
            }
        }
    }

    #[test]
    fn winter_sessions_draw_more_energy() {
        let mut p = params();
        p.energy_kwh_std = 0.0;
        let mut rng = StationRng::new(12);
        let january = sample_energy_kwh(&mut rng, &p, 0);
        let july = sample_energy_kwh(&mut rng, &p, 6);
        assert!((january - p.energy_kwh_mean * WINTER_ENERGY_BOOST).abs() < 1e-9);
        assert!((july - p.energy_kwh_mean).abs() < 1e-9);
    }

    #[test]
    fn wait_tolerance_draws_stay_in_bounds() {
        let p = params();
        let mut rng = StationRng::new(13);
        for _ in 0..2000 {
            let w = sample_wait_tolerance_min(&mut rng, &p);
            assert!((p.wait_tol_min_min..=p.wait_tol_max_min).contains(&w));
        }
    }

    #[test]
    fn service_time_floors_power() {
        let mut p = params();
        assert!((service_time_hours(75.0, &p) - 0.5).abs() < 1e-12);
        p.power_kw = 0.0;
        assert!(service_time_hours(1.0, &p).is_finite());
    }
}
