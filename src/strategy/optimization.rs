// src/strategy/optimization.rs

//! Service-level arithmetic for the order-up-to policy.

/// Safety stock = z * sigma_error * sqrt(time_factor).
///
/// Negative results (a negative z-score) are kept: they lower the
/// order-up-to level below the forecast, which is what such a z asks for.
pub fn safety_stock(safety_factor: f64, std_error: f64, time_factor: usize) -> f64 {
    safety_factor * std_error * (time_factor as f64).sqrt()
}

/// Z-score for a target cycle service level (probability of no stockout
/// during a replenishment cycle), e.g. 0.95 -> ~1.645.
///
/// Inverse standard normal CDF, Abramowitz and Stegun 26.2.23, absolute
/// error below 4.5e-4. Returns `None` outside (0, 1).
pub fn z_score_for_service_level(service_level: f64) -> Option<f64> {
    if !(service_level > 0.0 && service_level < 1.0) {
        return None;
    }
    if service_level == 0.5 {
        return Some(0.0);
    }

    const C: [f64; 3] = [2.515517, 0.802853, 0.010328];
    const D: [f64; 3] = [1.432788, 0.189269, 0.001308];

    // Tail probability, the formula holds on (0, 0.5].
    let tail = service_level.min(1.0 - service_level);
    let t = (-2.0 * tail.ln()).sqrt();

    let numerator = C[0] + C[1] * t + C[2] * t * t;
    let denominator = 1.0 + D[0] * t + D[1] * t * t + D[2] * t * t * t;
    let z = t - numerator / denominator;

    Some(if service_level < 0.5 { -z } else { z })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn safety_stock_scales_with_sqrt_time() {
        assert_abs_diff_eq!(safety_stock(2.0, 3.0, 4), 12.0);
        assert_eq!(safety_stock(1.645, 5.0, 0), 0.0);
        assert_eq!(safety_stock(0.0, 5.0, 9), 0.0);
    }

    #[test]
    fn common_service_levels() {
        let z95 = z_score_for_service_level(0.95).unwrap();
        assert_abs_diff_eq!(z95, 1.6449, epsilon = 1e-3);

        let z99 = z_score_for_service_level(0.99).unwrap();
        assert_abs_diff_eq!(z99, 2.3263, epsilon = 1e-3);

        let z05 = z_score_for_service_level(0.05).unwrap();
        assert_abs_diff_eq!(z05, -z95, epsilon = 1e-12);

        assert_eq!(z_score_for_service_level(0.5), Some(0.0));
    }

    #[test]
    fn rejects_degenerate_levels() {
        assert_eq!(z_score_for_service_level(0.0), None);
        assert_eq!(z_score_for_service_level(1.0), None);
        assert_eq!(z_score_for_service_level(f64::NAN), None);
    }
}
