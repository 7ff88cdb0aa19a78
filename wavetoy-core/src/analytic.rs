//! Closed-form standing wave, used for seeding and as ground truth.

use std::f64::consts::PI;

/// Period length of the standing wave along each axis.
pub const PERIOD: [f64; 3] = [4.0, 4.0, 4.0];

/// Wave numbers `2π / L` per axis.
pub fn wave_numbers() -> [f64; 3] {
    [2.0 * PI / PERIOD[0], 2.0 * PI / PERIOD[1], 2.0 * PI / PERIOD[2]]
}

/// Angular frequency from the continuum dispersion relation `ω = |k|`.
pub fn angular_frequency() -> f64 {
    let [kx, ky, kz] = wave_numbers();
    (kx * kx + ky * ky + kz * kz).sqrt()
}

/// `cos(ωt) cos(kx x) cos(ky y) cos(kz z)`, an exact solution of `φ_tt = ∇²φ`.
pub fn standing(t: f64, x: f64, y: f64, z: f64) -> f64 {
    let [kx, ky, kz] = wave_numbers();
    let omega = angular_frequency();
    (omega * t).cos() * (kx * x).cos() * (ky * y).cos() * (kz * z).cos()
}

/// Linear interpolation through `(x0, y0)` and `(x1, y1)`, evaluated at `x`.
///
/// No clamping: values of `x` outside `[x0, x1]` extrapolate.
#[inline]
pub fn linterp(y0: f64, y1: f64, x0: f64, x1: f64, x: f64) -> f64 {
    (x1 - x) / (x1 - x0) * y0 + (x - x0) / (x1 - x0) * y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_at_origin() {
        assert_eq!(standing(0.0, 0.0, 0.0, 0.0), 1.0);
        // Quarter period in x is a node
        assert!(standing(0.0, 1.0, 0.3, 0.7).abs() < 1e-15);
    }

    #[test]
    fn test_standing_is_periodic() {
        let (t, x, y, z) = (0.37, 0.25, 1.5, 3.1);
        let a = standing(t, x, y, z);
        let b = standing(t, x + PERIOD[0], y - PERIOD[1], z + 2.0 * PERIOD[2]);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_standing_solves_wave_equation() {
        // Centered differences with a small step approximate φ_tt - ∇²φ.
        let h = 1e-3;
        let (t, x, y, z) = (0.2, 0.3, 0.9, 1.7);
        let f = |t, x, y, z| standing(t, x, y, z);
        let c = f(t, x, y, z);
        let tt = (f(t + h, x, y, z) - 2.0 * c + f(t - h, x, y, z)) / (h * h);
        let xx = (f(t, x + h, y, z) - 2.0 * c + f(t, x - h, y, z)) / (h * h);
        let yy = (f(t, x, y + h, z) - 2.0 * c + f(t, x, y - h, z)) / (h * h);
        let zz = (f(t, x, y, z + h) - 2.0 * c + f(t, x, y, z - h)) / (h * h);
        assert!((tt - (xx + yy + zz)).abs() < 1e-4);
    }

    #[test]
    fn test_linterp_endpoints() {
        assert_eq!(linterp(2.0, 6.0, -1.0, 7.0, -1.0), 2.0);
        assert_eq!(linterp(2.0, 6.0, -1.0, 7.0, 7.0), 6.0);
        assert_eq!(linterp(2.0, 6.0, -1.0, 7.0, 3.0), 4.0);
        // extrapolation
        assert_eq!(linterp(2.0, 6.0, -1.0, 7.0, 11.0), 8.0);
    }
}
