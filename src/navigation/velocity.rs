//! Doppler based velocity estimation
use nalgebra::{DMatrix, DVector, Vector3};

use crate::candidate::Candidate;
use crate::carrier::carrier_frequency_hz;
use crate::cfg::Config;
use crate::constants::{EARTH_ANGULAR_VEL_RAD_S, SPEED_OF_LIGHT_M_S};
use crate::ephemeris::{NavigationData, SatelliteState};
use crate::geodesy::{ecef_to_geodetic, enu_rotation};
use crate::navigation::MAX_ITER;
use crate::solutions::{PVTSolution, SatelliteStatus};

/// Velocity convergence criterion on the state update norm (m/s).
const CONVERGENCE_M_S: f64 = 1.0E-6;

/// Estimates the receiver ECEF velocity and clock drift from the
/// doppler measurements of the satellites retained by the position
/// estimator, the converged position serving as linearization point.
/// Runs whether the position stood or not: on convergence the velocity,
/// its covariance and [PVTSolution::velocity_valid] are written,
/// otherwise the solution is left untouched.
pub(crate) fn estimate_velocity<N: NavigationData>(
    candidates: &[Candidate],
    states: &[SatelliteState],
    nav: &N,
    cfg: &Config,
    solution: &mut PVTSolution,
    status: &[SatelliteStatus],
) {
    let mut x = DVector::<f64>::zeros(4);

    for _ in 0..MAX_ITER {
        // range rate residuals (m/s)
        let (v, h) = doppler_residuals(
            candidates,
            states,
            nav,
            cfg,
            &solution.position_ecef_m,
            &x,
            status,
        );

        if v.len() < 4 {
            break;
        }

        // least squares estimation
        let ht = h.transpose();
        let Some(q) = (&ht * &h).try_inverse() else {
            break;
        };
        let dx = &q * (&ht * &v);

        x += &dx;

        if dx.norm() < CONVERGENCE_M_S {
            solution.velocity_ecef_m_s = Vector3::new(x[0], x[1], x[2]);
            solution.velocity_covar_m2_s2 = [
                q[(0, 0)],
                q[(1, 1)],
                q[(2, 2)],
                q[(0, 1)],
                q[(1, 2)],
                q[(0, 2)],
            ];
            solution.velocity_valid = true;
            break;
        }
    }
}

/// Range rate residuals and design matrix at velocity state `x`
/// (vx, vy, vz, c·clock drift).
fn doppler_residuals<N: NavigationData>(
    candidates: &[Candidate],
    states: &[SatelliteState],
    nav: &N,
    cfg: &Config,
    rr: &Vector3<f64>,
    x: &DVector<f64>,
    status: &[SatelliteStatus],
) -> (DVector<f64>, DMatrix<f64>) {
    let position_geodetic = ecef_to_geodetic(rr);
    let enu = enu_rotation(&position_geodetic);

    let mut v = Vec::with_capacity(candidates.len());
    let mut h = Vec::with_capacity(candidates.len() * 4);

    for (i, candidate) in candidates.iter().enumerate() {
        let Some(freq) = carrier_frequency_hz(candidate.sv, candidate.signals[0].code, nav)
        else {
            continue;
        };

        let Some(doppler) = candidate.signals[0].doppler_hz else {
            continue;
        };

        if !status[i].used || states[i].velocity_ecef_m_s.norm() <= 0.0 {
            continue;
        }

        // LOS vector in ECEF, from the stored azimuth/elevation
        let cos_el = status[i].elevation_rad.cos();
        let a = Vector3::new(
            status[i].azimuth_rad.sin() * cos_el,
            status[i].azimuth_rad.cos() * cos_el,
            status[i].elevation_rad.sin(),
        );
        let e = enu.transpose() * a;

        // satellite velocity relative to receiver
        let vs = states[i].velocity_ecef_m_s - Vector3::new(x[0], x[1], x[2]);

        // range rate with earth rotation correction
        let rate = vs.dot(&e)
            + EARTH_ANGULAR_VEL_RAD_S / SPEED_OF_LIGHT_M_S
                * (states[i].velocity_ecef_m_s[1] * rr[0] + states[i].position_ecef_m[1] * x[0]
                    - states[i].velocity_ecef_m_s[0] * rr[1]
                    - states[i].position_ecef_m[0] * x[1]);

        // std of the range rate error (m/s)
        let sigma = if cfg.error_model.doppler_std_hz > 0.0 {
            cfg.error_model.doppler_std_hz * SPEED_OF_LIGHT_M_S / freq
        } else {
            1.0
        };

        // range rate residual (m/s)
        v.push(
            (-doppler * SPEED_OF_LIGHT_M_S / freq
                - (rate + x[3] - SPEED_OF_LIGHT_M_S * states[i].clock_drift_s_s))
                / sigma,
        );

        h.extend([-e[0] / sigma, -e[1] / sigma, -e[2] / sigma, 1.0 / sigma]);
    }

    let nv = v.len();
    (DVector::from_vec(v), DMatrix::from_row_slice(nv, 4, &h))
}
