//! Iterated weighted least squares position estimation
use log::debug;
use nalgebra::{DVector, Vector3};

use crate::candidate::Candidate;
use crate::cfg::{Config, Ephemerides};
use crate::constants::SPEED_OF_LIGHT_M_S;
use crate::ephemeris::{NavigationData, SatelliteState};
use crate::error::Error;
use crate::prelude::Unit;
use crate::solutions::{PVTSolution, SatelliteStatus, SolutionStatus};

pub(crate) mod dop;
pub(crate) mod raim;
pub(crate) mod residuals;
pub(crate) mod validator;
pub(crate) mod velocity;

/// Estimated parameters: 3D position, receiver clock, and the GLONASS,
/// Galileo, BeiDou and IRNSS time offsets, all in meters.
pub(crate) const NX: usize = 8;

/// Gauss-Newton iteration ceiling.
pub(crate) const MAX_ITER: usize = 10;

/// Position convergence criterion on the state update norm (m).
const CONVERGENCE_M: f64 = 1.0E-4;

/// Estimates the receiver position and clock terms by Gauss-Newton
/// iteration over the pseudorange residuals, committing into `solution`
/// on convergence. The solution fields are written before validation:
/// only [PVTSolution::status] tells a validated solution apart.
pub(crate) fn estimate_position<N: NavigationData>(
    candidates: &[Candidate],
    states: &[SatelliteState],
    nav: &N,
    cfg: &Config,
    solution: &mut PVTSolution,
    status: &mut [SatelliteStatus],
) -> Result<(), Error> {
    let mut x = DVector::<f64>::zeros(NX);

    for j in 0..3 {
        x[j] = solution.position_ecef_m[j];
    }

    for iteration in 0..MAX_ITER {
        let mut input =
            residuals::code_residuals(iteration, candidates, states, nav, cfg, &x, status);

        let nv = input.v.len();
        if nv < NX {
            return Err(Error::LackOfValidSats(nv));
        }

        // whiten: row scale by measurement std, turning the weighted
        // problem into an ordinary least squares one
        for j in 0..nv {
            let sigma = input.var[j].sqrt();
            input.v[j] /= sigma;
            for k in 0..NX {
                input.h[(j, k)] /= sigma;
            }
        }

        // least squares estimation
        let ht = input.h.transpose();
        let q = (&ht * &input.h)
            .try_inverse()
            .ok_or(Error::LeastSquares)?;
        let dx = &q * (&ht * &input.v);

        x += &dx;

        if dx.norm() < CONVERGENCE_M {
            solution.epoch = candidates[0].epoch - (x[3] / SPEED_OF_LIGHT_M_S) * Unit::Second;

            for k in 0..5 {
                solution.dtr_s[k] = x[3 + k] / SPEED_OF_LIGHT_M_S;
            }

            solution.position_ecef_m = Vector3::new(x[0], x[1], x[2]);
            solution.velocity_ecef_m_s = Vector3::zeros();
            solution.position_covar_m2 = [
                q[(0, 0)],
                q[(1, 1)],
                q[(2, 2)],
                q[(0, 1)],
                q[(1, 2)],
                q[(0, 2)],
            ];
            solution.ns = input.ns;
            solution.age_s = 0.0;
            solution.ratio = 0.0;

            validator::validate(status, cfg, &input.v, nv, NX)?;

            solution.status = match cfg.ephemerides {
                Ephemerides::SbasAugmented => SolutionStatus::Sbas,
                _ => SolutionStatus::Single,
            };

            debug!(
                "{} - convergence ({}/{}) x={:.3} y={:.3} z={:.3} dtr={:.3}",
                solution.epoch,
                iteration + 1,
                MAX_ITER,
                x[0],
                x[1],
                x[2],
                x[3],
            );

            return Ok(());
        }
    }

    Err(Error::IterationDivergent(MAX_ITER))
}
