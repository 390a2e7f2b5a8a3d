//! RAIM: fault detection and exclusion
use log::{debug, info};

use crate::candidate::Candidate;
use crate::cfg::Config;
use crate::ephemeris::{NavigationData, SatelliteState};
use crate::navigation::estimate_position;
use crate::prelude::SV;
use crate::solutions::{PVTSolution, SatelliteStatus};

/// Incumbent residual RMS a candidate exclusion must improve on (m).
const RMS_THRESHOLD_M: f64 = 100.0;

/// Minimal satellite count an exclusion must retain.
const MIN_RETAINED: usize = 5;

/// Single satellite exclusion search, run after the full set was
/// rejected. Tries every leave-one-out subset in observation order and
/// keeps the exclusion with the lowest residual RMS; on success the
/// winning sub-solution replaces `solution` and the per satellite
/// records, the excluded satellite being marked unused.
/// Returns the excluded [SV], or None when no exclusion rescued
/// the epoch.
pub(crate) fn raim_fde<N: NavigationData>(
    candidates: &[Candidate],
    states: &[SatelliteState],
    nav: &N,
    cfg: &Config,
    solution: &mut PVTSolution,
    status: &mut [SatelliteStatus],
) -> Option<SV> {
    let n = candidates.len();

    let mut best: Option<(PVTSolution, Vec<SatelliteStatus>, usize)> = None;
    let mut rms = RMS_THRESHOLD_M;

    for i in 0..n {
        // satellite exclusion
        let candidates_e: Vec<Candidate> = candidates
            .iter()
            .enumerate()
            .filter_map(|(j, cd)| if j == i { None } else { Some(*cd) })
            .collect();

        let states_e: Vec<SatelliteState> = states
            .iter()
            .enumerate()
            .filter_map(|(j, st)| if j == i { None } else { Some(*st) })
            .collect();

        let mut status_e: Vec<SatelliteStatus> =
            candidates_e.iter().map(SatelliteStatus::new).collect();

        // estimate receiver position without this satellite
        let mut solution_e = PVTSolution::default();

        if let Err(e) = estimate_position(
            &candidates_e,
            &states_e,
            nav,
            cfg,
            &mut solution_e,
            &mut status_e,
        ) {
            debug!("raim: excluding {}: {}", candidates[i].sv, e);
            continue;
        }

        let retained = status_e.iter().filter(|s| s.used).count();
        if retained < MIN_RETAINED {
            debug!(
                "raim: excluding {}: lack of satellites nvsat={}",
                candidates[i].sv, retained
            );
            continue;
        }

        let rms_e = (status_e
            .iter()
            .filter(|s| s.used)
            .map(|s| s.residual_m * s.residual_m)
            .sum::<f64>()
            / retained as f64)
            .sqrt();

        debug!("raim: excluding {}: rms={:.3}", candidates[i].sv, rms_e);

        if rms_e > rms {
            continue;
        }

        best = Some((solution_e, status_e, i));
        rms = rms_e;
    }

    let (solution_e, status_e, excluded) = best?;

    let mut k = 0;
    for (j, s) in status.iter_mut().enumerate() {
        if j == excluded {
            continue;
        }
        s.azimuth_rad = status_e[k].azimuth_rad;
        s.elevation_rad = status_e[k].elevation_rad;
        s.used = status_e[k].used;
        s.residual_m = status_e[k].residual_m;
        k += 1;
    }

    status[excluded].used = false;
    *solution = solution_e;

    info!(
        "{} - {} excluded by raim",
        solution.epoch, candidates[excluded].sv
    );

    Some(candidates[excluded].sv)
}
