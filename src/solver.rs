use log::{debug, error};

use crate::bias::{IonosphereModel, TroposphereModel};
use crate::candidate::Candidate;
use crate::cfg::{Config, Mode};
use crate::ephemeris::{EphemerisSource, NavigationData, SatelliteState};
use crate::error::Error;
use crate::navigation::{estimate_position, raim::raim_fde, velocity::estimate_velocity};
use crate::prelude::Rc;
use crate::solutions::{PVTSolution, SatelliteStatus, SolutionStatus};

/// Epoch size below which the RAIM exclusion search is pointless.
const RAIM_MIN_CANDIDATES: usize = 6;

/// [Solver] to resolve [PVTSolution]s from single epochs of pseudorange
/// and doppler observations.
///
/// ## Generics:
/// - EPH: [EphemerisSource], satellite orbital state provider.
/// - NAV: [NavigationData], broadcast navigation product provider.
pub struct Solver<EPH: EphemerisSource, NAV: NavigationData> {
    /// Solver [Config]uration
    pub cfg: Config,

    /// [EphemerisSource] implementation
    eph_source: Rc<EPH>,

    /// [NavigationData] implementation
    nav_data: Rc<NAV>,

    /// Per satellite records of the latest attempt
    satellites: Vec<SatelliteStatus>,
}

impl<EPH: EphemerisSource, NAV: NavigationData> Solver<EPH, NAV> {
    /// Creates a new [Solver].
    ///
    /// ## Input
    /// - cfg: solver [Config]uration
    /// - eph_source: [EphemerisSource] implementation, wrapped in an
    ///   Rc<> so the solver and the provider may live in the same thread.
    /// - nav_data: [NavigationData] implementation.
    pub fn new(cfg: Config, eph_source: Rc<EPH>, nav_data: Rc<NAV>) -> Self {
        Self {
            cfg,
            eph_source,
            nav_data,
            satellites: Vec::new(),
        }
    }

    /// Per satellite records of the latest [Self::resolve] attempt,
    /// lockstep indexed with the proposed [Candidate]s: azimuth and
    /// elevation angles, contribution flag and pseudorange residual.
    pub fn satellites(&self) -> &[SatelliteStatus] {
        &self.satellites
    }

    /// [PVTSolution] solving attempt over one epoch of measurements.
    ///
    /// ## Input
    /// - candidates: proposed [Candidate]s (= measurements), in any
    ///   order. Consecutive duplicates of the same satellite are
    ///   dropped pairwise.
    /// - solution: [PVTSolution] to resolve (in/out). The position may
    ///   be seeded with a prior estimate; zero is acceptable.
    ///
    /// ## Output
    /// - Ok when a validated position stands (possibly after a RAIM
    ///   exclusion): [PVTSolution::status] is then [SolutionStatus::Single]
    ///   or [SolutionStatus::Sbas].
    /// - The velocity estimator runs whether the position stood or not,
    ///   and reports through [PVTSolution::velocity_valid] only.
    pub fn resolve(
        &mut self,
        candidates: &[Candidate],
        solution: &mut PVTSolution,
    ) -> Result<(), Error> {
        solution.status = SolutionStatus::None;
        solution.velocity_valid = false;

        if candidates.is_empty() {
            return Err(Error::NoObservationData);
        }

        solution.epoch = candidates[0].epoch;

        let mut cfg = self.cfg.clone();

        if cfg.mode != Mode::Single {
            // downstream precise processing estimates the atmosphere
            // itself: restrict this stage to the broadcast models
            cfg.iono = IonosphereModel::Klobuchar;
            cfg.tropo = TroposphereModel::Saastamoinen;
        }

        // satellite positions, velocities and clocks
        let states: Vec<SatelliteState> = candidates
            .iter()
            .map(|cd| {
                self.eph_source
                    .state_at(solution.epoch, cd)
                    .unwrap_or_default()
            })
            .collect();

        self.satellites = candidates.iter().map(SatelliteStatus::new).collect();

        // estimate receiver position with pseudorange
        let mut ret = estimate_position(
            candidates,
            &states,
            self.nav_data.as_ref(),
            &cfg,
            solution,
            &mut self.satellites,
        );

        if let Err(e) = &ret {
            error!("{} - position estimation: {}", solution.epoch, e);

            // RAIM FDE
            if candidates.len() >= RAIM_MIN_CANDIDATES && cfg.raim_fde {
                if raim_fde(
                    candidates,
                    &states,
                    self.nav_data.as_ref(),
                    &cfg,
                    solution,
                    &mut self.satellites,
                )
                .is_some()
                {
                    ret = Ok(());
                }
            }
        }

        // estimate receiver velocity with doppler, whether the
        // position stood or not
        estimate_velocity(
            candidates,
            &states,
            self.nav_data.as_ref(),
            &cfg,
            solution,
            &self.satellites,
        );

        if ret.is_ok() {
            debug!(
                "{} - {} solution, {} satellites",
                solution.epoch, solution.status, solution.ns
            );
        }

        ret
    }
}
