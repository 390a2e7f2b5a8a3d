//! Solver outputs
use crate::candidate::Candidate;
use crate::prelude::{Epoch, Vector3, SV};

/// Solution quality flag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// No validated solution stands for this epoch.
    #[default]
    None,
    /// Standalone solution.
    Single,
    /// Solution computed with SBAS augmented ephemerides.
    Sbas,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Single => write!(f, "SINGLE"),
            Self::Sbas => write!(f, "SBAS"),
        }
    }
}

/// Position, velocity and time solution of one epoch.
/// The caller may seed [PVTSolution::position_ecef_m] with a prior
/// before resolving: zero is acceptable.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PVTSolution {
    /// [Epoch] of the solution, corrected for the receiver clock bias.
    pub epoch: Epoch,

    /// Receiver position, ECEF (m).
    pub position_ecef_m: Vector3<f64>,

    /// Receiver velocity, ECEF (m/s). Only meaningful when
    /// [PVTSolution::velocity_valid] is set.
    pub velocity_ecef_m_s: Vector3<f64>,

    /// Position covariance (m²), upper triangle as
    /// [xx, yy, zz, xy, yz, zx].
    pub position_covar_m2: [f64; 6],

    /// Velocity covariance (m²/s²), same layout as the position
    /// covariance.
    pub velocity_covar_m2_s2: [f64; 6],

    /// Clock terms (s): receiver clock bias, then the GLO-GPS, GAL-GPS,
    /// BDS-GPS and IRN-GPS time offsets. Offsets of constellations that
    /// did not contribute are pinned to zero.
    pub dtr_s: [f64; 5],

    /// Number of satellites retained in the solution.
    pub ns: usize,

    /// Age of differential corrections (s). Always zero here, carried
    /// for record compatibility with differential solutions.
    pub age_s: f64,

    /// Ambiguity ratio factor. Always zero here, carried for record
    /// compatibility with fixed solutions.
    pub ratio: f64,

    /// [SolutionStatus] quality flag: [SolutionStatus::None] unless the
    /// position passed validation.
    pub status: SolutionStatus,

    /// Set when the doppler velocity estimator converged. Independent
    /// of [PVTSolution::status]: velocity is attempted even when the
    /// position was rejected.
    pub velocity_valid: bool,
}

/// Per satellite outcome of one resolution attempt, lockstep indexed
/// with the proposed [Candidate]s.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SatelliteStatus {
    /// [SV] identity
    pub sv: SV,

    /// Azimuth at reception (rad)
    pub azimuth_rad: f64,

    /// Elevation at reception (rad)
    pub elevation_rad: f64,

    /// True when this satellite contributed to the accepted residual
    /// vector on the last iteration.
    pub used: bool,

    /// Pseudorange residual (m)
    pub residual_m: f64,

    /// SNR on the primary frequency (dB-Hz)
    pub snr_dbhz: f64,
}

impl SatelliteStatus {
    pub(crate) fn new(candidate: &Candidate) -> Self {
        Self {
            sv: candidate.sv,
            snr_dbhz: candidate.primary().snr_dbhz.unwrap_or(0.0),
            ..Default::default()
        }
    }
}
