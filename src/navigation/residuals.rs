//! Pseudorange residual assembly
use log::{trace, warn};
use nalgebra::{DMatrix, DVector, Vector3};

use crate::bias::{iono, spaceborn, tropo, IonosphereModel};
use crate::candidate::Candidate;
use crate::carrier::{carrier_frequency_hz, Carrier};
use crate::cfg::Config;
use crate::constants::{EFACT_GLO, EFACT_SBS, MIN_EL_RAD, SPEED_OF_LIGHT_M_S};
use crate::ephemeris::{is_excluded, NavigationData, SatelliteState};
use crate::geodesy::{azimuth_elevation, ecef_to_geodetic, geometric_distance};
use crate::navigation::NX;
use crate::prelude::Constellation;
use crate::solutions::SatelliteStatus;

/// Residual vector, design matrix and per row variances of one
/// linearization point.
pub(crate) struct CodeResiduals {
    /// Residual vector (m)
    pub v: DVector<f64>,
    /// Design matrix, one row per residual
    pub h: DMatrix<f64>,
    /// Per row variance (m²)
    pub var: DVector<f64>,
    /// Number of real satellites retained (excludes the
    /// pseudo observations)
    pub ns: usize,
}

/// Pseudorange measurement error variance (m²) from the configured
/// noise model.
pub(crate) fn measurement_variance(
    cfg: &Config,
    elevation_rad: f64,
    constellation: Constellation,
) -> f64 {
    let fact = if constellation == Constellation::Glonass {
        EFACT_GLO
    } else if constellation.is_sbas() {
        EFACT_SBS
    } else {
        1.0
    };

    let el = elevation_rad.max(MIN_EL_RAD);
    let model = &cfg.error_model;

    let mut var = model.code_factor.powi(2)
        * (model.code_bias_m.powi(2) + model.code_elevation_m.powi(2) / el.sin());

    if cfg.iono == IonosphereModel::IonosphereFree {
        var *= 9.0;
    }

    fact * fact * var
}

/// Column of the inter system time offset this constellation
/// contributes to. GPS, SBAS and QZSS share the receiver clock column.
fn time_offset_column(constellation: Constellation) -> Option<usize> {
    match constellation {
        Constellation::Glonass => Some(4),
        Constellation::Galileo => Some(5),
        Constellation::BeiDou => Some(6),
        Constellation::IRNSS => Some(7),
        _ => None,
    }
}

fn supported(constellation: Constellation) -> bool {
    matches!(
        constellation,
        Constellation::GPS
            | Constellation::Glonass
            | Constellation::Galileo
            | Constellation::BeiDou
            | Constellation::QZSS
            | Constellation::IRNSS
    ) || constellation.is_sbas()
}

fn snr_accepted(candidate: &Candidate, elevation_rad: f64, cfg: &Config) -> bool {
    let mask = &cfg.snr_mask;

    if !mask.accepts(
        0,
        elevation_rad,
        candidate.signals[0].snr_dbhz.unwrap_or(0.0),
    ) {
        return false;
    }

    if cfg.iono == IonosphereModel::IonosphereFree
        && !mask.accepts(
            1,
            elevation_rad,
            candidate.signals[1].snr_dbhz.unwrap_or(0.0),
        )
    {
        return false;
    }

    true
}

/// Builds the pseudorange residual system at state `x`.
/// Iteration 0 is the bootstrap: the receiver position estimate is not
/// trustworthy yet, so elevation, SNR and atmosphere gates are deferred
/// to later iterations.
pub(crate) fn code_residuals<N: NavigationData>(
    iteration: usize,
    candidates: &[Candidate],
    states: &[SatelliteState],
    nav: &N,
    cfg: &Config,
    x: &DVector<f64>,
    status: &mut [SatelliteStatus],
) -> CodeResiduals {
    let n = candidates.len();

    let rr = Vector3::new(x[0], x[1], x[2]);
    let dtr = x[3];
    let position_geodetic = ecef_to_geodetic(&rr);

    let mut v = Vec::with_capacity(n + NX - 3);
    let mut h = Vec::with_capacity((n + NX - 3) * NX);
    let mut var = Vec::with_capacity(n + NX - 3);

    let mut ns = 0;
    let mut seen = [false; NX - 3];

    for s in status.iter_mut() {
        s.used = false;
        s.azimuth_rad = 0.0;
        s.elevation_rad = 0.0;
        s.residual_m = 0.0;
    }

    let mut skip_next = false;

    for (i, candidate) in candidates.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }

        let constellation = candidate.sv.constellation;
        if !supported(constellation) {
            continue;
        }

        // reject duplicated observation data
        if i + 1 < n && candidate.sv == candidates[i + 1].sv {
            warn!(
                "{} ({}) - duplicated observation data",
                candidate.epoch, candidate.sv
            );
            skip_next = true;
            continue;
        }

        if is_excluded(candidate.sv, &states[i], cfg) {
            continue;
        }

        // geometric distance
        let Some((r, e)) = geometric_distance(&states[i].position_ecef_m, &rr) else {
            continue;
        };

        let (mut dion, mut vion) = (0.0, 0.0);
        let (mut dtrp, mut vtrp) = (0.0, 0.0);

        if iteration > 0 {
            let (az, el) = azimuth_elevation(&position_geodetic, &e);
            status[i].azimuth_rad = az;
            status[i].elevation_rad = el;

            // elevation mask
            if el < cfg.min_elevation_rad {
                continue;
            }

            // SNR mask
            if !snr_accepted(candidate, el, cfg) {
                continue;
            }

            // ionospheric correction, scaled to the signal frequency
            let Some((di, vi)) = iono::correction(
                candidate.epoch,
                nav,
                &position_geodetic,
                (az, el),
                cfg.iono,
            ) else {
                continue;
            };

            let Some(freq) = carrier_frequency_hz(candidate.sv, candidate.signals[0].code, nav)
            else {
                continue;
            };

            let scale = (Carrier::L1.frequency_hz() / freq).powi(2);
            dion = di * scale;
            vion = vi * scale;

            // tropospheric correction
            let Some((dt, vt)) = tropo::correction(
                candidate.epoch,
                nav,
                &position_geodetic,
                (az, el),
                cfg.tropo,
            ) else {
                continue;
            };

            dtrp = dt;
            vtrp = vt;
        }

        // pseudorange with code bias correction
        let Some((p, vmeas)) = spaceborn::corrected_pseudorange(candidate, nav, cfg) else {
            continue;
        };

        // pseudorange residual
        let mut residual =
            p - (r + dtr - SPEED_OF_LIGHT_M_S * states[i].clock_bias_s + dion + dtrp);

        let mut row = [0.0; NX];
        row[0] = -e[0];
        row[1] = -e[1];
        row[2] = -e[2];
        row[3] = 1.0;

        // time system offset and receiver bias correction
        match time_offset_column(constellation) {
            Some(column) => {
                residual -= x[column];
                row[column] = 1.0;
                seen[column - 3] = true;
            },
            None => {
                seen[0] = true;
            },
        }

        status[i].used = true;
        status[i].residual_m = residual;
        ns += 1;

        v.push(residual);
        h.extend(row);
        var.push(
            measurement_variance(cfg, status[i].elevation_rad, constellation)
                + states[i].variance_m2
                + vmeas
                + vion
                + vtrp,
        );

        trace!(
            "{} ({}) azel={:.1}/{:.1} res={:.3} sig={:.3}",
            candidate.epoch,
            candidate.sv,
            status[i].azimuth_rad.to_degrees(),
            status[i].elevation_rad.to_degrees(),
            residual,
            var.last().unwrap_or(&0.0).sqrt()
        );
    }

    // constraint to avoid rank deficiency: pin every unobserved
    // clock / offset column
    for (j, seen) in seen.iter().enumerate() {
        if *seen {
            continue;
        }
        let mut row = [0.0; NX];
        row[j + 3] = 1.0;
        v.push(0.0);
        h.extend(row);
        var.push(0.01);
    }

    let nv = v.len();

    CodeResiduals {
        v: DVector::from_vec(v),
        h: DMatrix::from_row_slice(nv, NX, &h),
        var: DVector::from_vec(var),
        ns,
    }
}
