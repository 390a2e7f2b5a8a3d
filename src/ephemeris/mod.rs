use crate::bias::{GroupDelay, KbModel};
use crate::carrier::{Carrier, SignalCode};
use crate::cfg::Config;
use crate::constants::MAX_VAR_EPH_M2;
use crate::prelude::{Candidate, Constellation, Epoch, Vector3, SV};

/// Orbital and clock state of one satellite, at signal transmission:
/// what an ephemeris evaluator (broadcast, SBAS augmented or precise)
/// produces for each [Candidate].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteState {
    /// APC position, ECEF (m)
    pub position_ecef_m: Vector3<f64>,

    /// Velocity, ECEF (m/s)
    pub velocity_ecef_m_s: Vector3<f64>,

    /// Clock bias (s)
    pub clock_bias_s: f64,

    /// Clock drift (s/s)
    pub clock_drift_s_s: f64,

    /// Ephemeris + clock variance (m²)
    pub variance_m2: f64,

    /// Health flags: negative means "no ephemeris available",
    /// any non zero value marks an unhealthy satellite.
    pub health: i32,
}

impl Default for SatelliteState {
    fn default() -> Self {
        Self {
            position_ecef_m: Vector3::zeros(),
            velocity_ecef_m_s: Vector3::zeros(),
            clock_bias_s: 0.0,
            clock_drift_s_s: 0.0,
            variance_m2: 0.0,
            health: -1,
        }
    }
}

/// [EphemerisSource] evaluates satellite orbital states so the solving
/// process can proceed. Implement it over your broadcast ephemeris
/// evaluator, SP3 interpolator or hardware feed.
pub trait EphemerisSource {
    /// Provide the [SatelliteState] of this [Candidate] for the
    /// measurement epoch, accounting for signal flight time.
    /// If you can't provide (missing data?): simply return None
    /// and the satellite will not contribute.
    fn state_at(&self, epoch: Epoch, candidate: &Candidate) -> Option<SatelliteState>;
}

/// [NavigationData] exposes the broadcast navigation products the
/// correction models consume. Every method has a neutral default, so an
/// implementation only provides what it actually decodes.
pub trait NavigationData {
    /// Broadcast group delay parameter, in meters of delay.
    /// Unknown parameters return 0 (no compensation).
    /// [GroupDelay::DtauN] follows the usual convention and is returned
    /// as -dτₙ·c.
    fn group_delay_m(&self, _sv: SV, _param: GroupDelay) -> f64 {
        0.0
    }

    /// Differential code bias (m) bringing this tracking code to the
    /// constellation reference code (C1→P1, C2→P2).
    fn code_bias_m(&self, _sv: SV, _code: SignalCode) -> f64 {
        0.0
    }

    /// GPS broadcast Klobuchar coefficients, when decoded.
    fn klobuchar_gps(&self) -> Option<KbModel> {
        None
    }

    /// QZSS broadcast Klobuchar coefficients, when decoded.
    fn klobuchar_qzss(&self) -> Option<KbModel> {
        None
    }

    /// GLONASS FDMA carrier frequency (Hz) for this satellite.
    /// None drops the satellite: the channel number comes from the
    /// GLONASS ephemeris frame.
    fn glonass_frequency_hz(&self, _sv: SV, _carrier: Carrier) -> Option<f64> {
        None
    }

    /// True when the Galileo F/NAV message is selected (E5a pairing),
    /// false for I/NAV (E5b pairing). Drives the BGD selection.
    fn galileo_fnav(&self) -> bool {
        false
    }

    /// SBAS grid ionosphere correction: L1 delay and variance (m, m²)
    /// for this geodetic position (lat rad, lon rad, h m) and
    /// (azimuth, elevation). None when the grid cannot serve this
    /// geometry, which drops the satellite.
    fn sbas_ionosphere(
        &self,
        _epoch: Epoch,
        _position_geodetic: &Vector3<f64>,
        _azel_rad: (f64, f64),
    ) -> Option<(f64, f64)> {
        None
    }

    /// IONEX TEC map correction: L1 delay and variance (m, m²).
    /// None drops the satellite.
    fn ionex_tec(
        &self,
        _epoch: Epoch,
        _position_geodetic: &Vector3<f64>,
        _azel_rad: (f64, f64),
    ) -> Option<(f64, f64)> {
        None
    }

    /// SBAS (MOPS) troposphere correction: delay and variance (m, m²).
    /// None drops the satellite.
    fn sbas_troposphere(
        &self,
        _epoch: Epoch,
        _position_geodetic: &Vector3<f64>,
        _azel_rad: (f64, f64),
    ) -> Option<(f64, f64)> {
        None
    }
}

/// Satellite exclusion test.
pub(crate) fn is_excluded(sv: SV, state: &SatelliteState, cfg: &Config) -> bool {
    if state.health < 0 {
        return true; // ephemeris unavailable
    }

    if cfg.excluded_sv.contains(&sv) {
        return true;
    }

    if cfg.forced_sv.contains(&sv) {
        return false;
    }

    if !cfg.constellations.contains(&sv.constellation) {
        return true;
    }

    let mut health = state.health;

    if sv.constellation == Constellation::QZSS {
        health &= 0xFE; // mask the QZSS LEX health bit
    }

    if health != 0 {
        return true;
    }

    state.variance_m2 > MAX_VAR_EPH_M2
}

#[cfg(test)]
mod test {
    use super::{is_excluded, SatelliteState};
    use crate::cfg::Config;
    use crate::prelude::{Constellation, SV};

    fn healthy() -> SatelliteState {
        SatelliteState {
            health: 0,
            ..Default::default()
        }
    }

    #[test]
    fn exclusion() {
        let cfg = Config::default();
        let g01 = SV::new(Constellation::GPS, 1);

        assert!(is_excluded(g01, &SatelliteState::default(), &cfg));
        assert!(!is_excluded(g01, &healthy(), &cfg));

        let mut unhealthy = healthy();
        unhealthy.health = 1;
        assert!(is_excluded(g01, &unhealthy, &cfg));

        let mut poor_ephemeris = healthy();
        poor_ephemeris.variance_m2 = 301.0 * 301.0;
        assert!(is_excluded(g01, &poor_ephemeris, &cfg));
    }

    #[test]
    fn qzss_lex_health_is_masked() {
        let cfg = Config::default();
        let j01 = SV::new(Constellation::QZSS, 1);

        let mut state = healthy();
        state.health = 1; // LEX bit only
        assert!(!is_excluded(j01, &state, &cfg));

        state.health = 2;
        assert!(is_excluded(j01, &state, &cfg));
    }

    #[test]
    fn forced_and_excluded_lists() {
        let g01 = SV::new(Constellation::GPS, 1);

        let mut cfg = Config::default();
        cfg.excluded_sv.push(g01);
        assert!(is_excluded(g01, &healthy(), &cfg));

        let mut cfg = Config::default();
        cfg.forced_sv.push(g01);
        let mut unhealthy = healthy();
        unhealthy.health = 4;
        assert!(!is_excluded(g01, &unhealthy, &cfg));
    }
}
