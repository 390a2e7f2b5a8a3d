//! Synthetic constellation builders: satellites are placed by azimuth,
//! elevation and range around a truth receiver position, and the
//! measurements are generated through the same geometric model the
//! solver inverts.
use crate::constants::{EARTH_ANGULAR_VEL_RAD_S, SPEED_OF_LIGHT_M_S};
use crate::prelude::{
    azimuth_elevation, enu_rotation, geodetic_to_ecef, geometric_distance, Candidate,
    Constellation, Epoch, EphemerisSource, NavigationData, Observation, SatelliteState,
    SignalCode, Vector3, SV,
};

use std::str::FromStr;

/// Navigation data provider with nothing decoded.
pub struct NullNav;

impl NavigationData for NullNav {}

/// Fixed per satellite states, as an ephemeris evaluator would
/// produce them.
pub struct StaticEphemeris {
    states: Vec<(SV, SatelliteState)>,
}

impl StaticEphemeris {
    pub fn set_health(&mut self, health: i32) {
        for (_, state) in self.states.iter_mut() {
            state.health = health;
        }
    }
}

impl EphemerisSource for StaticEphemeris {
    fn state_at(&self, _epoch: Epoch, candidate: &Candidate) -> Option<SatelliteState> {
        self.states
            .iter()
            .filter_map(|(sv, state)| {
                if *sv == candidate.sv {
                    Some(*state)
                } else {
                    None
                }
            })
            .next()
    }
}

pub fn t0() -> Epoch {
    Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap()
}

pub fn receiver_geodetic() -> Vector3<f64> {
    Vector3::new(45.0_f64.to_radians(), 10.0_f64.to_radians(), 150.0)
}

pub fn receiver_ecef() -> Vector3<f64> {
    geodetic_to_ecef(&receiver_geodetic())
}

/// One synthetic satellite of a test epoch.
#[derive(Clone, Copy)]
pub struct SyntheticSat {
    pub sv: SV,
    pub code: SignalCode,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_m: f64,
    /// Additional pseudorange fault (m)
    pub bias_m: f64,
}

pub fn gps(prn: u8, azimuth_deg: f64, elevation_deg: f64) -> SyntheticSat {
    SyntheticSat {
        sv: SV::new(Constellation::GPS, prn),
        code: SignalCode::L1CA,
        azimuth_deg,
        elevation_deg,
        range_m: 22.0E6 + prn as f64 * 1.0E5,
        bias_m: 0.0,
    }
}

pub fn galileo(prn: u8, azimuth_deg: f64, elevation_deg: f64) -> SyntheticSat {
    SyntheticSat {
        sv: SV::new(Constellation::Galileo, prn),
        code: SignalCode::E1BC,
        azimuth_deg,
        elevation_deg,
        range_m: 24.0E6 + prn as f64 * 1.0E5,
        bias_m: 0.0,
    }
}

impl SyntheticSat {
    pub fn with_bias_m(&self, bias_m: f64) -> Self {
        let mut s = *self;
        s.bias_m = bias_m;
        s
    }

    fn position_ecef(&self) -> Vector3<f64> {
        let (az, el) = (
            self.azimuth_deg.to_radians(),
            self.elevation_deg.to_radians(),
        );
        let enu = Vector3::new(az.sin() * el.cos(), az.cos() * el.cos(), el.sin()) * self.range_m;
        receiver_ecef() + enu_rotation(&receiver_geodetic()).transpose() * enu
    }

    fn velocity_ecef(&self) -> Vector3<f64> {
        let rs = self.position_ecef();
        Vector3::new(-rs[1], rs[0], 0.0).normalize() * 3.0E3
    }
}

/// Builds one complete test epoch: candidates plus their ephemeris.
///
/// ## Input
/// - sats: the synthetic constellation
/// - clock_bias_s: true receiver clock bias, folded into every
///   pseudorange
/// - velocity_m_s: true receiver velocity. When provided, consistent
///   doppler measurements are generated on every satellite.
pub fn build_epoch(
    sats: &[SyntheticSat],
    clock_bias_s: f64,
    velocity_m_s: Option<Vector3<f64>>,
) -> (Vec<Candidate>, StaticEphemeris) {
    let rr = receiver_ecef();
    let pos = receiver_geodetic();

    let mut candidates = Vec::with_capacity(sats.len());
    let mut states = Vec::with_capacity(sats.len());

    for sat in sats.iter() {
        let rs = sat.position_ecef();
        let vs = sat.velocity_ecef();

        let (range, e) = geometric_distance(&rs, &rr).unwrap();
        let pseudo_range = range + SPEED_OF_LIGHT_M_S * clock_bias_s + sat.bias_m;

        let mut observation = Observation::pseudo_range(sat.code, pseudo_range, Some(45.0));

        if let Some(v_rx) = velocity_m_s {
            let (az, el) = azimuth_elevation(&pos, &e);
            let cos_el = el.cos();
            let a = Vector3::new(az.sin() * cos_el, az.cos() * cos_el, el.sin());
            let los = enu_rotation(&pos).transpose() * a;

            let rate = (vs - v_rx).dot(&los)
                + EARTH_ANGULAR_VEL_RAD_S / SPEED_OF_LIGHT_M_S
                    * (vs[1] * rr[0] + rs[1] * v_rx[0] - vs[0] * rr[1] - rs[0] * v_rx[1]);

            let freq = sat.code.carrier(sat.sv.constellation).frequency_hz();
            observation = observation.with_doppler(-rate * freq / SPEED_OF_LIGHT_M_S);
        }

        candidates.push(Candidate::single_frequency(sat.sv, t0(), observation));

        states.push((
            sat.sv,
            SatelliteState {
                position_ecef_m: rs,
                velocity_ecef_m_s: vs,
                clock_bias_s: 0.0,
                clock_drift_s_s: 0.0,
                variance_m2: 0.0,
                health: 0,
            },
        ));
    }

    (candidates, StaticEphemeris { states })
}

/// Six satellites, open sky: a clean reference geometry.
pub fn open_sky() -> Vec<SyntheticSat> {
    vec![
        gps(1, 0.0, 75.0),
        gps(5, 45.0, 40.0),
        gps(7, 120.0, 35.0),
        gps(9, 190.0, 50.0),
        gps(13, 250.0, 30.0),
        gps(15, 310.0, 45.0),
    ]
}

