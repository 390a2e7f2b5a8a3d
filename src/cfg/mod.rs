use crate::bias::{IonosphereModel, TroposphereModel};
use crate::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Positioning mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Standalone single point positioning.
    #[default]
    Single,
    /// The epoch solution seeds a downstream precise (PPP / RTK) process.
    /// Atmosphere options are forced to the broadcast models, the precise
    /// estimator handles the remainder itself.
    Precise,
}

/// Ephemerides in use: tags the solution quality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Ephemerides {
    /// Broadcast ephemerides
    #[default]
    Broadcast,
    /// Broadcast ephemerides with SBAS corrections applied
    SbasAugmented,
    /// Precise products
    Precise,
}

/// Pseudo range and doppler noise model scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasurementErrorModel {
    /// Code error ratio
    pub code_factor: f64,
    /// Code error constant term (m)
    pub code_bias_m: f64,
    /// Code error elevation dependent term (m)
    pub code_elevation_m: f64,
    /// Doppler measurement std (Hz). Zero or negative disables
    /// the doppler weighting.
    pub doppler_std_hz: f64,
}

impl Default for MeasurementErrorModel {
    fn default() -> Self {
        Self {
            code_factor: 100.0,
            code_bias_m: 0.003,
            code_elevation_m: 0.003,
            doppler_std_hz: 1.0,
        }
    }
}

/// Elevation banded SNR mask. Thresholds are expressed in dB-Hz for the
/// nine 10° wide elevation bands centered on 5°, 15°, .. 85°, one row per
/// frequency slot. A satellite below the (linearly interpolated) threshold
/// does not contribute.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnrMask {
    /// Mask activation: a disabled mask accepts everything.
    pub enabled: bool,
    /// Per frequency thresholds (dB-Hz), nine elevation bands each.
    pub thresholds_dbhz: [[f64; 9]; 2],
}

impl SnrMask {
    /// True when this (elevation, SNR) passes the mask on given
    /// frequency slot.
    pub fn accepts(&self, frequency: usize, elevation_rad: f64, snr_dbhz: f64) -> bool {
        if !self.enabled || frequency >= 2 {
            return true;
        }

        let a = (elevation_rad.to_degrees() + 5.0) / 10.0;
        let i = a.floor() as i64;
        let a = a - i as f64;

        let table = &self.thresholds_dbhz[frequency];

        let min_snr = if i < 1 {
            table[0]
        } else if i > 8 {
            table[8]
        } else {
            (1.0 - a) * table[(i - 1) as usize] + a * table[i as usize]
        };

        snr_dbhz >= min_snr
    }
}

fn default_constellations() -> Vec<Constellation> {
    vec![
        Constellation::GPS,
        Constellation::Glonass,
        Constellation::Galileo,
        Constellation::BeiDou,
        Constellation::QZSS,
        Constellation::SBAS,
        Constellation::IRNSS,
    ]
}

/// Processing options consumed by the [Solver](crate::prelude::Solver).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Positioning [Mode]
    pub mode: Mode,

    /// [IonosphereModel] in use
    pub iono: IonosphereModel,

    /// [TroposphereModel] in use
    pub tropo: TroposphereModel,

    /// [Ephemerides] in use: tags the solution quality.
    pub ephemerides: Ephemerides,

    /// Minimal SV elevation angle for an SV to contribute to the
    /// solution (rad).
    pub min_elevation_rad: f64,

    /// Elevation banded [SnrMask]
    pub snr_mask: SnrMask,

    /// [MeasurementErrorModel] scalars
    pub error_model: MeasurementErrorModel,

    /// GDOP ceiling: solutions above are rejected.
    pub max_gdop: f64,

    /// Enable the RAIM fault detection and exclusion search
    /// on rejected epochs.
    pub raim_fde: bool,

    /// [Constellation]s allowed to contribute.
    pub constellations: Vec<Constellation>,

    /// Satellites to exclude unconditionally.
    pub excluded_sv: Vec<SV>,

    /// Satellites to retain regardless of health and ephemeris quality.
    pub forced_sv: Vec<SV>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            iono: Default::default(),
            tropo: Default::default(),
            ephemerides: Default::default(),
            min_elevation_rad: 15.0_f64.to_radians(),
            snr_mask: Default::default(),
            error_model: Default::default(),
            max_gdop: 30.0,
            raim_fde: false,
            constellations: default_constellations(),
            excluded_sv: Vec::new(),
            forced_sv: Vec::new(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with RAIM-FDE enabled.
    pub fn with_raim_fde(&self) -> Self {
        let mut s = self.clone();
        s.raim_fde = true;
        s
    }

    /// Copies and returns [Config] with desired elevation mask, in degrees.
    pub fn with_elevation_mask_deg(&self, mask_deg: f64) -> Self {
        let mut s = self.clone();
        s.min_elevation_rad = mask_deg.to_radians();
        s
    }

    /// Copies and returns [Config] with desired GDOP ceiling.
    pub fn with_max_gdop(&self, max_gdop: f64) -> Self {
        let mut s = self.clone();
        s.max_gdop = max_gdop;
        s
    }

    /// Copies and returns [Config] with desired [IonosphereModel].
    pub fn with_ionosphere_model(&self, model: IonosphereModel) -> Self {
        let mut s = self.clone();
        s.iono = model;
        s
    }

    /// Copies and returns [Config] with desired [TroposphereModel].
    pub fn with_troposphere_model(&self, model: TroposphereModel) -> Self {
        let mut s = self.clone();
        s.tropo = model;
        s
    }
}

#[cfg(test)]
mod test {
    use super::SnrMask;
    use rstest::*;

    #[rstest]
    #[case(5.0, 35.0)]
    #[case(15.0, 36.0)]
    #[case(10.0, 35.5)]
    #[case(0.0, 35.0)]
    #[case(90.0, 43.0)]
    fn snr_mask_interpolation(#[case] elevation_deg: f64, #[case] threshold: f64) {
        let mask = SnrMask {
            enabled: true,
            thresholds_dbhz: [[35.0, 36.0, 37.0, 38.0, 39.0, 40.0, 41.0, 42.0, 43.0]; 2],
        };
        assert!(mask.accepts(0, elevation_deg.to_radians(), threshold));
        assert!(!mask.accepts(0, elevation_deg.to_radians(), threshold - 0.1));
    }

    #[test]
    fn disabled_mask_accepts_all() {
        let mask = SnrMask::default();
        assert!(mask.accepts(0, 0.0, 0.0));
        assert!(mask.accepts(1, 1.0, 0.0));
    }
}
