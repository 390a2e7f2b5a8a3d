use crate::constants::{ERR_BRDCI, ERR_ION_M, SPEED_OF_LIGHT_M_S};
use crate::ephemeris::NavigationData;
use crate::prelude::{Epoch, TimeScale, Vector3};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ionospheric correction option.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IonosphereModel {
    /// No compensation: a conservative 5 m std is carried in the
    /// measurement weighting instead.
    Off,
    /// GPS broadcast (Klobuchar) model.
    #[default]
    Klobuchar,
    /// SBAS grid corrections, through the
    /// [NavigationData](crate::prelude::NavigationData) provider.
    Sbas,
    /// First order cancellation with the dual frequency
    /// ionosphere-free combination.
    IonosphereFree,
    /// IONEX TEC maps, through the
    /// [NavigationData](crate::prelude::NavigationData) provider.
    Ionex,
    /// QZSS broadcast (Klobuchar) model.
    KlobucharQzss,
}

/// Klobuchar (8 coefficient) broadcast model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KbModel {
    /// Alpha coefficients (s, s/sc, s/sc², s/sc³)
    pub alpha: (f64, f64, f64, f64),
    /// Beta coefficients (s, s/sc, s/sc², s/sc³)
    pub beta: (f64, f64, f64, f64),
}

impl KbModel {
    /// The 2004-01-01 coefficient set: the fallback when broadcast
    /// coefficients are missing.
    pub const fn default_2004() -> Self {
        Self {
            alpha: (0.1118E-7, -0.7451E-8, -0.5961E-7, 0.1192E-6),
            beta: (0.1167E+6, -0.2294E+6, -0.1311E+6, 0.1049E+7),
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        let (a0, a1, a2, a3) = self.alpha;
        let (b0, b1, b2, b3) = self.beta;
        a0 == 0.0
            && a1 == 0.0
            && a2 == 0.0
            && a3 == 0.0
            && b0 == 0.0
            && b1 == 0.0
            && b2 == 0.0
            && b3 == 0.0
    }

    /// L1 slant delay (m) for this geometry.
    ///
    /// ## Input
    /// - t: [Epoch] of measurement
    /// - position_geodetic: receiver (lat rad, lon rad, h m)
    /// - azel_rad: satellite (azimuth, elevation)
    pub(crate) fn meters_delay(
        &self,
        t: Epoch,
        position_geodetic: &Vector3<f64>,
        azel_rad: (f64, f64),
    ) -> f64 {
        let (az, el) = azel_rad;

        if position_geodetic[2] < -1.0E3 || el <= 0.0 {
            return 0.0;
        }

        // earth centered angle (semi-circle)
        let psi = 0.0137 / (el / PI + 0.11) - 0.022;

        // subionospheric latitude/longitude (semi-circle)
        let phi = (position_geodetic[0] / PI + psi * az.cos()).clamp(-0.416, 0.416);
        let lam = position_geodetic[1] / PI + psi * az.sin() / (phi * PI).cos();

        // geomagnetic latitude (semi-circle)
        let phi = phi + 0.064 * ((lam - 1.617) * PI).cos();

        // local time (s)
        let tow = t.to_duration_in_time_scale(TimeScale::GPST).to_seconds();
        let mut tt = 43200.0 * lam + tow;
        tt -= (tt / 86400.0).floor() * 86400.0;

        // slant factor
        let f = 1.0 + 16.0 * (0.53 - el / PI).powi(3);

        let (a0, a1, a2, a3) = self.alpha;
        let (b0, b1, b2, b3) = self.beta;

        let amp = (a0 + phi * (a1 + phi * (a2 + phi * a3))).max(0.0);
        let per = (b0 + phi * (b1 + phi * (b2 + phi * b3))).max(72000.0);

        let x = 2.0 * PI * (tt - 50400.0) / per;

        let delay = if x.abs() < 1.57 {
            5E-9 + amp * (1.0 + x * x * (-0.5 + x * x / 24.0))
        } else {
            5E-9
        };

        SPEED_OF_LIGHT_M_S * f * delay
    }
}

/// L1 ionospheric delay and variance (m, m²) for the selected model.
/// None when the model cannot serve this geometry: the satellite is
/// then dropped.
pub(crate) fn correction<N: NavigationData>(
    t: Epoch,
    nav: &N,
    position_geodetic: &Vector3<f64>,
    azel_rad: (f64, f64),
    model: IonosphereModel,
) -> Option<(f64, f64)> {
    match model {
        IonosphereModel::Klobuchar => {
            let kb = nav
                .klobuchar_gps()
                .filter(|kb| !kb.is_null())
                .unwrap_or(KbModel::default_2004());

            let delay = kb.meters_delay(t, position_geodetic, azel_rad);
            Some((delay, (delay * ERR_BRDCI).powi(2)))
        },
        IonosphereModel::Sbas => nav.sbas_ionosphere(t, position_geodetic, azel_rad),
        IonosphereModel::Ionex => nav.ionex_tec(t, position_geodetic, azel_rad),
        IonosphereModel::KlobucharQzss => match nav.klobuchar_qzss().filter(|kb| !kb.is_null()) {
            Some(kb) => {
                let delay = kb.meters_delay(t, position_geodetic, azel_rad);
                Some((delay, (delay * ERR_BRDCI).powi(2)))
            },
            None => Some((0.0, 0.0)),
        },
        IonosphereModel::Off => Some((0.0, ERR_ION_M * ERR_ION_M)),
        IonosphereModel::IonosphereFree => Some((0.0, 0.0)),
    }
}

#[cfg(test)]
mod test {
    use super::KbModel;
    use crate::prelude::{Epoch, Vector3};
    use std::str::FromStr;

    #[test]
    fn klobuchar_midlatitude_daytime() {
        let kb = KbModel::default_2004();
        let t = Epoch::from_str("2020-06-25T12:00:00 GPST").unwrap();
        let pos = Vector3::new(45.0_f64.to_radians(), 10.0_f64.to_radians(), 0.0);

        let zenith = kb.meters_delay(t, &pos, (0.0, 90.0_f64.to_radians()));
        assert!(
            zenith > 1.0 && zenith < 30.0,
            "unrealistic zenith delay: {}",
            zenith
        );

        let low = kb.meters_delay(t, &pos, (0.0, 10.0_f64.to_radians()));
        assert!(low > zenith, "slant factor not applied: {} <= {}", low, zenith);
    }

    #[test]
    fn klobuchar_below_horizon() {
        let kb = KbModel::default_2004();
        let t = Epoch::from_str("2020-06-25T12:00:00 GPST").unwrap();
        let pos = Vector3::new(0.0, 0.0, 0.0);
        assert_eq!(kb.meters_delay(t, &pos, (0.0, 0.0)), 0.0);
    }
}
