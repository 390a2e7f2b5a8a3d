use crate::constants::{ERR_SAAS_M, ERR_TROP_M, REL_HUMI};
use crate::ephemeris::NavigationData;
use crate::prelude::{Epoch, Vector3};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tropospheric correction option.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TroposphereModel {
    /// No compensation: a conservative 3 m std is carried in the
    /// measurement weighting instead.
    Off,
    /// Saastamoinen dry + wet model over a standard atmosphere.
    #[default]
    Saastamoinen,
    /// Saastamoinen here, the residual zenith delay being estimated
    /// by a downstream precise process.
    SaastamoinenEstimated,
    /// SBAS (MOPS) model, through the
    /// [NavigationData](crate::prelude::NavigationData) provider.
    Sbas,
}

/// Saastamoinen slant delay (m) over a standard atmosphere.
///
/// ## Input
/// - position_geodetic: receiver (lat rad, lon rad, h m)
/// - azel_rad: satellite (azimuth, elevation)
/// - humidity: relative humidity (0.7 for the broadcast usage)
pub(crate) fn saastamoinen_delay_m(
    position_geodetic: &Vector3<f64>,
    azel_rad: (f64, f64),
    humidity: f64,
) -> f64 {
    const TEMP0_C: f64 = 15.0; // temperature at sea level

    let h = position_geodetic[2];
    let el = azel_rad.1;

    if h < -100.0 || h > 1.0E4 || el <= 0.0 {
        return 0.0;
    }

    // standard atmosphere
    let hgt = h.max(0.0);
    let pres = 1013.25 * (1.0 - 2.2557E-5 * hgt).powf(5.2568);
    let temp = TEMP0_C - 6.5E-3 * hgt + 273.16;
    let e = 6.108 * humidity * ((17.15 * temp - 4684.0) / (temp - 38.45)).exp();

    let z = PI / 2.0 - el;

    let trph = 0.0022768 * pres
        / (1.0 - 0.00266 * (2.0 * position_geodetic[0]).cos() - 0.00028 * hgt / 1.0E3)
        / z.cos();
    let trpw = 0.002277 * (1255.0 / temp + 0.05) * e / z.cos();

    trph + trpw
}

/// Tropospheric delay and variance (m, m²) for the selected model.
/// None when the model cannot serve this geometry: the satellite is
/// then dropped.
pub(crate) fn correction<N: NavigationData>(
    t: Epoch,
    nav: &N,
    position_geodetic: &Vector3<f64>,
    azel_rad: (f64, f64),
    model: TroposphereModel,
) -> Option<(f64, f64)> {
    match model {
        TroposphereModel::Saastamoinen | TroposphereModel::SaastamoinenEstimated => {
            let delay = saastamoinen_delay_m(position_geodetic, azel_rad, REL_HUMI);
            let var = (ERR_SAAS_M / (azel_rad.1.sin() + 0.1)).powi(2);
            Some((delay, var))
        },
        TroposphereModel::Sbas => nav.sbas_troposphere(t, position_geodetic, azel_rad),
        TroposphereModel::Off => Some((0.0, ERR_TROP_M * ERR_TROP_M)),
    }
}

#[cfg(test)]
mod test {
    use super::saastamoinen_delay_m;
    use crate::prelude::Vector3;

    #[test]
    fn saastamoinen_sea_level() {
        let pos = Vector3::new(45.0_f64.to_radians(), 0.0, 0.0);

        let zenith = saastamoinen_delay_m(&pos, (0.0, 90.0_f64.to_radians()), 0.7);
        assert!(
            (zenith - 2.4).abs() < 0.3,
            "unrealistic zenith delay: {}",
            zenith
        );

        let low = saastamoinen_delay_m(&pos, (0.0, 15.0_f64.to_radians()), 0.7);
        assert!(low > 3.0 * zenith, "mapping too weak: {} vs {}", low, zenith);
    }

    #[test]
    fn saastamoinen_out_of_domain() {
        let pos = Vector3::new(0.0, 0.0, 20.0E3);
        assert_eq!(saastamoinen_delay_m(&pos, (0.0, 1.0), 0.7), 0.0);
    }
}
