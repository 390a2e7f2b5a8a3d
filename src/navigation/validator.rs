use nalgebra::DVector;

use crate::cfg::Config;
use crate::error::Error;
use crate::navigation::dop::DilutionOfPrecision;
use crate::solutions::SatelliteStatus;

/// Chi-square one sided critical values, alpha = 0.001, indexed by
/// degrees of freedom - 1.
const CHISQR: [f64; 100] = [
    10.8, 13.8, 16.3, 18.5, 20.5, 22.5, 24.3, 26.1, 27.9, 29.6, 31.3, 32.9, 34.5, 36.1, 37.7,
    39.3, 40.8, 42.3, 43.8, 45.3, 46.8, 48.3, 49.7, 51.2, 52.6, 54.1, 55.5, 56.9, 58.3, 59.7,
    61.1, 62.5, 63.9, 65.2, 66.6, 68.0, 69.3, 70.7, 72.1, 73.4, 74.7, 76.0, 77.3, 78.6, 80.0,
    81.3, 82.6, 84.0, 85.4, 86.7, 88.0, 89.3, 90.6, 91.9, 93.3, 94.7, 96.0, 97.4, 98.7, 100.0,
    101.0, 102.0, 103.0, 104.0, 105.0, 107.0, 108.0, 109.0, 110.0, 112.0, 113.0, 114.0, 115.0,
    116.0, 118.0, 119.0, 120.0, 122.0, 123.0, 125.0, 126.0, 127.0, 128.0, 129.0, 131.0, 132.0,
    133.0, 134.0, 135.0, 137.0, 138.0, 139.0, 140.0, 142.0, 143.0, 144.0, 145.0, 147.0, 148.0,
    149.0,
];

/// Validates a converged solution: chi-square consistency of the
/// (whitened) residuals, then GDOP ceiling over the retained geometry.
pub(crate) fn validate(
    status: &[SatelliteStatus],
    cfg: &Config,
    v: &DVector<f64>,
    nv: usize,
    nx: usize,
) -> Result<(), Error> {
    // chi-square validation of residuals
    let vv = v.dot(v);

    if nv > nx {
        let threshold = CHISQR[(nv - nx - 1).min(CHISQR.len() - 1)];
        if vv > threshold {
            return Err(Error::ChiSquare { nv, vv, threshold });
        }
    }

    // large GDOP check
    let azel: Vec<(f64, f64)> = status
        .iter()
        .filter(|s| s.used)
        .map(|s| (s.azimuth_rad, s.elevation_rad))
        .collect();

    let dop = DilutionOfPrecision::new(&azel, cfg.min_elevation_rad);

    if dop.gdop <= 0.0 || dop.gdop > cfg.max_gdop {
        return Err(Error::Gdop {
            nv,
            gdop: dop.gdop,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{validate, CHISQR};
    use crate::cfg::Config;
    use crate::error::Error;
    use crate::solutions::SatelliteStatus;
    use nalgebra::DVector;

    fn open_sky_status() -> Vec<SatelliteStatus> {
        [
            (0.0, 90.0),
            (0.0, 30.0),
            (90.0, 30.0),
            (180.0, 30.0),
            (270.0, 30.0),
            (45.0, 60.0),
        ]
        .iter()
        .map(|(az, el): &(f64, f64)| SatelliteStatus {
            azimuth_rad: az.to_radians(),
            elevation_rad: el.to_radians(),
            used: true,
            ..Default::default()
        })
        .collect()
    }

    #[test]
    fn table_spot_values() {
        assert_eq!(CHISQR.len(), 100);
        assert_eq!(CHISQR[0], 10.8);
        assert_eq!(CHISQR[9], 29.6);
        assert_eq!(CHISQR[99], 149.0);
    }

    #[test]
    fn consistent_residuals_pass() {
        let cfg = Config::default().with_elevation_mask_deg(10.0);
        let status = open_sky_status();
        let v = DVector::from_element(10, 0.1);
        assert!(validate(&status, &cfg, &v, 10, 8).is_ok());
    }

    #[test]
    fn inconsistent_residuals_fail() {
        let cfg = Config::default().with_elevation_mask_deg(10.0);
        let status = open_sky_status();
        let v = DVector::from_element(10, 5.0);

        match validate(&status, &cfg, &v, 10, 8) {
            Err(Error::ChiSquare { nv, vv, threshold }) => {
                assert_eq!(nv, 10);
                assert!((vv - 250.0).abs() < 1.0E-9);
                assert_eq!(threshold, CHISQR[1]);
            },
            other => panic!("expected chi-square rejection, got {:?}", other),
        }
    }

    #[test]
    fn weak_geometry_fails() {
        let cfg = Config::default().with_max_gdop(1.0);
        let status = open_sky_status();
        let v = DVector::from_element(10, 0.0);

        assert!(matches!(
            validate(&status, &cfg, &v, 10, 8),
            Err(Error::Gdop { .. })
        ));
    }
}
