//! Geodetic and frame primitives shared by the solving process.
use crate::constants::{
    EARTH_ANGULAR_VEL_RAD_S, EARTH_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84_M,
    SPEED_OF_LIGHT_M_S,
};

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

/// ECEF (m) to geodetic (lat rad, lon rad, ellipsoidal height m),
/// on the WGS84 ellipsoid.
pub fn ecef_to_geodetic(r: &Vector3<f64>) -> Vector3<f64> {
    let e2 = EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);
    let r2 = r[0] * r[0] + r[1] * r[1];

    let mut v = EARTH_SEMI_MAJOR_AXIS_WGS84_M;
    let mut z = r[2];
    let mut zk = 0.0;

    while (z - zk).abs() >= 1.0E-9 {
        zk = z;
        let sinp = z / (r2 + z * z).sqrt();
        v = EARTH_SEMI_MAJOR_AXIS_WGS84_M / (1.0 - e2 * sinp * sinp).sqrt();
        z = r[2] + v * e2 * sinp;
    }

    let lat = if r2 > 1.0E-12 {
        (z / r2.sqrt()).atan()
    } else if r[2] > 0.0 {
        PI / 2.0
    } else {
        -PI / 2.0
    };

    let lon = if r2 > 1.0E-12 { r[1].atan2(r[0]) } else { 0.0 };

    Vector3::new(lat, lon, (r2 + z * z).sqrt() - v)
}

/// Geodetic (lat rad, lon rad, ellipsoidal height m) to ECEF (m).
pub fn geodetic_to_ecef(position_geodetic: &Vector3<f64>) -> Vector3<f64> {
    let (sinp, cosp) = position_geodetic[0].sin_cos();
    let (sinl, cosl) = position_geodetic[1].sin_cos();
    let h = position_geodetic[2];

    let e2 = EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);
    let v = EARTH_SEMI_MAJOR_AXIS_WGS84_M / (1.0 - e2 * sinp * sinp).sqrt();

    Vector3::new(
        (v + h) * cosp * cosl,
        (v + h) * cosp * sinl,
        (v * (1.0 - e2) + h) * sinp,
    )
}

/// Rotation from ECEF to local ENU coordinates at this geodetic position:
/// rows are the East, North and Up unit vectors.
pub fn enu_rotation(position_geodetic: &Vector3<f64>) -> Matrix3<f64> {
    let (sinp, cosp) = position_geodetic[0].sin_cos();
    let (sinl, cosl) = position_geodetic[1].sin_cos();

    Matrix3::new(
        -sinl,
        cosl,
        0.0,
        -sinp * cosl,
        -sinp * sinl,
        cosp,
        cosp * cosl,
        cosp * sinl,
        sinp,
    )
}

/// ECEF vector to local ENU coordinates at this geodetic position.
pub fn ecef_to_enu(position_geodetic: &Vector3<f64>, r: &Vector3<f64>) -> Vector3<f64> {
    enu_rotation(position_geodetic) * r
}

/// Geometric distance (m) between satellite and receiver ECEF positions,
/// Sagnac correction included, along with the receiver-to-satellite unit
/// vector. None when the satellite position is physically invalid.
pub fn geometric_distance(
    rs: &Vector3<f64>,
    rr: &Vector3<f64>,
) -> Option<(f64, Vector3<f64>)> {
    if rs.norm() < EARTH_SEMI_MAJOR_AXIS_WGS84_M {
        return None;
    }

    let d = rs - rr;
    let r = d.norm();
    let e = d / r;

    Some((
        r + EARTH_ANGULAR_VEL_RAD_S * (rs[0] * rr[1] - rs[1] * rr[0]) / SPEED_OF_LIGHT_M_S,
        e,
    ))
}

/// Satellite (azimuth, elevation) in radians, seen from this geodetic
/// position along the receiver-to-satellite unit vector.
pub fn azimuth_elevation(
    position_geodetic: &Vector3<f64>,
    e: &Vector3<f64>,
) -> (f64, f64) {
    let mut az = 0.0;
    let mut el = PI / 2.0;

    if position_geodetic[2] > -EARTH_SEMI_MAJOR_AXIS_WGS84_M {
        let enu = ecef_to_enu(position_geodetic, e);

        az = if enu[0] * enu[0] + enu[1] * enu[1] < 1.0E-12 {
            0.0
        } else {
            enu[0].atan2(enu[1])
        };

        if az < 0.0 {
            az += 2.0 * PI;
        }

        el = enu[2].asin();
    }

    (az, el)
}
