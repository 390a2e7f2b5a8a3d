/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD_S: f64 = 7.2921151467E-5;

/// WGS84 Earth Frame Ellipsoid semi-major axis (m)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84_M: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// Ionospheric delay std when no model compensates (m)
pub const ERR_ION_M: f64 = 5.0;

/// Tropospheric delay std when no model compensates (m)
pub const ERR_TROP_M: f64 = 3.0;

/// Saastamoinen model error std (m)
pub const ERR_SAAS_M: f64 = 0.3;

/// Broadcast ionosphere model error factor
pub const ERR_BRDCI: f64 = 0.5;

/// Code bias error std (m)
pub const ERR_CBIAS_M: f64 = 0.3;

/// Relative humidity for the Saastamoinen model
pub const REL_HUMI: f64 = 0.7;

/// Minimal elevation for the measurement error model (rad)
pub const MIN_EL_RAD: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// GLONASS measurement error factor
pub const EFACT_GLO: f64 = 1.5;

/// SBAS measurement error factor
pub const EFACT_SBS: f64 = 3.0;

/// Ephemeris variance ceiling: satellites above this are excluded (m²)
pub const MAX_VAR_EPH_M2: f64 = 300.0 * 300.0;
