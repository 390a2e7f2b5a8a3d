#![doc = include_str!("../README.md")]

extern crate gnss_rs as gnss;

// private modules
mod bias;
mod candidate;
mod carrier;
mod cfg;
mod constants;
mod ephemeris;
mod error;
mod geodesy;
mod navigation;
mod solutions;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::bias::{GroupDelay, IonosphereModel, KbModel, TroposphereModel};
    pub use crate::candidate::{Candidate, Observation};
    pub use crate::carrier::{Carrier, SignalCode};
    pub use crate::cfg::{Config, Ephemerides, MeasurementErrorModel, Mode, SnrMask};
    pub use crate::ephemeris::{EphemerisSource, NavigationData, SatelliteState};
    pub use crate::error::Error;
    pub use crate::geodesy::{
        azimuth_elevation, ecef_to_enu, ecef_to_geodetic, enu_rotation, geodetic_to_ecef,
        geometric_distance,
    };
    pub use crate::solutions::{PVTSolution, SatelliteStatus, SolutionStatus};
    pub use crate::solver::Solver;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
    pub use std::rc::Rc;
}
