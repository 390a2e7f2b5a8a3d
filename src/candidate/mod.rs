//! Position solving candidate
use crate::carrier::SignalCode;
use crate::prelude::{Epoch, SV};

/// Signal measurements from one tracking channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observation {
    /// [SignalCode] that produced these measurements
    pub code: SignalCode,

    /// Code pseudo range (m)
    pub pseudo_range_m: Option<f64>,

    /// Carrier phase (cycles). Carried into the output records,
    /// not consumed by the solving process.
    pub phase_range_cycles: Option<f64>,

    /// Doppler (Hz, signed). Only consumed on the primary frequency.
    pub doppler_hz: Option<f64>,

    /// SNR (dB-Hz)
    pub snr_dbhz: Option<f64>,
}

impl Observation {
    /// Creates a new pseudo range [Observation] from a raw measurement
    /// in meters, and possible SNR information.
    pub fn pseudo_range(code: SignalCode, pseudo_range_m: f64, snr_dbhz: Option<f64>) -> Self {
        Self {
            code,
            snr_dbhz,
            doppler_hz: None,
            phase_range_cycles: None,
            pseudo_range_m: Some(pseudo_range_m),
        }
    }

    /// Copies and returns [Observation] with given doppler measurement (Hz).
    pub fn with_doppler(&self, doppler_hz: f64) -> Self {
        let mut s = *self;
        s.doppler_hz = Some(doppler_hz);
        s
    }

    /// Copies and returns [Observation] with given carrier phase
    /// measurement (cycles).
    pub fn with_phase_range(&self, phase_range_cycles: f64) -> Self {
        let mut s = *self;
        s.phase_range_cycles = Some(phase_range_cycles);
        s
    }
}

/// Position solving candidate: one satellite, one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// [SV] identity
    pub sv: SV,

    /// Sampling [Epoch] (receiver clock)
    pub epoch: Epoch,

    /// Signal observations on the primary and (possible) secondary
    /// frequency. The secondary slot is only consumed by the
    /// ionosphere-free combination.
    pub signals: [Observation; 2],
}

impl Candidate {
    /// Basic definition, to propose to the [Solver](crate::prelude::Solver).
    ///
    /// ## Input
    /// - sv: [SV] identity
    /// - epoch: sampling [Epoch]
    /// - signals: primary and secondary frequency [Observation]s
    pub fn new(sv: SV, epoch: Epoch, signals: [Observation; 2]) -> Self {
        Self { sv, epoch, signals }
    }

    /// Single frequency definition: the secondary slot stays empty.
    pub fn single_frequency(sv: SV, epoch: Epoch, observation: Observation) -> Self {
        Self {
            sv,
            epoch,
            signals: [observation, Default::default()],
        }
    }

    pub(crate) fn primary(&self) -> &Observation {
        &self.signals[0]
    }
}
