use crate::ephemeris::NavigationData;
use crate::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GLONASS G1 FDMA channel spacing (Hz)
pub const GLONASS_G1_SPACING_HZ: f64 = 562.5E3;

/// GLONASS G2 FDMA channel spacing (Hz)
pub const GLONASS_G2_SPACING_HZ: f64 = 437.5E3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// [Carrier::L1] (1575.42) (GPS +QZSS +SBAS +Galileo E1 +BDS B1C)
    #[default]
    L1,
    /// [Carrier::L2] (1227.60) (GPS +QZSS)
    L2,
    /// [Carrier::L5] (1176.45) (GPS +QZSS +SBAS +Galileo E5a +IRNSS)
    L5,
    /// [Carrier::E5b] (1207.140) (Galileo)
    E5b,
    /// [Carrier::B1] (1561.098) (BDS B1I)
    B1,
    /// [Carrier::B2] (1207.140) (BDS B2I)
    B2,
    /// [Carrier::S] (2492.028) (IRNSS)
    S,
    /// [Carrier::G1] (1602.00 nominal) (Glonass)
    G1,
    /// [Carrier::G2] (1246.00 nominal) (Glonass)
    G2,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::E5b => write!(f, "E5b"),
            Self::B1 => write!(f, "B1"),
            Self::B2 => write!(f, "B2"),
            Self::S => write!(f, "S"),
            Self::G1 => write!(f, "G1"),
            Self::G2 => write!(f, "G2"),
        }
    }
}

impl Carrier {
    /// Returns the nominal carrier frequency in Hertz.
    /// For the GLONASS FDMA bands this is the channel 0 frequency:
    /// see [carrier_frequency_hz] for channel resolution.
    pub const fn frequency_hz(&self) -> f64 {
        match self {
            Self::L1 => 1575.42E6,
            Self::L2 => 1227.60E6,
            Self::L5 => 1176.45E6,
            Self::E5b => 1207.140E6,
            Self::B1 => 1561.098E6,
            Self::B2 => 1207.140E6,
            Self::S => 2492.028E6,
            Self::G1 => 1602.00E6,
            Self::G2 => 1246.00E6,
        }
    }
}

/// [SignalCode] identifies the tracking channel a measurement came from.
/// The distinction matters for the group delay parameter selection
/// (BeiDou B1 family in particular) and for differential code biases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignalCode {
    /// L1 C/A (GPS, QZSS, SBAS) or G1 C/A (Glonass)
    #[default]
    L1CA,
    /// Galileo E1 B/C
    E1BC,
    /// BeiDou B1I
    B1I,
    /// BeiDou B1C pilot
    B1CP,
    /// BeiDou B1C data
    B1CD,
    /// GPS / QZSS L2C
    L2C,
    /// Glonass G2 C/A
    G2CA,
    /// Galileo E5b
    E5B,
    /// BeiDou B2I
    B2I,
    /// L5 / E5a (GPS, QZSS, SBAS, Galileo, IRNSS)
    L5,
    /// IRNSS S band
    S,
}

impl SignalCode {
    /// [Carrier] this code is modulated on, for this [Constellation].
    pub fn carrier(&self, constellation: Constellation) -> Carrier {
        match self {
            Self::L1CA => {
                if constellation == Constellation::Glonass {
                    Carrier::G1
                } else {
                    Carrier::L1
                }
            },
            Self::E1BC | Self::B1CP | Self::B1CD => Carrier::L1,
            Self::B1I => Carrier::B1,
            Self::L2C => Carrier::L2,
            Self::G2CA => Carrier::G2,
            Self::E5B => Carrier::E5b,
            Self::B2I => Carrier::B2,
            Self::L5 => Carrier::L5,
            Self::S => Carrier::S,
        }
    }
}

/// Carrier frequency (Hz) for this signal. GLONASS FDMA channels are
/// resolved through the navigation data: None when the channel is unknown,
/// which drops the satellite.
pub(crate) fn carrier_frequency_hz<N: NavigationData>(
    sv: SV,
    code: SignalCode,
    nav: &N,
) -> Option<f64> {
    let carrier = code.carrier(sv.constellation);
    match carrier {
        Carrier::G1 | Carrier::G2 => nav.glonass_frequency_hz(sv, carrier),
        _ => Some(carrier.frequency_hz()),
    }
}

#[cfg(test)]
mod test {
    use super::{Carrier, SignalCode};
    use crate::prelude::Constellation;

    #[test]
    fn frequencies() {
        assert_eq!(Carrier::L1.frequency_hz(), 1575.42E6);
        assert_eq!(Carrier::L2.frequency_hz(), 1227.60E6);
        assert_eq!(Carrier::B1.frequency_hz(), 1561.098E6);
        assert_eq!(Carrier::S.frequency_hz(), 2492.028E6);
    }

    #[test]
    fn code_carrier_mapping() {
        assert_eq!(
            SignalCode::L1CA.carrier(Constellation::GPS),
            Carrier::L1
        );
        assert_eq!(
            SignalCode::L1CA.carrier(Constellation::Glonass),
            Carrier::G1
        );
        assert_eq!(
            SignalCode::B1CP.carrier(Constellation::BeiDou),
            Carrier::L1
        );
        assert_eq!(SignalCode::B1I.carrier(Constellation::BeiDou), Carrier::B1);
    }
}
