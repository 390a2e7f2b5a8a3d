use crate::bias::IonosphereModel;
use crate::candidate::Candidate;
use crate::carrier::{Carrier, SignalCode};
use crate::cfg::Config;
use crate::constants::ERR_CBIAS_M;
use crate::ephemeris::NavigationData;
use crate::prelude::Constellation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Broadcast group delay parameters, as found in the navigation
/// messages of each constellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupDelay {
    /// GPS / QZSS / IRNSS TGD
    Tgd,
    /// GLONASS inter frequency bias, conventionally served as -dτₙ·c
    DtauN,
    /// Galileo BGD(E1, E5a)
    BgdE1E5a,
    /// Galileo BGD(E1, E5b)
    BgdE1E5b,
    /// BeiDou TGD(B1I)
    TgdB1I,
    /// BeiDou TGD(B2I / B2bI)
    TgdB2I,
    /// BeiDou TGD(B1Cp)
    TgdB1Cp,
    /// BeiDou ISC(B1Cd)
    IscB1Cd,
}

/// Code pseudorange with satellite hardware bias compensation,
/// and its model variance (m, m²).
///
/// Single frequency (default): the constellation group delay is removed
/// from the primary pseudorange. Under [IonosphereModel::IonosphereFree]
/// both frequencies are combined, cancelling the first order ionosphere
/// and most group delay terms.
///
/// None when the required measurements are missing: the satellite is
/// then dropped.
pub(crate) fn corrected_pseudorange<N: NavigationData>(
    candidate: &Candidate,
    nav: &N,
    cfg: &Config,
) -> Option<(f64, f64)> {
    let sv = candidate.sv;
    let constellation = sv.constellation;
    let iflc = cfg.iono == IonosphereModel::IonosphereFree;

    let mut p1 = candidate.signals[0].pseudo_range_m?;

    if iflc && candidate.signals[1].pseudo_range_m.is_none() {
        return None;
    }

    let mut p2 = candidate.signals[1].pseudo_range_m.unwrap_or(0.0);

    // C1->P1, C2->P2 differential code bias
    if matches!(constellation, Constellation::GPS | Constellation::Glonass) {
        if candidate.signals[0].code == SignalCode::L1CA {
            p1 += nav.code_bias_m(sv, candidate.signals[0].code);
        }
        if candidate.signals[1].code == SignalCode::L2C {
            p2 += nav.code_bias_m(sv, candidate.signals[1].code);
        }
    }

    if iflc {
        // dual frequency combination
        match constellation {
            Constellation::GPS | Constellation::QZSS => {
                let gamma =
                    (Carrier::L1.frequency_hz() / Carrier::L2.frequency_hz()).powi(2);
                Some(((p2 - gamma * p1) / (1.0 - gamma), 0.0))
            },
            Constellation::Glonass => {
                let gamma =
                    (Carrier::G1.frequency_hz() / Carrier::G2.frequency_hz()).powi(2);
                Some(((p2 - gamma * p1) / (1.0 - gamma), 0.0))
            },
            Constellation::Galileo => {
                // E1-E5b
                let gamma =
                    (Carrier::L1.frequency_hz() / Carrier::E5b.frequency_hz()).powi(2);
                if nav.galileo_fnav() {
                    // remove BGD(E5a, E5b)
                    p2 -= nav.group_delay_m(sv, GroupDelay::BgdE1E5a)
                        - nav.group_delay_m(sv, GroupDelay::BgdE1E5b);
                }
                Some(((p2 - gamma * p1) / (1.0 - gamma), 0.0))
            },
            Constellation::BeiDou => {
                // B1-B2, TGD compensated
                let f1 = if candidate.signals[0].code == SignalCode::B1I {
                    Carrier::B1.frequency_hz()
                } else {
                    Carrier::L1.frequency_hz()
                };
                let gamma = (f1 / Carrier::B2.frequency_hz()).powi(2);
                let b1 = beidou_b1_delay(candidate, nav);
                let b2 = nav.group_delay_m(sv, GroupDelay::TgdB2I);
                Some((((p2 - gamma * p1) - (b2 - gamma * b1)) / (1.0 - gamma), 0.0))
            },
            Constellation::IRNSS => {
                // L5-S
                let gamma =
                    (Carrier::L5.frequency_hz() / Carrier::S.frequency_hz()).powi(2);
                Some(((p2 - gamma * p1) / (1.0 - gamma), 0.0))
            },
            _ => Some((p1, 0.0)),
        }
    } else {
        // single frequency (L1/E1/B1)
        let var = ERR_CBIAS_M * ERR_CBIAS_M;

        let b1 = match constellation {
            Constellation::GPS | Constellation::QZSS => nav.group_delay_m(sv, GroupDelay::Tgd),
            Constellation::Glonass => {
                let gamma =
                    (Carrier::G1.frequency_hz() / Carrier::G2.frequency_hz()).powi(2);
                nav.group_delay_m(sv, GroupDelay::DtauN) / (gamma - 1.0)
            },
            Constellation::Galileo => {
                if nav.galileo_fnav() {
                    nav.group_delay_m(sv, GroupDelay::BgdE1E5a)
                } else {
                    nav.group_delay_m(sv, GroupDelay::BgdE1E5b)
                }
            },
            Constellation::BeiDou => beidou_b1_delay(candidate, nav),
            Constellation::IRNSS => {
                let gamma =
                    (Carrier::S.frequency_hz() / Carrier::L5.frequency_hz()).powi(2);
                gamma * nav.group_delay_m(sv, GroupDelay::Tgd)
            },
            _ => 0.0,
        };

        Some((p1 - b1, var))
    }
}

/// BeiDou B1 family group delay (m), selected by tracking code.
fn beidou_b1_delay<N: NavigationData>(candidate: &Candidate, nav: &N) -> f64 {
    let sv = candidate.sv;
    match candidate.signals[0].code {
        SignalCode::B1I => nav.group_delay_m(sv, GroupDelay::TgdB1I),
        SignalCode::B1CP => nav.group_delay_m(sv, GroupDelay::TgdB1Cp),
        _ => {
            nav.group_delay_m(sv, GroupDelay::TgdB1Cp)
                + nav.group_delay_m(sv, GroupDelay::IscB1Cd)
        },
    }
}

#[cfg(test)]
mod test {
    use super::{corrected_pseudorange, GroupDelay};
    use crate::bias::IonosphereModel;
    use crate::candidate::{Candidate, Observation};
    use crate::carrier::{Carrier, SignalCode};
    use crate::cfg::Config;
    use crate::ephemeris::NavigationData;
    use crate::prelude::{Constellation, Epoch, SV};

    use rstest::*;
    use std::str::FromStr;

    struct NullNav;
    impl NavigationData for NullNav {}

    struct TgdNav(f64);
    impl NavigationData for TgdNav {
        fn group_delay_m(&self, _sv: SV, param: GroupDelay) -> f64 {
            match param {
                GroupDelay::Tgd => self.0,
                _ => 0.0,
            }
        }
    }

    fn t0() -> Epoch {
        Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap()
    }

    #[test]
    fn missing_primary_drops() {
        let cd = Candidate::single_frequency(
            SV::new(Constellation::GPS, 1),
            t0(),
            Observation::default(),
        );
        assert!(corrected_pseudorange(&cd, &NullNav {}, &Config::default()).is_none());
    }

    #[test]
    fn iflc_requires_both_frequencies() {
        let cfg = Config::default().with_ionosphere_model(IonosphereModel::IonosphereFree);
        let cd = Candidate::single_frequency(
            SV::new(Constellation::GPS, 1),
            t0(),
            Observation::pseudo_range(SignalCode::L1CA, 22.0E6, None),
        );
        assert!(corrected_pseudorange(&cd, &NullNav {}, &cfg).is_none());
    }

    #[test]
    fn gps_tgd_is_removed() {
        let cd = Candidate::single_frequency(
            SV::new(Constellation::GPS, 1),
            t0(),
            Observation::pseudo_range(SignalCode::L1CA, 22.0E6, None),
        );
        let (p, var) = corrected_pseudorange(&cd, &TgdNav(2.5), &Config::default()).unwrap();
        assert_eq!(p, 22.0E6 - 2.5);
        assert_eq!(var, 0.09);
    }

    #[rstest]
    #[case(0.0)]
    #[case(12.5)]
    fn iflc_removes_first_order_iono(#[case] common_bias_m: f64) {
        let cfg = Config::default().with_ionosphere_model(IonosphereModel::IonosphereFree);
        let gamma = (Carrier::L1.frequency_hz() / Carrier::L2.frequency_hz()).powi(2);

        let (range, iono) = (22.0E6, 7.5);

        let cd = Candidate::new(
            SV::new(Constellation::GPS, 1),
            t0(),
            [
                Observation::pseudo_range(
                    SignalCode::L1CA,
                    range + iono + common_bias_m,
                    None,
                ),
                Observation::pseudo_range(
                    SignalCode::L2C,
                    range + gamma * iono + common_bias_m,
                    None,
                ),
            ],
        );

        let (p, var) = corrected_pseudorange(&cd, &NullNav {}, &cfg).unwrap();
        assert!(
            (p - (range + common_bias_m)).abs() < 1.0E-6,
            "iono leak: {}",
            p - range
        );
        assert_eq!(var, 0.0);
    }
}
