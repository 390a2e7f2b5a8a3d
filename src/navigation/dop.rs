use nalgebra::DMatrix;

/// Dilution of precision figures over a satellite geometry.
#[derive(Debug, Clone, Default, Copy)]
pub(crate) struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,
}

fn dop_sqrt(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value.sqrt()
    }
}

impl DilutionOfPrecision {
    /// Creates new [DilutionOfPrecision] from the (azimuth, elevation)
    /// set (rad) of the contributing satellites, counting only those
    /// above the elevation mask. Degenerate geometries (fewer than 4
    /// satellites, or singular normal matrix) return all zeros.
    pub fn new(azel_rad: &[(f64, f64)], min_elevation_rad: f64) -> Self {
        let mut rows = Vec::with_capacity(4 * azel_rad.len());

        for (az, el) in azel_rad.iter() {
            if *el < min_elevation_rad || *el <= 0.0 {
                continue;
            }
            let (sin_az, cos_az) = az.sin_cos();
            let (sin_el, cos_el) = el.sin_cos();
            rows.extend([cos_el * sin_az, cos_el * cos_az, sin_el, 1.0]);
        }

        let n = rows.len() / 4;
        if n < 4 {
            return Default::default();
        }

        let h = DMatrix::from_row_slice(n, 4, &rows);
        let q = h.transpose() * h;

        match q.try_inverse() {
            Some(q) => Self {
                gdop: dop_sqrt(q[(0, 0)] + q[(1, 1)] + q[(2, 2)] + q[(3, 3)]),
                pdop: dop_sqrt(q[(0, 0)] + q[(1, 1)] + q[(2, 2)]),
                hdop: dop_sqrt(q[(0, 0)] + q[(1, 1)]),
                vdop: dop_sqrt(q[(2, 2)]),
            },
            None => Default::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::DilutionOfPrecision;

    #[test]
    fn open_sky_geometry() {
        let azel: Vec<(f64, f64)> = [
            (0.0, 90.0),
            (0.0, 30.0),
            (90.0, 30.0),
            (180.0, 30.0),
            (270.0, 30.0),
        ]
        .iter()
        .map(|(az, el): &(f64, f64)| (az.to_radians(), el.to_radians()))
        .collect();

        let dop = DilutionOfPrecision::new(&azel, 0.0);
        assert!(dop.gdop > 0.0 && dop.gdop < 5.0, "gdop: {}", dop.gdop);
        assert!(dop.pdop < dop.gdop);
        assert!(dop.hdop < dop.pdop);
    }

    #[test]
    fn not_enough_satellites() {
        let azel = [(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
        let dop = DilutionOfPrecision::new(&azel, 0.0);
        assert_eq!(dop.gdop, 0.0);
    }

    #[test]
    fn masked_satellites_do_not_count() {
        let azel: Vec<(f64, f64)> = [
            (0.0, 60.0),
            (90.0, 60.0),
            (180.0, 60.0),
            (270.0, 5.0),
            (315.0, 5.0),
        ]
        .iter()
        .map(|(az, el): &(f64, f64)| (az.to_radians(), el.to_radians()))
        .collect();

        let dop = DilutionOfPrecision::new(&azel, 10.0_f64.to_radians());
        assert_eq!(dop.gdop, 0.0);
    }
}
