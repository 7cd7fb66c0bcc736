//! Tests for affine contractions of the unit square

#[cfg(test)]
mod tests {
    use pascal_ifs::PatternError;
    use pascal_ifs::ifs::{ContractionMap, Rotation};

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-12 && (a[1] - b[1]).abs() < 1e-12
    }

    // Tests scaling and translation of corner points
    // Verified by translating before scaling
    #[test]
    fn test_scale_then_translate() {
        let map = ContractionMap::new(0.5, [0.5, 0.0]).expect("valid map");
        assert!(close(map.apply([0.0, 0.0]), [0.5, 0.0]));
        assert!(close(map.apply([1.0, 1.0]), [1.0, 0.5]));
        assert!((map.scale() - 0.5).abs() < f64::EPSILON);
        assert_eq!(map.translation(), [0.5, 0.0]);
        assert_eq!(map.rotation(), Rotation::None);
        assert!(!map.reflect());
    }

    // Tests rotations turn the square about its centre
    // Verified by rotating about the origin
    #[test]
    fn test_rotations() {
        let base = ContractionMap::new(0.5, [0.0, 0.0]).expect("valid map");
        let quarter = base.with_rotation(Rotation::Quarter);
        assert!(close(quarter.apply([0.0, 0.0]), [0.5, 0.0]));
        let half = base.with_rotation(Rotation::Half);
        assert!(close(half.apply([0.0, 0.0]), [0.5, 0.5]));
        let three = base.with_rotation(Rotation::ThreeQuarter);
        assert!(close(three.apply([0.0, 0.0]), [0.0, 0.5]));
        assert!(close(half.apply([0.5, 0.5]), [0.25, 0.25]));
    }

    // Tests reflection mirrors x before rotating
    // Verified by mirroring y instead
    #[test]
    fn test_reflection() {
        let map = ContractionMap::new(0.5, [0.0, 0.0])
            .expect("valid map")
            .with_reflection(true);
        assert!(close(map.apply([0.2, 0.4]), [0.4, 0.2]));
        let turned = map.with_rotation(Rotation::Quarter);
        // Mirror gives (0.8, 0.4), the quarter turn (0.6, 0.8)
        assert!(close(turned.apply([0.2, 0.4]), [0.3, 0.4]));
    }

    // Tests the inverse undoes every orientation
    // Verified by unrotating before unmirroring
    #[test]
    fn test_inverse_round_trip() {
        let point = [0.17, 0.62];
        for rotation in [
            Rotation::None,
            Rotation::Quarter,
            Rotation::Half,
            Rotation::ThreeQuarter,
        ] {
            for reflect in [false, true] {
                let map = ContractionMap::new(1.0 / 3.0, [0.25, 0.5])
                    .expect("valid map")
                    .with_rotation(rotation)
                    .with_reflection(reflect);
                assert!(close(map.inverse_apply(map.apply(point)), point));
                assert!(close(map.apply(map.inverse_apply(point)), point));
            }
        }
    }

    // Tests non-contracting scales and bad translations are rejected
    // Verified by allowing scale 1
    #[test]
    fn test_invalid_maps() {
        for scale in [0.0, 1.0, 1.5, -0.5, f64::NAN] {
            assert!(matches!(
                ContractionMap::new(scale, [0.0, 0.0]),
                Err(PatternError::InvalidParameter {
                    parameter: "scale",
                    ..
                })
            ));
        }
        assert!(matches!(
            ContractionMap::new(0.5, [f64::INFINITY, 0.0]),
            Err(PatternError::InvalidParameter {
                parameter: "translation",
                ..
            })
        ));
    }
}
