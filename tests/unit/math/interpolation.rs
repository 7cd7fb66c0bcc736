//! Tests for natural cubic splines and colour ramps

#[cfg(test)]
mod tests {
    use pascal_ifs::math::interpolation::{ColorRamp, Cubic};

    // Tests the spline passes through its anchors
    // Verified by swapping the tridiagonal coefficients
    #[test]
    fn test_cubic_hits_anchors() {
        let Some(spline) = Cubic::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.0, 1.0, 4.0]) else {
            panic!("valid anchors rejected");
        };
        for (x, y) in [(0.0, 0.0), (1.0, 2.0), (2.0, 1.0), (3.0, 4.0)] {
            assert!((spline.evaluate(x) - y).abs() < 1e-9, "spline({x}) != {y}");
        }
    }

    // Tests collinear anchors give a straight line
    // Verified by adding a curvature offset
    #[test]
    fn test_cubic_reproduces_lines() {
        let Some(spline) = Cubic::new(vec![0.0, 0.5, 1.0], vec![1.0, 2.0, 3.0]) else {
            panic!("valid anchors rejected");
        };
        assert!((spline.evaluate(0.25) - 1.5).abs() < 1e-9);
        assert!((spline.evaluate(0.8) - 2.6).abs() < 1e-9);
    }

    // Tests evaluation clamps outside the anchor range
    // Verified by extrapolating the end segments
    #[test]
    fn test_cubic_clamps() {
        let Some(spline) = Cubic::new(vec![0.0, 1.0], vec![3.0, 5.0]) else {
            panic!("valid anchors rejected");
        };
        assert!((spline.evaluate(-2.0) - 3.0).abs() < f64::EPSILON);
        assert!((spline.evaluate(7.0) - 5.0).abs() < f64::EPSILON);
    }

    // Tests invalid anchor sets are rejected
    // Verified by removing the monotonicity check
    #[test]
    fn test_cubic_rejects_bad_anchors() {
        assert!(Cubic::new(vec![0.0], vec![1.0]).is_none());
        assert!(Cubic::new(vec![0.0, 1.0], vec![1.0]).is_none());
        assert!(Cubic::new(vec![0.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]).is_none());
    }

    // Tests ramp ends match the first and last anchors
    // Verified by reversing the anchor order
    #[test]
    fn test_ramp_endpoints() {
        let Some(ramp) = ColorRamp::new(&[[0, 0, 0], [128, 64, 32], [255, 255, 255]]) else {
            panic!("valid anchors rejected");
        };
        assert_eq!(ramp.sample(0.0), [0, 0, 0, 255]);
        assert_eq!(ramp.sample(1.0), [255, 255, 255, 255]);
        assert_eq!(ramp.sample(0.5), [128, 64, 32, 255]);
        assert_eq!(ramp.sample(2.0), ramp.sample(1.0));
    }

    // Tests spreading colours across a ramp
    // Verified by spacing samples by count instead of count - 1
    #[test]
    fn test_ramp_spread() {
        let Some(ramp) = ColorRamp::new(&[[0, 0, 0], [200, 100, 50]]) else {
            panic!("valid anchors rejected");
        };
        let colors = ramp.spread(3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.first(), Some(&[0, 0, 0, 255]));
        assert_eq!(colors.get(1), Some(&[100, 50, 25, 255]));
        assert_eq!(colors.last(), Some(&[200, 100, 50, 255]));
        assert!(ramp.spread(0).is_empty());
        assert!(ColorRamp::new(&[[1, 2, 3]]).is_none());
    }
}
