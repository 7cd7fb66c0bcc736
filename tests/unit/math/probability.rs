//! Tests for weighted selection and seeded random sources

#[cfg(test)]
mod tests {
    use pascal_ifs::math::probability::{WeightedSelector, seeded_rng};
    use rand::Rng;

    // Tests zero-weight indices are never drawn
    // Verified by using < instead of <= in the search
    #[test]
    fn test_zero_weights_never_chosen() {
        let Some(selector) = WeightedSelector::new(&[0.0, 1.0, 0.0, 3.0]) else {
            panic!("valid weights rejected");
        };
        let mut rng = seeded_rng(Some(7));
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            if let Some(count) = counts.get_mut(selector.choose(&mut rng)) {
                *count += 1;
            }
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert!(counts[3] > 2 * counts[1], "weights not respected: {counts:?}");
    }

    // Tests uniform selection reaches every index
    // Verified by building the selector over count - 1 indices
    #[test]
    fn test_uniform_covers_all_indices() {
        let Some(selector) = WeightedSelector::uniform(5) else {
            panic!("uniform selector rejected");
        };
        assert_eq!(selector.len(), 5);
        assert!(!selector.is_empty());
        let mut rng = seeded_rng(Some(1));
        let mut seen = [false; 5];
        for _ in 0..500 {
            if let Some(flag) = seen.get_mut(selector.choose(&mut rng)) {
                *flag = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    // Tests invalid weights are rejected
    // Verified by removing the finiteness check
    #[test]
    fn test_invalid_weights() {
        assert!(WeightedSelector::new(&[]).is_none());
        assert!(WeightedSelector::new(&[0.0, 0.0]).is_none());
        assert!(WeightedSelector::new(&[1.0, -0.5]).is_none());
        assert!(WeightedSelector::new(&[1.0, f64::NAN]).is_none());
        assert!(WeightedSelector::uniform(0).is_none());
    }

    // Tests seeded sources replay exactly
    // Verified by ignoring the seed
    #[test]
    fn test_seeded_rng_replays() {
        let mut a = seeded_rng(Some(42));
        let mut b = seeded_rng(Some(42));
        let first: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let second: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(first, second);
    }
}
