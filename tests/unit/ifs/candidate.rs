//! Tests for candidate construction and assignment rules

#[cfg(test)]
mod tests {
    use pascal_ifs::analysis::similarity::{BlockMotif, BlockPosition};
    use pascal_ifs::analysis::SimilarityVerdict;
    use pascal_ifs::ifs::{AssignmentRule, ContractionMap, IfsCandidate};
    use pascal_ifs::{PatternError, analyze_self_similarity, build_ifs_candidate, generate_triangle};
    use std::f64::consts::TAU;

    fn verdict_for(modulus: u64, rows: usize) -> SimilarityVerdict {
        let raster = generate_triangle(modulus, rows).expect("valid parameters");
        analyze_self_similarity(&raster, modulus).expect("enough rows")
    }

    // Tests one map per non-empty block, translated to the block's square
    // Verified by swapping row and column in the translation
    #[test]
    fn test_binary_candidate_maps() {
        let candidate = build_ifs_candidate(2, &verdict_for(2, 8)).expect("non-empty motif");
        assert_eq!(candidate.len(), 3);
        assert_eq!(candidate.modulus(), Some(2));
        assert_eq!(candidate.rule(), &AssignmentRule::Uniform);
        let translations: Vec<[f64; 2]> =
            candidate.maps().iter().map(ContractionMap::translation).collect();
        assert_eq!(translations, vec![[0.0, 0.0], [0.0, 0.5], [0.5, 0.5]]);
        assert!(candidate.maps().iter().all(|m| (m.scale() - 0.5).abs() < f64::EPSILON));
    }

    // Tests a prime modulus gives m(m+1)/2 maps of scale 1/m
    // Verified by using scale 1/(m+1)
    #[test]
    fn test_ternary_candidate() {
        let candidate = build_ifs_candidate(3, &verdict_for(3, 9)).expect("non-empty motif");
        assert_eq!(candidate.len(), 6);
        assert!(!candidate.is_empty());
        assert!(
            candidate
                .maps()
                .iter()
                .all(|m| (m.scale() - 1.0 / 3.0).abs() < 1e-15)
        );
    }

    // Tests an empty motif cannot produce a candidate
    // Verified by returning an empty candidate
    #[test]
    fn test_empty_motif() {
        let verdict = SimilarityVerdict::from_motif(3, BlockMotif::empty(3));
        assert!(matches!(
            IfsCandidate::from_verdict(3, &verdict),
            Err(PatternError::EmptyMapSet { modulus: Some(3) })
        ));
        assert!(matches!(
            IfsCandidate::new(Vec::new(), AssignmentRule::Uniform),
            Err(PatternError::EmptyMapSet { modulus: None })
        ));
    }

    // Tests a hand-written motif drives synthesis
    // Verified by ignoring the motif and using every block
    #[test]
    fn test_hypothesised_motif() {
        let motif = BlockMotif::from_positions(
            3,
            &[
                BlockPosition { row: 0, col: 0 },
                BlockPosition { row: 2, col: 2 },
            ],
        );
        let candidate = IfsCandidate::from_verdict(3, &SimilarityVerdict::from_motif(3, motif))
            .expect("non-empty motif");
        assert_eq!(candidate.len(), 2);
        let last = candidate.maps().last().expect("two maps");
        assert!((last.translation()[0] - 2.0 / 3.0).abs() < 1e-15);
    }

    // Tests a verdict for another modulus is rejected
    // Verified by trusting the caller's modulus
    #[test]
    fn test_modulus_mismatch() {
        assert!(matches!(
            IfsCandidate::from_verdict(3, &verdict_for(2, 8)),
            Err(PatternError::InvalidParameter {
                parameter: "modulus",
                ..
            })
        ));
    }

    // Tests the preset grid and polygon candidates
    // Verified by dropping the optional centre map
    #[test]
    fn test_presets() {
        let grid = IfsCandidate::triangular_grid(4).expect("valid size");
        assert_eq!(grid.len(), 10);
        assert!(matches!(
            IfsCandidate::triangular_grid(1),
            Err(PatternError::InvalidModulus { modulus: 1 })
        ));

        let triangle = IfsCandidate::polygon(3, false).expect("valid polygon");
        assert_eq!(triangle.len(), 3);
        assert_eq!(triangle.modulus(), None);
        assert_eq!(IfsCandidate::polygon(6, true).expect("valid").len(), 7);
        assert!(IfsCandidate::polygon(2, false).is_err());
    }

    // Tests each polygon map fixes its own vertex
    // Verified by contracting towards the centre instead
    #[test]
    fn test_polygon_maps_fix_vertices() {
        let pentagon = IfsCandidate::polygon(5, true).expect("valid polygon");
        let vertices = (0..5).map(|k| {
            let angle = TAU * f64::from(k) / 5.0;
            [0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin()]
        });
        let targets: Vec<[f64; 2]> = vertices.chain([[0.5, 0.5]]).collect();
        assert_eq!(targets.len(), pentagon.len());
        for (map, target) in pentagon.maps().iter().zip(&targets) {
            let fixed = map.apply(*target);
            assert!(
                (fixed[0] - target[0]).abs() < 1e-12 && (fixed[1] - target[1]).abs() < 1e-12,
                "{target:?} moved to {fixed:?}"
            );
            assert!((map.scale() - 0.4).abs() < 1e-12);
        }
        // Any other point moves towards its map's vertex
        let first = pentagon.maps().first().expect("vertex map");
        let moved = first.apply([0.0, 0.0]);
        assert!(moved[0] > 0.0 && moved[0] < 1.0);
    }

    // Tests rule validation against the map count
    // Verified by skipping the weight length check
    #[test]
    fn test_rule_validation() {
        let grid = IfsCandidate::triangular_grid(2).expect("valid size");
        assert!(
            grid.clone()
                .with_rule(AssignmentRule::Weighted(vec![1.0, 2.0]))
                .is_err()
        );
        assert!(
            grid.clone()
                .with_rule(AssignmentRule::Weighted(vec![1.0, -1.0, 1.0]))
                .is_err()
        );
        assert!(
            grid.clone()
                .with_rule(AssignmentRule::Weighted(vec![1.0, 0.0, 3.0]))
                .is_ok()
        );
        assert!(
            grid.clone()
                .with_rule(AssignmentRule::AddressIndexed { depth: 0 })
                .is_err()
        );
        assert!(
            grid.clone()
                .with_rule(AssignmentRule::AddressIndexed { depth: 30 })
                .is_err()
        );
        let walked = grid
            .with_rule(AssignmentRule::AddressIndexed { depth: 4 })
            .expect("81 addresses");
        assert_eq!(walked.rule(), &AssignmentRule::AddressIndexed { depth: 4 });
    }
}
