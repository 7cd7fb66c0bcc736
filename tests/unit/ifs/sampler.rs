//! Tests for chaos-game and address-enumeration sampling

#[cfg(test)]
mod tests {
    use pascal_ifs::cancellation::CancellationToken;
    use pascal_ifs::ifs::{AssignmentRule, AttractorSample, AttractorSampler, IfsCandidate, SamplerConfig};
    use pascal_ifs::{PatternError, compare, generate_triangle, sample_attractor};

    fn sierpinski() -> IfsCandidate {
        IfsCandidate::triangular_grid(2).expect("valid size")
    }

    // Tests a fixed seed replays the same points
    // Verified by seeding from entropy regardless of config
    #[test]
    fn test_seeded_runs_replay() {
        let candidate = sierpinski();
        let first = sample_attractor(&candidate, 500, Some(9)).expect("valid");
        let second = sample_attractor(&candidate, 500, Some(9)).expect("valid");
        let other = sample_attractor(&candidate, 500, Some(10)).expect("valid");
        assert_eq!(first, second);
        assert_ne!(first.points(), other.points());
        assert_eq!(first.seed(), Some(9));
        assert_eq!(first.len(), 500);
    }

    // Tests every recorded point lies on the lower-left half of the square
    // Verified by recording burn-in steps from outside the attractor
    #[test]
    fn test_points_stay_on_attractor() {
        let candidate = sierpinski();
        let config = SamplerConfig {
            iterations: 2000,
            seed: Some(3),
            start: [0.9, 0.05],
            ..SamplerConfig::default()
        };
        let sample = AttractorSampler::new(&candidate, config)
            .expect("valid config")
            .sample()
            .expect("uncancelled");
        assert!(
            sample
                .points()
                .iter()
                .all(|&[x, y]| (0.0..=1.0).contains(&x) && x <= y + 1e-5)
        );
    }

    // Tests burn-in steps are taken but not recorded
    // Verified by skipping the burn-in loop
    #[test]
    fn test_burn_in_discards_leading_steps() {
        let candidate = sierpinski();
        let run = |iterations, burn_in| {
            let config = SamplerConfig {
                iterations,
                burn_in,
                seed: Some(21),
                start: [0.9, 0.05],
            };
            AttractorSampler::new(&candidate, config)
                .expect("valid config")
                .sample()
                .expect("uncancelled")
        };
        let burned = run(10, 20);
        let unburned = run(30, 0);
        assert_eq!(burned.len(), 10);
        assert_eq!(burned.points().first(), unburned.points().get(20));
        assert_eq!(burned.points(), unburned.points().get(20..).expect("30 points"));
    }

    // Tests points are produced lazily
    // Verified by collecting the whole run before yielding
    #[test]
    fn test_points_are_lazy() {
        let candidate = sierpinski();
        let config = SamplerConfig {
            iterations: usize::MAX,
            seed: Some(1),
            ..SamplerConfig::default()
        };
        let sampler = AttractorSampler::new(&candidate, config).expect("valid config");
        assert_eq!(sampler.points().take(5).count(), 5);
    }

    // Tests zero-weight maps are never applied
    // Verified by falling back to uniform selection
    #[test]
    fn test_weighted_rule() {
        let candidate = sierpinski()
            .with_rule(AssignmentRule::Weighted(vec![1.0, 1.0, 0.0]))
            .expect("valid weights");
        let sample = sample_attractor(&candidate, 3000, Some(5)).expect("valid");
        assert!(sample.points().iter().all(|&[x, _]| x < 0.5));
    }

    // Tests address enumeration visits every cell of the raster once
    // Verified by applying the first address digit innermost
    #[test]
    fn test_addresses_reproduce_raster() {
        let candidate = sierpinski()
            .with_rule(AssignmentRule::AddressIndexed { depth: 3 })
            .expect("27 addresses");
        let config = SamplerConfig {
            iterations: 0,
            ..SamplerConfig::default()
        };
        let sample = AttractorSampler::new(&candidate, config)
            .expect("iterations unused")
            .sample()
            .expect("uncancelled");
        assert_eq!(sample.len(), 27);
        assert_eq!(sample.points().first(), Some(&[0.0625, 0.0625]));

        let raster = generate_triangle(2, 8).expect("valid parameters");
        let result = compare(&raster, &sample, 0.0).expect("valid tolerance");
        assert!(result.is_exact());
    }

    // Tests chaos-game sampling converges onto the binary triangle
    // Verified by skipping burn-in and starting outside the attractor
    #[test]
    fn test_chaos_game_matches_raster() {
        let sample = sample_attractor(&sierpinski(), 20_000, Some(42)).expect("valid");
        let raster = generate_triangle(2, 32).expect("valid parameters");
        let result = compare(&raster, &sample, 1.0).expect("valid tolerance");
        assert!(result.score > 0.99, "score {}", result.score);
    }

    // Tests zero iterations are rejected for the chaos game
    // Verified by returning an empty sample instead
    #[test]
    fn test_zero_iterations() {
        assert!(matches!(
            sample_attractor(&sierpinski(), 0, None),
            Err(PatternError::InvalidParameter {
                parameter: "iterations",
                ..
            })
        ));
        let config = SamplerConfig {
            start: [f64::NAN, 0.0],
            ..SamplerConfig::default()
        };
        assert!(AttractorSampler::new(&sierpinski(), config).is_err());
    }

    // Tests a cancelled token aborts sampling
    // Verified by ignoring the token between iterations
    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let candidate = sierpinski();
        let sampler = AttractorSampler::new(&candidate, SamplerConfig::default())
            .expect("valid config")
            .with_cancellation(token);
        assert_eq!(sampler.points().count(), 0);
        assert!(matches!(
            sampler.sample(),
            Err(PatternError::Cancelled { .. })
        ));
    }

    // Tests merging and rasterizing samples
    // Verified by keeping only the first sample when merging
    #[test]
    fn test_merge_and_rasterize() {
        let a = AttractorSample::from_points(vec![[0.1, 0.1]]);
        let b = AttractorSample::from_points(vec![[0.9, 0.9], [0.6, 0.1]]);
        let merged = AttractorSample::merge([a, b]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.seed(), None);
        let occupancy = merged.rasterize(2);
        assert!(occupancy.get(0, 0) && occupancy.get(1, 1) && occupancy.get(0, 1));
        assert!(AttractorSample::default().is_empty());
    }
}
