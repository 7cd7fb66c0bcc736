//! Tests for PNG rendering of rasters and samples

#[cfg(test)]
mod tests {
    use pascal_ifs::PatternError;
    use pascal_ifs::generate_triangle;
    use pascal_ifs::ifs::AttractorSample;
    use pascal_ifs::io::image::{
        Layout, RenderOptions, export_raster_png, export_sample_png, render_raster, render_sample,
    };
    use pascal_ifs::pattern::Palette;
    use tempfile::TempDir;

    const BRIGHT: [u8; 4] = [252, 255, 164, 255];

    // Tests aligned rendering places entry (i, k) at block (k, i)
    // Verified by swapping x and y when painting
    #[test]
    fn test_render_aligned() {
        let raster = generate_triangle(2, 4).expect("valid");
        let palette = Palette::ramp(raster.class_count());
        let img = render_raster(&raster, &palette, RenderOptions::default()).expect("renders");
        assert_eq!(img.dimensions(), (8, 8));

        // C(0, 0) = 1
        assert_eq!(img.get_pixel(0, 0).0, BRIGHT);
        assert_eq!(img.get_pixel(1, 1).0, BRIGHT);
        // Above the diagonal
        assert_eq!(img.get_pixel(2, 0).0[3], 0);
        // C(2, 1) = 2 = 0 mod 2
        assert_eq!(img.get_pixel(2, 4).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(7, 7).0, BRIGHT);
    }

    // Tests centred rendering puts the apex in the middle
    // Verified by using the aligned offset for both layouts
    #[test]
    fn test_render_centered() {
        let raster = generate_triangle(2, 4).expect("valid");
        let palette = Palette::ramp(raster.class_count());
        let options = RenderOptions {
            scale: 2,
            layout: Layout::Centered,
        };
        let img = render_raster(&raster, &palette, options).expect("renders");
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(3, 0).0, BRIGHT);
        assert_eq!(img.get_pixel(4, 1).0, BRIGHT);
        // The last row spans the full width
        assert_eq!(img.get_pixel(0, 7).0, BRIGHT);
    }

    // Tests odd scales are rejected
    // Verified by accepting any positive scale
    #[test]
    fn test_odd_scale_rejected() {
        let raster = generate_triangle(2, 4).expect("valid");
        let options = RenderOptions {
            scale: 3,
            layout: Layout::Aligned,
        };
        assert!(matches!(
            render_raster(&raster, &Palette::binary(), options),
            Err(PatternError::InvalidParameter {
                parameter: "scale",
                ..
            })
        ));
    }

    // Tests a palette too small for the raster's labels is reported
    // Verified by falling back to white for unknown labels
    #[test]
    fn test_missing_class_colour() {
        let raster = generate_triangle(5, 6).expect("valid");
        let palette = Palette::fixed(vec![[1, 1, 1, 255]], [0, 0, 0, 255]);
        assert!(matches!(
            render_raster(&raster, &palette, RenderOptions::default()),
            Err(PatternError::InvalidClassLabel { palette_len: 1, .. })
        ));
    }

    // Tests sample density plots mark hit pixels only
    // Verified by painting every pixel of the canvas
    #[test]
    fn test_render_sample() {
        let sample = AttractorSample::from_points(vec![[0.1, 0.1], [0.1, 0.1], [0.9, 0.6]]);
        let img = render_sample(&sample, 10);
        assert_eq!(img.dimensions(), (10, 10));
        assert_ne!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_ne!(img.get_pixel(9, 6).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);

        let empty = render_sample(&AttractorSample::default(), 4);
        assert!(empty.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    // Tests exports create parent directories and write PNG files
    // Verified by skipping directory creation
    #[test]
    fn test_export_png() {
        let temp_dir = TempDir::new().unwrap();
        let raster = generate_triangle(3, 9).expect("valid");
        let raster_path = temp_dir.path().join("nested").join("triangle.png");
        export_raster_png(
            &raster,
            &Palette::ramp(raster.class_count()),
            RenderOptions::default(),
            &raster_path,
        )
        .expect("export succeeds");
        let written = image::open(&raster_path).expect("readable png");
        assert_eq!(written.width(), 18);

        let sample_path = temp_dir.path().join("attractor.png");
        let sample = AttractorSample::from_points(vec![[0.5, 0.5]]);
        export_sample_png(&sample, 16, &sample_path).expect("export succeeds");
        assert!(sample_path.exists());
        assert!(export_sample_png(&sample, 0, &sample_path).is_err());
    }
}
