//! Natural cubic spline interpolation for smooth colour ramps
//!
//! Second derivatives are zero at both ends, which keeps the ramp from
//! overshooting the anchor colours near the boundaries.

/// Cubic spline through a set of `(x, y)` anchors with natural boundaries
#[derive(Debug, Clone)]
pub struct Cubic {
    x_values: Vec<f64>,
    y_values: Vec<f64>,
    second_derivatives: Vec<f64>,
}

// Every index is bounded by the anchor count validated in `new`
#[allow(clippy::indexing_slicing)]
impl Cubic {
    /// Fit a spline through strictly increasing `x_values`
    ///
    /// Returns `None` for mismatched lengths, fewer than two anchors, or
    /// x values that are not strictly increasing.
    pub fn new(x_values: Vec<f64>, y_values: Vec<f64>) -> Option<Self> {
        let n = x_values.len();
        if n != y_values.len() || n < 2 || x_values.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        // Tridiagonal sweep for the interior second derivatives
        let mut second_derivatives = vec![0.0; n];
        let mut u = vec![0.0; n];
        for i in 1..n - 1 {
            let (x0, x1, x2) = (x_values[i - 1], x_values[i], x_values[i + 1]);
            let (y0, y1, y2) = (y_values[i - 1], y_values[i], y_values[i + 1]);
            let sig = (x1 - x0) / (x2 - x0);
            let p = sig.mul_add(second_derivatives[i - 1], 2.0);
            second_derivatives[i] = (sig - 1.0) / p;
            let slope_change = (y2 - y1) / (x2 - x1) - (y1 - y0) / (x1 - x0);
            u[i] = sig.mul_add(-u[i - 1], 6.0 * slope_change / (x2 - x0)) / p;
        }
        for i in (0..n - 1).rev() {
            second_derivatives[i] = second_derivatives[i].mul_add(second_derivatives[i + 1], u[i]);
        }

        Some(Self {
            x_values,
            y_values,
            second_derivatives,
        })
    }

    /// Evaluate the spline, clamping outside the anchor range
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.x_values.len();
        let (first, last) = (self.x_values[0], self.x_values[n - 1]);
        if x <= first {
            return self.y_values[0];
        }
        if x >= last {
            return self.y_values[n - 1];
        }

        let hi = self.x_values.partition_point(|&v| v < x).clamp(1, n - 1);
        let lo = hi - 1;
        let h = self.x_values[hi] - self.x_values[lo];
        let a = (self.x_values[hi] - x) / h;
        let b = (x - self.x_values[lo]) / h;
        let cubic_term = (a * a * a - a).mul_add(
            self.second_derivatives[lo],
            (b * b * b - b) * self.second_derivatives[hi],
        ) * (h * h)
            / 6.0;
        a.mul_add(self.y_values[lo], b * self.y_values[hi]) + cubic_term
    }
}

/// RGBA ramp built from evenly spaced anchor colours
#[derive(Debug, Clone)]
pub struct ColorRamp {
    channels: [Cubic; 3],
}

impl ColorRamp {
    /// Build a ramp through at least two anchor colours (alpha is fixed opaque)
    pub fn new(anchors: &[[u8; 3]]) -> Option<Self> {
        if anchors.len() < 2 {
            return None;
        }
        let last = (anchors.len() - 1) as f64;
        let xs: Vec<f64> = (0..anchors.len()).map(|i| i as f64 / last).collect();
        let channel = |c: usize| {
            let ys = anchors.iter().map(|rgb| f64::from(rgb[c])).collect();
            Cubic::new(xs.clone(), ys)
        };
        Some(Self {
            channels: [channel(0)?, channel(1)?, channel(2)?],
        })
    }

    /// Colour at position `t` in `[0, 1]`
    pub fn sample(&self, t: f64) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let [r, g, b] = self
            .channels
            .each_ref()
            .map(|spline| spline.evaluate(t).round().clamp(0.0, 255.0) as u8);
        [r, g, b, 255]
    }

    /// `count` colours spread evenly across the ramp
    pub fn spread(&self, count: usize) -> Vec<[u8; 4]> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(1.0)],
            _ => (0..count)
                .map(|i| self.sample(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}
