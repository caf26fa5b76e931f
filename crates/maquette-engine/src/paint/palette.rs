use super::Color;

/// A fixed-size lookup table of colors.
///
/// Palettes are generated once and then used to map scalar data onto vertex
/// colors via [`map_values`](Palette::map_values).
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Full-saturation rainbow sweeping hue from `start` to `end` (in `[0, 1]`).
    pub fn rainbow(n: usize, start: f32, end: f32) -> Self {
        let colors = (0..n)
            .map(|i| {
                let h = start + i as f32 * (end - start) / n as f32;
                Color::from_hsv(h, 1.0, 1.0)
            })
            .collect();
        Self { colors }
    }

    /// Grey ramp from value `start` to value `end`.
    pub fn grayscale(n: usize, start: f32, end: f32) -> Self {
        let step = (end - start) / (n.saturating_sub(1).max(1)) as f32;
        let colors = (0..n)
            .map(|i| {
                let v = start + step * i as f32;
                Color::rgb(v, v, v)
            })
            .collect();
        Self { colors }
    }

    /// Uniformly random channels in `[start, end)`.
    pub fn random(n: usize, start: f32, end: f32) -> Self {
        let chan = || start + (end - start) * rand::random::<f32>();
        let colors = (0..n).map(|_| Color::rgb(chan(), chan(), chan())).collect();
        Self { colors }
    }

    /// Channel-wise linear ramp from `from` to `to`; alpha is forced opaque.
    pub fn ramp(n: usize, from: Color, to: Color) -> Self {
        let d = (n.saturating_sub(1).max(1)) as f32;
        let colors = (0..n)
            .map(|i| {
                let t = i as f32 / d;
                Color::rgb(
                    from.r + (to.r - from.r) * t,
                    from.g + (to.g - from.g) * t,
                    from.b + (to.b - from.b) * t,
                )
            })
            .collect();
        Self { colors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Maps each scalar in `values` onto a palette color.
    ///
    /// The value range defaults to the data's own min/max; either bound can
    /// be overridden. Values falling outside the palette index range map to
    /// transparent black.
    pub fn map_values(&self, values: &[f32], vmin: Option<f32>, vmax: Option<f32>) -> Vec<Color> {
        if self.colors.is_empty() || values.is_empty() {
            return vec![Color::transparent(); values.len()];
        }

        let mut min_val = values[0];
        let mut max_val = values[0];
        for &v in &values[1..] {
            min_val = min_val.min(v);
            max_val = max_val.max(v);
        }
        if let Some(v) = vmin {
            min_val = v;
        }
        if let Some(v) = vmax {
            max_val = v;
        }

        log::debug!("palette map range: {min_val} .. {max_val}");

        let n = self.colors.len();
        let span = max_val - min_val;
        values
            .iter()
            .map(|&v| {
                let id = ((v - min_val) / span * (n - 1) as f32) as isize;
                if id < 0 || id > (n - 1) as isize {
                    Color::transparent()
                } else {
                    self.colors[id as usize]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn rainbow_starts_at_the_start_hue() {
        let p = Palette::rainbow(10, 0.0, 0.75);
        assert_eq!(p.len(), 10);
        let first = p.colors()[0];
        assert!((first.r - 1.0).abs() < EPS && first.g.abs() < EPS && first.b.abs() < EPS);
    }

    #[test]
    fn grayscale_endpoints() {
        let p = Palette::grayscale(5, 0.0, 1.0);
        assert!((p.colors()[0].r - 0.0).abs() < EPS);
        assert!((p.colors()[4].r - 1.0).abs() < EPS);
    }

    #[test]
    fn ramp_midpoint_interpolates() {
        let p = Palette::ramp(3, Color::rgb(0.0, 0.0, 0.0), Color::rgb(1.0, 0.0, 1.0));
        let mid = p.colors()[1];
        assert!((mid.r - 0.5).abs() < EPS && (mid.b - 0.5).abs() < EPS);
    }

    #[test]
    fn random_channels_stay_in_range() {
        let p = Palette::random(32, 0.25, 0.75);
        for c in p.colors() {
            assert!(c.r >= 0.25 && c.r < 0.75);
            assert!(c.g >= 0.25 && c.g < 0.75);
            assert!(c.b >= 0.25 && c.b < 0.75);
        }
    }

    #[test]
    fn map_values_spans_the_palette() {
        let p = Palette::grayscale(11, 0.0, 1.0);
        let cols = p.map_values(&[0.0, 0.5, 1.0], None, None);
        assert!((cols[0].r - 0.0).abs() < EPS);
        assert!((cols[1].r - 0.5).abs() < EPS);
        assert!((cols[2].r - 1.0).abs() < EPS);
    }

    #[test]
    fn map_values_out_of_range_is_transparent() {
        let p = Palette::grayscale(4, 0.0, 1.0);
        // Explicit bounds narrower than the data: outliers fall off the table.
        let cols = p.map_values(&[-1.0, 0.5, 2.0], Some(0.0), Some(1.0));
        assert_eq!(cols[0], Color::transparent());
        assert_eq!(cols[2], Color::transparent());
    }
}
