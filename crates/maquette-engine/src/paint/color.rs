/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Converts HSV (all channels in `[0, 1]`) to an opaque RGB color.
    ///
    /// `s == 0` yields the achromatic grey of value `v`.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        if s == 0.0 {
            return Color::rgb(v, v, v);
        }

        // Hue sector 0..5 plus fractional position within the sector.
        let h = h * 360.0 / 60.0;
        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match i as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Color::rgb(r, g, b)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < EPS
            && (a.g - b.g).abs() < EPS
            && (a.b - b.b).abs() < EPS
            && (a.a - b.a).abs() < EPS
    }

    #[test]
    fn hsv_zero_saturation_is_grey() {
        assert!(close(Color::from_hsv(0.3, 0.0, 0.5), Color::rgb(0.5, 0.5, 0.5)));
    }

    #[test]
    fn hsv_primary_hues() {
        // h = 0 red, h = 1/3 green, h = 2/3 blue.
        assert!(close(Color::from_hsv(0.0, 1.0, 1.0), Color::rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::from_hsv(1.0 / 3.0, 1.0, 1.0), Color::rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::from_hsv(2.0 / 3.0, 1.0, 1.0), Color::rgb(0.0, 0.0, 1.0)));
    }
}
