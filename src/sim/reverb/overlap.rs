//! Overlap of elliptical Gaussian footprints projected on the horizontal plane.

/// 2-D Gaussian footprint of an eigenverb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    /// Orientation of the `length` axis (rad, counter-clockwise from east).
    pub heading: f64,
    /// Sigma along the heading (m).
    pub length: f64,
    /// Sigma across the heading (m).
    pub width: f64,
}

/// Symmetric 2x2 covariance `[[xx, xy], [xy, yy]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance {
    pub xx: f64,
    pub xy: f64,
    pub yy: f64,
}

impl Covariance {
    pub fn det(&self) -> f64 {
        self.xx * self.yy - self.xy * self.xy
    }

    fn mean(&self, other: &Self) -> Self {
        Self {
            xx: 0.5 * (self.xx + other.xx),
            xy: 0.5 * (self.xy + other.xy),
            yy: 0.5 * (self.yy + other.yy),
        }
    }
}

impl Footprint {
    pub fn new(x: f64, y: f64, heading: f64, length: f64, width: f64) -> Self {
        Self {
            x,
            y,
            heading,
            length,
            width,
        }
    }

    pub fn covariance(&self) -> Covariance {
        let (s, c) = self.heading.sin_cos();
        let l2 = self.length * self.length;
        let w2 = self.width * self.width;
        Covariance {
            xx: l2 * c * c + w2 * s * s,
            xy: (l2 - w2) * c * s,
            yy: l2 * s * s + w2 * c * c,
        }
    }
}

/// Overlap weight of two footprints in `[0, 1]`.
///
/// Bhattacharyya coefficient of the two Gaussians:
///
/// ```text
/// S = (Sa + Sb) / 2
/// w = sqrt( sqrt(|Sa| |Sb|) / |S| ) * exp( -d' S^-1 d / 8 )
/// ```
///
/// Symmetric in its arguments and exactly 1 for identical footprints.
/// Footprints with a zero sigma have no area and give 0.
pub fn overlap_weight(a: &Footprint, b: &Footprint) -> f64 {
    let ca = a.covariance();
    let cb = b.covariance();
    let det_a = ca.det();
    let det_b = cb.det();
    if det_a <= 0.0 || det_b <= 0.0 {
        return 0.0;
    }
    let cm = ca.mean(&cb);
    let det = cm.det();
    if det <= 0.0 || !det.is_finite() {
        return 0.0;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mahalanobis = (cm.yy * dx * dx - 2.0 * cm.xy * dx * dy + cm.xx * dy * dy) / det;
    let shape = (det_a.sqrt() * det_b.sqrt() / det).sqrt().min(1.0);
    let weight = shape * (-0.125 * mahalanobis).exp();
    if weight.is_finite() { weight } else { 0.0 }
}

/// Horizontal separation beyond which every weight is below `cutoff`, given
/// that no sigma of either footprint exceeds `max_sigma`.
pub fn search_radius(max_sigma: f64, cutoff: f64) -> f64 {
    if cutoff >= 1.0 {
        return 0.0;
    }
    max_sigma * (8.0 * (1.0 / cutoff).ln()).sqrt()
}
