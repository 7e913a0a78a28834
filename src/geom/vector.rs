use crate::geom::EPS;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Unit vector from a heading (radians counter-clockwise from east) and an
    /// elevation angle (radians, positive up).
    pub fn from_angles(heading: f64, elevation: f64) -> Self {
        let (s_el, c_el) = elevation.sin_cos();
        let (s_hd, c_hd) = heading.sin_cos();
        Self {
            dx: c_el * c_hd,
            dy: c_el * s_hd,
            dz: s_el,
        }
    }

    /// Cross product between 2 vectors.
    pub fn cross(self, other: Self) -> Self {
        Self {
            dx: self.dy * other.dz - self.dz * other.dy,
            dy: self.dz * other.dx - self.dx * other.dz,
            dz: self.dx * other.dy - self.dy * other.dx,
        }
    }

    /// Dot product between 2 vectors.
    pub fn dot(self, other: Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Length of the horizontal (`dx`, `dy`) component.
    pub fn horizontal_length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Heading of the horizontal component in radians, counter-clockwise from east.
    ///
    /// Vertical vectors have no heading and return 0.
    pub fn heading(&self) -> f64 {
        if self.horizontal_length() < EPS {
            0.0
        } else {
            self.dy.atan2(self.dx)
        }
    }

    /// Angle between the vector and the horizontal plane, in radians.
    ///
    /// This is the grazing angle against a flat boundary.
    pub fn grazing_angle(&self) -> f64 {
        self.dz.abs().atan2(self.horizontal_length())
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.dx - other.dx).abs() < EPS
            && (self.dy - other.dy).abs() < EPS
            && (self.dz - other.dz).abs() < EPS
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPS {
            None
        } else {
            Some(Self {
                dx: self.dx / len,
                dy: self.dy / len,
                dz: self.dz / len,
            })
        }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.dz.is_finite()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            self.dz,
            prec = prec
        )
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            dx: self.dx * other,
            dy: self.dy * other,
            dz: self.dz * other,
        }
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_cross() {
        let vx = Vector::new(1., 0., 0.);
        let vy = Vector::new(0., 1., 0.);
        let v_cross = vx.cross(vy);
        assert_eq!(v_cross, Vector::new(0., 0., 1.));
        assert_eq!(v_cross.length(), 1.);
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(9., 0., 0.);
        assert_eq!(v.normalize(), Some(Vector::new(1., 0., 0.)));
        assert!(Vector::new(0., 0., 0.).normalize().is_none());
    }

    #[test]
    fn test_from_angles_is_unit() {
        let v = Vector::from_angles(0.3, -0.7);
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.heading() - 0.3).abs() < 1e-12);
        assert!((v.grazing_angle() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_grazing_angle_ignores_vertical_sign() {
        let down = Vector::new(1.0, 0.0, -1.0);
        let up = Vector::new(1.0, 0.0, 1.0);
        assert!((down.grazing_angle() - FRAC_PI_4).abs() < 1e-12);
        assert!((up.grazing_angle() - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_heading_is_zero() {
        assert_eq!(Vector::new(0.0, 0.0, -1.0).heading(), 0.0);
    }
}
