use kd_tree::KdPoint;
use nalgebra::Point3;

/// A point in 3-D space tagged with the input index of the atom it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct XYZ {
    point: Point3<f64>,
    index: usize,
}

impl XYZ {
    pub fn from(coords: [f64; 3], index: usize) -> Self {
        Self {
            point: Point3::from(coords),
            index,
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }
    pub fn y(&self) -> f64 {
        self.point.y
    }
    pub fn z(&self) -> f64 {
        self.point.z
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for XYZ {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl KdPoint for XYZ {
    type Scalar = f64;
    type Dim = typenum::U3;
    fn at(&self, i: usize) -> f64 {
        self.point[i]
    }
}

/// Strict cutoff test: `true` when `a` and `b` are closer than `cutoff`.
pub fn within_cutoff(a: &XYZ, b: &XYZ, cutoff: f64) -> bool {
    let d_x = a.x() - b.x();
    let d_y = a.y() - b.y();
    let d_z = a.z() - b.z();
    d_x * d_x + d_y * d_y + d_z * d_z < cutoff * cutoff
}
