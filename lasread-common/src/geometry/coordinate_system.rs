use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// A position in the global coordinate system
pub type PositionGlobal = Point3<f64>;

/// A position as it is stored in a LAS point record.
pub type PositionRaw = Point3<i32>;

/// The coordinate system is used to convert between
/// the stored coordinates and actual "world coordinates".
#[derive(Debug, Clone, PartialEq, Copy, Serialize)]
pub struct CoordinateSystem {
    scale: Vector3<f64>,
    offset: Vector3<f64>,
}

impl CoordinateSystem {
    /// Construct a new coordinate system with unit scale and no offset
    pub fn new_identity() -> Self {
        CoordinateSystem {
            scale: Vector3::new(1.0, 1.0, 1.0),
            offset: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Construct a new coordinate system with the given scale and offset
    pub fn from_las_transform(scale: Vector3<f64>, offset: Vector3<f64>) -> Self {
        CoordinateSystem { scale, offset }
    }

    pub fn scale(&self) -> &Vector3<f64> {
        &self.scale
    }

    pub fn offset(&self) -> &Vector3<f64> {
        &self.offset
    }

    /// Applies `raw * scale + offset` to each axis.
    ///
    /// The multiplication and the addition are rounded separately, so the
    /// result is the same on every platform.
    pub fn decode_position(&self, pos: PositionRaw) -> PositionGlobal {
        let pos_f64 = pos.map(f64::from).coords;
        (pos_f64.component_mul(&self.scale) + self.offset).into()
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::new_identity()
    }
}
