use nalgebra::{Point3, point};
use serde::Serialize;

/// Axis aligned bounding box in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Constructs an empty bounding box.
    pub fn empty() -> Self {
        Aabb {
            min: point![f64::MAX, f64::MAX, f64::MAX],
            max: point![f64::MIN, f64::MIN, f64::MIN],
        }
    }

    /// Construct a new AABB with the given bounds.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Aabb { min, max }
    }

    /// Checks, if the bounding box is empty.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Check, if the given point is within the bounds.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && self.min.z <= point.z
            && self.max.x >= point.x
            && self.max.y >= point.y
            && self.max.z >= point.z
    }

    /// Extends the bounding box so that it also covers the given position.
    pub fn extend(&mut self, position: &Point3<f64>) {
        self.min = self.min.inf(position);
        self.max = self.max.sup(position);
    }

    /// Extends the bounding box so that it also covers the other one.
    pub fn extend_aabb(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.extend(&other.min);
        self.extend(&other.max);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::Aabb;

    #[test]
    fn test_empty() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert!(!aabb.contains(&point![0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_extend() {
        let mut aabb = Aabb::empty();
        aabb.extend(&point![1.0, 2.0, 3.0]);
        assert!(!aabb.is_empty());
        assert_eq!(aabb, Aabb::new(point![1.0, 2.0, 3.0], point![1.0, 2.0, 3.0]));

        aabb.extend(&point![-1.0, 5.0, 3.5]);
        assert_eq!(aabb, Aabb::new(point![-1.0, 2.0, 3.0], point![1.0, 5.0, 3.5]));
        assert!(aabb.contains(&point![0.0, 4.0, 3.25]));
        assert!(!aabb.contains(&point![0.0, 6.0, 3.25]));
    }

    #[test]
    fn test_extend_aabb() {
        let mut a = Aabb::new(point![0.0, 0.0, 0.0], point![1.0, 1.0, 1.0]);
        a.extend_aabb(&Aabb::empty());
        assert_eq!(a, Aabb::new(point![0.0, 0.0, 0.0], point![1.0, 1.0, 1.0]));

        a.extend_aabb(&Aabb::new(point![-1.0, 0.5, 0.5], point![0.5, 0.5, 2.0]));
        assert_eq!(a, Aabb::new(point![-1.0, 0.0, 0.0], point![1.0, 1.0, 2.0]));
    }
}
