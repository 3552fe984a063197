pub mod bounding_box;
pub mod coordinate_system;
