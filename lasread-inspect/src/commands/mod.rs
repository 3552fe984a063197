pub mod check;
pub mod header;
pub mod points;
