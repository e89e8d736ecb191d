pub mod sphere;
pub mod vec;

pub use sphere::*;
pub use vec::*;
