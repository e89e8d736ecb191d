pub mod budget;
pub mod frame;
pub mod scheduler;

pub use budget::*;
pub use frame::*;
pub use scheduler::*;
