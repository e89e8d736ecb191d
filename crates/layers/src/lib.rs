//! Country styling: palette, fill policy, transitions and tooltips.

pub mod country;
pub mod labels;
pub mod symbology;
pub mod transition;
pub mod view_mode;

pub use country::*;
pub use labels::*;
pub use symbology::*;
pub use transition::*;
pub use view_mode::*;
