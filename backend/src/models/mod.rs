pub mod interval;
pub mod profile;
pub mod time;

pub use interval::*;
pub use profile::*;
pub use time::*;
