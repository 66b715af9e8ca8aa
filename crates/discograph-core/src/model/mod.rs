pub mod album;
pub mod catalog;
pub mod duration;

pub use album::{Album, Composition};
pub use catalog::Catalog;
pub use duration::{format_clock, parse_clock};
