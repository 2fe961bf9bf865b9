pub mod builder;
pub mod file;

pub use builder::{FlagOverrides, build_config};
