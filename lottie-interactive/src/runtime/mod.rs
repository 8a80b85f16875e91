mod animation;
mod driver;
mod playback;
pub mod remap;
mod state;
mod transition;
mod variables;

pub use animation::*;
pub use driver::*;
pub use playback::*;
pub use variables::*;


#[cfg(test)]
mod variables_tests;
