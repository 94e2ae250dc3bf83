//! quadshade engine crate.
//!
//! Owns the platform loop, the wgpu device layer and the shader program
//! lifecycle used by the demo binary.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod shader;
