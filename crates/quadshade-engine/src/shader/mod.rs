//! Shader program lifecycle.
//!
//! Stages are read from disk, compiled and validated with naga, linked by
//! checking the vertex/fragment interface, and finally turned into a GPU
//! program through a [`ProgramFactory`]. [`ProgramManager`] owns the single
//! active program and swaps it on reload without ever leaving the slot empty.
//!
//! Flow:
//! - [`compile_stage`] ×2 → [`link_program`] → [`ProgramFactory::create_program`]
//! - first build failure is returned to the caller (fatal at startup)
//! - reload failures keep the previous program active

mod compile;
mod error;
mod link;
mod manager;
mod pipeline;
mod slot;
mod source;

pub use compile::{compile_source, compile_stage, CompiledStage};
pub use error::ShaderError;
pub use link::{link_program, LinkedProgram};
pub use manager::{ProgramFactory, ProgramManager, ReloadOutcome};
pub use pipeline::{GpuProgram, PipelineFactory};
pub use slot::{ProgramSlot, SlotState};
pub use source::{ShaderPaths, ShaderSource, ShaderStage};
