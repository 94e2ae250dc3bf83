//! GPU rendering subsystem.
//!
//! Draws the fixed full-screen quad with whichever shader program is active.
//!
//! Convention:
//! - the quad mesh is already in NDC (`[-1, 1]²`, z = 0)
//! - per-frame values reach both stages through one uniform block at
//!   set 0, binding 0 (see [`FrameUniforms`])

mod ctx;
mod quad;
mod renderer;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{QuadVertex, POSITION_LOCATION, QUAD_INDICES, QUAD_VERTICES};
pub use renderer::QuadRenderer;
pub use uniforms::{FrameUniforms, FRAME_UNIFORMS_BINDING, FRAME_UNIFORMS_GROUP};
