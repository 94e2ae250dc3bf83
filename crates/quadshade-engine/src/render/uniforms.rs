use bytemuck::{Pod, Zeroable};

/// Bind group index of the per-frame uniform block.
pub const FRAME_UNIFORMS_GROUP: u32 = 0;

/// Binding index of the per-frame uniform block inside its group.
pub const FRAME_UNIFORMS_BINDING: u32 = 0;

/// Per-frame values uploaded before every draw.
///
/// std140 layout, matching this GLSL declaration:
///
/// ```glsl
/// layout(set = 0, binding = 0) uniform FrameUniforms {
///     float u_time;   // offset 0
///     ivec2 u_size;   // offset 8
/// };
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Seconds since startup.
    pub time: f32,
    pub _pad: u32, // ivec2 is 8-byte aligned
    /// Drawable size in physical pixels, the framebuffer `gl_FragCoord` spans.
    /// On HiDPI displays this is larger than the window size in screen
    /// coordinates by the scale factor.
    pub size: [i32; 2],
}

impl FrameUniforms {
    pub fn new(time: f32, width: u32, height: u32) -> Self {
        Self {
            time,
            _pad: 0,
            size: [clamp_i32(width), clamp_i32(height)],
        }
    }

    /// Minimum binding size for the uniform buffer. `FrameUniforms` is 16 bytes,
    /// so this never fails.
    pub(crate) fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<FrameUniforms>() as u64)
            .expect("FrameUniforms has non-zero size by construction")
    }
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 16);

        let u = FrameUniforms::new(1.5, 800, 600);
        let bytes = bytemuck::bytes_of(&u);

        assert_eq!(&bytes[0..4], &1.5f32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &800i32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &600i32.to_ne_bytes());
    }

    #[test]
    fn oversized_dimensions_saturate() {
        let u = FrameUniforms::new(0.0, u32::MAX, 1);
        assert_eq!(u.size, [i32::MAX, 1]);
    }

    #[test]
    fn binding_size_is_whole_block() {
        assert_eq!(FrameUniforms::min_binding_size().get(), 16);
    }
}
