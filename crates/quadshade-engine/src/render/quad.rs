use bytemuck::{Pod, Zeroable};

/// Shader location of the quad's position attribute.
pub const POSITION_LOCATION: u32 = 0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 3],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![POSITION_LOCATION => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Full-screen quad in NDC.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [1.0, 1.0, 0.0] },   // top right
    QuadVertex { pos: [1.0, -1.0, 0.0] },  // bottom right
    QuadVertex { pos: [-1.0, -1.0, 0.0] }, // bottom left
    QuadVertex { pos: [-1.0, 1.0, 0.0] },  // top left
];

pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_reference_every_vertex() {
        for v in 0..QUAD_VERTICES.len() as u32 {
            assert!(QUAD_INDICES.contains(&v));
        }
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn quad_spans_ndc() {
        for v in QUAD_VERTICES {
            assert_eq!(v.pos[0].abs(), 1.0);
            assert_eq!(v.pos[1].abs(), 1.0);
            assert_eq!(v.pos[2], 0.0);
        }
    }

    #[test]
    fn layout_stride_is_three_floats() {
        assert_eq!(QuadVertex::layout().array_stride, 12);
    }
}
