use wgpu::util::DeviceExt;

use crate::shader::GpuProgram;

use super::{FrameUniforms, RenderCtx, RenderTarget, QUAD_INDICES, QUAD_VERTICES};

/// Draws the full-screen quad with a shader program.
///
/// Owns the static mesh buffers, the per-frame uniform buffer and the
/// bind-group layout every program is built against. The mesh is uploaded
/// once and never mutated.
pub struct QuadRenderer {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

impl QuadRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadshade frame uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: super::FRAME_UNIFORMS_BINDING,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(FrameUniforms::min_binding_size()),
                },
                count: None,
            }],
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadshade frame uniforms ubo"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadshade frame uniforms bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: super::FRAME_UNIFORMS_BINDING,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadshade quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadshade quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            bind_group_layout,
            bind_group,
            uniform_ubo,
            quad_vbo,
            quad_ibo,
        }
    }

    /// Layout programs must be created against to be drawable here.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Uploads the frame uniforms and draws the quad with `program` into `target`.
    ///
    /// `time` is seconds since startup; the size uniform comes from `ctx`.
    /// The target is loaded, not cleared; clearing is the frame's job.
    pub fn render(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        program: &GpuProgram,
        time: f32,
    ) {
        let uniforms = FrameUniforms::new(time, ctx.size.width, ctx.size.height);
        ctx.queue
            .write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(&uniforms));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadshade quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(program.pipeline());
        rpass.set_bind_group(super::FRAME_UNIFORMS_GROUP, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
