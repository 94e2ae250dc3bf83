use std::borrow::Cow;

use crate::render::QuadVertex;

use super::{LinkedProgram, ProgramFactory, ShaderError};

/// A linked program on the GPU: a render pipeline drawing the quad mesh.
///
/// Dropping it releases the pipeline.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    id: u64,
}

impl GpuProgram {
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Factory-assigned identifier, unique per `PipelineFactory` counter.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for GpuProgram {
    fn drop(&mut self) {
        log::debug!("releasing shader program #{}", self.id);
    }
}

/// Creates [`GpuProgram`]s on a wgpu device.
///
/// Borrowed for the duration of a build; the bind-group layout is owned by the
/// quad renderer so every program is compatible with its uniform bind group.
pub struct PipelineFactory<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    bind_group_layout: &'a wgpu::BindGroupLayout,
    next_id: &'a mut u64,
}

impl<'a> PipelineFactory<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        surface_format: wgpu::TextureFormat,
        bind_group_layout: &'a wgpu::BindGroupLayout,
        next_id: &'a mut u64,
    ) -> Self {
        Self {
            device,
            surface_format,
            bind_group_layout,
            next_id,
        }
    }
}

impl ProgramFactory for PipelineFactory<'_> {
    type Program = GpuProgram;

    fn create_program(&mut self, linked: &LinkedProgram) -> Result<GpuProgram, ShaderError> {
        // wgpu validates modules and pipelines again on creation. Without a
        // scope those errors go to the uncaptured handler, which panics.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.create_pipeline(linked);

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }

        *self.next_id += 1;
        let id = *self.next_id;
        log::debug!("created shader program #{id}");

        Ok(GpuProgram { pipeline, id })
    }
}

impl PipelineFactory<'_> {
    fn create_pipeline(&self, linked: &LinkedProgram) -> wgpu::RenderPipeline {
        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadshade vertex stage"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(linked.vertex.clone())),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadshade fragment stage"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(linked.fragment.clone())),
        });

        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quadshade pipeline layout"),
                bind_group_layouts: &[self.bind_group_layout],
                immediate_size: 0,
            });

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadshade program"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}
