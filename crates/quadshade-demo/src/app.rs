use anyhow::Context;

use quadshade_engine::core::{App, AppControl, FrameCtx};
use quadshade_engine::device::Gpu;
use quadshade_engine::render::QuadRenderer;
use quadshade_engine::shader::{
    GpuProgram, PipelineFactory, ProgramManager, ReloadOutcome, ShaderPaths,
};

use crate::config::DemoKeys;

/// GPU-side state, created once the device exists.
struct Scene {
    renderer: QuadRenderer,
    programs: ProgramManager<GpuProgram>,
    next_program_id: u64,
}

impl Scene {
    fn new(gpu: &Gpu<'_>, paths: ShaderPaths) -> anyhow::Result<Self> {
        let renderer = QuadRenderer::new(gpu.device());
        let mut next_program_id = 0;

        let programs = {
            let mut factory = PipelineFactory::new(
                gpu.device(),
                gpu.surface_format(),
                renderer.bind_group_layout(),
                &mut next_program_id,
            );
            ProgramManager::new(paths, &mut factory)
                .context("no usable shader program at startup")?
        };

        Ok(Self {
            renderer,
            programs,
            next_program_id,
        })
    }

    fn reload(&mut self, gpu: &Gpu<'_>) -> ReloadOutcome {
        let Self {
            renderer,
            programs,
            next_program_id,
        } = self;

        let mut factory = PipelineFactory::new(
            gpu.device(),
            gpu.surface_format(),
            renderer.bind_group_layout(),
            next_program_id,
        );
        programs.reload(&mut factory)
    }
}

/// Draws the quad with the active program; reloads and exits on key presses.
pub struct ShaderDemo {
    paths: ShaderPaths,
    keys: DemoKeys,
    clear_color: wgpu::Color,
    scene: Option<Scene>,
}

impl ShaderDemo {
    pub fn new(paths: ShaderPaths, keys: DemoKeys, clear_color: wgpu::Color) -> Self {
        Self {
            paths,
            keys,
            clear_color,
            scene: None,
        }
    }
}

impl App for ShaderDemo {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        log::info!(
            "building shaders from `{}` and `{}`",
            self.paths.vertex.display(),
            self.paths.fragment.display()
        );
        self.scene = Some(Scene::new(gpu, self.paths.clone())?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(self.keys.exit) {
            return AppControl::Exit;
        }

        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        if ctx.input_frame.pressed(self.keys.reload) {
            log::info!("reloading shaders");
            // Failures are logged by the manager; the old program keeps drawing.
            let _ = scene.reload(ctx.gpu);
        }

        let Some(program) = scene.programs.active() else {
            return AppControl::Continue;
        };

        let time = ctx.time.elapsed;
        let renderer = &scene.renderer;

        ctx.render(self.clear_color, |rctx, target| {
            renderer.render(rctx, target, program, time);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use quadshade_engine::shader::{compile_stage, link_program};

    use super::*;

    #[test]
    fn shipped_shaders_compile_and_link() {
        let paths = ShaderPaths::in_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"));

        let vertex = compile_stage(&paths.vertex_source()).unwrap();
        let fragment = compile_stage(&paths.fragment_source()).unwrap();

        assert!(link_program(vertex, fragment).is_ok());
    }
}
