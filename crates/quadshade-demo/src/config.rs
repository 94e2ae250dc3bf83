use std::ffi::OsString;
use std::path::PathBuf;

use quadshade_engine::device::GpuInit;
use quadshade_engine::input::Key;
use quadshade_engine::logging::LoggingConfig;
use quadshade_engine::shader::ShaderPaths;
use quadshade_engine::window::RuntimeConfig;

/// Keys the demo reacts to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DemoKeys {
    pub reload: Key,
    pub exit: Key,
}

impl Default for DemoKeys {
    fn default() -> Self {
        Self {
            reload: Key::Enter,
            exit: Key::Escape,
        }
    }
}

/// Everything the demo needs before the event loop starts.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
    pub logging: LoggingConfig,
    pub shaders: ShaderPaths,
    pub keys: DemoKeys,
    pub clear_color: wgpu::Color,
}

impl DemoConfig {
    pub const DEFAULT_SHADER_DIR: &'static str = "shaders";

    /// Builds the configuration from command-line arguments (program name
    /// already skipped). The only argument is an optional shader directory.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let shader_dir = args
            .into_iter()
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_SHADER_DIR));

        Self {
            shaders: ShaderPaths::in_dir(shader_dir),
            ..Self::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
            shaders: ShaderPaths::in_dir(Self::DEFAULT_SHADER_DIR),
            keys: DemoKeys::default(),
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.3,
                b: 0.3,
                a: 1.0,
            },
        }
    }
}
