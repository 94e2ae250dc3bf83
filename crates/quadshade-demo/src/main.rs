mod app;
mod config;

use std::process::ExitCode;

use quadshade_engine::logging::init_logging;
use quadshade_engine::window::Runtime;

use app::ShaderDemo;
use config::DemoConfig;

fn main() -> ExitCode {
    let config = DemoConfig::from_args(std::env::args_os().skip(1));
    init_logging(config.logging.clone());

    log::info!(
        "{}: press {} to reload shaders, {} to quit",
        config.runtime.title,
        config.keys.reload,
        config.keys.exit
    );

    let app = ShaderDemo::new(config.shaders.clone(), config.keys, config.clear_color);

    // Fatal errors were already logged by the runtime.
    match Runtime::run(config.runtime, config.gpu, app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
