use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use naga::front::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSource, ShaderStage};

/// One successfully compiled and validated stage.
///
/// A stage only exists to be linked: [`super::link_program`] consumes it by
/// value, so the intermediate module is released as soon as the program is
/// linked.
#[derive(Debug)]
pub struct CompiledStage {
    pub(crate) stage: ShaderStage,
    pub(crate) path: PathBuf,
    pub(crate) module: naga::Module,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stage's `main` entry point. Present by construction.
    pub(crate) fn entry_point(&self) -> &naga::EntryPoint {
        &self.module.entry_points[0]
    }
}

/// Reads `source` from disk and compiles it.
pub fn compile_stage(source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
    let text = std::fs::read_to_string(&source.path).map_err(|e| ShaderError::Io {
        path: source.path.clone(),
        source: e,
    })?;

    compile_source(source.stage, &source.path, &text)
}

/// Compiles GLSL `text` for `stage`. `path` is only used for diagnostics.
pub fn compile_source(
    stage: ShaderStage,
    path: impl Into<PathBuf>,
    text: &str,
) -> Result<CompiledStage, ShaderError> {
    let path = path.into();

    let mut frontend = glsl::Frontend::default();
    let options = glsl::Options::from(stage.to_naga());

    let mut module = match frontend.parse(&options, text) {
        Ok(module) => module,
        Err(errors) => {
            let log = format_parse_errors(&errors, text);
            return Err(ShaderError::Compile { path, log });
        }
    };

    // The device is requested without optional features, so only the
    // baseline capabilities are accepted here.
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::default());
    if let Err(err) = validator.validate(&module) {
        let log = format_validation_error(&err, text);
        return Err(ShaderError::Compile { path, log });
    }

    // Keep only the entry point for this stage so linking can index it directly.
    module
        .entry_points
        .retain(|ep| ep.stage == stage.to_naga() && ep.name == "main");

    if module.entry_points.is_empty() {
        return Err(ShaderError::Compile {
            path,
            log: format!("no `main` entry point for the {stage} stage"),
        });
    }

    log::debug!("compiled {stage} stage `{}`", path.display());

    Ok(CompiledStage {
        stage,
        path,
        module,
    })
}

fn format_parse_errors(errors: &glsl::ParseErrors, text: &str) -> String {
    let mut log = String::new();
    for err in &errors.errors {
        push_diagnostic(&mut log, err.meta, text, &err.kind.to_string());
    }
    log
}

fn format_validation_error(
    err: &naga::WithSpan<naga::valid::ValidationError>,
    text: &str,
) -> String {
    let mut log = String::new();

    for (span, label) in err.spans() {
        push_diagnostic(&mut log, *span, text, label);
    }

    // The outer error names the function; the cause chain holds the detail.
    let mut message = err.as_inner().to_string();
    let mut cause = std::error::Error::source(err.as_inner());
    while let Some(c) = cause {
        let _ = write!(message, ": {c}");
        cause = c.source();
    }
    let _ = writeln!(log, "{message}");

    log
}

fn push_diagnostic(log: &mut String, span: naga::Span, text: &str, message: &str) {
    if span.is_defined() {
        let loc = span.location(text);
        let _ = writeln!(log, "{}:{}: {}", loc.line_number, loc.line_position, message);
    } else {
        let _ = writeln!(log, "{message}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const VERTEX: &str = r#"#version 450 core
layout(location = 0) in vec3 a_position;
layout(location = 0) out vec2 v_uv;

void main() {
    v_uv = a_position.xy * 0.5 + 0.5;
    gl_Position = vec4(a_position, 1.0);
}
"#;

    pub(crate) const FRAGMENT: &str = r#"#version 450 core
layout(set = 0, binding = 0) uniform FrameUniforms {
    float u_time;
    ivec2 u_size;
};

layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 o_color;

void main() {
    float pulse = 0.5 + 0.5 * sin(u_time);
    vec2 px = gl_FragCoord.xy / vec2(u_size);
    o_color = vec4(v_uv * pulse, px.x, 1.0);
}
"#;

    pub(crate) const VERTEX_SYNTAX_ERROR: &str = r#"#version 450 core
layout(location = 0) in vec3 a_position;

void main() {
    gl_Position = vec4(a_position, 1.0)
}
"#;

    #[test]
    fn valid_vertex_stage_compiles() {
        let stage = compile_source(ShaderStage::Vertex, "vertex.glsl", VERTEX).unwrap();
        assert_eq!(stage.stage(), ShaderStage::Vertex);
        assert_eq!(stage.path(), Path::new("vertex.glsl"));
        assert_eq!(stage.entry_point().stage, naga::ShaderStage::Vertex);
    }

    #[test]
    fn valid_fragment_stage_compiles() {
        let stage = compile_source(ShaderStage::Fragment, "fragment.glsl", FRAGMENT).unwrap();
        assert_eq!(stage.entry_point().stage, naga::ShaderStage::Fragment);
    }

    #[test]
    fn syntax_error_reports_path_and_line() {
        let err = compile_source(ShaderStage::Vertex, "shaders/vertex.glsl", VERTEX_SYNTAX_ERROR)
            .unwrap_err();

        match err {
            ShaderError::Compile { path, log } => {
                assert_eq!(path, Path::new("shaders/vertex.glsl"));
                assert!(!log.trim().is_empty());
            }
            other => panic!("expected compile failure, got {other:?}"),
        }
    }

    #[test]
    fn unknown_identifier_is_a_compile_failure() {
        let src = r#"#version 450 core
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(missing, 1.0);
}
"#;
        let err = compile_source(ShaderStage::Fragment, "f.glsl", src).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn double_precision_needs_a_device_feature() {
        let src = r#"#version 450 core
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    double d = double(v_uv.x);
    o_color = vec4(float(d), v_uv.y, 0.0, 1.0);
}
"#;
        let err = compile_source(ShaderStage::Fragment, "f64.glsl", src).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let source = ShaderSource::new(
            std::env::temp_dir().join("quadshade-does-not-exist.glsl"),
            ShaderStage::Vertex,
        );

        let err = compile_stage(&source).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert_eq!(err.path(), Some(source.path.as_path()));
    }

    #[test]
    fn reads_stage_from_disk() {
        let dir = std::env::temp_dir().join(format!("quadshade-compile-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vertex.glsl");
        std::fs::write(&path, VERTEX).unwrap();

        let stage = compile_stage(&ShaderSource::new(&path, ShaderStage::Vertex)).unwrap();
        assert_eq!(stage.path(), path.as_path());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
