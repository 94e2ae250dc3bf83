use std::fmt::Write as _;

use naga::{AddressSpace, Binding, Interpolation, Sampling, ScalarKind, TypeInner, VectorSize};

use crate::render::{FRAME_UNIFORMS_BINDING, FRAME_UNIFORMS_GROUP, FrameUniforms, POSITION_LOCATION};

use super::{CompiledStage, ShaderError, ShaderStage};

/// A vertex/fragment pair whose interfaces were checked against each other
/// and against the fixed quad mesh and per-frame uniform block.
#[derive(Debug)]
pub struct LinkedProgram {
    pub(crate) vertex: naga::Module,
    pub(crate) fragment: naga::Module,
}

/// A `location` varying: its slot, value type and interpolation qualifiers.
struct Varying<'a> {
    location: u32,
    name: Option<&'a str>,
    ty: &'a TypeInner,
    interpolation: Option<Interpolation>,
    sampling: Option<Sampling>,
}

/// Links two compiled stages.
///
/// Both stages are consumed. Every problem found is collected into a single
/// link log rather than stopping at the first one.
pub fn link_program(
    vertex: CompiledStage,
    fragment: CompiledStage,
) -> Result<LinkedProgram, ShaderError> {
    let mut log = String::new();

    if vertex.stage != ShaderStage::Vertex {
        let _ = writeln!(log, "`{}` is not a vertex stage", vertex.path.display());
    }
    if fragment.stage != ShaderStage::Fragment {
        let _ = writeln!(log, "`{}` is not a fragment stage", fragment.path.display());
    }
    if !log.is_empty() {
        return Err(ShaderError::Link { log });
    }

    check_vertex_inputs(&vertex, &mut log);
    check_varyings(&vertex, &fragment, &mut log);
    check_color_output(&fragment, &mut log);
    check_resources(&vertex, &mut log);
    check_resources(&fragment, &mut log);

    if !log.is_empty() {
        return Err(ShaderError::Link { log });
    }

    log::debug!(
        "linked `{}` + `{}`",
        vertex.path.display(),
        fragment.path.display()
    );

    Ok(LinkedProgram {
        vertex: vertex.module,
        fragment: fragment.module,
    })
}

/// The quad mesh provides a single `vec3` position.
fn check_vertex_inputs(vertex: &CompiledStage, log: &mut String) {
    for input in inputs(vertex) {
        if input.location != POSITION_LOCATION {
            let _ = writeln!(
                log,
                "vertex input {} at location {} is not provided by the quad mesh",
                display_name(input.name),
                input.location
            );
            continue;
        }

        let is_vec3 = matches!(
            input.ty,
            TypeInner::Vector { size: VectorSize::Tri, scalar } if scalar.kind == ScalarKind::Float
        );
        if !is_vec3 {
            let _ = writeln!(
                log,
                "vertex input {} at location {} must be a vec3",
                display_name(input.name),
                input.location
            );
        }
    }
}

/// Every fragment input must be written by the vertex stage with the same type
/// and the same interpolation qualifiers.
fn check_varyings(vertex: &CompiledStage, fragment: &CompiledStage, log: &mut String) {
    let outputs = outputs(vertex);

    for input in inputs(fragment) {
        match outputs.iter().find(|o| o.location == input.location) {
            None => {
                let _ = writeln!(
                    log,
                    "fragment input {} at location {} is not written by the vertex stage",
                    display_name(input.name),
                    input.location
                );
            }
            Some(output) if output.ty != input.ty => {
                let _ = writeln!(
                    log,
                    "type mismatch at location {}: vertex writes {:?}, fragment reads {:?}",
                    input.location, output.ty, input.ty
                );
            }
            Some(output)
                if output.interpolation != input.interpolation
                    || output.sampling != input.sampling =>
            {
                let _ = writeln!(
                    log,
                    "interpolation mismatch at location {}: vertex writes {:?} {:?}, fragment reads {:?} {:?}",
                    input.location,
                    output.interpolation,
                    output.sampling,
                    input.interpolation,
                    input.sampling
                );
            }
            Some(_) => {}
        }
    }
}

fn check_color_output(fragment: &CompiledStage, log: &mut String) {
    let has_color = outputs(fragment).iter().any(|o| {
        o.location == 0
            && matches!(
                o.ty,
                TypeInner::Vector { size: VectorSize::Quad, scalar } if scalar.kind == ScalarKind::Float
            )
    });

    if !has_color {
        let _ = writeln!(log, "fragment stage must write a vec4 color at location 0");
    }
}

/// Only the per-frame uniform block may be bound.
fn check_resources(stage: &CompiledStage, log: &mut String) {
    let module = &stage.module;
    let max_size = std::mem::size_of::<FrameUniforms>() as u32;

    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = display_name(var.name.as_deref());

        if var.space != AddressSpace::Uniform {
            let _ = writeln!(
                log,
                "{} stage: resource {} (set = {}, binding = {}) is not supported",
                stage.stage, name, binding.group, binding.binding
            );
            continue;
        }

        if binding.group != FRAME_UNIFORMS_GROUP || binding.binding != FRAME_UNIFORMS_BINDING {
            let _ = writeln!(
                log,
                "{} stage: uniform block {} must use set = {}, binding = {}",
                stage.stage, name, FRAME_UNIFORMS_GROUP, FRAME_UNIFORMS_BINDING
            );
            continue;
        }

        match &module.types[var.ty].inner {
            TypeInner::Struct { span, .. } if *span > max_size => {
                let _ = writeln!(
                    log,
                    "{} stage: uniform block {} is {} bytes; at most {} are uploaded",
                    stage.stage, name, span, max_size
                );
            }
            TypeInner::Struct { .. } => {}
            _ => {
                let _ = writeln!(log, "{} stage: uniform {} must be a block", stage.stage, name);
            }
        }
    }
}

fn inputs(stage: &CompiledStage) -> Vec<Varying<'_>> {
    let module = &stage.module;
    let mut out = Vec::new();

    for arg in &stage.entry_point().function.arguments {
        collect_varyings(module, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut out);
    }

    out
}

fn outputs(stage: &CompiledStage) -> Vec<Varying<'_>> {
    let module = &stage.module;
    let mut out = Vec::new();

    if let Some(result) = &stage.entry_point().function.result {
        collect_varyings(module, result.ty, result.binding.as_ref(), None, &mut out);
    }

    out
}

/// Flattens an argument or result into its `location` bindings. Built-ins are skipped.
fn collect_varyings<'a>(
    module: &'a naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    name: Option<&'a str>,
    out: &mut Vec<Varying<'a>>,
) {
    match binding {
        Some(Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => out.push(Varying {
            location: *location,
            name,
            ty: &module.types[ty].inner,
            interpolation: *interpolation,
            sampling: *sampling,
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_varyings(
                        module,
                        member.ty,
                        member.binding.as_ref(),
                        member.name.as_deref(),
                        out,
                    );
                }
            }
        }
    }
}

fn display_name(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("`{n}`"),
        None => "<unnamed>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::compile::tests::{FRAGMENT, VERTEX};
    use crate::shader::compile_source;

    fn vertex(src: &str) -> CompiledStage {
        compile_source(ShaderStage::Vertex, "vertex.glsl", src).unwrap()
    }

    fn fragment(src: &str) -> CompiledStage {
        compile_source(ShaderStage::Fragment, "fragment.glsl", src).unwrap()
    }

    fn link_log(result: Result<LinkedProgram, ShaderError>) -> String {
        match result {
            Err(ShaderError::Link { log }) => log,
            Err(other) => panic!("expected link failure, got {other}"),
            Ok(_) => panic!("expected link failure, got a program"),
        }
    }

    #[test]
    fn matching_stages_link() {
        let linked = link_program(vertex(VERTEX), fragment(FRAGMENT)).unwrap();
        assert_eq!(linked.vertex.entry_points.len(), 1);
        assert_eq!(linked.fragment.entry_points.len(), 1);
    }

    #[test]
    fn undeclared_varying_fails_to_link() {
        let frag = r#"#version 450 core
layout(location = 0) in vec2 v_uv;
layout(location = 1) in vec3 v_color;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(v_color * v_uv.x, 1.0);
}
"#;
        let log = link_log(link_program(vertex(VERTEX), fragment(frag)));
        assert!(log.contains("location 1"), "{log}");
    }

    #[test]
    fn varying_type_mismatch_fails_to_link() {
        let frag = r#"#version 450 core
layout(location = 0) in vec3 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(v_uv, 1.0);
}
"#;
        let log = link_log(link_program(vertex(VERTEX), fragment(frag)));
        assert!(log.contains("type mismatch"), "{log}");
    }

    #[test]
    fn interpolation_mismatch_fails_to_link() {
        let frag = r#"#version 450 core
layout(location = 0) flat in vec2 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(v_uv, 0.0, 1.0);
}
"#;
        let log = link_log(link_program(vertex(VERTEX), fragment(frag)));
        assert!(log.contains("interpolation mismatch at location 0"), "{log}");
    }

    #[test]
    fn matching_flat_varyings_link() {
        let vert = r#"#version 450 core
layout(location = 0) in vec3 a_position;
layout(location = 0) flat out vec2 v_uv;
void main() {
    v_uv = a_position.xy;
    gl_Position = vec4(a_position, 1.0);
}
"#;
        let frag = r#"#version 450 core
layout(location = 0) flat in vec2 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(v_uv, 0.0, 1.0);
}
"#;
        assert!(link_program(vertex(vert), fragment(frag)).is_ok());
    }

    #[test]
    fn extra_vertex_attribute_fails_to_link() {
        let vert = r#"#version 450 core
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
layout(location = 0) out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 1.0);
}
"#;
        let log = link_log(link_program(vertex(vert), fragment(FRAGMENT)));
        assert!(log.contains("not provided by the quad mesh"), "{log}");
    }

    #[test]
    fn foreign_uniform_binding_fails_to_link() {
        let frag = r#"#version 450 core
layout(set = 0, binding = 3) uniform Other {
    vec4 tint;
};
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = tint * v_uv.x;
}
"#;
        let log = link_log(link_program(vertex(VERTEX), fragment(frag)));
        assert!(log.contains("binding = 0"), "{log}");
    }

    #[test]
    fn oversized_uniform_block_fails_to_link() {
        let frag = r#"#version 450 core
layout(set = 0, binding = 0) uniform FrameUniforms {
    float u_time;
    ivec2 u_size;
    mat4 u_extra;
};
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = u_extra * vec4(v_uv, u_time, 1.0);
}
"#;
        let log = link_log(link_program(vertex(VERTEX), fragment(frag)));
        assert!(log.contains("bytes"), "{log}");
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let log = link_log(link_program(fragment(FRAGMENT), vertex(VERTEX)));
        assert!(log.contains("not a vertex stage"), "{log}");
    }
}
