use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage a source file compiles to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A shader file on disk and the stage it belongs to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub stage: ShaderStage,
}

impl ShaderSource {
    pub fn new(path: impl Into<PathBuf>, stage: ShaderStage) -> Self {
        Self {
            path: path.into(),
            stage,
        }
    }
}

/// The fixed pair of source files a program is built from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    pub const VERTEX_FILE: &'static str = "vertex.glsl";
    pub const FRAGMENT_FILE: &'static str = "fragment.glsl";

    /// `dir/vertex.glsl` and `dir/fragment.glsl`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vertex: dir.join(Self::VERTEX_FILE),
            fragment: dir.join(Self::FRAGMENT_FILE),
        }
    }

    pub fn vertex_source(&self) -> ShaderSource {
        ShaderSource::new(&self.vertex, ShaderStage::Vertex)
    }

    pub fn fragment_source(&self) -> ShaderSource {
        ShaderSource::new(&self.fragment, ShaderStage::Fragment)
    }
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self::in_dir("shaders")
    }
}
