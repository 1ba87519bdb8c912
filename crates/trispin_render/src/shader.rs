//! Shader source loading and compilation
//!
//! Shader sources are plain WGSL files read from disk at startup. Compilation
//! runs inside a validation error scope so that a bad shader surfaces as a
//! [`ShaderError`] carrying the compiler log instead of an uncaptured device
//! error.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Pipeline stage a shader module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every module of this stage must export
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex Shader",
            ShaderStage::Fragment => "Fragment Shader",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Error type for shader loading, compilation and linking
#[derive(Debug)]
pub enum ShaderError {
    /// The source file could not be read
    Io { path: PathBuf, source: io::Error },
    /// A single stage failed to compile
    Compile { stage: ShaderStage, log: String },
    /// The stages compiled but could not be combined into a pipeline
    Link { log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "Failed to read shader '{}': {}", path.display(), source)
            }
            ShaderError::Compile { stage, log } => {
                write!(f, "Failed to compile {} shader: {}", stage, log)
            }
            ShaderError::Link { log } => write!(f, "Failed to link shader program: {}", log),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            ShaderError::Compile { .. } | ShaderError::Link { .. } => None,
        }
    }
}

/// Read a text file, returning every line terminated by `\n`.
///
/// CRLF line endings are normalized and a trailing newline is added if the
/// file lacks one.
pub fn read_all_lines<P: AsRef<Path>>(path: P) -> Result<String, ShaderError> {
    let path = path.as_ref();
    let io_err = |source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut text = String::new();
    for line in reader.lines() {
        text.push_str(&line.map_err(io_err)?);
        text.push('\n');
    }
    Ok(text)
}

/// WGSL sources for both pipeline stages
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Read both stages from disk
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Self, ShaderError> {
        let vertex = read_all_lines(&vertex_path)?;
        let fragment = read_all_lines(&fragment_path)?;
        log::debug!(
            "Read shaders '{}' ({} bytes) and '{}' ({} bytes)",
            vertex_path.as_ref().display(),
            vertex.len(),
            fragment_path.as_ref().display(),
            fragment.len()
        );
        Ok(Self { vertex, fragment })
    }

    /// Source text for a stage
    pub fn get(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Compile one stage into a shader module
pub fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.label()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            stage,
            log: err.to_string(),
        }),
        None => {
            log::debug!("Compiled {} shader", stage);
            Ok(module)
        }
    }
}
