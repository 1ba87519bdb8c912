//! Checks on the WGSL files shipped with the binary
//!
//! The pipeline binds attributes and uniforms by fixed locations, so the
//! shader files must agree with the Rust side.

use trispin::config::AppConfig;
use trispin_render::pipeline::{COLOR_LOCATION, POSITION_LOCATION};
use trispin_render::shader::{ShaderSources, ShaderStage};

fn shipped_sources() -> ShaderSources {
    let shaders = AppConfig::default().shaders;
    ShaderSources::load(&shaders.vertex_path, &shaders.fragment_path).unwrap()
}

#[test]
fn test_default_shader_paths_exist() {
    let sources = shipped_sources();
    assert!(!sources.vertex.is_empty());
    assert!(!sources.fragment.is_empty());
    assert!(sources.vertex.ends_with('\n'));
}

#[test]
fn test_entry_points_declared() {
    let sources = shipped_sources();
    for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
        let needle = format!("fn {}(", stage.entry_point());
        assert!(
            sources.get(stage).contains(&needle),
            "{} shader lacks {}",
            stage,
            needle
        );
    }
}

#[test]
fn test_vertex_attribute_locations() {
    let vertex = shipped_sources().vertex;
    assert!(vertex.contains(&format!("@location({}) position", POSITION_LOCATION)));
    assert!(vertex.contains(&format!("@location({}) color", COLOR_LOCATION)));
}

#[test]
fn test_transforms_block_order() {
    let vertex = shipped_sources().vertex;
    let model = vertex.find("model: mat4x4<f32>").unwrap();
    let view = vertex.find("view: mat4x4<f32>").unwrap();
    let projection = vertex.find("projection: mat4x4<f32>").unwrap();
    assert!(model < view && view < projection);
}
