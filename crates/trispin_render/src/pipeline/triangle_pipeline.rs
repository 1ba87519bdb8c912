//! Render pipeline for the spinning triangle
//!
//! Owns every GPU object the demo needs: the linked pipeline, the vertex
//! buffer holding [`TRIANGLE`], and the uniform buffer with the model, view and
//! projection matrices. Dropping the pipeline releases all of them.

use trispin_math::Mat4;
use wgpu::util::DeviceExt;

use super::types::{Transforms, Vertex, COLOR_LOCATION, POSITION_LOCATION, TRIANGLE};
use crate::shader::{compile_stage, ShaderError, ShaderSources, ShaderStage};

/// Render pipeline for the coloured triangle
pub struct TrianglePipeline {
    /// The linked render pipeline
    pipeline: wgpu::RenderPipeline,
    /// Uniform buffer holding [`Transforms`]
    uniform_buffer: wgpu::Buffer,
    /// Bind group for uniforms
    bind_group: wgpu::BindGroup,
    /// Interleaved position/color vertices
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl TrianglePipeline {
    /// Compile both shader stages, link them and upload the triangle
    ///
    /// The vertex stage is compiled first; whichever stage fails first is the
    /// one reported.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sources: &ShaderSources,
    ) -> Result<Self, ShaderError> {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Triangle Vertex Buffer"),
            contents: bytemuck::cast_slice(&TRIANGLE),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let vertex_shader = compile_stage(device, ShaderStage::Vertex, sources.get(ShaderStage::Vertex))?;
        let fragment_shader =
            compile_stage(device, ShaderStage::Fragment, sources.get(ShaderStage::Fragment))?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transforms Bind Group Layout"),
            entries: &[
                // Transforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<Transforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Triangle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Linking: stage interfaces and the bind group layout are checked here
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Triangle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                buffers: &[Self::vertex_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }
        log::debug!("Linked triangle pipeline");

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transforms Uniform Buffer"),
            contents: bytemuck::bytes_of(&Transforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transforms Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            vertex_count: TRIANGLE.len() as u32,
        })
    }

    /// Get the vertex buffer layout for [`Vertex`]
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: POSITION_LOCATION,
                },
                // color: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: COLOR_LOCATION,
                },
            ],
        }
    }

    /// Upload the model matrix
    pub fn update_model(&self, queue: &wgpu::Queue, model: &Mat4) {
        queue.write_buffer(&self.uniform_buffer, Transforms::MODEL_OFFSET, bytemuck::bytes_of(model));
    }

    /// Upload the view matrix
    pub fn update_view(&self, queue: &wgpu::Queue, view: &Mat4) {
        queue.write_buffer(&self.uniform_buffer, Transforms::VIEW_OFFSET, bytemuck::bytes_of(view));
    }

    /// Upload the projection matrix
    pub fn update_projection(&self, queue: &wgpu::Queue, projection: &Mat4) {
        queue.write_buffer(
            &self.uniform_buffer,
            Transforms::PROJECTION_OFFSET,
            bytemuck::bytes_of(projection),
        );
    }

    /// Number of vertices drawn per frame
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Clear the target and draw the triangle
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Triangle Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Device without a surface, or `None` on machines with no usable adapter
    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;
        let (device, _queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("trispin test device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .ok()?;
        Some(device)
    }

    fn shipped_sources() -> ShaderSources {
        let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../shaders");
        ShaderSources::load(format!("{root}/vertex.wgsl"), format!("{root}/fragment.wgsl")).unwrap()
    }

    #[test]
    fn test_shader_compile_and_link_on_device() {
        let Some(device) = headless_device() else {
            eprintln!("no wgpu adapter available, skipping");
            return;
        };

        // Shipped shaders compile and link
        let sources = shipped_sources();
        let pipeline = TrianglePipeline::new(&device, FORMAT, &sources).unwrap();
        assert_eq!(pipeline.vertex_count(), 3);

        // Syntax error in the vertex stage
        let broken = ShaderSources {
            vertex: "@vertex\nfn vs_main( -> {\n".to_string(),
            fragment: sources.fragment.clone(),
        };
        match TrianglePipeline::new(&device, FORMAT, &broken) {
            Err(ShaderError::Compile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            Err(other) => panic!("Expected Compile error, got {:?}", other),
            Ok(_) => panic!("Broken vertex source should not compile"),
        }

        // Both stages compile on their own, but the fragment stage reads a
        // location the vertex stage never writes
        let mismatched = ShaderSources {
            vertex: sources.vertex.clone(),
            fragment: "@fragment\n\
                       fn fs_main(@location(3) shade: vec4<f32>) -> @location(0) vec4<f32> {\n\
                           return shade;\n\
                       }\n"
                .to_string(),
        };
        assert!(compile_stage(&device, ShaderStage::Fragment, &mismatched.fragment).is_ok());
        match TrianglePipeline::new(&device, FORMAT, &mismatched) {
            Err(ShaderError::Link { log }) => assert!(!log.is_empty()),
            Err(other) => panic!("Expected Link error, got {:?}", other),
            Ok(_) => panic!("Mismatched stage interfaces should not link"),
        }
    }

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = TrianglePipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<Vertex>() as u64);
        assert_eq!(layout.array_stride, 24);
    }

    #[test]
    fn test_vertex_buffer_layout_attributes() {
        let layout = TrianglePipeline::vertex_buffer_layout();
        assert_eq!(layout.attributes.len(), 2);

        let position = &layout.attributes[0];
        assert_eq!(position.shader_location, POSITION_LOCATION);
        assert_eq!(position.offset, 0);

        let color = &layout.attributes[1];
        assert_eq!(color.shader_location, COLOR_LOCATION);
        assert_eq!(color.offset, std::mem::offset_of!(Vertex, color) as u64);
    }
}
