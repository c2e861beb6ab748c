use crate::device::GpuContext;
use bytemuck::{Pod, Zeroable};
use cloudview_core::{Drawable, Point3d, PointCloudModel, Result};
use nalgebra::Matrix4;
use std::ops::Range;
use std::sync::Arc;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Corners of the quad each point is expanded into
const QUAD_VERTEX_COUNT: u32 = 4;

/// Per-point instance data for point cloud rendering
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    /// Create an instance from a model vertex and its 8-bit color
    pub fn from_point(point: &Point3d, color: [u8; 3]) -> Self {
        Self {
            position: [point.x as f32, point.y as f32, point.z as f32],
            color: [
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            ],
        }
    }

    /// Instance buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Point that model coordinates are made relative to before they are
/// narrowed to `f32`: the center of the model's bounding box.
pub fn render_origin(model: &PointCloudModel) -> Point3d {
    model.center().unwrap_or_else(Point3d::origin)
}

/// Convert a model into render instances, one per vertex, in vertex order.
///
/// Positions are shifted by `-origin` in double precision first, so clouds
/// far from the world origin keep their detail.
pub fn model_to_vertices(model: &PointCloudModel, origin: &Point3d) -> Vec<PointVertex> {
    model
        .iter()
        .map(|(position, color)| PointVertex::from_point(&Point3d::from(position - *origin), color))
        .collect()
}

/// Split `count` instances into consecutive ranges that each fit in one
/// buffer of at most `max_buffer_size` bytes
pub fn instance_batches(count: usize, max_buffer_size: u64) -> Vec<Range<usize>> {
    let stride = std::mem::size_of::<PointVertex>() as u64;
    let per_buffer = (max_buffer_size / stride).clamp(1, u32::MAX as u64) as usize;

    (0..count)
        .step_by(per_buffer)
        .map(|start| start..(start + per_buffer).min(count))
        .collect()
}

/// Camera uniform data
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub viewport_size: [f32; 2],
    pub point_size: f32,
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Matrix4<f32>, width: u32, height: u32, point_size: f32) -> Self {
        Self {
            view_proj: view_proj.into(),
            viewport_size: [width.max(1) as f32, height.max(1) as f32],
            point_size,
            _padding: 0.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Point diameter in pixels
    pub point_size: f32,
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            background_color: [0.5, 0.5, 0.5, 1.0],
            enable_depth_test: true,
        }
    }
}

/// Point cloud renderer drawing one colored sprite per model vertex
pub struct PointCloudRenderer {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub depth_view: wgpu::TextureView,
    /// Instance buffers with the number of points each holds
    instance_buffers: Vec<(wgpu::Buffer, u32)>,
    instance_count: u32,
    pub config: RenderConfig,
}

impl PointCloudRenderer {
    /// Create a renderer for `window` and upload `model`
    pub async fn new(window: Arc<Window>, model: &PointCloudModel, config: RenderConfig) -> Result<Self> {
        let size = window.inner_size();
        let (gpu_context, surface) = GpuContext::with_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        // Colors are authored as display values, so prefer a non-sRGB target
        // and write them through unchanged.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| cloudview_core::Error::Gpu("Surface reports no supported formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let camera_uniform = CameraUniform::new(
            Matrix4::identity(),
            surface_config.width,
            surface_config.height,
            config.point_size,
        );

        let camera_buffer = gpu_context.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let camera_bind_group_layout = gpu_context.create_bind_group_layout(
            "camera_bind_group_layout",
            &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        );

        let camera_bind_group = gpu_context.create_bind_group(
            "camera_bind_group",
            &camera_bind_group_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        );

        let shader = gpu_context.create_shader_module("Point Cloud Shader", include_str!("shaders/point_cloud.wgsl"));

        let render_pipeline_layout = gpu_context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Cloud Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = gpu_context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Cloud Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[PointVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let depth_view = create_depth_view(&gpu_context.device, &surface_config);

        let mut renderer = Self {
            gpu_context,
            surface,
            surface_config,
            render_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            depth_view,
            instance_buffers: Vec::new(),
            instance_count: 0,
            config,
        };
        renderer.set_model(model);

        Ok(renderer)
    }

    /// Replace the uploaded point set. Points are stored relative to
    /// [`render_origin`] and split across as many buffers as the device's
    /// buffer size limit requires.
    pub fn set_model(&mut self, model: &PointCloudModel) {
        let vertices = model_to_vertices(model, &render_origin(model));
        let max_buffer_size = self.gpu_context.device.limits().max_buffer_size;

        self.instance_buffers = instance_batches(vertices.len(), max_buffer_size)
            .into_iter()
            .map(|range| {
                let count = range.len() as u32;
                let buffer = self.gpu_context.create_buffer_init(
                    "Point Cloud Instance Buffer",
                    &vertices[range],
                    wgpu::BufferUsages::VERTEX,
                );
                (buffer, count)
            })
            .collect();
        self.instance_count = vertices.len() as u32;

        log::debug!(
            "Uploaded {} point instances in {} buffers",
            self.instance_count,
            self.instance_buffers.len()
        );
    }

    /// Number of points that will be drawn
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Current surface size in pixels
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    /// Update the combined view-projection matrix
    pub fn update_camera(&mut self, view_proj: Matrix4<f32>) {
        self.camera_uniform = CameraUniform::new(
            view_proj,
            self.surface_config.width,
            self.surface_config.height,
            self.config.point_size,
        );

        self.gpu_context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu_context.device, &self.surface_config);
            self.depth_view = create_depth_view(&self.gpu_context.device, &self.surface_config);
        }
    }

    /// Render one frame. An empty model only clears to the background.
    pub fn render(&self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu_context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Cloud Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Cloud Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.config.background_color[0],
                            g: self.config.background_color[1],
                            b: self.config.background_color[2],
                            a: self.config.background_color[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: if self.config.enable_depth_test {
                    Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    })
                } else {
                    None
                },
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.instance_buffers.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                for (buffer, count) in &self.instance_buffers {
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..QUAD_VERTEX_COUNT, 0..*count);
                }
            }
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: surface_config.width,
            height: surface_config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
