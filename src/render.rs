//! GPU rendering: path tessellation and the wgpu pipeline.
//!
//! [`MeshSurface`] is the real front-end behind the [`RenderSurface`]
//! capability: draw behaviors emit paths and ellipses, it turns them into
//! an alpha-blended triangle soup in stage coordinates. [`GpuState`] owns
//! the wgpu surface and pipeline and flushes that soup once per frame under
//! an orthographic projection sized to the stage.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::window::Window;

use crate::engine::Stage;
use crate::error::GpuError;
use crate::path::TrailPath;
use crate::surface::RenderSurface;
use crate::visuals::Color;

/// Catmull-Rom subdivisions per control-point span.
const CURVE_SEGMENTS: usize = 8;
/// Triangle-fan subdivisions for ellipses.
const ELLIPSE_SEGMENTS: usize = 24;

/// One triangle-soup vertex in stage coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Tessellating surface: accumulates triangles for one frame.
#[derive(Debug, Default)]
pub struct MeshSurface {
    vertices: Vec<LineVertex>,
    stack: Vec<Vec3>,
    offset: Vec3,
}

impl MeshSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the frame's triangles. The transform stack is expected to be
    /// balanced by then; leftovers are discarded.
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.stack.clear();
        self.offset = Vec3::ZERO;
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.vertices.push(LineVertex::new(a, color));
        self.vertices.push(LineVertex::new(b, color));
        self.vertices.push(LineVertex::new(c, color));
    }

    /// Expand a polyline into ribbon quads of the given width. Widths are
    /// in stage units; the ribbon lies in the XY plane.
    fn tessellate_stroke(&mut self, points: &[Vec3], width: f32, color: Color) {
        let half = (width * 0.5).max(0.05);
        for pair in points.windows(2) {
            let (a, b) = (pair[0] + self.offset, pair[1] + self.offset);
            let dir = b - a;
            if dir.length_squared() < 1e-12 {
                continue;
            }
            let perp = Vec3::new(-dir.y, dir.x, 0.0).normalize() * half;
            self.push_triangle(a - perp, b - perp, b + perp, color);
            self.push_triangle(a - perp, b + perp, a + perp, color);
        }
    }

    /// Fan the polyline around its centroid. Good enough for the blobby
    /// shapes trails make; no attempt at general polygon triangulation.
    fn tessellate_fill(&mut self, points: &[Vec3], color: Color) {
        if points.len() < 3 {
            return;
        }
        let centroid =
            points.iter().copied().sum::<Vec3>() / points.len() as f32 + self.offset;
        for pair in points.windows(2) {
            self.push_triangle(centroid, pair[0] + self.offset, pair[1] + self.offset, color);
        }
    }
}

impl RenderSurface for MeshSurface {
    fn draw_path(&mut self, path: &TrailPath) {
        if path.len() < 2 {
            return;
        }
        let sampled = path.sample_curve(CURVE_SEGMENTS);
        if path.filled() {
            self.tessellate_fill(&sampled, path.fill_color());
        }
        self.tessellate_stroke(&sampled, path.stroke_width(), path.stroke_color());
    }

    fn draw_ellipse(&mut self, center: Vec3, rx: f32, ry: f32, color: Color) {
        let center = center + self.offset;
        let step = std::f32::consts::TAU / ELLIPSE_SEGMENTS as f32;
        for i in 0..ELLIPSE_SEGMENTS {
            let (a0, a1) = (i as f32 * step, (i + 1) as f32 * step);
            let p0 = center + Vec3::new(a0.cos() * rx, a0.sin() * ry, 0.0);
            let p1 = center + Vec3::new(a1.cos() * rx, a1.sin() * ry, 0.0);
            self.push_triangle(center, p0, p1, color);
        }
    }

    fn push_transform(&mut self) {
        self.stack.push(self.offset);
    }

    fn translate(&mut self, offset: Vec3) {
        self.offset += offset;
    }

    fn pop_transform(&mut self) {
        match self.stack.pop() {
            Some(saved) => self.offset = saved,
            None => log::warn!("pop_transform with empty transform stack"),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

const SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Initial vertex-buffer capacity, grown on demand.
const INITIAL_VERTEX_CAPACITY: u64 = 1 << 16;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    stage: Stage,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, stage: Stage) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        let uniforms = Uniforms {
            view_proj: stage_projection(stage).to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Render Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            uniform_buffer,
            uniform_bind_group,
            stage,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the frame's triangles and present.
    pub fn render(&mut self, mesh: &MeshSurface) -> Result<(), wgpu::SurfaceError> {
        let vertices = mesh.vertices();
        let needed = vertices.len() as u64;
        if needed > self.vertex_capacity {
            self.vertex_capacity = needed.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Trail Vertex Buffer"),
        size: capacity * std::mem::size_of::<LineVertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Orthographic projection covering the stage, z running front to back.
fn stage_projection(stage: Stage) -> Mat4 {
    let half = stage.half();
    Mat4::orthographic_rh(
        -half.x,
        half.x,
        -half.y,
        half.y,
        -half.z.max(1.0),
        half.z.max(1.0),
    )
}
