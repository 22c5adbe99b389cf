//! Point-sprite and orbit-trail rendering

use crate::buffers::{orbit_vertex_layout, point_instance_layout, TrajectoryBuffers};
use crate::palette;
use bytemuck::{Pod, Zeroable};
use orbit_camera::CameraUniform;
use thiserror::Error;
use trajectory_playback::{FramePlan, PointScale};

#[derive(Error, Debug)]
pub enum RendererError {
    /// Shader or pipeline creation rejected by wgpu validation
    #[error("failed to build render pipelines: {0}")]
    Pipeline(String),
}

/// Per-frame display uniform, shared by both passes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DisplayUniform {
    pub resolution: [f32; 2],
    pub relative_size: f32,
    pub absolute_size: f32,
    pub point_color: [f32; 4],
    pub trail_color: [f32; 4],
}

impl DisplayUniform {
    pub fn new(width: u32, height: u32, point_scale: PointScale) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            relative_size: point_scale.relative,
            absolute_size: point_scale.absolute,
            point_color: palette::point_color(),
            trail_color: palette::trail_color(),
        }
    }
}

pub struct TrajectoryRenderer {
    sprite_pipeline: wgpu::RenderPipeline,
    orbit_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    display_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    surface_config: wgpu::SurfaceConfiguration,
}

impl TrajectoryRenderer {
    /// Build both pipelines. Shader compilation and pipeline validation
    /// failures are captured and returned instead of aborting.
    pub async fn new(
        device: &wgpu::Device,
        surface_config: &wgpu::SurfaceConfiguration,
    ) -> Result<Self, RendererError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let display_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Display Buffer"),
            size: std::mem::size_of::<DisplayUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Trajectory Bind Group Layout"),
            entries: &[
                // Camera (Uniform) - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Display (Uniform) - Binding 1
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Trajectory Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: display_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trajectory Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let orbit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Orbit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/orbit.wgsl").into()),
        });

        let sprite_pipeline = create_pipeline(
            device,
            "Sprite Render Pipeline",
            &pipeline_layout,
            &sprite_shader,
            point_instance_layout(),
            wgpu::PrimitiveTopology::TriangleList,
            surface_config.format,
        );

        let orbit_pipeline = create_pipeline(
            device,
            "Orbit Render Pipeline",
            &pipeline_layout,
            &orbit_shader,
            orbit_vertex_layout(),
            wgpu::PrimitiveTopology::LineStrip,
            surface_config.format,
        );

        if let Some(error) = device.pop_error_scope().await {
            log::error!("Render pipeline creation failed: {error}");
            return Err(RendererError::Pipeline(error.to_string()));
        }

        Ok(Self {
            sprite_pipeline,
            orbit_pipeline,
            camera_buffer,
            display_buffer,
            bind_group,
            surface_config: surface_config.clone(),
        })
    }

    pub fn resize(&mut self, new_config: &wgpu::SurfaceConfiguration) {
        self.surface_config = new_config.clone();
    }

    /// Draw trails (when planned), then the bodies at the planned step
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        buffers: &TrajectoryBuffers,
        plan: &FramePlan,
    ) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[plan.camera]));
        queue.write_buffer(
            &self.display_buffer,
            0,
            bytemuck::cast_slice(&[DisplayUniform::new(
                self.surface_config.width,
                self.surface_config.height,
                plan.point_scale,
            )]),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(palette::BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            if !plan.trails.is_empty() {
                render_pass.set_pipeline(&self.orbit_pipeline);
                render_pass.set_vertex_buffer(0, buffers.orbits.slice(..));
                // A strip needs two vertices to produce a segment
                for trail in plan.trails.iter().filter(|trail| trail.count >= 2) {
                    render_pass.draw(trail.vertices(), 0..1);
                }
            }

            render_pass.set_pipeline(&self.sprite_pipeline);
            render_pass.set_vertex_buffer(0, buffers.points.slice(..));
            render_pass.draw(0..6, plan.points.vertices());
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vertex"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fragment"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uniform_layout() {
        // vec2 + f32 + f32 + vec4 + vec4 with WGSL uniform alignment
        assert_eq!(std::mem::size_of::<DisplayUniform>(), 48);
    }

    #[test]
    fn test_display_uniform_carries_point_scale() {
        let uniform = DisplayUniform::new(1280, 720, PointScale::default());
        assert_eq!(uniform.resolution, [1280.0, 720.0]);
        assert_eq!(uniform.relative_size, 0.8);
        assert_eq!(uniform.absolute_size, 1.5);
    }
}
