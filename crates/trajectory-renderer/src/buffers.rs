//! Static vertex buffers for one trajectory

use trajectory_data::{FrameBuffers, OrbitVertex, PointVertex};
use wgpu::util::DeviceExt;

/// Step-major point instances and body-major orbit vertices, uploaded once
pub struct TrajectoryBuffers {
    pub points: wgpu::Buffer,
    pub orbits: wgpu::Buffer,
    pub point_count: u32,
    pub orbit_vertex_count: u32,
}

impl TrajectoryBuffers {
    pub fn new(device: &wgpu::Device, frames: &FrameBuffers) -> Self {
        let points = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Trajectory Point Buffer"),
            contents: bytemuck::cast_slice(frames.points()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let orbits = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Trajectory Orbit Buffer"),
            contents: bytemuck::cast_slice(frames.orbits()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "✓ Uploaded {} point records and {} orbit vertices",
            frames.points().len(),
            frames.orbits().len()
        );

        Self {
            points,
            orbits,
            point_count: frames.points().len() as u32,
            orbit_vertex_count: frames.orbits().len() as u32,
        }
    }
}

/// One [`PointVertex`] per instance: `xyz` position, `w` mass
pub const fn point_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x4,
    }];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: ATTRIBUTES,
    }
}

pub const fn orbit_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OrbitVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: ATTRIBUTES,
    }
}
