//! GPU vertex layouts derived from a trajectory

use crate::normalize::NormalizationScalars;
use crate::parser::Trajectory;
use bytemuck::{Pod, Zeroable};

/// One body at one step, as consumed by the point-sprite pass
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    /// Normalized mass, drives sprite size
    pub mass: f32,
}

/// One sample of a body's orbit polyline
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct OrbitVertex {
    pub position: [f32; 3],
}

/// The two render layouts of one normalized trajectory.
///
/// `points` is step-major so a single timestep is one contiguous run of
/// `num_bodies` records. `orbits` is body-major so a body's trail up to the
/// current step is a prefix of its contiguous run of `num_steps` records.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    num_bodies: usize,
    num_steps: usize,
    points: Vec<PointVertex>,
    orbits: Vec<OrbitVertex>,
}

impl FrameBuffers {
    /// Emit both layouts, applying the scale factors of `scalars` on the way
    pub fn build(trajectory: &Trajectory, scalars: &NormalizationScalars) -> Self {
        let num_bodies = trajectory.num_bodies();
        let num_steps = trajectory.num_steps();
        let position_scale = scalars.position_scale();
        let mass_scale = scalars.mass_scale();

        let mut points = vec![PointVertex::zeroed(); trajectory.sample_count()];
        let mut orbits = Vec::with_capacity(trajectory.sample_count());

        for (body, &mass) in trajectory.masses().iter().enumerate() {
            let mass = (mass * mass_scale) as f32;

            for (step, &position) in trajectory.body_positions(body).iter().enumerate() {
                let position = (position * position_scale).as_vec3().to_array();

                orbits.push(OrbitVertex { position });
                points[step * num_bodies + body] = PointVertex { position, mass };
            }
        }

        Self {
            num_bodies,
            num_steps,
            points,
            orbits,
        }
    }

    pub fn num_bodies(&self) -> usize {
        self.num_bodies
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Step-major point records
    pub fn points(&self) -> &[PointVertex] {
        &self.points
    }

    /// Body-major orbit records
    pub fn orbits(&self) -> &[OrbitVertex] {
        &self.orbits
    }

    /// Every body at `step`
    pub fn points_at_step(&self, step: usize) -> &[PointVertex] {
        let start = step * self.num_bodies;
        &self.points[start..start + self.num_bodies]
    }

    /// The whole orbit of `body`
    pub fn orbit_of_body(&self, body: usize) -> &[OrbitVertex] {
        let start = body * self.num_steps;
        &self.orbits[start..start + self.num_steps]
    }

    /// Point records as a flat `[x, y, z, mass, ...]` float slice
    pub fn point_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }

    /// Orbit records as a flat `[x, y, z, ...]` float slice
    pub fn orbit_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.orbits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::parser::parse_trajectory;

    fn two_bodies() -> FrameBuffers {
        let trajectory =
            parse_trajectory("2\n3\n1.0\n2.0\n0 0 0\n1 0 0\n2 0 0\n0 1 0\n0 2 0\n0 3 0\n").unwrap();
        normalize(&trajectory).buffers
    }

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 16);
        assert_eq!(std::mem::size_of::<OrbitVertex>(), 12);
    }

    #[test]
    fn test_buffer_lengths() {
        let buffers = two_bodies();

        assert_eq!(buffers.point_floats().len(), 2 * 3 * 4);
        assert_eq!(buffers.orbit_floats().len(), 2 * 3 * 3);
    }

    #[test]
    fn test_points_are_step_major() {
        let buffers = two_bodies();

        // Position scale is 2 (avg_pos 0.5), mass scale is 0.5
        let step1 = buffers.points_at_step(1);
        assert_eq!(
            step1,
            &[
                PointVertex {
                    position: [2.0, 0.0, 0.0],
                    mass: 0.5
                },
                PointVertex {
                    position: [0.0, 4.0, 0.0],
                    mass: 1.0
                },
            ]
        );
        assert_eq!(&buffers.point_floats()[8..12], &[2.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_orbits_are_body_major() {
        let buffers = two_bodies();

        let orbit = buffers.orbit_of_body(1);
        assert_eq!(orbit[0].position, [0.0, 2.0, 0.0]);
        assert_eq!(orbit[1].position, [0.0, 4.0, 0.0]);
        assert_eq!(orbit[2].position, [0.0, 6.0, 0.0]);
        assert_eq!(&buffers.orbit_floats()[9..12], &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_layouts_agree() {
        let buffers = two_bodies();

        for body in 0..buffers.num_bodies() {
            for step in 0..buffers.num_steps() {
                assert_eq!(
                    buffers.points_at_step(step)[body].position,
                    buffers.orbit_of_body(body)[step].position
                );
            }
        }
    }
}
