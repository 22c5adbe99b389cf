//! Line-oriented trajectory text format
//!
//! ```text
//! <num_bodies>
//! <num_steps>
//! <mass of body 0>
//! ...
//! <mass of body num_bodies-1>
//! <x y z of body 0, step 0>
//! <x y z of body 0, step 1>
//! ...
//! <x y z of body num_bodies-1, step num_steps-1>
//! ```
//!
//! Positions are body-major: every step of body 0, then every step of body 1.

use crate::error::{FormatError, LoadError};
use glam::DVec3;
use std::path::Path;

/// Parsed simulation output, before any normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub(crate) num_bodies: usize,
    pub(crate) num_steps: usize,
    /// One mass per body, constant over time
    pub(crate) masses: Vec<f64>,
    /// Body-major: `positions[body * num_steps + step]`
    pub(crate) positions: Vec<DVec3>,
}

impl Trajectory {
    /// Build a trajectory from already-typed data.
    ///
    /// Returns `None` unless `positions.len() == masses.len() * num_steps`
    /// and both counts are non-zero.
    pub fn from_parts(masses: Vec<f64>, positions: Vec<DVec3>, num_steps: usize) -> Option<Self> {
        let num_bodies = masses.len();
        if num_bodies == 0 || num_steps == 0 || positions.len() != num_bodies * num_steps {
            return None;
        }

        Some(Self {
            num_bodies,
            num_steps,
            masses,
            positions,
        })
    }

    pub fn num_bodies(&self) -> usize {
        self.num_bodies
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Total number of (body, step) position samples
    pub fn sample_count(&self) -> usize {
        self.positions.len()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// All positions in body-major order
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Position of `body` at `step`
    pub fn position(&self, body: usize, step: usize) -> DVec3 {
        self.positions[body * self.num_steps + step]
    }

    /// Every sampled position of one body, in step order
    pub fn body_positions(&self, body: usize) -> &[DVec3] {
        let start = body * self.num_steps;
        &self.positions[start..start + self.num_steps]
    }
}

/// Parse the full text content of a trajectory file.
///
/// Fails on the first malformed line; no partially filled trajectory is ever
/// returned. Trailing blank lines are ignored so files ending with a newline
/// are accepted.
pub fn parse_trajectory(text: &str) -> Result<Trajectory, FormatError> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(FormatError::Empty);
    }

    let num_bodies = parse_count(&lines, 0, "body count")?;
    let num_steps = parse_count(&lines, 1, "step count")?;

    let expected = num_bodies
        .checked_mul(num_steps)
        .and_then(|samples| samples.checked_add(num_bodies))
        .and_then(|total| total.checked_add(2))
        .ok_or_else(|| FormatError::InvalidCount {
            line: 2,
            field: "step count",
            text: lines[1].trim().to_string(),
        })?;

    // Checked before any value is parsed so a wrong shape is reported as such
    if lines.len() != expected {
        return Err(FormatError::LineCount {
            expected,
            found: lines.len(),
            num_bodies,
            num_steps,
        });
    }

    let mass_lines = &lines[2..2 + num_bodies];
    let masses = mass_lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_number(line.trim(), 3 + i))
        .collect::<Result<Vec<_>, _>>()?;

    let first_position_line = 2 + num_bodies;
    let positions = lines[first_position_line..]
        .iter()
        .enumerate()
        .map(|(i, line)| parse_position(line, first_position_line + i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Parsed trajectory: {} bodies x {} steps ({} samples)",
        num_bodies,
        num_steps,
        positions.len()
    );

    Ok(Trajectory {
        num_bodies,
        num_steps,
        masses,
        positions,
    })
}

/// Read and parse a trajectory file
pub fn load_trajectory(path: impl AsRef<Path>) -> Result<Trajectory, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_trajectory(&text).map_err(|source| LoadError::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_count(lines: &[&str], index: usize, field: &'static str) -> Result<usize, FormatError> {
    let line = index + 1;
    let text = lines
        .get(index)
        .ok_or(FormatError::MissingHeader { line, field })?
        .trim();

    match text.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(FormatError::InvalidCount {
            line,
            field,
            text: text.to_string(),
        }),
    }
}

fn parse_number(text: &str, line: usize) -> Result<f64, FormatError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::InvalidNumber {
            line,
            text: text.to_string(),
        }),
    }
}

fn parse_position(text: &str, line: usize) -> Result<DVec3, FormatError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [x, y, z] = fields[..] else {
        return Err(FormatError::WrongFieldCount {
            line,
            found: fields.len(),
        });
    };

    Ok(DVec3::new(
        parse_number(x, line)?,
        parse_number(y, line)?,
        parse_number(z, line)?,
    ))
}
