//! Render surface for the ocean.
//!
//! A square grid centered on the origin. The base grid never changes; the
//! displaced positions and normals are rebuilt from it every frame so that
//! errors never accumulate across frames.
//!
//! ## Mesh Structure
//! - `(resolution + 1)²` vertices laid out row by row along +Z
//! - Two triangles per cell, counter-clockwise when seen from above
//! - UV coordinates span the grid from 0 to 1

use bevy::math::Vec2;

use super::wave::WaveSpectrum;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    size: f32,
    resolution: u32,
    base: Vec<Vec2>,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl SurfaceMesh {
    /// `size` is the edge length in world units, `resolution` the number of
    /// cells along each edge (at least one).
    pub fn new(size: f32, resolution: u32) -> Self {
        let resolution = resolution.max(1);
        let row = resolution + 1;
        let half = size / 2.0;
        let cell = size / resolution as f32;

        let mut base = Vec::with_capacity((row * row) as usize);
        let mut uvs = Vec::with_capacity((row * row) as usize);
        for j in 0..row {
            for i in 0..row {
                base.push(Vec2::new(-half + i as f32 * cell, -half + j as f32 * cell));
                uvs.push([i as f32 / resolution as f32, j as f32 / resolution as f32]);
            }
        }

        let mut indices = Vec::with_capacity((resolution * resolution * 6) as usize);
        for j in 0..resolution {
            for i in 0..resolution {
                let a = j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let positions = base.iter().map(|p| [p.x, 0.0, p.y]).collect();
        let normals = vec![[0.0, 1.0, 0.0]; base.len()];

        Self {
            size,
            resolution,
            base,
            positions,
            normals,
            uvs,
            indices,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn vertex_count(&self) -> usize {
        self.base.len()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub(super) fn regenerate(&mut self, spectrum: &WaveSpectrum, time: f32) {
        let sea_level = spectrum.sea_level();
        for ((base, position), normal) in self
            .base
            .iter()
            .zip(self.positions.iter_mut())
            .zip(self.normals.iter_mut())
        {
            let d = spectrum.displacement(base.x, base.y, time);
            *position = [base.x + d.x, sea_level + d.y, base.y + d.z];
            *normal = spectrum.normal(base.x, base.y, time).to_array();
        }
    }
}
