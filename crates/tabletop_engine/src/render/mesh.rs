//! Primitive meshes
//!
//! The scene is built entirely from a fixed set of unit primitives. Each is
//! generated once and then drawn any number of times under different model
//! matrices. [`MeshLibrary`] is the seam a GPU backend implements;
//! [`PrimitiveMeshes`] keeps the generated buffers on the host and counts
//! draws, which is what the app's headless pipeline and the tests use.
//!
//! # Unit shapes
//! - Plane: 2x2 square in XZ centered on the origin, facing +Y
//! - Box: unit cube centered on the origin
//! - Sphere: radius 1 centered on the origin
//! - Cylinder, tapered cylinder, cone: base radius 1 on y = 0, top on y = 1
//!   (tapered top radius 0.5, cone apex at the top)
//! - Torus: ring radius 1 around Y, tube radius 0.2

use std::collections::HashMap;
use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::foundation::math::constants::PI;

/// Primitive shapes available to draw steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshKind {
    /// Flat square
    Plane,
    /// Cube
    Box,
    /// UV sphere
    Sphere,
    /// Cone with a closed base
    Cone,
    /// Capped cylinder
    Cylinder,
    /// Capped cylinder narrowing toward the top
    TaperedCylinder,
    /// Ring
    Torus,
}

impl MeshKind {
    /// Every primitive kind
    pub const ALL: [Self; 7] = [
        Self::Plane,
        Self::Box,
        Self::Sphere,
        Self::Cone,
        Self::Cylinder,
        Self::TaperedCylinder,
        Self::Torus,
    ];

    /// Generate the host geometry for this kind
    #[must_use]
    pub fn generate(self) -> Mesh {
        match self {
            Self::Plane => Mesh::plane(),
            Self::Box => Mesh::cube(),
            Self::Sphere => Mesh::sphere(RADIAL_SEGMENTS, SPHERE_STACKS),
            Self::Cone => Mesh::cone(RADIAL_SEGMENTS),
            Self::Cylinder => Mesh::cylinder(RADIAL_SEGMENTS),
            Self::TaperedCylinder => Mesh::tapered_cylinder(RADIAL_SEGMENTS),
            Self::Torus => Mesh::torus(RADIAL_SEGMENTS, TORUS_TUBE_SEGMENTS),
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const RADIAL_SEGMENTS: u32 = 36;
const SPHERE_STACKS: u32 = 18;
const TORUS_TUBE_SEGMENTS: u32 = 16;
const TORUS_TUBE_RADIUS: f32 = 0.2;
const TAPERED_TOP_RADIUS: f32 = 0.5;

/// Vertex with position, normal, and texture coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in object space
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    #[must_use]
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Triangle mesh with indexed vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Index data for triangles
    pub indices: Vec<u32>,
}

/// One point of a surface-of-revolution profile
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    radius: f32,
    y: f32,
    normal_radial: f32,
    normal_y: f32,
}

impl ProfilePoint {
    fn new(radius: f32, y: f32, normal_radial: f32, normal_y: f32) -> Self {
        let len = normal_radial.hypot(normal_y);
        Self {
            radius,
            y,
            normal_radial: normal_radial / len,
            normal_y: normal_y / len,
        }
    }
}

impl Mesh {
    /// Create a new mesh
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes for upload
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// True when every index refers to a vertex and indices form whole triangles
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let count = self.vertices.len();
        self.indices.len() % 3 == 0 && self.indices.iter().all(|&i| (i as usize) < count)
    }

    /// Flat square in XZ facing +Y
    #[must_use]
    pub fn plane() -> Self {
        let up = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex::new([-1.0, 0.0, 1.0], up, [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 1.0], up, [1.0, 0.0]),
            Vertex::new([1.0, 0.0, -1.0], up, [1.0, 1.0]),
            Vertex::new([-1.0, 0.0, -1.0], up, [0.0, 1.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 2, 3, 0])
    }

    /// Unit cube with one quad per face so each face gets its own normal and UVs
    #[must_use]
    pub fn cube() -> Self {
        // (normal, u axis, v axis); corners are normal/2 +- u/2 +- v/2
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u_axis, v_axis) in faces {
            let base = index_of(vertices.len());
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = [
                    0.5 * (normal[0] + su * u_axis[0] + sv * v_axis[0]),
                    0.5 * (normal[1] + su * u_axis[1] + sv * v_axis[1]),
                    0.5 * (normal[2] + su * u_axis[2] + sv * v_axis[2]),
                ];
                vertices.push(Vertex::new(position, normal, [(su + 1.0) * 0.5, (sv + 1.0) * 0.5]));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        Self::new(vertices, indices)
    }

    /// UV sphere of radius 1
    #[must_use]
    pub fn sphere(segments: u32, stacks: u32) -> Self {
        let profile: Vec<ProfilePoint> = (0..=stacks)
            .map(|i| {
                let phi = -PI * 0.5 + PI * i as f32 / stacks as f32;
                ProfilePoint::new(phi.cos().max(0.0), phi.sin(), phi.cos(), phi.sin())
            })
            .collect();
        let mut mesh = Self::new(Vec::new(), Vec::new());
        mesh.append_lathe(&profile, segments);
        mesh
    }

    /// Capped cylinder of radius 1 from y = 0 to y = 1
    #[must_use]
    pub fn cylinder(segments: u32) -> Self {
        Self::frustum(1.0, 1.0, segments)
    }

    /// Capped cylinder narrowing from radius 1 to 0.5
    #[must_use]
    pub fn tapered_cylinder(segments: u32) -> Self {
        Self::frustum(1.0, TAPERED_TOP_RADIUS, segments)
    }

    /// Cone with base radius 1 on y = 0 and apex at y = 1
    #[must_use]
    pub fn cone(segments: u32) -> Self {
        let slope = ProfilePoint::new(0.0, 0.0, 1.0, 1.0);
        let profile = [
            ProfilePoint { radius: 1.0, y: 0.0, ..slope },
            ProfilePoint { radius: 0.0, y: 1.0, ..slope },
        ];
        let mut mesh = Self::new(Vec::new(), Vec::new());
        mesh.append_lathe(&profile, segments);
        mesh.append_cap(1.0, 0.0, false, segments);
        mesh
    }

    /// Ring of radius 1 around Y with a circular tube
    #[must_use]
    pub fn torus(segments: u32, tube_segments: u32) -> Self {
        let profile: Vec<ProfilePoint> = (0..=tube_segments)
            .map(|i| {
                let phi = 2.0 * PI * i as f32 / tube_segments as f32;
                ProfilePoint::new(
                    TORUS_TUBE_RADIUS.mul_add(phi.cos(), 1.0),
                    TORUS_TUBE_RADIUS * phi.sin(),
                    phi.cos(),
                    phi.sin(),
                )
            })
            .collect();
        let mut mesh = Self::new(Vec::new(), Vec::new());
        mesh.append_lathe(&profile, segments);
        mesh
    }

    fn frustum(bottom_radius: f32, top_radius: f32, segments: u32) -> Self {
        let side = ProfilePoint::new(0.0, 0.0, 1.0, bottom_radius - top_radius);
        let profile = [
            ProfilePoint { radius: bottom_radius, y: 0.0, ..side },
            ProfilePoint { radius: top_radius, y: 1.0, ..side },
        ];
        let mut mesh = Self::new(Vec::new(), Vec::new());
        mesh.append_lathe(&profile, segments);
        mesh.append_cap(bottom_radius, 0.0, false, segments);
        mesh.append_cap(top_radius, 1.0, true, segments);
        mesh
    }

    /// Sweep a profile around the Y axis, bottom to top, counter-clockwise from outside
    fn append_lathe(&mut self, profile: &[ProfilePoint], segments: u32) {
        let base = index_of(self.vertices.len());
        let ring = segments + 1;

        for (i, point) in profile.iter().enumerate() {
            let v = i as f32 / (profile.len() - 1) as f32;
            for j in 0..=segments {
                let u = j as f32 / segments as f32;
                let (sin, cos) = (2.0 * PI * u).sin_cos();
                self.vertices.push(Vertex::new(
                    [point.radius * cos, point.y, -point.radius * sin],
                    [point.normal_radial * cos, point.normal_y, -point.normal_radial * sin],
                    [u, v],
                ));
            }
        }

        for i in 0..index_of(profile.len() - 1) {
            for j in 0..segments {
                let a = base + i * ring + j;
                let b = a + 1;
                let c = a + ring + 1;
                let d = a + ring;
                self.indices.extend_from_slice(&[a, b, c, c, d, a]);
            }
        }
    }

    /// Disk at height `y`, facing +Y when `facing_up`
    fn append_cap(&mut self, radius: f32, y: f32, facing_up: bool, segments: u32) {
        let normal = [0.0, if facing_up { 1.0 } else { -1.0 }, 0.0];
        let center = index_of(self.vertices.len());
        self.vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));

        for j in 0..=segments {
            let (sin, cos) = (2.0 * PI * j as f32 / segments as f32).sin_cos();
            self.vertices.push(Vertex::new(
                [radius * cos, y, -radius * sin],
                normal,
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            ));
        }

        for j in 0..segments {
            let current = center + 1 + j;
            if facing_up {
                self.indices.extend_from_slice(&[center, current, current + 1]);
            } else {
                self.indices.extend_from_slice(&[center, current + 1, current]);
            }
        }
    }
}

fn index_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Mesh library errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    /// Draw requested before the mesh was built
    #[error("Mesh {0} has not been loaded")]
    NotLoaded(MeshKind),

    /// Backend failed to create buffers
    #[error("Failed to build mesh {kind}: {reason}")]
    BuildFailed {
        /// Mesh that failed
        kind: MeshKind,
        /// Backend message
        reason: String,
    },
}

/// Build-once, draw-many primitive store
pub trait MeshLibrary {
    /// Build buffers for `kind`; returns false when it was already resident
    fn load(&mut self, kind: MeshKind) -> Result<bool, MeshError>;

    /// True when `kind` has been built
    fn is_loaded(&self, kind: MeshKind) -> bool;

    /// Draw `kind` with the currently uploaded transform and shading
    fn draw(&mut self, kind: MeshKind) -> Result<(), MeshError>;

    /// Called once before the first draw of a frame
    fn begin_frame(&mut self) {}
}

/// Per-frame draw counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Draw calls issued
    pub draw_calls: usize,
    /// Triangles submitted
    pub triangles: usize,
}

/// Host-side primitive library
#[derive(Debug, Default)]
pub struct PrimitiveMeshes {
    meshes: HashMap<MeshKind, Mesh>,
    stats: DrawStats,
    draw_order: Vec<MeshKind>,
    builds: usize,
}

impl PrimitiveMeshes {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generated geometry for `kind`, if built
    #[must_use]
    pub fn mesh(&self, kind: MeshKind) -> Option<&Mesh> {
        self.meshes.get(&kind)
    }

    /// Counters for the current frame
    #[must_use]
    pub const fn stats(&self) -> &DrawStats {
        &self.stats
    }

    /// Kinds drawn this frame, in order
    #[must_use]
    pub fn draw_order(&self) -> &[MeshKind] {
        &self.draw_order
    }

    /// Number of meshes actually generated since creation
    #[must_use]
    pub const fn build_count(&self) -> usize {
        self.builds
    }
}

impl MeshLibrary for PrimitiveMeshes {
    fn load(&mut self, kind: MeshKind) -> Result<bool, MeshError> {
        if self.meshes.contains_key(&kind) {
            log::debug!("Mesh {} already resident, skipping build", kind);
            return Ok(false);
        }
        let mesh = kind.generate();
        if !mesh.is_valid() {
            return Err(MeshError::BuildFailed {
                kind,
                reason: "generated indices out of range".to_string(),
            });
        }
        log::debug!(
            "Built mesh {} ({} vertices, {} triangles)",
            kind,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        self.meshes.insert(kind, mesh);
        self.builds += 1;
        Ok(true)
    }

    fn is_loaded(&self, kind: MeshKind) -> bool {
        self.meshes.contains_key(&kind)
    }

    fn draw(&mut self, kind: MeshKind) -> Result<(), MeshError> {
        let mesh = self.meshes.get(&kind).ok_or(MeshError::NotLoaded(kind))?;
        self.stats.draw_calls += 1;
        self.stats.triangles += mesh.triangle_count();
        self.draw_order.push(kind);
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.stats = DrawStats::default();
        self.draw_order.clear();
    }
}
