use glam::{DVec3, Mat4, Vec3};

use maquette_engine::paint::Color;
use maquette_engine::scene::{MeshCmd, MeshTopology, ZIndex};

use crate::frame::Frame;

/// Centroid, bounds, and fitting scale of a vertex cloud.
///
/// `scale` maps the largest axis extent into the ~100-unit canvas cube.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshExtent {
    pub centroid: Vec3,
    pub min: Vec3,
    pub max: Vec3,
    pub scale: f32,
}

impl MeshExtent {
    /// Computes the extent of a vertex cloud; `None` when empty.
    ///
    /// The centroid accumulates in f64 — vertex counts can be large enough
    /// for f32 accumulation to drift.
    pub fn compute(vertices: &[[f32; 3]]) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }

        let mut centroid = DVec3::ZERO;
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for v in vertices {
            let v = Vec3::from_array(*v);
            centroid += v.as_dvec3();
            min = min.min(v);
            max = max.max(v);
        }
        centroid /= vertices.len() as f64;

        let span = max - min;
        let scale = 2.0 / span.x.max(span.y).max(span.z) * 50.0;

        Some(Self {
            centroid: centroid.as_vec3(),
            min,
            max,
            scale,
        })
    }

    /// Center-and-scale transform fitting the cloud into the canvas cube.
    pub fn fitting_transform(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.scale)) * Mat4::from_translation(-self.centroid)
    }
}

/// A generic colored mesh: points, line segments, or triangles.
///
/// Vertices and colors are set independently (colors default to none, which
/// the renderer rejects, so callers are expected to provide both). Triangle
/// meshes may carry an index list.
#[derive(Debug, Clone)]
pub struct MeshShape {
    topology: MeshTopology,
    vertices: Vec<[f32; 3]>,
    colors: Vec<Color>,
    indices: Option<Vec<u32>>,
    model: Mat4,
    z_index: ZIndex,
    visible: bool,
}

impl MeshShape {
    pub fn new(topology: MeshTopology) -> Self {
        Self {
            topology,
            vertices: Vec::new(),
            colors: Vec::new(),
            indices: None,
            model: Mat4::IDENTITY,
            z_index: ZIndex::default(),
            visible: true,
        }
    }

    pub fn set_vertices(&mut self, vertices: Vec<[f32; 3]>) {
        self.vertices = vertices;
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = colors;
    }

    pub fn set_indices(&mut self, indices: Vec<u32>) {
        self.indices = Some(indices);
    }

    pub fn set_z_index(&mut self, z: ZIndex) {
        self.z_index = z;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn z_index(&self) -> ZIndex {
        self.z_index
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Replaces the model transform with one fitting the current vertex data
    /// into view. No-op (with a warning) on an empty mesh.
    pub fn auto_extent(&mut self) {
        match MeshExtent::compute(&self.vertices) {
            Some(extent) => {
                log::debug!(
                    "auto extent: centroid {:?}, scale {}",
                    extent.centroid,
                    extent.scale
                );
                self.model = extent.fitting_transform();
            }
            None => log::warn!("auto_extent on an empty mesh; transform unchanged"),
        }
    }

    /// Applies a precomputed extent's fitting transform.
    pub fn set_extent(&mut self, extent: &MeshExtent) {
        self.model = extent.fitting_transform();
    }

    /// Draw command for the external rasterizer.
    pub fn to_draw_cmd(&self) -> MeshCmd {
        MeshCmd {
            topology: self.topology,
            vertices: self.vertices.clone(),
            colors: self.colors.clone(),
            indices: self.indices.clone(),
            model: self.model,
        }
    }
}

/// A shape owned by the scene: either a generic mesh or an interactive frame.
///
/// Only frames take part in hit-testing and pointer manipulation.
#[derive(Debug, Clone)]
pub enum Shape {
    Mesh(MeshShape),
    Frame(Frame),
}

impl Shape {
    #[inline]
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Shape::Frame(f) => Some(f),
            Shape::Mesh(_) => None,
        }
    }

    #[inline]
    pub fn as_frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            Shape::Frame(f) => Some(f),
            Shape::Mesh(_) => None,
        }
    }
}

impl From<MeshShape> for Shape {
    fn from(m: MeshShape) -> Self {
        Shape::Mesh(m)
    }
}

impl From<Frame> for Shape {
    fn from(f: Frame) -> Self {
        Shape::Frame(f)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn extent_of_unit_cube_cloud() {
        let verts = vec![[0.0, 0.0, 0.0], [2.0, 2.0, 2.0]];
        let e = MeshExtent::compute(&verts).unwrap();

        assert_eq!(e.min, Vec3::ZERO);
        assert_eq!(e.max, Vec3::splat(2.0));
        assert_eq!(e.centroid, Vec3::splat(1.0));
        // scale = 2 / 2 * 50
        assert!((e.scale - 50.0).abs() < EPS);
    }

    #[test]
    fn extent_of_empty_cloud_is_none() {
        assert_eq!(MeshExtent::compute(&[]), None);
    }

    #[test]
    fn fitting_transform_centers_the_centroid() {
        let verts = vec![[10.0, 10.0, 10.0], [14.0, 10.0, 10.0]];
        let e = MeshExtent::compute(&verts).unwrap();

        let centered = e.fitting_transform() * Vec4::new(12.0, 10.0, 10.0, 1.0);
        assert!(centered.x.abs() < EPS);
        assert!(centered.y.abs() < EPS);
        assert!(centered.z.abs() < EPS);
    }

    #[test]
    fn auto_extent_updates_model() {
        let mut mesh = MeshShape::new(MeshTopology::Points);
        mesh.set_vertices(vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
        mesh.auto_extent();
        assert_ne!(mesh.model(), Mat4::IDENTITY);
    }

    #[test]
    fn draw_cmd_carries_indexed_triangles() {
        let mut mesh = MeshShape::new(MeshTopology::Triangles);
        mesh.set_vertices(vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        mesh.set_colors(vec![Color::rgb(1.0, 1.0, 1.0); 4]);
        mesh.set_indices(vec![0, 1, 2, 2, 3, 0]);

        let cmd = mesh.to_draw_cmd();
        assert_eq!(cmd.topology, MeshTopology::Triangles);
        assert_eq!(cmd.indices.as_deref(), Some(&[0, 1, 2, 2, 3, 0][..]));
        assert_eq!(cmd.vertices.len(), cmd.colors.len());
    }
}
