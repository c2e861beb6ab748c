//! Renderable point-cloud model
//!
//! A [`PointCloudModel`] is what the rendering side consumes: a vertex array,
//! a parallel 3-channel color attribute used directly as vertex colors, and
//! one point primitive per vertex.

use crate::error::{Error, Result};
use crate::point::*;
use crate::point_cloud::ColoredPointCloud3d;
use serde::{Deserialize, Serialize};

/// Name given to the per-vertex color attribute
pub const COLOR_ATTRIBUTE_NAME: &str = "Colors";

/// Per-vertex RGB attribute, indexed like the model's vertices.
///
/// The values are used as colors as they are; there is no lookup table
/// between the attribute and the rendered color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAttribute {
    pub name: String,
    pub values: Vec<[u8; 3]>,
}

impl ColorAttribute {
    /// Number of components per tuple
    pub const COMPONENTS: usize = 3;

    /// Create a named color attribute
    pub fn new(values: Vec<[u8; 3]>) -> Self {
        Self {
            name: COLOR_ATTRIBUTE_NAME.to_string(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Point primitives: each cell references exactly one vertex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexCells {
    pub indices: Vec<usize>,
}

impl VertexCells {
    /// Turn a bare vertex set into one independent point primitive per vertex
    pub fn from_vertex_count(count: usize) -> Self {
        Self {
            indices: (0..count).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A colored point set ready to be handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudModel {
    pub vertices: Vec<Point3d>,
    pub colors: ColorAttribute,
    pub cells: VertexCells,
}

impl PointCloudModel {
    /// Create a model with no vertices. Rendering it draws nothing.
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            colors: ColorAttribute::new(Vec::new()),
            cells: VertexCells::default(),
        }
    }

    /// Build a model from parallel vertex and color arrays
    pub fn new(vertices: Vec<Point3d>, colors: Vec<[u8; 3]>) -> Result<Self> {
        if vertices.len() != colors.len() {
            return Err(Error::InvalidData(format!(
                "color attribute has {} tuples but there are {} vertices",
                colors.len(),
                vertices.len()
            )));
        }

        let cells = VertexCells::from_vertex_count(vertices.len());
        Ok(Self {
            vertices,
            colors: ColorAttribute::new(colors),
            cells,
        })
    }

    /// Build a model from a loaded cloud, taking ownership of it.
    ///
    /// Vertex `i` is the position of record `i` and carries its color.
    pub fn from_cloud(cloud: ColoredPointCloud3d) -> Self {
        let (vertices, colors): (Vec<Point3d>, Vec<[u8; 3]>) = cloud
            .into_iter()
            .map(|p| (p.position, p.color))
            .unzip();

        let cells = VertexCells::from_vertex_count(vertices.len());
        Self {
            vertices,
            colors: ColorAttribute::new(colors),
            cells,
        }
    }

    /// Build a model from a cloud that may be absent
    pub fn from_optional(cloud: Option<ColoredPointCloud3d>) -> Self {
        cloud.map(Self::from_cloud).unwrap_or_else(Self::empty)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of point primitives
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over (position, color) pairs in vertex order
    pub fn iter(&self) -> impl Iterator<Item = (Point3d, [u8; 3])> + '_ {
        self.vertices
            .iter()
            .copied()
            .zip(self.colors.values.iter().copied())
    }
}

impl From<ColoredPointCloud3d> for PointCloudModel {
    fn from(cloud: ColoredPointCloud3d) -> Self {
        Self::from_cloud(cloud)
    }
}
