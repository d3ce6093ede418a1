//! CPU-side mesh representation: parsed OBJ data and GPU-ready buffers.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use corelib::MeshResult;

/// Object-space vertex position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Texture coordinate (u, v).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.u, self.v]
    }
}

/// One vertex reference of a face. Both indices are 1-based, as in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: u32,
    pub tex_coord: u32,
}

impl FaceCorner {
    pub const fn new(position: u32, tex_coord: u32) -> Self {
        Self {
            position,
            tex_coord,
        }
    }
}

/// Triangle face. `line` is the 1-based source line it was declared on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceCorner; 3],
    pub line: usize,
}

/// Result of one OBJ load: positions, texture coordinates and faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjMesh {
    pub(crate) name: String,
    pub(crate) positions: Vec<Position>,
    pub(crate) tex_coords: Vec<TexCoord>,
    pub(crate) faces: Vec<Face>,
}

impl ObjMesh {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[TexCoord] {
        &self.tex_coords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if at least one face was parsed.
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Replace this mesh with the one stored at `path`.
    ///
    /// The file is parsed into fresh storage first; on error `self` keeps
    /// its previous contents.
    pub fn reload_from_path(&mut self, path: impl AsRef<Path>) -> MeshResult<()> {
        *self = crate::obj::load_obj_from_path(path)?;
        Ok(())
    }
}

/// Interleaved vertex as uploaded to the GPU: 3 floats position, 2 floats uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const SIZE: usize = std::mem::size_of::<Vertex>();
    pub const POSITION_OFFSET: usize = 0;
    pub const TEX_COORD_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    pub fn new(position: Position, tex_coord: TexCoord) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }
}

/// How the index buffer is populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexLayout {
    /// `indices[i] = i`, one index per emitted vertex.
    #[default]
    Identity,
    /// Five running-counter values per face, kept for compatibility with
    /// existing GL consumers. Not usable for indexed drawing.
    Legacy,
}

/// Index data in the narrowest format that holds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native-endian bytes ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Indices::U16(v) => bytemuck::cast_slice(v),
            Indices::U32(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Indices::U32(v) => v.get(i).copied(),
        }
    }
}

/// Upload-ready vertex and index buffers for one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vertex>,
    pub indices: Indices,
    pub layout: IndexLayout,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
