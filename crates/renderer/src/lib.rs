//! Renderer seam: vertex layout, GPU upload and draw for loaded meshes.
//!
//! Window, surface, pipeline and shader setup are owned by the embedding
//! application; this crate only turns `MeshBuffers` into bound GPU buffers.

pub mod mesh;

pub use mesh::{
    DrawCall, GpuMesh, POSITION_ATTRIBUTE, TEXCOORD_ATTRIBUTE, index_format, vertex_layout,
};
