//! Asset loading: OBJ meshes and their GPU-ready buffers.
//! `obj` parses the text format, `buffers` flattens it into an interleaved
//! vertex buffer plus index buffer.

pub mod buffers;
pub mod mesh;
pub mod obj;

pub use buffers::{BufferBuilder, build_buffers};
pub use mesh::{
    Face, FaceCorner, IndexLayout, Indices, MeshBuffers, ObjMesh, Position, TexCoord, Vertex,
};
pub use obj::{load_obj_from_path, load_obj_from_reader, load_obj_from_str};
