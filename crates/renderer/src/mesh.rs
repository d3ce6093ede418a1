//! GPU mesh: uploads [`MeshBuffers`] and issues the matching draw call.

use std::ops::Range;

use asset::{IndexLayout, Indices, MeshBuffers, Vertex};
use wgpu::{
    Buffer, BufferUsages, Device, IndexFormat, RenderPass, VertexBufferLayout, VertexStepMode,
    util::DeviceExt,
};

/// Shader attribute name bound to location 0.
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Shader attribute name bound to location 1.
pub const TEXCOORD_ATTRIBUTE: &str = "a_texcoord";

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Layout of [`Vertex`]: position at location 0, uv at location 1.
pub fn vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: Vertex::SIZE as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

pub fn index_format(indices: &Indices) -> IndexFormat {
    match indices {
        Indices::U16(_) => IndexFormat::Uint16,
        Indices::U32(_) => IndexFormat::Uint32,
    }
}

/// Draw call for a mesh. Legacy index buffers don't describe triangles, so
/// those meshes are drawn as a plain vertex list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Indexed {
        indices: Range<u32>,
        format: IndexFormat,
    },
    Sequential {
        vertices: Range<u32>,
    },
}

impl DrawCall {
    pub fn for_buffers(buffers: &MeshBuffers) -> Self {
        match buffers.layout {
            IndexLayout::Identity => DrawCall::Indexed {
                indices: 0..buffers.index_count() as u32,
                format: index_format(&buffers.indices),
            },
            IndexLayout::Legacy => DrawCall::Sequential {
                vertices: 0..buffers.vertex_count() as u32,
            },
        }
    }
}

pub struct GpuMesh {
    vertex_buf: Buffer,
    index_buf: Buffer,
    draw: DrawCall,
}

impl GpuMesh {
    /// Create vertex and index buffers initialised with the mesh data.
    pub fn upload(device: &Device, buffers: &MeshBuffers, label: &str) -> Self {
        // Zero-sized buffers can't be bound; keep one element of padding.
        let vertex_bytes = non_empty(buffers.vertex_bytes(), Vertex::SIZE);
        let index_bytes = non_empty(buffers.index_bytes(), 4);

        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} VB")),
            contents: &vertex_bytes,
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} IB")),
            contents: &index_bytes,
            usage: BufferUsages::INDEX,
        });

        let draw = DrawCall::for_buffers(buffers);
        log::info!(
            "Uploaded mesh '{}': {} vertices ({} bytes), {} indices ({} bytes), draw={:?}",
            label,
            buffers.vertex_count(),
            buffers.vertex_bytes().len(),
            buffers.index_count(),
            buffers.index_bytes().len(),
            draw
        );

        Self {
            vertex_buf,
            index_buf,
            draw,
        }
    }

    pub fn draw_call(&self) -> &DrawCall {
        &self.draw
    }

    /// Bind buffers and draw. The pipeline must already be set and use
    /// [`vertex_layout`] at slot 0.
    pub fn draw(&self, rpass: &mut RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        match &self.draw {
            DrawCall::Indexed { indices, format } => {
                if indices.is_empty() {
                    return;
                }
                rpass.set_index_buffer(self.index_buf.slice(..), *format);
                rpass.draw_indexed(indices.clone(), 0, 0..1);
            }
            DrawCall::Sequential { vertices } => {
                if !vertices.is_empty() {
                    rpass.draw(vertices.clone(), 0..1);
                }
            }
        }
    }
}

fn non_empty(bytes: &[u8], pad: usize) -> Vec<u8> {
    if bytes.is_empty() {
        vec![0; pad]
    } else {
        bytes.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{BufferBuilder, load_obj_from_str};

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n";

    #[test]
    fn layout_matches_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].offset, Vertex::POSITION_OFFSET as u64);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].offset, Vertex::TEX_COORD_OFFSET as u64);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn identity_layout_draws_indexed() {
        let mesh = load_obj_from_str(TRIANGLE, "tri.obj").unwrap();
        let buffers = BufferBuilder::new(IndexLayout::Identity).build(&mesh).unwrap();
        assert_eq!(
            DrawCall::for_buffers(&buffers),
            DrawCall::Indexed {
                indices: 0..3,
                format: IndexFormat::Uint16
            }
        );
    }

    #[test]
    fn legacy_layout_draws_vertex_list() {
        let mesh = load_obj_from_str(TRIANGLE, "tri.obj").unwrap();
        let buffers = BufferBuilder::new(IndexLayout::Legacy).build(&mesh).unwrap();
        assert_eq!(buffers.index_count(), 5);
        assert_eq!(
            DrawCall::for_buffers(&buffers),
            DrawCall::Sequential { vertices: 0..3 }
        );
    }

    #[test]
    fn wide_indices_use_uint32() {
        assert_eq!(index_format(&Indices::U32(vec![0])), IndexFormat::Uint32);
        assert_eq!(index_format(&Indices::U16(vec![0])), IndexFormat::Uint16);
    }

    #[test]
    fn empty_uploads_get_padding() {
        assert_eq!(non_empty(&[], 20), vec![0; 20]);
        assert_eq!(non_empty(&[1, 2, 3, 4], 20), vec![1, 2, 3, 4]);
    }
}
