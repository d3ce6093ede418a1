//! Flattens a parsed [`ObjMesh`] into interleaved vertex and index buffers.

use corelib::{Attribute, MeshError, MeshResult};

use crate::mesh::{Face, IndexLayout, Indices, MeshBuffers, ObjMesh, Vertex};

/// Largest vertex count whose identity indices still fit in `u16`.
const MAX_U16_VERTICES: usize = u16::MAX as usize + 1;

/// Builds [`MeshBuffers`] from parsed meshes. Holds configuration only, so
/// one builder can be shared across meshes and threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferBuilder {
    layout: IndexLayout,
}

impl BufferBuilder {
    pub fn new(layout: IndexLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> IndexLayout {
        self.layout
    }

    /// Emit three vertices per face, in face then corner order, and the
    /// index buffer for the configured layout.
    pub fn build(&self, mesh: &ObjMesh) -> MeshResult<MeshBuffers> {
        let mut vertices = Vec::with_capacity(mesh.face_count() * 3);
        for face in mesh.faces() {
            push_face(mesh, face, &mut vertices)?;
        }

        let indices = match self.layout {
            IndexLayout::Identity => identity_indices(vertices.len()),
            IndexLayout::Legacy => Indices::U16(legacy_indices(mesh.face_count())),
        };

        log::debug!(
            "Built buffers for '{}': {} vertices, {} indices ({:?})",
            mesh.name(),
            vertices.len(),
            indices.len(),
            self.layout
        );

        Ok(MeshBuffers {
            vertices,
            indices,
            layout: self.layout,
        })
    }
}

/// Build buffers with the default (identity) index layout.
pub fn build_buffers(mesh: &ObjMesh) -> MeshResult<MeshBuffers> {
    BufferBuilder::default().build(mesh)
}

fn push_face(mesh: &ObjMesh, face: &Face, out: &mut Vec<Vertex>) -> MeshResult<()> {
    for corner in &face.corners {
        let position = lookup(mesh, face, mesh.positions(), corner.position, Attribute::Position)?;
        let tex_coord =
            lookup(mesh, face, mesh.tex_coords(), corner.tex_coord, Attribute::TexCoord)?;
        out.push(Vertex::new(*position, *tex_coord));
    }
    Ok(())
}

/// 1-based lookup into `items`.
fn lookup<'a, T>(
    mesh: &ObjMesh,
    face: &Face,
    items: &'a [T],
    index: u32,
    attribute: Attribute,
) -> MeshResult<&'a T> {
    (index as usize)
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or_else(|| MeshError::IndexOutOfRange {
            name: mesh.name().to_owned(),
            line: face.line,
            attribute,
            index: u64::from(index),
            available: items.len(),
        })
}

fn identity_indices(count: usize) -> Indices {
    if count <= MAX_U16_VERTICES {
        Indices::U16((0..count).map(|i| i as u16).collect())
    } else {
        Indices::U32((0..count).map(|i| i as u32).collect())
    }
}

/// Running-counter scheme: per face, the vertex counter three times then the
/// texture counter twice, both starting at -1 and post-incremented. Values
/// wrap into `u16` the way a `GLushort` does.
fn legacy_indices(face_count: usize) -> Vec<u16> {
    let mut indices = Vec::with_capacity(face_count * 5);
    let mut vertex: i64 = -1;
    let mut texture: i64 = -1;
    for _ in 0..face_count {
        for _ in 0..3 {
            indices.push(vertex as u16);
            vertex += 1;
        }
        for _ in 0..2 {
            indices.push(texture as u16);
            texture += 1;
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Face, FaceCorner, Position, TexCoord};
    use crate::obj::load_obj_from_str;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";

    fn grid_mesh(face_count: usize) -> ObjMesh {
        let mut src = String::from("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 1\n");
        for i in 0..face_count {
            let t = i % 2 + 1;
            src.push_str(&format!("f 1/{t} 2/{t} 3/{t}\n"));
        }
        load_obj_from_str(&src, "grid.obj").unwrap()
    }

    #[test]
    fn triangle_vertices_follow_corner_order() {
        let mesh = load_obj_from_str(TRIANGLE, "triangle.obj").unwrap();
        let buffers = build_buffers(&mesh).unwrap();

        assert_eq!(
            buffers.vertices,
            vec![
                Vertex::new(Position::new(0.0, 0.0, 0.0), TexCoord::new(0.0, 0.0)),
                Vertex::new(Position::new(1.0, 0.0, 0.0), TexCoord::new(1.0, 0.0)),
                Vertex::new(Position::new(0.0, 1.0, 0.0), TexCoord::new(0.0, 1.0)),
            ]
        );
        assert_eq!(buffers.indices, Indices::U16(vec![0, 1, 2]));
        assert_eq!(buffers.layout, IndexLayout::Identity);
    }

    #[test]
    fn buffer_lengths_scale_with_face_count() {
        for faces in [0, 1, 2, 7, 64] {
            let mesh = grid_mesh(faces);
            let identity = BufferBuilder::new(IndexLayout::Identity).build(&mesh).unwrap();
            assert_eq!(identity.vertex_count(), 3 * faces);
            assert_eq!(identity.index_count(), 3 * faces);

            let legacy = BufferBuilder::new(IndexLayout::Legacy).build(&mesh).unwrap();
            assert_eq!(legacy.vertex_count(), 3 * faces);
            assert_eq!(legacy.index_count(), 5 * faces);
        }
    }

    #[test]
    fn no_faces_gives_empty_buffers() {
        let mesh = load_obj_from_str("v 0 0 0\nvt 0 0\n", "points.obj").unwrap();
        let buffers = build_buffers(&mesh).unwrap();
        assert!(buffers.is_empty());
        assert!(buffers.indices.is_empty());
        assert!(buffers.vertex_bytes().is_empty());
    }

    #[test]
    fn shared_corners_are_duplicated() {
        let src = format!("{TRIANGLE}f 3/3 2/2 1/1\n");
        let mesh = load_obj_from_str(&src, "two.obj").unwrap();
        let buffers = build_buffers(&mesh).unwrap();
        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(buffers.vertices[0], buffers.vertices[5]);
        assert_eq!(buffers.vertices[2], buffers.vertices[3]);
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let mesh = grid_mesh(5);
        for layout in [IndexLayout::Identity, IndexLayout::Legacy] {
            let builder = BufferBuilder::new(layout);
            let a = builder.build(&mesh).unwrap();
            let b = builder.build(&mesh).unwrap();
            assert_eq!(a.vertex_bytes(), b.vertex_bytes());
            assert_eq!(a.index_bytes(), b.index_bytes());
        }
    }

    #[test]
    fn legacy_indices_match_running_counters() {
        let buffers = BufferBuilder::new(IndexLayout::Legacy)
            .build(&grid_mesh(2))
            .unwrap();
        assert_eq!(
            buffers.indices,
            Indices::U16(vec![u16::MAX, 0, 1, u16::MAX, 0, 2, 3, 4, 1, 2])
        );
    }

    #[test]
    fn identity_switches_to_u32_past_u16_range() {
        assert!(matches!(identity_indices(MAX_U16_VERTICES), Indices::U16(_)));
        match identity_indices(MAX_U16_VERTICES + 1) {
            Indices::U32(v) => {
                assert_eq!(v.len(), MAX_U16_VERTICES + 1);
                assert_eq!(v.last(), Some(&(MAX_U16_VERTICES as u32)));
            }
            Indices::U16(_) => panic!("expected 32-bit indices"),
        }
    }

    #[test]
    fn out_of_range_corner_reports_face_line() {
        let mut mesh = load_obj_from_str(TRIANGLE, "edited.obj").unwrap();
        mesh.faces.push(Face {
            corners: [
                FaceCorner::new(1, 1),
                FaceCorner::new(2, 9),
                FaceCorner::new(3, 3),
            ],
            line: 42,
        });

        let err = build_buffers(&mesh).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                line: 42,
                attribute: Attribute::TexCoord,
                index: 9,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn builder_does_not_mutate_mesh() {
        let mesh = grid_mesh(3);
        let before = mesh.clone();
        let _ = build_buffers(&mesh).unwrap();
        assert_eq!(mesh, before);
    }
}
