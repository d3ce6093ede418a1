//! Minimal OBJ parser for textured triangle meshes (positions, uvs, faces).

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{Attribute, LineKind, MeshError, MeshResult};

use crate::mesh::{Face, FaceCorner, ObjMesh, Position, TexCoord};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> MeshResult<ObjMesh> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| MeshError::SourceUnavailable {
        name: name.clone(),
        source,
    })?;
    load_obj_from_reader(BufReader::new(file), name)
}

/// Load an OBJ mesh from a [`BufRead`] implementation. `name` is used in
/// diagnostics.
pub fn load_obj_from_reader<R: BufRead>(
    reader: R,
    name: impl Into<String>,
) -> MeshResult<ObjMesh> {
    parse_obj(reader, name.into())
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, name: impl Into<String>) -> MeshResult<ObjMesh> {
    parse_obj(io::Cursor::new(contents), name.into())
}

fn parse_obj<R: BufRead>(mut reader: R, name: String) -> MeshResult<ObjMesh> {
    log::info!("Loading OBJ mesh '{}'", name);

    let mut mesh = ObjMesh {
        name,
        ..ObjMesh::default()
    };
    let mut ignored_lines = 0usize;
    let mut clipped_faces = 0usize;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| MeshError::SourceUnavailable {
                name: mesh.name.clone(),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        // Invalid UTF-8 only matters if it lands in a field we parse.
        let line = String::from_utf8_lossy(&buf);
        let cx = LineCtx {
            name: &mesh.name,
            line: line_no,
        };

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let x = cx.parse_f32(parts.next(), LineKind::Position, "x coordinate")?;
                let y = cx.parse_f32(parts.next(), LineKind::Position, "y coordinate")?;
                let z = cx.parse_f32(parts.next(), LineKind::Position, "z coordinate")?;
                mesh.positions.push(Position::new(x, y, z));
            }
            Some("vt") => {
                let u = cx.parse_f32(parts.next(), LineKind::TexCoord, "u coordinate")?;
                let v = cx.parse_f32(parts.next(), LineKind::TexCoord, "v coordinate")?;
                mesh.tex_coords.push(TexCoord::new(u, v));
            }
            Some("f") => {
                let tokens: Vec<&str> = parts.collect();
                if tokens.len() < 3 {
                    return Err(cx.malformed(
                        LineKind::Face,
                        format!("expected 3 corners, found {}", tokens.len()),
                    ));
                }
                if tokens.len() > 3 {
                    clipped_faces += 1;
                }

                let mut corners = [FaceCorner::new(0, 0); 3];
                for (corner, token) in corners.iter_mut().zip(&tokens) {
                    *corner =
                        cx.parse_corner(token, mesh.positions.len(), mesh.tex_coords.len())?;
                }
                mesh.faces.push(Face {
                    corners,
                    line: cx.line,
                });
            }
            // Blank lines, comments, normals, groups, materials.
            _ => ignored_lines += 1,
        }
    }

    if clipped_faces > 0 {
        log::warn!(
            "'{}': {} face(s) had more than 3 corners; extra corners ignored",
            mesh.name,
            clipped_faces
        );
    }
    log::debug!("'{}': {} line(s) ignored", mesh.name, ignored_lines);
    log::info!(
        "Loaded '{}': {} positions, {} tex coords, {} faces",
        mesh.name,
        mesh.positions.len(),
        mesh.tex_coords.len(),
        mesh.faces.len()
    );
    if !mesh.has_faces() {
        log::warn!("'{}' contains no faces", mesh.name);
    }

    Ok(mesh)
}

/// Location of the line being parsed, for error reporting.
struct LineCtx<'a> {
    name: &'a str,
    line: usize,
}

impl LineCtx<'_> {
    fn malformed(&self, kind: LineKind, reason: impl Into<String>) -> MeshError {
        MeshError::MalformedInput {
            name: self.name.to_owned(),
            line: self.line,
            kind,
            reason: reason.into(),
        }
    }

    fn parse_f32(&self, value: Option<&str>, kind: LineKind, what: &str) -> MeshResult<f32> {
        let token = value.ok_or_else(|| self.malformed(kind, format!("missing {what}")))?;
        token
            .parse::<f32>()
            .map_err(|_| self.malformed(kind, format!("invalid {what} '{token}'")))
    }

    /// Parse `p/t` or `p/t/n`; the normal index is not used.
    fn parse_corner(
        &self,
        token: &str,
        pos_count: usize,
        tex_count: usize,
    ) -> MeshResult<FaceCorner> {
        let mut split = token.split('/');
        let pos = split.next().unwrap_or_default();
        let tex = split.next().ok_or_else(|| {
            self.malformed(
                LineKind::Face,
                format!("corner '{token}' has no texture coordinate index"),
            )
        })?;

        let position = self.resolve_index(pos, Attribute::Position, pos_count)?;
        let tex_coord = self.resolve_index(tex, Attribute::TexCoord, tex_count)?;
        Ok(FaceCorner::new(position, tex_coord))
    }

    fn resolve_index(&self, token: &str, attribute: Attribute, len: usize) -> MeshResult<u32> {
        if token.is_empty() {
            return Err(self.malformed(LineKind::Face, format!("empty {attribute} index")));
        }
        let raw = token.parse::<u64>().map_err(|_| {
            self.malformed(
                LineKind::Face,
                format!("{attribute} index '{token}' is not a positive integer"),
            )
        })?;
        let out_of_range = || MeshError::IndexOutOfRange {
            name: self.name.to_owned(),
            line: self.line,
            attribute,
            index: raw,
            available: len,
        };
        if raw == 0 || raw > len as u64 {
            return Err(out_of_range());
        }
        u32::try_from(raw).map_err(|_| out_of_range())
    }
}
