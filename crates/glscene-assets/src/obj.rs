//! Wavefront OBJ/MTL import.
//!
//! Produces indexed, triangulated meshes with one interleaved vertex per unique
//! `(position, texcoord, normal)` corner. Supported statements:
//!
//! - `v`, `vt`, `vn`, `f` (`v`, `v/vt`, `v//vn`, `v/vt/vn`, negative indices, n-gons as fans)
//! - `o`, `g`, `usemtl` (each starts a new mesh), `mtllib`
//! - MTL: `newmtl`, `Ns`, `map_Kd`, `map_Ks`
//!
//! Everything else is ignored. Corners without a normal get a smooth normal accumulated from
//! the faces that use them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use glscene_core::EngineError;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    /// Relative to the model directory.
    pub diffuse_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    pub shininess: f32,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_map: None,
            specular_map: None,
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: MaterialData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    /// Directory the model was loaded from; material maps resolve against it.
    pub directory: PathBuf,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

/// Load an OBJ file and any MTL libraries it references.
///
/// A missing or unreadable MTL file is logged and the model loads without those materials.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ModelData, EngineError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let model = parse_obj(&source, path, |lib| {
        let mtl_path = directory.join(lib);
        match std::fs::read_to_string(&mtl_path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(path = %mtl_path.display(), error = %e, "material library not loaded");
                None
            }
        }
    })?;

    tracing::debug!(
        path = %path.display(),
        meshes = model.meshes.len(),
        triangles = model.triangle_count(),
        "model imported"
    );
    Ok(model)
}

/// Parse OBJ text. `origin` labels errors and supplies the model directory; `read_mtl`
/// resolves `mtllib` names to MTL source text.
pub fn parse_obj<F>(source: &str, origin: &Path, mut read_mtl: F) -> Result<ModelData, EngineError>
where
    F: FnMut(&str) -> Option<String>,
{
    let err = |line: usize, msg: String| EngineError::Model {
        path: origin.to_path_buf(),
        line,
        msg,
    };

    let mut positions: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut materials: HashMap<String, MaterialData> = HashMap::new();

    let mut finished: Vec<(MeshBuilder, Option<String>)> = Vec::new();
    let mut current = MeshBuilder::new(String::new());
    let mut current_material: Option<String> = None;

    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens).map_err(|m| err(line_no, m))?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let u = parse_float(tokens.next(), "vt u").map_err(|m| err(line_no, m))?;
                let v = match tokens.next() {
                    Some(t) => parse_float(Some(t), "vt v").map_err(|m| err(line_no, m))?,
                    None => 0.0,
                };
                texcoords.push([u, v]);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens).map_err(|m| err(line_no, m))?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let mut corners = Vec::new();
                for tok in tokens {
                    let key = parse_corner(tok, positions.len(), texcoords.len(), normals.len())
                        .map_err(|m| err(line_no, m))?;
                    corners.push(key);
                }
                if corners.len() < 3 {
                    return Err(err(
                        line_no,
                        format!("face needs at least 3 corners, got {}", corners.len()),
                    ));
                }
                for k in 1..corners.len() - 1 {
                    current.push_triangle(
                        [corners[0], corners[k], corners[k + 1]],
                        &positions,
                        &texcoords,
                        &normals,
                    );
                }
            }
            "o" | "g" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                let prev = std::mem::replace(&mut current, MeshBuilder::new(name));
                finished.push((prev, current_material.clone()));
            }
            "usemtl" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                if !current.is_empty() {
                    let label = current.name.clone();
                    let prev = std::mem::replace(&mut current, MeshBuilder::new(label));
                    finished.push((prev, current_material.clone()));
                }
                current_material = Some(name);
            }
            "mtllib" => {
                for lib in tokens {
                    if let Some(text) = read_mtl(lib) {
                        materials.extend(parse_mtl(&text));
                    }
                }
            }
            _ => {}
        }
    }
    finished.push((current, current_material));

    let meshes = finished
        .into_iter()
        .filter(|(b, _)| !b.is_empty())
        .map(|(b, mat)| {
            let material = match mat {
                Some(name) => materials.get(&name).cloned().unwrap_or_else(|| {
                    tracing::warn!(material = %name, "usemtl references unknown material");
                    MaterialData {
                        name,
                        ..MaterialData::default()
                    }
                }),
                None => MaterialData::default(),
            };
            b.finish(material)
        })
        .collect();

    Ok(ModelData {
        directory: origin.parent().map(Path::to_path_buf).unwrap_or_default(),
        meshes,
    })
}

/// Parse MTL text into materials keyed by name. Unparseable values are skipped.
pub fn parse_mtl(source: &str) -> HashMap<String, MaterialData> {
    let mut out = HashMap::new();
    let mut current: Option<MaterialData> = None;

    for raw in source.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();

        if keyword == "newmtl" {
            if let Some(done) = current.take() {
                out.insert(done.name.clone(), done);
            }
            current = Some(MaterialData {
                name: rest.join(" "),
                ..MaterialData::default()
            });
            continue;
        }

        let Some(mat) = current.as_mut() else {
            continue;
        };
        match keyword {
            "Ns" => {
                if let Some(ns) = rest.first().and_then(|t| t.parse::<f32>().ok()) {
                    mat.shininess = ns;
                }
            }
            // Map statements may carry options (`-s 1 1 1 file.png`); the file is last.
            "map_Kd" => mat.diffuse_map = rest.last().map(|p| map_path(p)),
            "map_Ks" => mat.specular_map = rest.last().map(|p| map_path(p)),
            _ => {}
        }
    }
    if let Some(done) = current {
        out.insert(done.name.clone(), done);
    }
    out
}

fn map_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.replace('\\', "/"))
}

fn parse_float(tok: Option<&str>, what: &str) -> Result<f32, String> {
    let tok = tok.ok_or_else(|| format!("missing {what}"))?;
    tok.parse::<f32>()
        .map_err(|_| format!("invalid number '{tok}' for {what}"))
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<[f32; N], String> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = parse_float(tokens.next(), &format!("component {i}"))?;
    }
    Ok(out)
}

/// Resolved zero-based `(position, texcoord, normal)` indices of a face corner.
type CornerKey = (usize, Option<usize>, Option<usize>);

fn parse_corner(tok: &str, np: usize, nt: usize, nn: usize) -> Result<CornerKey, String> {
    let mut parts = tok.split('/');
    let v = match parts.next() {
        Some(s) if !s.is_empty() => resolve_index(s, np, "position")?,
        _ => return Err(format!("face corner '{tok}' has no position index")),
    };
    let vt = match parts.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, nt, "texcoord")?),
        _ => None,
    };
    let vn = match parts.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, nn, "normal")?),
        _ => None,
    };
    Ok((v, vt, vn))
}

/// OBJ indices are 1-based; negative values count back from the latest element.
fn resolve_index(s: &str, len: usize, what: &str) -> Result<usize, String> {
    let i: i64 = s
        .parse()
        .map_err(|_| format!("invalid {what} index '{s}'"))?;
    let resolved = match i {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => (len as i64 + i).try_into().ok(),
    };
    match resolved {
        Some(r) if r < len => Ok(r),
        _ => Err(format!("{what} index {i} out of range (have {len})")),
    }
}

#[derive(Debug)]
struct MeshBuilder {
    name: String,
    vertices: Vec<ModelVertex>,
    indices: Vec<u32>,
    lookup: HashMap<CornerKey, u32>,
    /// Per vertex: the position index whose accumulated normal it takes, if generated.
    smooth_from: Vec<Option<usize>>,
    /// Summed face normals keyed by position index, shared across UV seams.
    position_normals: HashMap<usize, Vec3>,
}

impl MeshBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            vertices: Vec::new(),
            indices: Vec::new(),
            lookup: HashMap::new(),
            smooth_from: Vec::new(),
            position_normals: HashMap::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_triangle(
        &mut self,
        corners: [CornerKey; 3],
        positions: &[Vec3],
        texcoords: &[[f32; 2]],
        normals: &[Vec3],
    ) {
        let p = corners.map(|(v, _, _)| positions[v]);
        let face_normal = (p[1] - p[0]).cross(p[2] - p[0]);

        for key in corners {
            let (v, _, vn) = key;
            let idx = *self.lookup.entry(key).or_insert_with(|| {
                let (v, vt, vn) = key;
                self.vertices.push(ModelVertex {
                    position: positions[v].to_array(),
                    normal: vn.map(|n| normals[n].to_array()).unwrap_or([0.0; 3]),
                    uv: vt.map(|t| texcoords[t]).unwrap_or([0.0; 2]),
                });
                self.smooth_from.push(vn.is_none().then_some(v));
                (self.vertices.len() - 1) as u32
            });

            if vn.is_none() {
                *self.position_normals.entry(v).or_insert(Vec3::ZERO) += face_normal;
            }
            self.indices.push(idx);
        }
    }

    fn finish(mut self, material: MaterialData) -> MeshData {
        for (vertex, source) in self.vertices.iter_mut().zip(&self.smooth_from) {
            if let Some(position) = source {
                let sum = self.position_normals.get(position).copied().unwrap_or(Vec3::ZERO);
                let n = sum.normalize_or_zero();
                vertex.normal = if n == Vec3::ZERO { Vec3::Y } else { n }.to_array();
            }
        }
        MeshData {
            name: self.name,
            vertices: self.vertices,
            indices: self.indices,
            material,
        }
    }
}
