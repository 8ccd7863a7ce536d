use glow::HasContext;
use glscene_assets::{MeshData, ModelVertex};
use glscene_geometry::{Geometry, VertexLayout};

use crate::tracker::{build_tracked, GlHandle, GlResource};
use crate::EngineError;

/// Layout of [`ModelVertex`]: position(3) + normal(3) + uv(2).
pub fn model_vertex_layout() -> VertexLayout {
    VertexLayout::new(&[3, 3, 2])
}

/// VAO + VBO (+ EBO when indexed) for one triangle list.
#[derive(Debug)]
pub struct GpuMesh {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    ebo: Option<glow::NativeBuffer>,
    count: i32,
}

impl GpuMesh {
    pub unsafe fn upload(gl: &glow::Context, geometry: &Geometry) -> Result<Self, EngineError> {
        upload_interleaved(
            gl,
            bytemuck::cast_slice(&geometry.vertices),
            &geometry.layout,
            geometry.indices.as_deref(),
            geometry.draw_count(),
        )
    }

    pub unsafe fn upload_model_mesh(gl: &glow::Context, mesh: &MeshData) -> Result<Self, EngineError> {
        upload_interleaved(
            gl,
            bytemuck::cast_slice::<ModelVertex, u8>(&mesh.vertices),
            &model_vertex_layout(),
            Some(&mesh.indices),
            mesh.indices.len(),
        )
    }

    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.bind_vertex_array(Some(self.vao));
        if self.ebo.is_some() {
            gl.draw_elements(glow::TRIANGLES, self.count, glow::UNSIGNED_INT, 0);
        } else {
            gl.draw_arrays(glow::TRIANGLES, 0, self.count);
        }
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        if let Some(ebo) = self.ebo.take() {
            gl.delete_buffer(ebo);
        }
    }
}

impl GlResource for GpuMesh {
    fn handles(&self) -> Vec<GlHandle> {
        let mut handles = vec![GlHandle::VertexArray(self.vao), GlHandle::Buffer(self.vbo)];
        handles.extend(self.ebo.map(GlHandle::Buffer));
        handles
    }
}

unsafe fn upload_interleaved(
    gl: &glow::Context,
    bytes: &[u8],
    layout: &VertexLayout,
    indices: Option<&[u32]>,
    count: usize,
) -> Result<GpuMesh, EngineError> {
    let (vao, vbo, ebo) = build_tracked(gl, |created| -> Result<_, EngineError> {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| EngineError::GlCreate(format!("create_vertex_array: {e}")))?;
        created.push(GlHandle::VertexArray(vao));
        let vbo = gl
            .create_buffer()
            .map_err(|e| EngineError::GlCreate(format!("create_buffer: {e}")))?;
        created.push(GlHandle::Buffer(vbo));
        let ebo = match indices {
            Some(_) => Some(
                gl.create_buffer()
                    .map_err(|e| EngineError::GlCreate(format!("create_buffer(EBO): {e}")))?,
            ),
            None => None,
        };
        Ok((vao, vbo, ebo))
    })?;

    gl.bind_vertex_array(Some(vao));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
    gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);

    if let (Some(ebo), Some(idx)) = (ebo, indices) {
        // EBO binding is VAO state; keep it bound until the VAO is unbound.
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(idx),
            glow::STATIC_DRAW,
        );
    }

    let stride = layout.stride_bytes() as i32;
    let float = std::mem::size_of::<f32>();
    for (loc, components) in layout.attributes().iter().enumerate() {
        gl.enable_vertex_attrib_array(loc as u32);
        gl.vertex_attrib_pointer_f32(
            loc as u32,
            *components as i32,
            glow::FLOAT,
            false,
            stride,
            (layout.offset_floats(loc) * float) as i32,
        );
    }

    gl.bind_vertex_array(None);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);
    if ebo.is_some() {
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
    }

    Ok(GpuMesh {
        vao,
        vbo,
        ebo,
        count: count as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_layout_matches_vertex_struct() {
        let layout = model_vertex_layout();
        assert_eq!(layout.stride_bytes(), std::mem::size_of::<ModelVertex>());
        assert_eq!(
            layout.offset_floats(1) * 4,
            std::mem::offset_of!(ModelVertex, normal)
        );
        assert_eq!(
            layout.offset_floats(2) * 4,
            std::mem::offset_of!(ModelVertex, uv)
        );
    }

    #[test]
    fn indexed_mesh_reports_its_element_buffer() {
        let id = |n| std::num::NonZeroU32::new(n).unwrap();
        let mesh = GpuMesh {
            vao: glow::NativeVertexArray(id(1)),
            vbo: glow::NativeBuffer(id(2)),
            ebo: Some(glow::NativeBuffer(id(3))),
            count: 6,
        };
        assert_eq!(
            mesh.handles(),
            vec![
                GlHandle::VertexArray(glow::NativeVertexArray(id(1))),
                GlHandle::Buffer(glow::NativeBuffer(id(2))),
                GlHandle::Buffer(glow::NativeBuffer(id(3))),
            ]
        );

        let plain = GpuMesh { ebo: None, ..mesh };
        assert_eq!(plain.handles().len(), 2);
    }
}
