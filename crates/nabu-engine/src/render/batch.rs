use std::ops::Range;

use egui::epaint::{Primitive, Vertex};
use egui::{ClippedPrimitive, TextureId};

use crate::coords::{ScissorRect, Vec2};

/// One `draw_indexed` call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawCall {
    pub texture: TextureId,
    pub scissor: ScissorRect,
    /// Range into the shared index buffer.
    pub indices: Range<u32>,
    /// Offset of the mesh's first vertex in the shared vertex buffer.
    pub base_vertex: i32,
}

/// All meshes of a frame packed into shared vertex/index arrays.
#[derive(Debug, Default)]
pub(crate) struct MeshBatches {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub calls: Vec<DrawCall>,
}

impl MeshBatches {
    pub fn vertex_bytes(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }

    pub fn index_bytes(&self) -> u64 {
        std::mem::size_of_val(self.indices.as_slice()) as u64
    }
}

/// Packs clipped meshes and computes each batch's scissor rect.
///
/// Meshes that are empty or clipped away entirely are dropped before upload.
/// Paint callbacks are not supported and are skipped.
pub(crate) fn build_batches(
    primitives: &[ClippedPrimitive],
    display: Vec2,
    framebuffer: [u32; 2],
) -> MeshBatches {
    let mut out = MeshBatches::default();

    for ClippedPrimitive { clip_rect, primitive } in primitives {
        let mesh = match primitive {
            Primitive::Mesh(mesh) => mesh,
            Primitive::Callback(_) => {
                log::trace!("skipping paint callback");
                continue;
            }
        };
        if mesh.indices.is_empty() || mesh.vertices.is_empty() {
            continue;
        }

        let Some(scissor) = ScissorRect::from_clip(
            Vec2::new(clip_rect.min.x, clip_rect.min.y),
            Vec2::new(clip_rect.max.x, clip_rect.max.y),
            display,
            framebuffer,
        ) else {
            continue;
        };

        let base_vertex = out.vertices.len() as i32;
        let first = out.indices.len() as u32;

        out.vertices.extend_from_slice(&mesh.vertices);
        out.indices.extend_from_slice(&mesh.indices);

        out.calls.push(DrawCall {
            texture: mesh.texture_id,
            scissor,
            indices: first..out.indices.len() as u32,
            base_vertex,
        });
    }

    out
}
