use std::borrow::Cow;
use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use egui::epaint::{ImageData, ImageDelta, Vertex};
use egui::{TextureFilter, TextureId, TextureOptions, TextureWrapMode};
use winit::dpi::PhysicalSize;

use crate::coords::Vec2;
use crate::device::Gpu;
use crate::gui::DrawData;

use super::backend::{RenderBackend, RenderError};
use super::batch::{build_batches, MeshBatches};

/// Screen-size uniform used for the point → NDC conversion.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScreenUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: [u32; 2],
}

/// wgpu renderer for egui draw data.
///
/// Fixed pipeline state: no depth attachment or test, no culling,
/// premultiplied alpha blending. All meshes of a frame share one vertex and
/// one index buffer; each mesh is one `draw_indexed` with its own scissor.
pub struct GuiRenderer {
    gpu: Gpu,
    clear: wgpu::Color,

    pipeline: wgpu::RenderPipeline,
    screen_ubo: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    texture_bgl: wgpu::BindGroupLayout,

    textures: HashMap<TextureId, GpuTexture>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: u64,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: u64,

    /// Submitted but not yet presented.
    pending: Option<wgpu::SurfaceTexture>,
}

impl GuiRenderer {
    pub fn new(gpu: Gpu, clear_color: [f32; 4]) -> Self {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nabu gui shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gui.wgsl").into()),
        });

        let screen_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nabu gui screen bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ScreenUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nabu gui texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("nabu gui pipeline layout"),
            bind_group_layouts: &[&screen_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("nabu gui pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let screen_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nabu gui screen ubo"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nabu gui screen bind group"),
            layout: &screen_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_ubo.as_entire_binding(),
            }],
        });

        if gpu.surface_format().is_srgb() {
            log::debug!("surface format is sRGB; GUI colors will appear lighter");
        }

        let [r, g, b, a] = clear_color.map(f64::from);

        Self {
            gpu,
            clear: wgpu::Color { r, g, b, a },
            pipeline,
            screen_ubo,
            screen_bind_group,
            texture_bgl,
            textures: HashMap::new(),
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
            pending: None,
        }
    }

    fn update_texture(&mut self, id: TextureId, delta: &ImageDelta) {
        let [w, h] = delta.image.size();
        if w == 0 || h == 0 {
            return;
        }
        let (w, h) = (w as u32, h as u32);

        let pixels: Cow<'_, [u8]> = match &delta.image {
            ImageData::Color(image) => Cow::Borrowed(bytemuck::cast_slice(image.pixels.as_slice())),
            ImageData::Font(image) => Cow::Owned(
                image
                    .srgba_pixels(None)
                    .flat_map(|c| c.to_array())
                    .collect(),
            ),
        };

        let origin = match delta.pos {
            Some([x, y]) => {
                let Some(existing) = self.textures.get(&id) else {
                    log::warn!("partial update for unknown texture {id:?}; ignored");
                    return;
                };
                let [tw, th] = existing.size;
                if x as u32 + w > tw || y as u32 + h > th {
                    log::warn!("partial update outside texture {id:?}; ignored");
                    return;
                }
                wgpu::Origin3d { x: x as u32, y: y as u32, z: 0 }
            }
            None => {
                let texture = self.create_texture(id, [w, h], delta.options);
                self.textures.insert(id, texture);
                wgpu::Origin3d::ZERO
            }
        };

        let Some(target) = self.textures.get(&id) else { return };

        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }

    fn create_texture(&self, id: TextureId, size: [u32; 2], options: TextureOptions) -> GpuTexture {
        let device = self.gpu.device();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nabu gui texture"),
            size: wgpu::Extent3d {
                width: size[0],
                height: size[1],
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address_mode = match options.wrap_mode {
            TextureWrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            TextureWrapMode::Repeat => wgpu::AddressMode::Repeat,
            TextureWrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nabu gui sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter_mode(options.magnification),
            min_filter: filter_mode(options.minification),
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nabu gui texture bind group"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("gui texture {id:?} allocated: {}x{}", size[0], size[1]);

        GpuTexture { texture, bind_group, size }
    }

    /// Grows the shared vertex/index buffers to fit `batches`.
    fn ensure_capacity(&mut self, batches: &MeshBatches) -> Result<(), RenderError> {
        let limit = self.gpu.device().limits().max_buffer_size;

        for needed in [batches.vertex_bytes(), batches.index_bytes()] {
            if needed > limit {
                return Err(RenderError::BufferTooLarge { needed, limit });
            }
        }

        let device = self.gpu.device();
        let grow = |needed: u64| needed.next_power_of_two().max(64 * 1024).min(limit);

        if batches.vertex_bytes() > self.vbo_capacity || self.vbo.is_none() {
            let size = grow(batches.vertex_bytes());
            self.vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("nabu gui vbo"),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = size;
        }

        if batches.index_bytes() > self.ibo_capacity || self.ibo.is_none() {
            let size = grow(batches.index_bytes());
            self.ibo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("nabu gui ibo"),
                size,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = size;
        }

        Ok(())
    }

    fn draw(
        &mut self,
        display: Vec2,
        framebuffer: [u32; 2],
        draw: &DrawData,
    ) -> Result<(), RenderError> {
        let [fb_w, fb_h] = framebuffer;
        if fb_w == 0 || fb_h == 0 {
            return Err(RenderError::ZeroFramebuffer);
        }

        let size = self.gpu.size();
        if size.width != fb_w || size.height != fb_h {
            log::debug!("framebuffer resized: {}x{} -> {fb_w}x{fb_h}", size.width, size.height);
            self.gpu.resize(PhysicalSize::new(fb_w, fb_h));
        }

        let batches = build_batches(&draw.primitives, display, framebuffer);
        self.ensure_capacity(&batches)?;

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => return Err(RenderError::Surface(self.gpu.handle_surface_error(err))),
        };

        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.screen_ubo,
            0,
            bytemuck::bytes_of(&ScreenUniform {
                size: [display.x.max(1.0), display.y.max(1.0)],
                _pad: [0.0; 2],
            }),
        );

        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else {
            return Ok(());
        };
        if !batches.calls.is_empty() {
            queue.write_buffer(vbo, 0, bytemuck::cast_slice(&batches.vertices));
            queue.write_buffer(ibo, 0, bytemuck::cast_slice(&batches.indices));
        }

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("nabu gui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !batches.calls.is_empty() {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.screen_bind_group, &[]);
                rpass.set_vertex_buffer(0, vbo.slice(..batches.vertex_bytes()));
                rpass.set_index_buffer(
                    ibo.slice(..batches.index_bytes()),
                    wgpu::IndexFormat::Uint32,
                );

                for call in &batches.calls {
                    let Some(texture) = self.textures.get(&call.texture) else {
                        log::debug!("mesh references unknown texture {:?}; skipped", call.texture);
                        continue;
                    };
                    let s = call.scissor;
                    rpass.set_scissor_rect(s.x, s.y, s.width, s.height);
                    rpass.set_bind_group(1, &texture.bind_group, &[]);
                    rpass.draw_indexed(call.indices.clone(), call.base_vertex, 0..1);
                }
            }
        }

        self.pending = Some(self.gpu.submit(frame));
        Ok(())
    }
}

impl RenderBackend for GuiRenderer {
    fn render(
        &mut self,
        display: Vec2,
        framebuffer: [u32; 2],
        draw: &DrawData,
    ) -> Result<(), RenderError> {
        // Uploads happen even if this frame is skipped; the deltas are one-shot.
        for (id, delta) in &draw.textures_delta.set {
            self.update_texture(*id, delta);
        }

        let result = self.draw(display, framebuffer, draw);

        for id in &draw.textures_delta.free {
            if let Some(texture) = self.textures.remove(id) {
                texture.texture.destroy();
            }
        }

        result
    }

    fn present(&mut self) {
        if let Some(surface_texture) = self.pending.take() {
            surface_texture.present();
        }
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Unorm8x4   // color
    ];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::OneMinusDstAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn filter_mode(filter: TextureFilter) -> wgpu::FilterMode {
    match filter {
        TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        TextureFilter::Linear => wgpu::FilterMode::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_egui_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[2].offset, 16);
    }

    #[test]
    fn screen_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
    }
}
