use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use ezview_ppm::Image;
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

// ── geometry ──────────────────────────────────────────────────────────────

/// Upper texture coordinate. Slightly below 1.0 so nearest sampling never
/// lands exactly on the far edge.
const UV_MAX: f32 = 0.99999;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2], // model space, [-1, 1]
    pub uv: [f32; 2],  // texture space, top-left origin
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering `[-1, 1]²`; image row 0 is at the top (`y = 1`).
pub(crate) const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { pos: [1.0, -1.0], uv: [UV_MAX, UV_MAX] },
    QuadVertex { pos: [1.0, 1.0], uv: [UV_MAX, 0.0] },
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, UV_MAX] },
    QuadVertex { pos: [1.0, -1.0], uv: [UV_MAX, UV_MAX] },
];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MvpUniform {
    mvp: [[f32; 4]; 4], // column-major
}

impl From<Mat4> for MvpUniform {
    fn from(m: Mat4) -> Self {
        Self { mvp: m.to_cols_array_2d() }
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws one RGB image as a textured quad transformed by a per-frame MVP.
///
/// The image is uploaded once via [`set_image`](Self::set_image) as an
/// `Rgba8UnormSrgb` texture sampled with nearest filtering.
#[derive(Default)]
pub struct ImageQuadRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings (rebuilt when the pipeline or texture changes)
    bind_group: Option<wgpu::BindGroup>,
    mvp_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    // image
    texture: Option<wgpu::Texture>,
    texture_view: Option<wgpu::TextureView>,

    quad_vbo: Option<wgpu::Buffer>,

    warned_no_image: bool,
}

impl ImageQuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `image` as the quad's texture, replacing any previous one, and
    /// builds the pipeline and bindings for the current surface format.
    ///
    /// Fails when the image exceeds the device's 2D texture limit, or when
    /// wgpu reports a validation error for the shader, pipeline or upload.
    pub fn set_image(&mut self, ctx: &RenderCtx<'_>, image: &Image) -> Result<()> {
        let max = ctx.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            image.width <= max && image.height <= max,
            "image {}x{} exceeds the GPU texture limit of {max}x{max}",
            image.width,
            image.height,
        );

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ezview image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        self.texture_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.bind_group = None;

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        scope_result(pollster::block_on(scope.pop()), "image texture and pipeline setup")?;

        log::debug!("uploaded {}x{} texture", image.width, image.height);
        Ok(())
    }

    /// Draws the quad into `target` with the given MVP matrix.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: Mat4) {
        if self.texture_view.is_none() {
            if !self.warned_no_image {
                log::debug!("ImageQuadRenderer: no image uploaded; nothing to draw");
                self.warned_no_image = true;
            }
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let Some(ubo) = self.mvp_ubo.as_ref() else { return; };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&MvpUniform::from(mvp)));

        let Some(pipeline)   = self.pipeline.as_ref()   else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };
        let Some(quad_vbo)   = self.quad_vbo.as_ref()   else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ezview image pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ezview image shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ezview image bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<MvpUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ezview image pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ezview image pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Negative scale or shear can flip winding; both faces stay visible.
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.mvp_ubo = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ezview image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.mvp_ubo.is_some() {
            return;
        }

        let Some(bgl)          = self.bind_group_layout.as_ref() else { return; };
        let Some(texture_view) = self.texture_view.as_ref()      else { return; };
        let Some(sampler)      = self.sampler.as_ref()           else { return; };

        let mvp_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ezview mvp ubo"),
            size: std::mem::size_of::<MvpUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ezview image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: mvp_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.mvp_ubo = Some(mvp_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ezview quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }
}

/// Turns the error captured by a popped error scope into a `Result`.
fn scope_result<E: std::fmt::Display>(error: Option<E>, stage: &str) -> Result<()> {
    match error {
        Some(e) => Err(anyhow::anyhow!("{stage} failed: {e}")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_validation_error_becomes_err() {
        let err = scope_result(Some("shader entry point missing"), "pipeline").unwrap_err();
        assert_eq!(err.to_string(), "pipeline failed: shader entry point missing");
        assert!(scope_result(None::<String>, "pipeline").is_ok());
    }

    #[test]
    fn quad_covers_unit_square() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.pos[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);
    }

    #[test]
    fn image_top_row_maps_to_top_edge() {
        for v in QUAD_VERTICES {
            // y = 1 is the top of the quad; v = 0 is row 0 of the image.
            assert_eq!(v.uv[1] == 0.0, v.pos[1] == 1.0);
            assert_eq!(v.uv[0] == 0.0, v.pos[0] == -1.0);
        }
    }

    #[test]
    fn texture_coords_stay_below_one() {
        assert!(QUAD_VERTICES.iter().all(|v| v.uv.iter().all(|c| (0.0..1.0).contains(c))));
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        assert_eq!(std::mem::size_of::<MvpUniform>(), 64);
    }

    #[test]
    fn mvp_uniform_is_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(3.0, 4.0, 0.0));
        let u = MvpUniform::from(m);
        assert_eq!(u.mvp[3][0], 3.0);
        assert_eq!(u.mvp[3][1], 4.0);
    }
}
