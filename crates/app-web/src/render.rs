//! WebGPU renderer: one pipeline for textured word/heart billboards (a bind
//! group per slot, rebuilt when the slot recycles) and one instanced
//! pipeline for the sparkle glow quads. Everything is alpha-blended and
//! depth is never written.

use app_core::{
    sprite, Camera, RainDrop, Sparkle, GLOW_TEXTURE_SIZE, RAIN_COUNT, SPARKLE_COUNT,
    SPARKLE_GLOW_SCALE,
};
use web_sys as web;
use wgpu::util::DeviceExt;

use crate::raster::RasterImage;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BillboardInstance {
    pos: [f32; 3],
    _pad: f32,
    scale: [f32; 2],
    _pad2: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SparkleInstance {
    pos: [f32; 3],
    scale: f32,
}

/// GPU resources backing one rain slot. Replaced wholesale when the slot is
/// recycled; dropping the old value releases its texture.
struct SlotVisual {
    generation: u32,
    scale: [f32; 2],
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    billboard_pipeline: wgpu::RenderPipeline,
    sparkle_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    sprite_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vb: wgpu::Buffer,
    billboard_instance_vb: wgpu::Buffer,
    sparkle_instance_vb: wgpu::Buffer,
    glow_bind_group: wgpu::BindGroup,
    slots: Vec<Option<SlotVisual>>,
    width: u32,
    height: u32,
}

const BILLBOARD_WGSL: &str = r#"
struct Uniforms {
  view_proj: mat4x4<f32>,
  cam_right: vec4<f32>,
  cam_up: vec4<f32>,
};
@group(0) @binding(0) var<uniform> u: Uniforms;
@group(1) @binding(0) var sprite_tex: texture_2d<f32>;
@group(1) @binding(1) var sprite_samp: sampler;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(
  @location(0) v_pos: vec2<f32>,
  @location(1) v_uv: vec2<f32>,
  @location(2) i_pos: vec3<f32>,
  @location(3) i_scale: vec2<f32>,
) -> VsOut {
  let world = i_pos
    + u.cam_right.xyz * (v_pos.x * i_scale.x)
    + u.cam_up.xyz * (v_pos.y * i_scale.y);
  var out: VsOut;
  out.pos = u.view_proj * vec4<f32>(world, 1.0);
  out.uv = v_uv;
  return out;
}

@fragment
fn fs_main(inf: VsOut) -> @location(0) vec4<f32> {
  return textureSample(sprite_tex, sprite_samp, inf.uv);
}
"#;

const SPARKLE_WGSL: &str = r#"
struct Uniforms {
  view_proj: mat4x4<f32>,
  cam_right: vec4<f32>,
  cam_up: vec4<f32>,
};
@group(0) @binding(0) var<uniform> u: Uniforms;
@group(1) @binding(0) var glow_tex: texture_2d<f32>;
@group(1) @binding(1) var glow_samp: sampler;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
  @location(1) local: vec2<f32>,
};

@vertex
fn vs_main(
  @location(0) v_pos: vec2<f32>,
  @location(1) v_uv: vec2<f32>,
  @location(2) i_pos: vec3<f32>,
  @location(3) i_scale: f32,
) -> VsOut {
  let world = i_pos
    + u.cam_right.xyz * (v_pos.x * i_scale)
    + u.cam_up.xyz * (v_pos.y * i_scale);
  var out: VsOut;
  out.pos = u.view_proj * vec4<f32>(world, 1.0);
  out.uv = v_uv;
  out.local = v_pos;
  return out;
}

@fragment
fn fs_main(inf: VsOut) -> @location(0) vec4<f32> {
  // Halo from the gradient texture, bright core in the middle.
  let glow = textureSample(glow_tex, glow_samp, inf.uv).a * 0.7;
  let r = length(inf.local);
  let core = 1.0 - smoothstep(0.08, 0.10, r);
  return vec4<f32>(1.0, 1.0, 1.0, max(glow, core));
}
"#;

// Two triangles with uv (v = 0 at the top row of the backing image).
const QUAD_VERTICES: [f32; 24] = [
    -0.5, -0.5, 0.0, 1.0, //
    0.5, -0.5, 1.0, 1.0, //
    0.5, 0.5, 1.0, 0.0, //
    -0.5, -0.5, 0.0, 1.0, //
    0.5, 0.5, 1.0, 0.0, //
    -0.5, 0.5, 0.0, 0.0,
];

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let billboard_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("billboard_instances"),
            size: (std::mem::size_of::<BillboardInstance>() * RAIN_COUNT) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sparkle_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sparkle_instances"),
            size: (std::mem::size_of::<SparkleInstance>() * SPARKLE_COUNT) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sprite_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bgl"),
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
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&uniform_bgl, &sprite_bgl],
            push_constant_ranges: &[],
        });

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 4) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 8,
                    shader_location: 1,
                },
            ],
        };

        let billboard_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("billboard_shader"),
            source: wgpu::ShaderSource::Wgsl(BILLBOARD_WGSL.into()),
        });
        let billboard_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("billboard_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &billboard_shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    quad_layout.clone(),
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BillboardInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 0,
                                shader_location: 2,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 16,
                                shader_location: 3,
                            },
                        ],
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &billboard_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let sparkle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sparkle_shader"),
            source: wgpu::ShaderSource::Wgsl(SPARKLE_WGSL.into()),
        });
        let sparkle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sparkle_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &sparkle_shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    quad_layout,
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SparkleInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 0,
                                shader_location: 2,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32,
                                offset: 12,
                                shader_location: 3,
                            },
                        ],
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &sparkle_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Shared halo texture for the instanced sparkle pass.
        let glow_pixels = sprite::glow_pixels(GLOW_TEXTURE_SIZE);
        let glow_texture = Self::upload_rgba(
            &device,
            &queue,
            GLOW_TEXTURE_SIZE,
            GLOW_TEXTURE_SIZE,
            &glow_pixels,
            "glow",
        );
        let glow_view = glow_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let glow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glow_bg"),
            layout: &sprite_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&glow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            billboard_pipeline,
            sparkle_pipeline,
            uniform_buffer,
            uniform_bind_group,
            sprite_bgl,
            sampler,
            quad_vb,
            billboard_instance_vb,
            sparkle_instance_vb,
            glow_bind_group,
            slots: (0..RAIN_COUNT).map(|_| None).collect(),
            width,
            height,
        })
    }

    fn upload_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: &str,
    ) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        texture
    }

    /// Generation of the visual currently installed in a slot, if any.
    pub fn slot_generation(&self, index: usize) -> Option<u32> {
        self.slots.get(index).and_then(|s| s.as_ref().map(|v| v.generation))
    }

    /// Install a freshly rasterized billboard into a slot, releasing the
    /// previous visual.
    pub fn install_slot(
        &mut self,
        index: usize,
        generation: u32,
        scale: [f32; 2],
        image: &RasterImage,
    ) {
        if index >= self.slots.len() {
            return;
        }
        let texture = Self::upload_rgba(
            &self.device,
            &self.queue,
            image.width,
            image.height,
            &image.pixels,
            "billboard",
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("billboard_bg"),
            layout: &self.sprite_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.slots[index] = Some(SlotVisual {
            generation,
            scale,
            _texture: texture,
            bind_group,
        });
    }

    /// Drop every per-slot texture. Used on teardown; safe to repeat.
    pub fn release_slots(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        drops: &[RainDrop],
        sparkles: &[Sparkle],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let (right, up) = camera.billboard_axes();
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                cam_right: [right.x, right.y, right.z, 0.0],
                cam_up: [up.x, up.y, up.z, 0.0],
            }),
        );

        let billboard_instances: Vec<BillboardInstance> = drops
            .iter()
            .enumerate()
            .map(|(i, d)| BillboardInstance {
                pos: d.position.to_array(),
                _pad: 0.0,
                scale: self.slots[i].as_ref().map(|v| v.scale).unwrap_or([0.0; 2]),
                _pad2: [0.0; 2],
            })
            .collect();
        self.queue.write_buffer(
            &self.billboard_instance_vb,
            0,
            bytemuck::cast_slice(&billboard_instances),
        );

        let sparkle_instances: Vec<SparkleInstance> = sparkles
            .iter()
            .map(|s| SparkleInstance {
                pos: s.position.to_array(),
                scale: SPARKLE_GLOW_SCALE,
            })
            .collect();
        self.queue.write_buffer(
            &self.sparkle_instance_vb,
            0,
            bytemuck::cast_slice(&sparkle_instances),
        );

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rpass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(&self.billboard_pipeline);
        rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.billboard_instance_vb.slice(..));
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(visual) = slot {
                rpass.set_bind_group(1, &visual.bind_group, &[]);
                rpass.draw(0..6, i as u32..i as u32 + 1);
            }
        }

        rpass.set_pipeline(&self.sparkle_pipeline);
        rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
        rpass.set_bind_group(1, &self.glow_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.sparkle_instance_vb.slice(..));
        rpass.draw(0..6, 0..sparkle_instances.len() as u32);

        drop(rpass);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
