use std::time::Instant;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use vitrine_bridge::coords::SurfaceSize;
use vitrine_bridge::core::FrameSource;

/// BGRA keeps the readback byte-identical to the bridge's transfer format.
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

const ITERATIONS: f32 = 150.0;

/// Frame uniforms for the fragment stage.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    center: [f32; 2],
    span: [f32; 2],
    iterations: f32,
    _pad: [f32; 3],
}

/// Offscreen Mandelbrot renderer.
///
/// Owns a windowless wgpu device and a BGRA render target; one fullscreen
/// triangle per frame, escape-time coloring in the fragment stage, with a
/// slow breathing zoom so motion is visible. Doubles as the bridge's
/// [`FrameSource`]: readback happens on the render thread, synchronously,
/// inside the capture cycle.
pub struct MandelbrotScene {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: wgpu::Buffer,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    size: SurfaceSize,
    started: Instant,
}

impl MandelbrotScene {
    /// Brings up the GPU device and pipeline. Adapter/device acquisition is
    /// asynchronous under wgpu; callers block on this with `pollster`.
    pub async fn new(size: SurfaceSize) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a GPU adapter for offscreen rendering")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vitrine-demo device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vitrine mandelbrot shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mandelbrot.wgsl").into()),
        });

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vitrine mandelbrot uniforms"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vitrine mandelbrot bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<SceneUniform>() as u64)
                            .unwrap(),
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vitrine mandelbrot bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vitrine mandelbrot pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vitrine mandelbrot pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
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

        let (target, target_view) = create_target(&device, size);

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group,
            uniforms,
            target,
            target_view,
            size,
            started: Instant::now(),
        })
    }

    /// Resizes the offscreen target; the next render covers the new extent.
    pub fn set_size(&mut self, size: SurfaceSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        let (target, view) = create_target(&self.device, size);
        self.target = target;
        self.target_view = view;
        log::debug!(
            "offscreen target resized to {}x{}",
            size.width(),
            size.height()
        );
    }

    /// Renders one frame into the offscreen target.
    pub fn render(&mut self) {
        let t = self.started.elapsed().as_secs_f32();
        let zoom = 0.9 + 0.25 * (t * 0.4).sin();
        let aspect = self.size.width() as f32 / self.size.height() as f32;
        let uniform = SceneUniform {
            center: [-0.7, 0.0],
            span: [3.0 * zoom * aspect, 3.0 * zoom],
            iterations: ITERATIONS,
            _pad: [0.0; 3],
        };
        self.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniform));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vitrine mandelbrot encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vitrine mandelbrot pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl FrameSource for MandelbrotScene {
    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn read_pixels(&mut self, width: u32, height: u32, dst: &mut [u8]) {
        // wgpu pads copy rows to a 256-byte alignment; de-pad into `dst`
        // bottom-up, since the texture is top-down and the bridge contract
        // is GL-style row order.
        let row_bytes = width as usize * 4;
        let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
        let padded = row_bytes.div_ceil(alignment) * alignment;

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vitrine readback staging"),
            size: (padded * height as usize) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vitrine readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded as u32),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .ok();

        match rx.recv() {
            Ok(Ok(())) => {}
            _ => {
                log::error!("frame readback failed; emitting a black frame");
                dst.fill(0);
                return;
            }
        }

        let data = slice.get_mapped_range();
        for row in 0..height as usize {
            let src = &data[row * padded..row * padded + row_bytes];
            let flipped = height as usize - 1 - row;
            dst[flipped * row_bytes..(flipped + 1) * row_bytes].copy_from_slice(src);
        }
        drop(data);
        staging.unmap();
    }
}

fn create_target(device: &wgpu::Device, size: SurfaceSize) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("vitrine offscreen target"),
        size: wgpu::Extent3d {
            width: size.width(),
            height: size.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
