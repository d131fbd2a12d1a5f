//! Scene renderer.
//!
//! Executes a composed `DrawList` in its three phases:
//! - opaque: depth write on, depth test Less
//! - glass: depth write off, depth test Less, alpha blended
//! - overlay: depth test Always, identity view/projection
//!
//! Per-draw data goes through one uniform buffer bound with a dynamic
//! offset; the whole frame's draw uniforms are written before encoding
//! because `write_buffer` cannot land mid-pass.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use static_assertions::assert_eq_size;

use crate::mesh::{MeshData, MeshVertex};
use crate::scene::{DrawCommand, DrawList, MeshId};

use super::gpu_context::GpuContext;
use super::shader::SHADER_SOURCE;
use super::texture::{load_texture, LoadedTexture};

/// Per-frame uniforms: camera matrices and eye position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad: f32,
}

assert_eq_size!(FrameUniforms, [f32; 36]);

/// Per-draw uniforms, one 256-byte slot per command.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    /// rgb tint + alpha
    pub color: [f32; 4],
    /// x > 0.5 = textured
    pub flags: [f32; 4],
}

assert_eq_size!(DrawUniforms, [f32; 24]);

/// Dynamic-offset stride; 256 satisfies every adapter's alignment limit.
const DRAW_STRIDE: u64 = 256;
/// Offset of the overlay's identity frame uniforms, aligned the same way.
const FRAME_SLOT: u64 = 256;
/// Slot capacity of the per-draw buffer. The scene is a few dozen draws.
const MAX_DRAWS: usize = 256;

pub struct SceneRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    glass_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    scene_bind_group: wgpu::BindGroup,
    overlay_bind_group: wgpu::BindGroup,
    frame_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    cube_buffer: wgpu::Buffer,
    sphere_buffer: wgpu::Buffer,
    toy_buffers: Vec<Option<wgpu::Buffer>>,
    _overlay_texture: LoadedTexture,
}

impl SceneRenderer {
    pub fn new(
        gpu: &GpuContext,
        cube: &MeshData,
        sphere: &MeshData,
        toy_meshes: &[Option<MeshData>],
        overlay_texture_path: &Path,
    ) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        // Two slots: the scene camera at offset 0 and static identity
        // matrices for the overlay at the next aligned offset.
        let frame_buffer = gpu.create_empty_uniform_buffer(
            "Frame Uniforms",
            FRAME_SLOT + std::mem::size_of::<FrameUniforms>() as u64,
        );
        let draw_buffer =
            gpu.create_empty_uniform_buffer("Draw Uniforms", DRAW_STRIDE * MAX_DRAWS as u64);

        let overlay_texture = load_texture(device, &gpu.queue, overlay_texture_path);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_size = std::mem::size_of::<FrameUniforms>() as u64;
        let make_bind_group = |label: &str, frame_offset: u64| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &frame_buffer,
                            offset: frame_offset,
                            size: wgpu::BufferSize::new(frame_size),
                        }),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &draw_buffer,
                            offset: 0,
                            size: wgpu::BufferSize::new(
                                std::mem::size_of::<DrawUniforms>() as u64
                            ),
                        }),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&overlay_texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&overlay_texture.sampler),
                    },
                ],
            })
        };
        let scene_bind_group = make_bind_group("Scene Bind Group", 0);
        let overlay_bind_group = make_bind_group("Overlay Bind Group", FRAME_SLOT);

        let identity = FrameUniforms {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            _pad: 0.0,
        };
        gpu.queue
            .write_buffer(&frame_buffer, FRAME_SLOT, bytemuck::bytes_of(&identity));

        let make_pipeline = |label: &str,
                             depth_write: bool,
                             depth_compare: wgpu::CompareFunction,
                             cull: Option<wgpu::Face>| {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label} Pipeline Layout")),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{label} Pipeline")),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 0,
                                shader_location: 0,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 12,
                                shader_location: 1,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 24,
                                shader_location: 2,
                            },
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: cull,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: depth_write,
                    depth_compare,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let opaque_pipeline =
            make_pipeline("Opaque", true, wgpu::CompareFunction::Less, Some(wgpu::Face::Back));
        // Glass panels are visible from both sides, so no culling.
        let glass_pipeline = make_pipeline("Glass", false, wgpu::CompareFunction::Less, None);
        let overlay_pipeline = make_pipeline("Overlay", false, wgpu::CompareFunction::Always, None);

        let cube_buffer = gpu.create_vertex_buffer("Cube Vertices", &cube.vertices);
        let sphere_buffer = gpu.create_vertex_buffer("Sphere Vertices", &sphere.vertices);
        let toy_buffers = toy_meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| {
                mesh.as_ref()
                    .map(|m| gpu.create_vertex_buffer(&format!("Toy {i} Vertices"), &m.vertices))
            })
            .collect();

        Self {
            opaque_pipeline,
            glass_pipeline,
            overlay_pipeline,
            scene_bind_group,
            overlay_bind_group,
            frame_buffer,
            draw_buffer,
            cube_buffer,
            sphere_buffer,
            toy_buffers,
            _overlay_texture: overlay_texture,
        }
    }

    fn mesh_buffer(&self, mesh: MeshId) -> Option<&wgpu::Buffer> {
        match mesh {
            MeshId::Cube => Some(&self.cube_buffer),
            MeshId::Sphere => Some(&self.sphere_buffer),
            MeshId::Toy(i) => self.toy_buffers.get(i).and_then(|b| b.as_ref()),
        }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        list: &DrawList,
        view: Mat4,
        proj: Mat4,
        camera_pos: Vec3,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = gpu.get_current_texture()?;
        let color_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame_uniforms = FrameUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            _pad: 0.0,
        };
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniforms));

        if list.len() > MAX_DRAWS {
            log::warn!(
                "draw list has {} commands, truncating to {MAX_DRAWS}",
                list.len()
            );
        }
        let commands: Vec<&DrawCommand> = list
            .opaque
            .iter()
            .chain(&list.glass)
            .chain(&list.overlay)
            .take(MAX_DRAWS)
            .collect();

        let mut staging = vec![0u8; commands.len() * DRAW_STRIDE as usize];
        for (slot, command) in commands.iter().enumerate() {
            let uniforms = DrawUniforms {
                model: command.transform.to_cols_array_2d(),
                color: [
                    command.color.x,
                    command.color.y,
                    command.color.z,
                    command.alpha,
                ],
                flags: [if command.use_texture { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            };
            let start = slot * DRAW_STRIDE as usize;
            staging[start..start + std::mem::size_of::<DrawUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        if !staging.is_empty() {
            gpu.queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut slot = 0usize;
            let phases: [(&wgpu::RenderPipeline, &wgpu::BindGroup, &[DrawCommand]); 3] = [
                (&self.opaque_pipeline, &self.scene_bind_group, &list.opaque),
                (&self.glass_pipeline, &self.scene_bind_group, &list.glass),
                (
                    &self.overlay_pipeline,
                    &self.overlay_bind_group,
                    &list.overlay,
                ),
            ];
            'phases: for (pipeline, bind_group, phase_commands) in phases {
                pass.set_pipeline(pipeline);
                for command in phase_commands {
                    if slot >= MAX_DRAWS {
                        break 'phases;
                    }
                    let Some(buffer) = self.mesh_buffer(command.mesh) else {
                        slot += 1;
                        continue;
                    };
                    let offset = (slot as u64 * DRAW_STRIDE) as u32;
                    pass.set_bind_group(0, bind_group, &[offset]);
                    pass.set_vertex_buffer(0, buffer.slice(..));
                    pass.draw(0..command.vertex_count, 0..1);
                    slot += 1;
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniform_slot_fits_the_stride() {
        assert!(std::mem::size_of::<DrawUniforms>() as u64 <= DRAW_STRIDE);
    }

    #[test]
    fn frame_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
    }
}
