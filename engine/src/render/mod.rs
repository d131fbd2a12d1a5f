//! Render System
//!
//! wgpu plumbing: GPU context, the scene renderer that executes draw lists,
//! the shared WGSL shader, and texture loading.

pub mod gpu_context;
pub mod scene_renderer;
pub mod shader;
pub mod texture;

pub use gpu_context::GpuContext;
pub use scene_renderer::SceneRenderer;
pub use shader::SHADER_SOURCE;
pub use texture::{load_texture, LoadedTexture};
