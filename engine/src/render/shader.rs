//! WGSL shader source for the scene renderer.
//!
//! One shader serves all three phases. Untextured draws get a simple
//! Blinn-Phong shade from a fixed key light; textured draws (the signature
//! overlay) sample the bound texture and skip lighting.

pub const SHADER_SOURCE: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    camera_pos: vec3<f32>,
    _pad: f32,
};

struct DrawUniforms {
    model: mat4x4<f32>,
    // rgb = tint, a = alpha
    color: vec4<f32>,
    // x > 0.5 = sample the texture
    flags: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: FrameUniforms;
@group(0) @binding(1) var<uniform> draw: DrawUniforms;
@group(0) @binding(2) var overlay_texture: texture_2d<f32>;
@group(0) @binding(3) var overlay_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = draw.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.proj * frame.view * world;
    out.world_pos = world.xyz;
    out.normal = (draw.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if (draw.flags.x > 0.5) {
        let texel = textureSample(overlay_texture, overlay_sampler, in.uv);
        return vec4<f32>(draw.color.rgb * texel.rgb, draw.color.a * texel.a);
    }

    let n = normalize(in.normal);
    let light_dir = normalize(vec3<f32>(0.4, 1.0, 0.6));
    let view_dir = normalize(frame.camera_pos - in.world_pos);
    let half_dir = normalize(light_dir + view_dir);

    let diffuse = max(dot(n, light_dir), 0.0);
    let specular = pow(max(dot(n, half_dir), 0.0), 32.0);
    let lit = draw.color.rgb * (0.25 + 0.75 * diffuse) + vec3<f32>(0.15) * specular;
    return vec4<f32>(lit, draw.color.a);
}
"#;
