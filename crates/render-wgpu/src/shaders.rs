/// WGSL shader for the sphere and the spring: per-instance model matrix and
/// colour, diffuse lighting from a point light.
pub const PENDULUM_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_position: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = world_normal;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(uniforms.light_position.xyz - in.world_position);
    // Both faces are drawn, so light whichever side faces the light.
    let normal = normalize(in.world_normal);
    let ambient = 0.2;
    let diffuse = abs(dot(normal, light_dir));
    let lighting = ambient + diffuse * 0.8;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;
