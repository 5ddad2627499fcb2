use super::helpers;
use crate::constants::{MAX_ENTITIES, MAX_LIGHTS};
use crate::scene::SceneGraph;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct LightPacked {
    pos_intensity: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct EntityPacked {
    center: [f32; 4],
    radii: [f32; 4],
    orient: [f32; 4],
    color_opacity: [f32; 4],
    emissive: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    inv_view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    params: [f32; 4],
    clear: [f32; 4],
    lights: [LightPacked; MAX_LIGHTS],
    entities: [EntityPacked; MAX_ENTITIES],
}

impl SceneUniforms {
    pub(crate) fn pack(graph: &SceneGraph, aspect: f32) -> Self {
        let mut lights = [LightPacked::default(); MAX_LIGHTS];
        for (dst, light) in lights.iter_mut().zip(graph.lights.iter()) {
            *dst = LightPacked {
                pos_intensity: light.position.extend(light.intensity).to_array(),
                color: [light.color[0], light.color[1], light.color[2], 1.0],
            };
        }
        let mut entities = [EntityPacked::default(); MAX_ENTITIES];
        for (dst, entity) in entities.iter_mut().zip(graph.entities.iter()) {
            let placed = graph.world_placement(entity);
            let m = &entity.material;
            *dst = EntityPacked {
                center: placed.center.extend(m.distortion).to_array(),
                radii: placed.radii.extend(entity.params.phase).to_array(),
                orient: placed.orientation.to_array(),
                color_opacity: [m.color[0], m.color[1], m.color[2], m.opacity],
                emissive: [
                    m.emissive[0],
                    m.emissive[1],
                    m.emissive[2],
                    m.emissive_intensity,
                ],
            };
        }
        Self {
            inv_view_proj: graph.camera.inverse_view_projection(aspect).to_cols_array_2d(),
            eye: graph.camera.eye.extend(1.0).to_array(),
            params: [
                graph.time,
                graph.entities.len().min(MAX_ENTITIES) as f32,
                graph.ambient,
                graph.lights.len().min(MAX_LIGHTS) as f32,
            ],
            clear: [0.0; 4],
            lights,
            entities,
        }
    }
}

pub(crate) struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ScenePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::fragment_uniform_entry(0)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_fullscreen_pipeline(
            device,
            "scene_pipeline",
            &layout,
            shader,
            "fs_scene",
            target_format,
            None,
        );
        let uniforms = helpers::uniform_buffer(
            device,
            "scene_uniforms",
            std::mem::size_of::<SceneUniforms>(),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        Self {
            pipeline,
            uniforms,
            bind_group,
        }
    }

    pub(crate) fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        uniforms: &SceneUniforms,
    ) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
