use super::helpers;
use super::targets::RenderTargets;
use crate::post::PostParams;

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    // One buffer per pass: queued writes all land before the submit.
    main_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    passthrough_pipeline: wgpu::RenderPipeline,
    bg_scene: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        targets: &RenderTargets,
        swap_format: wgpu::TextureFormat,
    ) -> Self {
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                helpers::fragment_texture_entry(0),
                helpers::fragment_sampler_entry(1),
                helpers::fragment_uniform_entry(2),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[
                helpers::fragment_texture_entry(0),
                helpers::fragment_sampler_entry(1),
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let size = std::mem::size_of::<PostParams>();
        let main_uniforms = helpers::uniform_buffer(device, "post_main_uniforms", size);
        let blur_h_uniforms = helpers::uniform_buffer(device, "post_blur_h_uniforms", size);
        let blur_v_uniforms = helpers::uniform_buffer(device, "post_blur_v_uniforms", size);

        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_fullscreen_pipeline(
            device,
            "bright_pipeline",
            &pl_single,
            shader,
            "fs_bright",
            targets.format,
            None,
        );
        let blur_pipeline = helpers::make_fullscreen_pipeline(
            device,
            "blur_pipeline",
            &pl_single,
            shader,
            "fs_blur",
            targets.format,
            None,
        );
        let composite_pipeline = helpers::make_fullscreen_pipeline(
            device,
            "composite_pipeline",
            &pl_composite,
            shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let passthrough_pipeline = helpers::make_fullscreen_pipeline(
            device,
            "passthrough_pipeline",
            &pl_single,
            shader,
            "fs_passthrough",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );

        let bg_scene = bind0(device, &bgl0, &targets.scene_view, &sampler, &main_uniforms, "bg_scene");
        let bg_from_bloom_a = bind0(
            device,
            &bgl0,
            &targets.bloom_a_view,
            &sampler,
            &blur_h_uniforms,
            "bg_from_bloom_a",
        );
        let bg_from_bloom_b = bind0(
            device,
            &bgl0,
            &targets.bloom_b_view,
            &sampler,
            &blur_v_uniforms,
            "bg_from_bloom_b",
        );
        let bg_bloom_a_only = bind1(device, &bgl1, &targets.bloom_a_view, &sampler);

        Self {
            bgl0,
            bgl1,
            sampler,
            main_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            passthrough_pipeline,
            bg_scene,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
        }
    }

    /// Targets were recreated; point the bind groups at the new views.
    pub(crate) fn rebind(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.bg_scene = bind0(
            device,
            &self.bgl0,
            &targets.scene_view,
            &self.sampler,
            &self.main_uniforms,
            "bg_scene",
        );
        self.bg_from_bloom_a = bind0(
            device,
            &self.bgl0,
            &targets.bloom_a_view,
            &self.sampler,
            &self.blur_h_uniforms,
            "bg_from_bloom_a",
        );
        self.bg_from_bloom_b = bind0(
            device,
            &self.bgl0,
            &targets.bloom_b_view,
            &self.sampler,
            &self.blur_v_uniforms,
            "bg_from_bloom_b",
        );
        self.bg_bloom_a_only = bind1(device, &self.bgl1, &targets.bloom_a_view, &self.sampler);
    }

    /// Encode the post chain into `output`, or a plain copy when `params` is `None`.
    pub(crate) fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
        params: Option<&PostParams>,
    ) {
        let Some(params) = params else {
            blit(
                encoder,
                "passthrough",
                output,
                &self.passthrough_pipeline,
                &self.bg_scene,
                None,
            );
            return;
        };

        queue.write_buffer(&self.main_uniforms, 0, bytemuck::bytes_of(params));
        if params.has_bloom() {
            let mut h = *params;
            h.blur_dir = [1.0, 0.0, 0.0, 0.0];
            let mut v = *params;
            v.blur_dir = [0.0, 1.0, 0.0, 0.0];
            queue.write_buffer(&self.blur_h_uniforms, 0, bytemuck::bytes_of(&h));
            queue.write_buffer(&self.blur_v_uniforms, 0, bytemuck::bytes_of(&v));

            blit(
                encoder,
                "bright_pass",
                &targets.bloom_a_view,
                &self.bright_pipeline,
                &self.bg_scene,
                None,
            );
            blit(
                encoder,
                "blur_h",
                &targets.bloom_b_view,
                &self.blur_pipeline,
                &self.bg_from_bloom_a,
                None,
            );
            blit(
                encoder,
                "blur_v",
                &targets.bloom_a_view,
                &self.blur_pipeline,
                &self.bg_from_bloom_b,
                None,
            );
        }
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &self.bg_scene,
            Some(&self.bg_bloom_a_only),
        );
    }
}

fn bind0(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}

fn bind1(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
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
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
