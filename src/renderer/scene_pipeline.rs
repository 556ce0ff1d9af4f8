//! Ray-traced WebGPU scene pipeline
//!
//! The course is a plane, a disc, and a sphere, so the fragment shader
//! intersects them analytically from a fullscreen triangle instead of
//! rasterising meshes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use super::camera::Camera;
use super::colors::{self, hex_to_linear};
use crate::error::StartupError;
use crate::sim::{GamePhase, GameState, ball_transform};

/// Directional light position (it points at the origin)
const SUN_POSITION: Vec3 = Vec3::new(40.0, 60.0, 20.0);
const SUN_INTENSITY: f32 = 0.8;
const HEMI_INTENSITY: f32 = 1.0;

/// Aim indicator length at zero and full power
const AIM_MIN_LENGTH: f32 = 0.8;
const AIM_MAX_LENGTH: f32 = 4.0;
const AIM_HALF_WIDTH: f32 = 0.06;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct Globals {
    inv_view_proj: [[f32; 4]; 4], // offset 0
    camera_pos: [f32; 4],         // offset 64 - xyz eye, w time (s)
    resolution: [f32; 4],         // offset 80 - xy size, zw unused
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct SceneUniform {
    ball: [f32; 4],          // xyz centre, w radius
    ball_rotation: [f32; 4], // quaternion xyzw
    hole: [f32; 4],          // xyz centre, w radius
    ground_plane: [f32; 4],  // xyz normal, w offset
    ground_rotation: [f32; 4],
    ground_extent: [f32; 4], // x half size
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    hole_color: [f32; 4],
    ball_color: [f32; 4],
    stripe_color: [f32; 4],
    hemi_sky: [f32; 4],    // rgb, w intensity
    hemi_ground: [f32; 4], // rgb
    sun_dir: [f32; 4],     // xyz toward the light, w intensity
    aim: [f32; 4],         // xyz direction along the ground, w length (0 = hidden)
    aim_color: [f32; 4],   // rgb, w half width
}

fn v4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn rgb(hex: u32, w: f32) -> [f32; 4] {
    let [r, g, b, _] = hex_to_linear(hex);
    [r, g, b, w]
}

impl Globals {
    pub(crate) fn new(camera: &Camera, width: u32, height: u32, time: f32) -> Self {
        Self {
            inv_view_proj: camera.inverse_view_proj().to_cols_array_2d(),
            camera_pos: v4(camera.eye, time),
            resolution: [width as f32, height as f32, 0.0, 0.0],
        }
    }
}

impl SceneUniform {
    /// Snapshot the game state for the shader
    pub(crate) fn from_state(state: &GameState) -> Self {
        let (ball_pos, ball_rot) = ball_transform(state);
        let course = &state.course;
        let ground = course.ground;

        // Indicator only while the player can putt
        let (aim_dir, aim_len) = if state.phase == GamePhase::Ready {
            let aim = state.shot.aim();
            let flat = Vec3::new(aim.x, 0.0, aim.y);
            // Lay the indicator along the slope
            let along = (flat - ground.normal * flat.dot(ground.normal)).normalize_or_zero();
            let power = state.shot.power();
            (along, AIM_MIN_LENGTH + (AIM_MAX_LENGTH - AIM_MIN_LENGTH) * power)
        } else {
            (Vec3::ZERO, 0.0)
        };
        let aim_color = lerp_color(colors::AIM_LOW, colors::AIM_HIGH, state.shot.power());

        Self {
            ball: v4(ball_pos, state.world.body(state.ball).radius),
            ball_rotation: ball_rot.to_array(),
            hole: v4(course.hole, course.hole_radius),
            ground_plane: v4(ground.normal, ground.offset),
            ground_rotation: course.ground_rotation.to_array(),
            ground_extent: [course.ground_size / 2.0, 0.0, 0.0, 0.0],
            sky_color: hex_to_linear(colors::SKY),
            ground_color: hex_to_linear(colors::GROUND),
            hole_color: hex_to_linear(colors::HOLE),
            ball_color: hex_to_linear(colors::BALL),
            stripe_color: hex_to_linear(colors::BALL_STRIPE),
            hemi_sky: rgb(colors::HEMI_SKY, HEMI_INTENSITY),
            hemi_ground: rgb(colors::HEMI_GROUND, 1.0),
            sun_dir: v4(SUN_POSITION.normalize(), SUN_INTENSITY),
            aim: v4(aim_dir, aim_len),
            aim_color: [aim_color[0], aim_color[1], aim_color[2], AIM_HALF_WIDTH],
        }
    }
}

/// Blend two palette entries in linear space
fn lerp_color(a: u32, b: u32, t: f32) -> [f32; 4] {
    let a = hex_to_linear(a);
    let b = hex_to_linear(b);
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        1.0,
    ]
}

// ============================================================================
// SCENE RENDERER
// ============================================================================

pub struct SceneRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub camera: Camera,
    pub size: (u32, u32),
    start_time: f64,
}

impl SceneRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scene-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| StartupError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::debug!("Surface alpha modes: {:?}", surface_caps.alpha_modes);

        // Prefer sRGB so linear shader output is encoded for display
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(StartupError::NoSurfaceFormat)?;
        log::info!("Using surface format: {:?}", surface_format);

        let width = width.max(1);
        let height = height.max(1);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_shader.wgsl").into()),
        });

        let camera = Camera::new(width, height);

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::new(&camera, width, height, 0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: scene_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("Scene pipeline ready ({}x{})", width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            scene_buffer,
            bind_group,
            camera,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_width, new_height);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload the frame's uniforms and draw
    pub fn render(&mut self, state: &GameState, time: f64) -> Result<(), wgpu::SurfaceError> {
        // requestAnimationFrame time is in ms
        let elapsed = ((time - self.start_time).max(0.0) / 1000.0) as f32;

        let globals = Globals::new(&self.camera, self.size.0, self.size.1, elapsed);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let scene = SceneUniform::from_state(state);
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<Globals>(), 96);
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SceneUniform>(), 16 * 16);
    }

    #[test]
    fn test_scene_mirrors_ball_transform() {
        let mut state = GameState::new(Difficulty::Medium);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        }
        let scene = SceneUniform::from_state(&state);
        let (pos, rot) = ball_transform(&state);
        assert_eq!(scene.ball[..3], pos.to_array());
        assert_eq!(scene.ball_rotation, rot.to_array());
        assert_eq!(scene.hole[..3], state.course.hole.to_array());
    }

    #[test]
    fn test_aim_indicator_only_when_ready() {
        let mut state = GameState::new(Difficulty::Hard);
        state.phase = GamePhase::Rolling;
        assert_eq!(SceneUniform::from_state(&state).aim[3], 0.0);

        state.phase = GamePhase::Ready;
        let scene = SceneUniform::from_state(&state);
        assert!((scene.aim[3] - AIM_MIN_LENGTH).abs() < 1e-6);
        // Direction lies in the tilted ground plane
        let dir = Vec3::new(scene.aim[0], scene.aim[1], scene.aim[2]);
        assert!(dir.dot(state.course.ground.normal).abs() < 1e-5);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_aim_color_follows_power() {
        let low = lerp_color(colors::AIM_LOW, colors::AIM_HIGH, 0.0);
        let high = lerp_color(colors::AIM_LOW, colors::AIM_HIGH, 1.0);
        let close = |a: [f32; 4], b: [f32; 4]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6);
        assert!(close(low, hex_to_linear(colors::AIM_LOW)));
        assert!(close(high, hex_to_linear(colors::AIM_HIGH)));
    }
}
