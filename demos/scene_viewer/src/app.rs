use glow::HasContext;
use glscene_assets::AssetsRoot;
use glscene_core::{Camera, SceneKind, ViewerConfig};
use glscene_host_winit::{look_offsets, FrameClock, Host, InputState, KeyLatch};
use glscene_runtime_glow::{reset_state, FrameCtx};
use glscene_scenes::{build_scene, Scene, SceneContext};
use winit::event::{
    DeviceEvent, ElementState, Event, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};

/// Number keys 1-9 select `SceneKind::ALL[0..9]`.
pub fn scene_for_key(key: VirtualKeyCode) -> Option<SceneKind> {
    let index = match key {
        VirtualKeyCode::Key1 => 0,
        VirtualKeyCode::Key2 => 1,
        VirtualKeyCode::Key3 => 2,
        VirtualKeyCode::Key4 => 3,
        VirtualKeyCode::Key5 => 4,
        VirtualKeyCode::Key6 => 5,
        VirtualKeyCode::Key7 => 6,
        VirtualKeyCode::Key8 => 7,
        VirtualKeyCode::Key9 => 8,
        _ => return None,
    };
    SceneKind::from_index(index)
}

/// Wheel lines per pixel-delta unit on touchpads.
const PIXELS_PER_LINE: f64 = 50.0;

#[derive(Debug)]
pub struct App {
    host: Host,
    scene: Box<dyn Scene>,
    kind: SceneKind,
    ctx: SceneContext,
    camera: Camera,
    input: InputState,
    keys: KeyLatch,
    clock: FrameClock,
    captured: bool,
}

impl App {
    pub fn new(
        event_loop: &EventLoop<()>,
        cfg: &ViewerConfig,
        assets: AssetsRoot,
    ) -> anyhow::Result<Self> {
        let host = Host::new(event_loop, &cfg.window)?;
        let (w, h) = host.size();
        let ctx = SceneContext {
            assets,
            width: w as i32,
            height: h as i32,
        };

        let mut scene = build_scene(cfg.scene);
        unsafe {
            reset_state(&host.gl);
            if let Err(e) = scene.setup(&host.gl, &ctx) {
                scene.destroy(&host.gl);
                return Err(anyhow::Error::new(e).context(format!("setting up scene '{}'", cfg.scene)));
            }
        }
        tracing::info!(scene = %cfg.scene, "scene ready");

        Ok(Self {
            host,
            scene,
            kind: cfg.scene,
            ctx,
            camera: cfg.camera.build(),
            input: InputState::default(),
            keys: KeyLatch::default(),
            clock: FrameClock::new(),
            captured: false,
        })
    }

    /// Hand control to winit. Never returns; the scene is destroyed when the loop ends.
    pub fn run(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { event, .. } => self.on_window_event(event, control_flow),

                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                    ..
                } if self.captured => {
                    let (x, y) = look_offsets(dx, dy);
                    self.camera.process_mouse_movement(x, y, true);
                }

                Event::MainEventsCleared => self.host.request_redraw(),

                Event::RedrawRequested(_) => self.redraw(),

                Event::LoopDestroyed => unsafe {
                    self.scene.destroy(&self.host.gl);
                    tracing::info!("viewer closed");
                },

                _ => {}
            }
        })
    }

    fn on_window_event(&mut self, event: WindowEvent, control_flow: &mut ControlFlow) {
        match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

            WindowEvent::Resized(size) => self.resize(size.width, size.height),

            WindowEvent::Focused(false) => {
                self.input.clear();
                self.keys.clear();
            }

            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if self.input.handle_key(key, pressed) || !self.keys.press(key, pressed) {
                    return;
                }
                match key {
                    VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                    VirtualKeyCode::F => {
                        let on = self.scene.toggle_offscreen();
                        tracing::info!(scene = %self.kind, offscreen = on, "offscreen toggled");
                    }
                    VirtualKeyCode::Tab => {
                        self.captured = !self.captured;
                        self.host.set_cursor_captured(self.captured);
                    }
                    other => {
                        if let Some(kind) = scene_for_key(other) {
                            self.switch_scene(kind);
                        }
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.camera.process_mouse_scroll(lines);
            }

            _ => {}
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (w, h) = (width.max(1), height.max(1));
        self.host.resize(w, h);
        self.ctx.width = w as i32;
        self.ctx.height = h as i32;
        if let Err(e) = unsafe { self.scene.resize(&self.host.gl, w as i32, h as i32) } {
            tracing::error!(error = %e, scene = %self.kind, "scene resize failed");
        }
        tracing::info!(width = w, height = h, "resized");
        self.host.request_redraw();
    }

    /// Tear down the current scene and set up `kind`. On failure the previous kind is rebuilt.
    fn switch_scene(&mut self, kind: SceneKind) {
        if kind == self.kind {
            return;
        }
        let gl = &self.host.gl;
        unsafe {
            self.scene.destroy(gl);
            reset_state(gl);
        }

        let mut next = build_scene(kind);
        match unsafe { next.setup(gl, &self.ctx) } {
            Ok(()) => {
                tracing::info!(from = %self.kind, to = %kind, "scene switched");
                self.scene = next;
                self.kind = kind;
            }
            Err(e) => {
                tracing::error!(error = %e, scene = %kind, "scene setup failed, keeping previous scene");
                let mut prev = build_scene(self.kind);
                unsafe {
                    next.destroy(gl);
                    reset_state(gl);
                    if let Err(e) = prev.setup(gl, &self.ctx) {
                        tracing::error!(error = %e, scene = %self.kind, "previous scene failed to rebuild");
                    }
                }
                self.scene = prev;
            }
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        self.input.apply(&mut self.camera, dt);

        let (w, h) = self.host.size();
        let frame = FrameCtx {
            width: w as i32,
            height: h as i32,
            time: self.clock.elapsed(),
            frame: self.clock.frame(),
        };

        let gl = &self.host.gl;
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, frame.width, frame.height);
            let [r, g, b, a] = self.scene.clear_color();
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
            self.scene.draw(gl, &self.camera, frame);
        }

        if let Err(e) = self.host.swap_buffers() {
            tracing::warn!(error = %e, "swap failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_follow_catalog_order() {
        assert_eq!(scene_for_key(VirtualKeyCode::Key1), Some(SceneKind::Triangle));
        assert_eq!(scene_for_key(VirtualKeyCode::Key7), Some(SceneKind::MirrorFramebuffer));
        assert_eq!(scene_for_key(VirtualKeyCode::Key9), Some(SceneKind::Test));
        assert_eq!(scene_for_key(VirtualKeyCode::Key0), None);
        assert_eq!(scene_for_key(VirtualKeyCode::F), None);
    }
}
