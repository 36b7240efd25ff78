use anyhow::{anyhow, Result};
use glfw::{Action, Context as _, Key, WindowEvent};
use glow::HasContext;

use flycam_gl::camera::Camera;
use flycam_gl::camera::free_fly_camera::FreeFlyCameraLoader;
use flycam_gl::graphics::shader::ShaderLoader;
use flycam_gl::input::Input;
use flycam_gl::input::multi_input::MultiInput;

#[cfg(feature = "trace")]
use tracing::{debug, info};

const CAMERA_FILE: &str = "assets/JSON/camera.json";
const SHADER_FILE: &str = "assets/JSON/shader.json";

fn main() -> Result<()> {
    #[cfg(feature = "trace")]
    let _log_guard = flycam_gl::log::init_logger(".")?;

    let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS)?;
    glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));

    let (mut window, events) = glfw
        .create_window(1280, 720, "flycam", glfw::WindowMode::Windowed)
        .ok_or_else(|| anyhow!("Failed to create GLFW window"))?;
    window.make_current();
    window.set_key_polling(true);
    window.set_cursor_pos_polling(true);
    window.set_mouse_button_polling(true);
    window.set_cursor_enter_polling(true);
    window.set_cursor_mode(glfw::CursorMode::Disabled);

    let gl = unsafe { glow::Context::from_loader_function(|s| window.get_proc_address(s) as *const _) };

    let mut camera = FreeFlyCameraLoader::new(CAMERA_FILE.to_string()).load()?;
    let mut program = ShaderLoader::new(SHADER_FILE.to_string()).load(&gl)?;
    // Keep running; an unusable program just draws nothing. With tracing on,
    // the failure has already been logged by the program itself.
    if cfg!(not(feature = "trace")) {
        if let Err(e) = program.check() {
            eprintln!("Shader program is unusable: {}", e);
        }
    }

    let vertex_array = unsafe { gl.create_vertex_array() }.map_err(|e| anyhow!(e))?;

    let mut input = MultiInput::new();
    let (x, y) = window.get_cursor_pos();
    camera.sync_cursor(glam::Vec2::new(x as f32, y as f32));

    let mut last_frame = glfw.get_time();

    #[cfg(feature = "trace")]
    info!("Setup complete. Entering render loop.");

    while !window.should_close() {
        glfw.poll_events();
        for (_, event) in glfw::flush_messages(&events) {
            match event {
                WindowEvent::Key(Key::Escape, _, Action::Release, _) => window.set_should_close(true),
                event => input.update(event)
            }
        }

        let now = glfw.get_time();
        let dt = (now - last_frame) as f32;
        last_frame = now;

        let (width, height) = window.get_framebuffer_size();
        if width > 0 && height > 0 {
            camera.on_resize(width as u32, height as u32);
        }
        camera.on_update(dt, &input);

        unsafe {
            gl.viewport(0, 0, width, height);
            gl.clear_color(0.1, 0.1, 0.12, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        {
            let mut bound = program.bind();
            bound.set_uniform_mat4("u_view", &camera.view());
            bound.set_uniform_mat4("u_projection", &camera.projection());
            bound.set_uniform_float("time", now as f32);

            unsafe {
                gl.bind_vertex_array(Some(vertex_array));
                gl.draw_arrays(glow::TRIANGLES, 0, 3);
                gl.bind_vertex_array(None);
            }
        }

        window.swap_buffers();
        input.clear();
    }

    #[cfg(feature = "trace")]
    debug!("Window closed. Releasing GL objects.");

    unsafe { gl.delete_vertex_array(vertex_array) };
    drop(program);

    Ok(())
}
