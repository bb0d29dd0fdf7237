use std::env;
use std::process::ExitCode;

use softrast::camera::CameraController;
use softrast::window::{
    FpsCounter, FrameLimiter, Key, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use softrast::{Engine, Mesh, RenderParams};

/// Toggle keys:
/// 1 wireframe, 2 vertex dots, 3 filled, 4 textured,
/// C back-face culling, G grid, N face normals, L FPS cap
fn apply_toggle(params: &mut RenderParams, limiter: &mut FrameLimiter, key: Key) {
    match key {
        Key::Num1 => params.draw_wireframe = !params.draw_wireframe,
        Key::Num2 => params.draw_wireframe_dots = !params.draw_wireframe_dots,
        Key::Num3 => params.draw_filled_triangles = !params.draw_filled_triangles,
        Key::Num4 => params.draw_textured_triangles = !params.draw_textured_triangles,
        Key::C => params.enable_backface_culling = !params.enable_backface_culling,
        Key::G => params.draw_grid = !params.draw_grid,
        Key::N => params.draw_triangle_normals = !params.draw_triangle_normals,
        Key::L => limiter.enabled = !limiter.enabled,
    }
}

fn run() -> Result<(), String> {
    // Optional `<model.obj> <texture.png>` arguments; the built-in cube
    // is the fallback
    let args: Vec<String> = env::args().collect();
    let mesh = match args.as_slice() {
        [_, model, texture] => {
            Mesh::from_obj(model, texture).map_err(|e| format!("{}: {}", model, e))?
        }
        [_] => Mesh::cube(),
        _ => return Err(format!("usage: {} [model.obj texture.png]", args[0])),
    };

    let mut params = RenderParams::default();
    let mut engine = Engine::new(WINDOW_WIDTH, WINDOW_HEIGHT, mesh, &params)
        .map_err(|e| e.to_string())?;

    let mut window = Window::new("softrast", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut limiter = FrameLimiter::new(&window, 60);
    let mut fps_counter = FpsCounter::new();
    let controller = CameraController::default();

    let mut delta_time = 0.0f32;
    let mut running = true;

    while running {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => running = false,
                WindowEvent::KeyPress(key) => apply_toggle(&mut params, &mut limiter, key),
            }
        }

        let input = window.input_state();
        controller.update(engine.camera_mut(), &input, delta_time);

        engine.update(&params);
        engine.render(&params);
        window.present(engine.frame_buffer())?;

        delta_time = limiter.wait_and_get_delta(&window) as f32 / 1000.0;

        if let Some(fps) = fps_counter.tick() {
            window.set_title(&format!("softrast - {:.1} FPS", fps));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("softrast: {}", message);
            ExitCode::FAILURE
        }
    }
}
