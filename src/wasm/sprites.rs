//! Canvas 2D backend: two streams of short-lived glowing particles drifting
//! toward the center, a continuously-running ambient alternative to the
//! phased WebGL scene.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::{Config, ParticleConfig};
use crate::particle::{ParticleField, Side};

/// Start the particle render loop on the given canvas.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("2d context not supported")?
        .dyn_into()?;

    fit_canvas(&canvas);

    // Resize canvas to fit window; the simulation runs in normalized
    // coordinates, so only the drawing surface needs updating.
    let resize_closure = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || {
            fit_canvas(&canvas);
        }) as Box<dyn FnMut()>)
    };
    window()
        .unwrap()
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    let colors = Config::default();
    let seed = window().unwrap().performance().unwrap().now() as u64;
    let mut field = ParticleField::new(ParticleConfig::default(), seed);

    // Animation loop, same recursive request_animation_frame shape as the
    // WebGL backend.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        field.step();

        let w = canvas.width().max(1) as f64;
        let h = canvas.height().max(1) as f64;
        ctx.set_global_composite_operation("source-over").ok();
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_global_composite_operation("lighter").ok();

        for (side, color) in [
            (Side::Left, colors.color_left),
            (Side::Right, colors.color_right),
        ] {
            for p in field.side(side) {
                draw_particle(&ctx, w, h, p.x, p.y, p.size, p.life, color);
            }
        }

        // schedule next
        window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    window()
        .unwrap()
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

fn fit_canvas(canvas: &HtmlCanvasElement) {
    let w = window().unwrap().inner_width().unwrap().as_f64().unwrap();
    let h = window().unwrap().inner_height().unwrap().as_f64().unwrap();
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
}

/// One particle as a radial-gradient disc, alpha scaled by remaining life.
fn draw_particle(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    x: f32,
    y: f32,
    size: f32,
    life: f32,
    color: [f32; 3],
) {
    let px = x as f64 * w;
    let py = y as f64 * h;
    let radius = (size as f64 * h).max(0.5);
    let alpha = life.clamp(0.0, 1.0) as f64;

    let (r, g, b) = (
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
    );

    let Ok(gradient) = ctx.create_radial_gradient(px, py, 0.0, px, py, radius) else {
        return;
    };
    gradient
        .add_color_stop(0.0, &format!("rgba({r}, {g}, {b}, {alpha})"))
        .ok();
    gradient
        .add_color_stop(1.0, &format!("rgba({r}, {g}, {b}, 0)"))
        .ok();

    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.begin_path();
    ctx.arc(px, py, radius, 0.0, std::f64::consts::TAU).ok();
    ctx.fill();
}
