//! WebGL2 backend: two noise-displaced spheres with rim-light shading and
//! additive blending, driven one frame at a time by the phase driver.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::config::Config;
use crate::driver::Driver;

// Vertex displacement uses a fixed third-party simplex noise function; the
// sphere normal is the normalized model-space position.
const VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 a_position;

uniform mat4 u_model;
uniform mat4 u_view_proj;
uniform float u_time;

out vec3 v_normal;
out vec3 v_position;

vec3 mod289(vec3 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 mod289(vec4 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 permute(vec4 x) { return mod289(((x*34.0)+1.0)*x); }
vec4 taylorInvSqrt(vec4 r) { return 1.79284291400159 - 0.85373472095314 * r; }
float snoise(vec3 v) {
    const vec2  C = vec2(1.0/6.0, 1.0/3.0) ;
    const vec4  D = vec4(0.0, 0.5, 1.0, 2.0);
    vec3 i  = floor(v + dot(v, C.yyy) );
    vec3 x0 = v - i + dot(i, C.xxx) ;
    vec3 g = step(x0.yzx, x0.xyz);
    vec3 l = 1.0 - g;
    vec3 i1 = min( g.xyz, l.zxy );
    vec3 i2 = max( g.xyz, l.zxy );
    vec3 x1 = x0 - i1 + C.xxx;
    vec3 x2 = x0 - i2 + C.yyy;
    vec3 x3 = x0 - D.yyy;
    i = mod289(i);
    vec4 p = permute( permute( permute(
            i.z + vec4(0.0, i1.z, i2.z, 1.0 ))
            + i.y + vec4(0.0, i1.y, i2.y, 1.0 ))
            + i.x + vec4(0.0, i1.x, i2.x, 1.0 ));
    float n_ = 0.142857142857;
    vec3  ns = n_ * D.wyz - D.xzx;
    vec4 j = p - 49.0 * floor(p * ns.z * ns.z);
    vec4 x_ = floor(j * ns.z);
    vec4 y_ = floor(j - 7.0 * x_ );
    vec4 x = x_ *ns.x + ns.yyyy;
    vec4 y = y_ *ns.x + ns.yyyy;
    vec4 h = 1.0 - abs(x) - abs(y);
    vec4 b0 = vec4( x.xy, y.xy );
    vec4 b1 = vec4( x.zw, y.zw );
    vec4 s0 = floor(b0)*2.0 + 1.0;
    vec4 s1 = floor(b1)*2.0 + 1.0;
    vec4 sh = -step(h, vec4(0.0));
    vec4 a0 = b0.xzyw + s0.xzyw*sh.xxyy ;
    vec4 a1 = b1.xzyw + s1.xzyw*sh.zzww ;
    vec3 p0 = vec3(a0.xy,h.x);
    vec3 p1 = vec3(a0.zw,h.y);
    vec3 p2 = vec3(a1.xy,h.z);
    vec3 p3 = vec3(a1.zw,h.w);
    vec4 norm = taylorInvSqrt(vec4(dot(p0,p0), dot(p1,p1), dot(p2, p2), dot(p3,p3)));
    p0 *= norm.x;
    p1 *= norm.y;
    p2 *= norm.z;
    p3 *= norm.w;
    vec4 m = max(0.6 - vec4(dot(x0,x0), dot(x1,x1), dot(x2,x2), dot(x3,x3)), 0.0);
    m = m * m;
    return 42.0 * dot( m*m, vec4( dot(p0,x0), dot(p1,x1), dot(p2,x2), dot(p3,x3) ) );
}

void main() {
    vec3 normal = normalize(a_position);
    float noiseVal = snoise(a_position * 2.0 + u_time * 0.5);
    vec3 displaced = a_position + normal * noiseVal * 0.2;
    vec4 world = u_model * vec4(displaced, 1.0);
    v_normal = normal;
    v_position = world.xyz;
    gl_Position = u_view_proj * world;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_position;

uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_camera;

out vec4 frag_color;

void main() {
    // Rim lighting to look like glowing plasma.
    vec3 view_dir = normalize(u_camera - v_position);
    float intensity = pow(max(0.6 - dot(normalize(v_normal), view_dir), 0.0), 2.0);
    vec3 final_color = u_color * intensity * 2.5 + u_color * 0.2;
    frag_color = vec4(final_color, u_opacity);
}
"#;

const CAMERA_Z: f32 = 5.0;
const SPHERE_RADIUS: f32 = 1.2;
const SPHERE_SEGMENTS: u32 = 64;
/// Shader-time advance per frame (makes the fluid move).
const TIME_STEP: f32 = 0.02;

struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view_proj: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    camera: Option<WebGlUniformLocation>,
}

/// Start the render loop on the given canvas.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;

    let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
    gl.use_program(Some(&program));

    let uniforms = Uniforms {
        model: gl.get_uniform_location(&program, "u_model"),
        view_proj: gl.get_uniform_location(&program, "u_view_proj"),
        time: gl.get_uniform_location(&program, "u_time"),
        color: gl.get_uniform_location(&program, "u_color"),
        opacity: gl.get_uniform_location(&program, "u_opacity"),
        camera: gl.get_uniform_location(&program, "u_camera"),
    };

    let index_count = upload_sphere(&gl, &program)?;

    gl.enable(GL::BLEND);
    gl.blend_func(GL::SRC_ALPHA, GL::ONE); // additive glow
    gl.disable(GL::DEPTH_TEST);
    gl.clear_color(0.0, 0.0, 0.0, 0.0);

    fit_canvas(&canvas);

    // Resize canvas to fit window
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

    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut shader_time: f32 = 0.0;

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now_ms = window().unwrap().performance().unwrap().now();
        driver.step(now_ms);
        shader_time += TIME_STEP;

        let width = canvas.width().max(1);
        let height = canvas.height().max(1);
        gl.viewport(0, 0, width as i32, height as i32);
        gl.clear(GL::COLOR_BUFFER_BIT);

        let aspect = width as f32 / height as f32;
        let proj = Mat4::perspective_rh_gl(75f32.to_radians(), aspect, 0.1, 1000.0);
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_Z));
        let view_proj = proj * view;

        gl.uniform_matrix4fv_with_f32_array(
            uniforms.view_proj.as_ref(),
            false,
            &view_proj.to_cols_array(),
        );
        gl.uniform1f(uniforms.time.as_ref(), shader_time);
        gl.uniform3f(uniforms.camera.as_ref(), 0.0, 0.0, CAMERA_Z);

        for (blob, color) in [
            (driver.left(), config.color_left),
            (driver.right(), config.color_right),
        ] {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(blob.scale),
                Quat::IDENTITY,
                Vec3::new(blob.x, 0.0, 0.0),
            );
            gl.uniform_matrix4fv_with_f32_array(
                uniforms.model.as_ref(),
                false,
                &model.to_cols_array(),
            );
            gl.uniform3f(uniforms.color.as_ref(), color[0], color[1], color[2]);
            gl.uniform1f(uniforms.opacity.as_ref(), blob.opacity.clamp(0.0, 1.0));
            gl.draw_elements_with_i32(GL::TRIANGLES, index_count, GL::UNSIGNED_SHORT, 0);
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

/// Match the drawing buffer to the window size. Idempotent; also used by the
/// resize listener.
fn fit_canvas(canvas: &HtmlCanvasElement) {
    let w = window().unwrap().inner_width().unwrap().as_f64().unwrap();
    let h = window().unwrap().inner_height().unwrap().as_f64().unwrap();
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
}

/// Upload a UV sphere (shared by both blobs) and return its index count.
fn upload_sphere(gl: &GL, program: &WebGlProgram) -> Result<i32, JsValue> {
    let (positions, indices) = sphere_mesh(SPHERE_RADIUS, SPHERE_SEGMENTS);

    let vao = gl.create_vertex_array().ok_or("failed to create VAO")?;
    gl.bind_vertex_array(Some(&vao));

    let vbo = gl.create_buffer().ok_or("failed to create vertex buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
    gl.buffer_data_with_array_buffer_view(
        GL::ARRAY_BUFFER,
        &js_sys::Float32Array::from(positions.as_slice()),
        GL::STATIC_DRAW,
    );

    let loc = gl.get_attrib_location(program, "a_position");
    if loc < 0 {
        return Err("a_position attribute missing".into());
    }
    gl.enable_vertex_attrib_array(loc as u32);
    gl.vertex_attrib_pointer_with_i32(loc as u32, 3, GL::FLOAT, false, 0, 0);

    let ibo = gl.create_buffer().ok_or("failed to create index buffer")?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
    gl.buffer_data_with_array_buffer_view(
        GL::ELEMENT_ARRAY_BUFFER,
        &js_sys::Uint16Array::from(indices.as_slice()),
        GL::STATIC_DRAW,
    );

    Ok(indices.len() as i32)
}

/// Positions and triangle indices for a latitude/longitude sphere.
fn sphere_mesh(radius: f32, segments: u32) -> (Vec<f32>, Vec<u16>) {
    let mut positions = Vec::with_capacity(((segments + 1) * (segments + 1) * 3) as usize);
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);

    for lat in 0..=segments {
        let theta = lat as f32 * std::f32::consts::PI / segments as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for lon in 0..=segments {
            let phi = lon as f32 * 2.0 * std::f32::consts::PI / segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            positions.push(radius * sin_t * cos_p);
            positions.push(radius * cos_t);
            positions.push(radius * sin_t * sin_p);
        }
    }

    let stride = segments + 1;
    for lat in 0..segments {
        for lon in 0..segments {
            let a = (lat * stride + lon) as u16;
            let b = ((lat + 1) * stride + lon) as u16;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    (positions, indices)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("failed to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".into());
        log::error!("shader compile failed: {info}");
        Err(info.into())
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;

    let program = gl.create_program().ok_or("failed to create program")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".into());
        log::error!("program link failed: {info}");
        Err(info.into())
    }
}
