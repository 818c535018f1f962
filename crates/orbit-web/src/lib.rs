//! Browser bridge for the orbit engine.
//!
//! One [`MapRunner`] lives in a `thread_local!`; the host calls the
//! exported free functions below and reads the body and update buffers
//! straight out of WASM memory.

pub mod runner;

pub use runner::{MapRunner, UPDATE_FLOATS};

use std::cell::RefCell;

use orbit_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<MapRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut MapRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Map not initialized. Call map_init() first.");
        f(runner)
    })
}

/// Create the map. `config_json` may be empty for the defaults.
#[wasm_bindgen]
pub fn map_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = MapRunner::from_config_json(config_json).map_err(|e| JsValue::from_str(&e))?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orbit-map: initialized");
    Ok(())
}

/// Replace the entity snapshot. Returns the number of systems loaded.
#[wasm_bindgen]
pub fn map_load_snapshot(json: &str) -> Result<u32, JsValue> {
    with_runner(|r| r.load_snapshot(json)).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn map_start(timestamp_ms: f64) {
    with_runner(|r| r.start(timestamp_ms));
}

#[wasm_bindgen]
pub fn map_stop() {
    with_runner(|r| r.stop());
}

/// Returns `false` once the animation has been stopped.
#[wasm_bindgen]
pub fn map_frame(timestamp_ms: f64) -> bool {
    with_runner(|r| r.frame(timestamp_ms))
}

// ---- Input ----

#[wasm_bindgen]
pub fn map_drag_end(system_id: &str, dx: f64, dy: f64) -> bool {
    with_runner(|r| r.drag_end(system_id, dx, dy))
}

#[wasm_bindgen]
pub fn map_pan(dx: f64, dy: f64) {
    with_runner(|r| r.push_input(InputEvent::Pan { dx, dy }));
}

#[wasm_bindgen]
pub fn map_zoom(factor: f64, x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::Zoom { factor, x, y }));
}

#[wasm_bindgen]
pub fn map_resize(width: f64, height: f64) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

#[wasm_bindgen]
pub fn map_custom_event(kind: u32, a: f64, b: f64, c: f64) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Editing ----

#[wasm_bindgen]
pub fn map_place_system(id: &str) -> Result<(), JsValue> {
    with_runner(|r| r.place_system(id)).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn map_add_planet(system_id: &str, planet_id: &str) -> bool {
    with_runner(|r| r.add_planet(system_id, planet_id))
}

#[wasm_bindgen]
pub fn map_add_moon(system_id: &str, planet_index: u32, moon_id: &str) -> bool {
    with_runner(|r| r.add_moon(system_id, planet_index, moon_id))
}

// ---- View accessors ----

#[wasm_bindgen]
pub fn map_world_center_x() -> f64 {
    with_runner(|r| r.world_center().x)
}

#[wasm_bindgen]
pub fn map_world_center_y() -> f64 {
    with_runner(|r| r.world_center().y)
}

#[wasm_bindgen]
pub fn map_translate_x() -> f64 {
    with_runner(|r| r.map().transform().translate_x)
}

#[wasm_bindgen]
pub fn map_translate_y() -> f64 {
    with_runner(|r| r.map().transform().translate_y)
}

#[wasm_bindgen]
pub fn map_scale() -> f64 {
    with_runner(|r| r.map().transform().scale)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_bodies_ptr() -> *const f32 {
    with_runner(|r| r.bodies_ptr())
}

#[wasm_bindgen]
pub fn get_body_count() -> u32 {
    with_runner(|r| r.body_count())
}

/// Copy of the body buffer, for hosts that cannot read WASM memory.
#[wasm_bindgen]
pub fn get_bodies() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.body_floats()))
}

#[wasm_bindgen]
pub fn get_updates_ptr() -> *const f64 {
    with_runner(|r| r.updates_ptr())
}

/// Number of pending position updates, each `UPDATE_FLOATS` wide.
#[wasm_bindgen]
pub fn get_updates_len() -> u32 {
    with_runner(|r| r.updates_len())
}

#[wasm_bindgen]
pub fn get_update_id(index: u32) -> Option<String> {
    with_runner(|r| r.update_id(index).map(str::to_string))
}

/// Call once the host has persisted the pending updates.
#[wasm_bindgen]
pub fn map_clear_updates() {
    with_runner(|r| r.clear_updates());
}
