#![cfg(target_arch = "wasm32")]
//! WASM entry point: builds the scene runtime and the audio session and
//! hands the page an owned application handle instead of ambient globals.

mod audio;
mod dom;
mod events;
mod frame;
mod overlay;
mod raster;
mod render;

use app_core::{OrbitRig, RainField};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");
    Ok(())
}

struct SceneHandles {
    frame_loop: Rc<frame::FrameLoop>,
    ctx: Rc<RefCell<frame::FrameContext<'static>>>,
}

/// Owned application context returned from [`boot`]. The page keeps this
/// handle and drives lifecycle and transport through it.
#[wasm_bindgen]
pub struct App {
    scene: Option<SceneHandles>,
    audio: Option<Rc<audio::AudioWiring>>,
}

/// Bootstrap entry point. A missing peripheral disables only the component
/// that needed it; the rest of the page keeps running.
#[wasm_bindgen]
pub async fn boot() -> Result<App, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let scene = match boot_scene(&document).await {
        Ok(s) => Some(s),
        Err(e) => {
            log::error!("scene disabled: {e:#}");
            None
        }
    };

    let audio = match audio::AudioWiring::attach(&document, &window) {
        Ok(a) => Some(a),
        Err(e) => {
            log::error!("audio disabled: {e}");
            None
        }
    };

    Ok(App { scene, audio })
}

async fn boot_scene(document: &web::Document) -> anyhow::Result<SceneHandles> {
    let canvas = dom::require_element(document, "scene-canvas")?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    dom::sync_canvas_backing_size(&canvas);
    events::wire_resize(&canvas);

    let seed = js_sys::Date::now() as u64;
    let field = RainField::new(seed);

    let raster = match raster::Rasterizer::new(document) {
        Ok(r) => Some(r),
        Err(e) => {
            log::error!("rasterizer unavailable, billboards disabled: {e}");
            None
        }
    };
    let gpu = frame::init_gpu(&canvas).await;

    let rig = Rc::new(RefCell::new(OrbitRig::new()));
    events::wire_pointer_orbit(&canvas, rig.clone());

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        field,
        rig,
        canvas,
        gpu,
        raster,
        started: Instant::now(),
        recycled: Vec::new(),
    }));
    let frame_loop = Rc::new(frame::start_loop(ctx.clone()));
    events::wire_visibility_pause(document, frame_loop.clone());

    Ok(SceneHandles { frame_loop, ctx })
}

#[wasm_bindgen]
impl App {
    /// Pause the frame loop (idempotent).
    pub fn pause(&self) {
        if let Some(s) = &self.scene {
            s.frame_loop.pause();
        }
    }

    /// Resume the frame loop if paused (idempotent).
    pub fn resume(&self) {
        if let Some(s) = &self.scene {
            s.frame_loop.resume();
        }
    }

    /// Tear everything down: stop the loop, release GPU resources, stop
    /// playback and remove listeners. Safe to call repeatedly.
    pub fn destroy(&self) {
        if let Some(s) = &self.scene {
            s.frame_loop.cancel();
            let mut ctx = s.ctx.borrow_mut();
            if let Some(gpu) = ctx.gpu.as_mut() {
                gpu.release_slots();
            }
            ctx.gpu = None;
        }
        if let Some(a) = &self.audio {
            a.destroy();
        }
    }

    pub fn play(&self) {
        if let Some(a) = &self.audio {
            a.play();
        }
    }

    #[wasm_bindgen(js_name = pauseAudio)]
    pub fn pause_audio(&self) {
        if let Some(a) = &self.audio {
            a.pause();
        }
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        if let Some(a) = &self.audio {
            a.set_volume(volume);
        }
    }

    #[wasm_bindgen(js_name = getVolume)]
    pub fn get_volume(&self) -> f64 {
        self.audio.as_ref().map(|a| a.volume()).unwrap_or(0.0)
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.audio.as_ref().map(|a| a.is_playing()).unwrap_or(false)
    }
}
