use crate::raster::Rasterizer;
use crate::render::GpuState;
use app_core::{sprite, Camera, OrbitRig, RainField, SpriteContent};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub field: RainField,
    pub rig: Rc<RefCell<OrbitRig>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState<'a>>,
    pub raster: Option<Rasterizer>,
    pub started: Instant,
    pub recycled: Vec<usize>,
}

impl<'a> FrameContext<'a> {
    /// One display frame: advance the simulation, rebuild any recycled slot
    /// visuals, render. Failures are logged and absorbed here; nothing
    /// propagates past the frame boundary.
    pub fn frame(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        self.recycled.clear();
        self.field.tick(elapsed, &mut self.recycled);

        if let (Some(gpu), Some(raster)) = (self.gpu.as_mut(), self.raster.as_ref()) {
            reconcile_slots(gpu, raster, &self.field);
        }

        if let Some(gpu) = self.gpu.as_mut() {
            let w = self.canvas.width();
            let h = self.canvas.height();
            gpu.resize_if_needed(w, h);
            let aspect = w.max(1) as f32 / h.max(1) as f32;
            let camera = Camera::new(self.rig.borrow().eye(), aspect);
            if let Err(e) = gpu.render(&camera, self.field.drops(), self.field.sparkles()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

/// Rebuild every slot whose visual generation no longer matches the
/// simulation. Covers both freshly recycled drops and slots whose previous
/// rasterization failed: those stay mismatched and are retried here on the
/// next frame, keeping their old visual until a build succeeds.
fn reconcile_slots(gpu: &mut GpuState<'_>, raster: &Rasterizer, field: &RainField) {
    for (i, d) in field.drops().iter().enumerate() {
        if gpu.slot_generation(i) == Some(d.generation) {
            continue;
        }
        let layout = match d.content {
            SpriteContent::Word(text) => {
                sprite::text_layout(text, |s, font_px| raster.measure(s, font_px))
            }
            SpriteContent::Heart => sprite::heart_layout(),
        };
        match raster.rasterize(d.content, &layout) {
            Ok(image) => {
                gpu.install_slot(i, d.generation, [layout.scale_x, layout.scale_y], &image)
            }
            Err(e) => log::warn!("billboard raster failed for slot {i}: {e}"),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Cooperative rAF loop with cancellation. `pause` drops the pending
/// callback (including one already queued for the next refresh), `resume`
/// re-arms only when nothing is pending; both are idempotent.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    raf_id: Rc<Cell<Option<i32>>>,
}

pub fn start_loop(ctx: Rc<RefCell<FrameContext<'static>>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        ctx.borrow_mut().frame();
        arm(&tick_clone, &raf_clone);
    }) as Box<dyn FnMut()>));
    let frame_loop = FrameLoop { tick, raf_id };
    frame_loop.resume();
    frame_loop
}

fn arm(
    tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    raf_id: &Rc<Cell<Option<i32>>>,
) {
    if raf_id.get().is_some() {
        return;
    }
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            raf_id.set(Some(id));
        }
    }
}

impl FrameLoop {
    pub fn pause(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
    }

    pub fn resume(&self) {
        arm(&self.tick, &self.raf_id);
    }

    /// Stop permanently: no tick runs after this, and `resume` becomes a
    /// no-op. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.pause();
        self.tick.borrow_mut().take();
    }
}
