//! Scene-side input wiring: resize, page visibility, pointer orbit.

use crate::dom;
use crate::frame::FrameLoop;
use app_core::OrbitRig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
}

/// Keep the canvas backing store in sync with the window size.
pub fn wire_resize(canvas: &web::HtmlCanvasElement) {
    if let Some(window) = web::window() {
        let canvas = canvas.clone();
        let closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas);
        }) as Box<dyn FnMut()>);
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Pause the frame loop while the page is hidden, resume when shown again.
pub fn wire_visibility_pause(document: &web::Document, frame_loop: Rc<FrameLoop>) {
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        if doc.hidden() {
            frame_loop.pause();
        } else {
            frame_loop.resume();
        }
    }) as Box<dyn FnMut(_)>);
    _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Drag on the canvas orbits the camera around the scene origin.
pub fn wire_pointer_orbit(canvas: &web::HtmlCanvasElement, rig: Rc<RefCell<OrbitRig>>) {
    let Some(window) = web::window() else {
        return;
    };
    let mouse = Rc::new(RefCell::new(MouseState::default()));

    {
        let mouse = mouse.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let mut ms = mouse.borrow_mut();
            ms.down = true;
            ms.x = ev.client_x() as f32;
            ms.y = ev.client_y() as f32;
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let mouse = mouse.clone();
        let rig = rig.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let mut ms = mouse.borrow_mut();
            if !ms.down {
                return;
            }
            let x = ev.client_x() as f32;
            let y = ev.client_y() as f32;
            rig.borrow_mut().apply_drag(x - ms.x, y - ms.y);
            ms.x = x;
            ms.y = y;
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            mouse.borrow_mut().down = false;
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
