//! Binds the transport state machine to the `<audio>` element and its UI:
//! gesture overlay, play/pause buttons, progress slider and time label.
//!
//! Every listener goes through [`AudioWiring::register`] so `destroy` can
//! deterministically remove it; the one-shot gesture listeners live in
//! their own list and are removed as a side effect of the unlock
//! transition.

use crate::dom;
use crate::overlay;
use app_core::{
    session::{slider_sync, MediaCommand},
    AudioSession, InitializationError, PlaybackError,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const ERROR_LABEL: &str = "Lỗi tải nhạc";
const ARIA_PLAYING: &str = "Tạm dừng nhạc";
const ARIA_PAUSED: &str = "Phát nhạc";

pub struct AudioDom {
    pub audio: web::HtmlAudioElement,
    pub overlay: web::Element,
    pub play_btn: web::Element,
    pub pause_btn: web::Element,
    pub slider: web::HtmlInputElement,
    pub time_label: web::Element,
    pub controls: web::Element,
}

impl AudioDom {
    pub fn lookup(document: &web::Document) -> Result<Self, InitializationError> {
        let audio = dom::require_element(document, "bg-music")?
            .dyn_into::<web::HtmlAudioElement>()
            .map_err(|_| InitializationError("bg-music is not an <audio>"))?;
        let slider = dom::require_element(document, "audio-slider")?
            .dyn_into::<web::HtmlInputElement>()
            .map_err(|_| InitializationError("audio-slider is not an <input>"))?;
        Ok(Self {
            audio,
            overlay: dom::require_element(document, "play-overlay")?,
            play_btn: dom::require_element(document, "play-btn")?,
            pause_btn: dom::require_element(document, "pause-btn")?,
            slider,
            time_label: dom::require_element(document, "audio-time")?,
            controls: dom::require_element(document, "audio-controls")?,
        })
    }
}

struct Registered {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

pub struct AudioWiring {
    dom: AudioDom,
    session: RefCell<AudioSession>,
    gestures: RefCell<Vec<Registered>>,
    registered: RefCell<Vec<Registered>>,
}

impl AudioWiring {
    pub fn attach(
        document: &web::Document,
        window: &web::Window,
    ) -> Result<Rc<Self>, InitializationError> {
        let dom = AudioDom::lookup(document)?;
        let this = Rc::new(Self {
            dom,
            session: RefCell::new(AudioSession::new()),
            gestures: RefCell::new(Vec::new()),
            registered: RefCell::new(Vec::new()),
        });
        this.setup_accessibility();
        this.wire_media_events();
        this.wire_controls();
        this.wire_gestures(window);
        this.wire_transport_keys(window);
        this.update_pause_button();
        this.update_slider();
        Ok(this)
    }

    fn setup_accessibility(&self) {
        _ = self
            .dom
            .audio
            .set_attribute("aria-label", "Nhạc nền - The Moon Represents My Heart");
        _ = self
            .dom
            .slider
            .set_attribute("aria-label", "Điều chỉnh thời gian phát nhạc");
    }

    fn register(
        self: &Rc<Self>,
        list: &RefCell<Vec<Registered>>,
        target: &web::EventTarget,
        event: &'static str,
        mut handler: impl FnMut(&Rc<Self>, web::Event) + 'static,
    ) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            if let Some(this) = weak.upgrade() {
                handler(&this, ev);
            }
        }) as Box<dyn FnMut(web::Event)>);
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_ok()
        {
            list.borrow_mut().push(Registered {
                target: target.clone(),
                event,
                closure,
            });
        }
    }

    fn wire_media_events(self: &Rc<Self>) {
        let audio: web::EventTarget = self.dom.audio.clone().into();

        self.register(&self.registered, &audio, "timeupdate", |this, _ev| {
            let t = this.dom.audio.current_time();
            this.session.borrow_mut().time_update(t);
            this.update_slider();
        });
        self.register(&self.registered, &audio, "loadedmetadata", |this, _ev| {
            let d = this.dom.audio.duration();
            this.session.borrow_mut().metadata_loaded(d);
            this.update_slider();
        });
        self.register(&self.registered, &audio, "ended", |this, _ev| {
            let cmds = this.session.borrow_mut().ended();
            this.apply(cmds);
        });
        self.register(&self.registered, &audio, "error", |this, _ev| {
            let code = this.dom.audio.error().map(|e| e.code()).unwrap_or(0);
            this.on_play_rejected(format!("media element error (code {code})"));
        });
        self.register(&self.registered, &audio, "play", |this, _ev| {
            this.on_play_started();
        });
        self.register(&self.registered, &audio, "pause", |this, _ev| {
            this.session.borrow_mut().media_paused();
            this.update_pause_button();
        });
    }

    fn wire_controls(self: &Rc<Self>) {
        let play_btn: web::EventTarget = self.dom.play_btn.clone().into();
        self.register(&self.registered, &play_btn, "click", |this, ev| {
            ev.stop_propagation();
            let cmds = this.session.borrow_mut().gesture();
            this.apply(cmds);
        });

        let pause_btn: web::EventTarget = self.dom.pause_btn.clone().into();
        self.register(&self.registered, &pause_btn, "click", |this, ev| {
            ev.stop_propagation();
            let cmds = this.session.borrow_mut().toggle_play_pause();
            this.apply(cmds);
        });

        let slider: web::EventTarget = self.dom.slider.clone().into();
        self.register(&self.registered, &slider, "input", |this, _ev| {
            if let Ok(v) = this.dom.slider.value().parse::<f64>() {
                let cmds = this.session.borrow_mut().scrub_to(v);
                this.apply(cmds);
            }
        });
        self.register(&self.registered, &slider, "mousedown", |this, _ev| {
            let cmds = this.session.borrow_mut().begin_scrub();
            this.apply(cmds);
        });
        self.register(&self.registered, &slider, "mouseup", |this, _ev| {
            let cmds = this.session.borrow_mut().end_scrub();
            this.apply(cmds);
        });
    }

    /// One-shot listeners that satisfy the autoplay gesture requirement.
    /// Removed as part of the unlock transition, so they fire at most once.
    fn wire_gestures(self: &Rc<Self>, window: &web::Window) {
        let target: web::EventTarget = window.clone().into();
        self.register(&self.gestures, &target, "click", |this, ev| {
            let pause_target: &web::EventTarget = this.dom.pause_btn.as_ref();
            if ev.target().is_some_and(|t| &t == pause_target) {
                return;
            }
            let cmds = this.session.borrow_mut().gesture();
            this.apply(cmds);
        });
        self.register(&self.gestures, &target, "keydown", |this, ev| {
            if let Some(key) = ev.dyn_ref::<web::KeyboardEvent>() {
                if matches!(key.code().as_str(), "Space" | "Enter") {
                    ev.prevent_default();
                    let cmds = this.session.borrow_mut().gesture();
                    this.apply(cmds);
                }
            }
        });
    }

    fn wire_transport_keys(self: &Rc<Self>, window: &web::Window) {
        let target: web::EventTarget = window.clone().into();
        self.register(&self.registered, &target, "keydown", |this, ev| {
            if !this.session.borrow().is_unlocked() {
                return;
            }
            let Some(key) = ev.dyn_ref::<web::KeyboardEvent>() else {
                return;
            };
            let cmds = match key.code().as_str() {
                "Space" => {
                    ev.prevent_default();
                    this.session.borrow_mut().toggle_play_pause()
                }
                "ArrowLeft" => {
                    ev.prevent_default();
                    this.session.borrow_mut().seek_back()
                }
                "ArrowRight" => {
                    ev.prevent_default();
                    this.session.borrow_mut().seek_forward()
                }
                _ => return,
            };
            this.apply(cmds);
        });
    }

    fn apply(self: &Rc<Self>, cmds: app_core::Commands) {
        for cmd in cmds {
            match cmd {
                MediaCommand::Play => self.request_play(),
                MediaCommand::Pause => {
                    _ = self.dom.audio.pause();
                }
                MediaCommand::SeekTo(t) => self.dom.audio.set_current_time(t),
                MediaCommand::SetVolume(v) => self.dom.audio.set_volume(v),
            }
        }
    }

    /// Kick off an asynchronous start; the session stays pending until the
    /// play promise settles.
    fn request_play(self: &Rc<Self>) {
        match self.dom.audio.play() {
            Ok(promise) => {
                let weak = Rc::downgrade(self);
                spawn_local(async move {
                    let outcome = JsFuture::from(promise).await;
                    let Some(this) = weak.upgrade() else {
                        return;
                    };
                    match outcome {
                        Ok(_) => this.on_play_started(),
                        Err(e) => this.on_play_rejected(format!("{e:?}")),
                    }
                });
            }
            Err(e) => self.on_play_rejected(format!("{e:?}")),
        }
    }

    fn on_play_started(&self) {
        let first_unlock = self.session.borrow_mut().play_started();
        if first_unlock {
            log::info!("audio unlocked by user gesture");
            overlay::hide(&self.dom.overlay);
            overlay::show(&self.dom.controls);
            self.unregister(&self.gestures);
        }
        self.update_pause_button();
        self.update_slider();
    }

    fn on_play_rejected(&self, message: String) {
        self.session
            .borrow_mut()
            .play_rejected(PlaybackError(message));
        self.dom.time_label.set_text_content(Some(ERROR_LABEL));
        self.update_pause_button();
    }

    fn update_pause_button(&self) {
        let playing = self.session.borrow().is_playing();
        let cl = self.dom.pause_btn.class_list();
        let (aria, icon) = if playing {
            _ = cl.add_1("playing");
            (ARIA_PLAYING, "⏸")
        } else {
            _ = cl.remove_1("playing");
            (ARIA_PAUSED, "▶")
        };
        _ = self.dom.pause_btn.set_attribute("aria-label", aria);
        _ = self.dom.play_btn.set_attribute("aria-label", aria);
        if let Ok(Some(el)) = self.dom.pause_btn.query_selector(".pause-icon") {
            el.set_text_content(Some(icon));
        }
    }

    fn update_slider(&self) {
        let (t, d) = {
            let s = self.session.borrow();
            (s.current_time(), s.duration())
        };
        let sync = slider_sync(t, d);
        self.dom.slider.set_max(&sync.max.to_string());
        self.dom.slider.set_value(&sync.value.to_string());
        self.dom.time_label.set_text_content(Some(&sync.label));
        _ = self
            .dom
            .slider
            .set_attribute("aria-valuemax", &sync.max.to_string());
        _ = self
            .dom
            .slider
            .set_attribute("aria-valuenow", &sync.value.to_string());
    }

    fn unregister(&self, list: &RefCell<Vec<Registered>>) {
        for r in list.borrow_mut().drain(..) {
            _ = r
                .target
                .remove_event_listener_with_callback(r.event, r.closure.as_ref().unchecked_ref());
        }
    }

    /// Stop playback and remove every listener. Safe to repeat; all later
    /// session events are no-ops.
    pub fn destroy(self: &Rc<Self>) {
        let cmds = self.session.borrow_mut().destroy();
        self.apply(cmds);
        self.unregister(&self.gestures);
        self.unregister(&self.registered);
    }

    // External transport controls for the page bootstrap.

    pub fn play(self: &Rc<Self>) {
        let cmds = self.session.borrow_mut().play();
        self.apply(cmds);
    }

    pub fn pause(self: &Rc<Self>) {
        let cmds = self.session.borrow_mut().pause();
        self.apply(cmds);
    }

    pub fn set_volume(self: &Rc<Self>, volume: f64) {
        let cmds = self.session.borrow_mut().set_volume(volume);
        self.apply(cmds);
    }

    pub fn volume(&self) -> f64 {
        self.session.borrow().volume()
    }

    pub fn is_playing(&self) -> bool {
        self.session.borrow().is_playing()
    }
}
