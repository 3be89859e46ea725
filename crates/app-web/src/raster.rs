//! Offscreen 2D-canvas rasterization of billboard content.
//!
//! One scratch canvas is reused for measuring and drawing; every call
//! resizes it to the layout's surface and exports fresh RGBA pixels, so each
//! billboard gets its own unique image.

use app_core::{ResourceError, SpriteContent, SpriteLayout};
use wasm_bindgen::JsCast;
use web_sys as web;

const TEXT_FONT_STACK: &str = "Segoe UI, Arial, sans-serif";
const HEART_FONT_STACK: &str = "Segoe UI Emoji, Apple Color Emoji, Arial, sans-serif";
const HEART_GLYPH: &str = "\u{2764}\u{fe0f}";

pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub struct Rasterizer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl Rasterizer {
    pub fn new(document: &web::Document) -> Result<Self, ResourceError> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| ResourceError(format!("create canvas: {e:?}")))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| ResourceError("scratch element is not a canvas".to_owned()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ResourceError(format!("get 2d context: {e:?}")))?
            .ok_or_else(|| ResourceError("no 2d context".to_owned()))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|_| ResourceError("context is not 2d".to_owned()))?;
        Ok(Self { canvas, ctx })
    }

    /// Rendered width in px of `text` at `font_px`, for layout sizing.
    pub fn measure(&self, text: &str, font_px: f32) -> f32 {
        self.ctx
            .set_font(&format!("bold {font_px}px {TEXT_FONT_STACK}"));
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    /// Draw `content` onto a surface sized per `layout` and export pixels.
    pub fn rasterize(
        &self,
        content: SpriteContent,
        layout: &SpriteLayout,
    ) -> Result<RasterImage, ResourceError> {
        self.canvas.set_width(layout.surface_w);
        self.canvas.set_height(layout.surface_h);
        let w = layout.surface_w as f64;
        let h = layout.surface_h as f64;

        // Resizing resets context state; restyle every time.
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let glyph = match content {
            SpriteContent::Word(text) => {
                self.ctx
                    .set_font(&format!("bold {}px {TEXT_FONT_STACK}", layout.font_px));
                self.ctx.set_shadow_color("#fff");
                self.ctx.set_shadow_blur(16.0);
                self.ctx.set_fill_style_str("#fff");
                self.ctx.set_global_alpha(0.9);
                text
            }
            SpriteContent::Heart => {
                self.ctx
                    .set_font(&format!("bold {}px {HEART_FONT_STACK}", layout.font_px));
                self.ctx.set_shadow_color("#f00");
                self.ctx.set_shadow_blur(24.0);
                self.ctx.set_global_alpha(0.95);
                HEART_GLYPH
            }
        };
        self.ctx
            .fill_text(glyph, w / 2.0, h / 2.0)
            .map_err(|e| ResourceError(format!("fill_text: {e:?}")))?;

        let data = self
            .ctx
            .get_image_data(0.0, 0.0, w, h)
            .map_err(|e| ResourceError(format!("get_image_data: {e:?}")))?;
        Ok(RasterImage {
            width: layout.surface_w,
            height: layout.surface_h,
            pixels: data.data().0,
        })
    }
}
