use app_core::InitializationError;
use web_sys as web;

#[inline]
pub fn require_element(
    document: &web::Document,
    element_id: &'static str,
) -> Result<web::Element, InitializationError> {
    document
        .get_element_by_id(element_id)
        .ok_or(InitializationError(element_id))
}

// Keep the canvas backing store matched to CSS size * devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}
