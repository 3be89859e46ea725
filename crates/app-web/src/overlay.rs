use web_sys as web;

#[inline]
pub fn show(el: &web::Element) {
    let cl = el.class_list();
    _ = cl.remove_1("hidden");
    // fallback for environments without the CSS class
    _ = el.set_attribute("style", "");
}

#[inline]
pub fn hide(el: &web::Element) {
    let cl = el.class_list();
    _ = cl.add_1("hidden");
    // fallback
    _ = el.set_attribute("style", "display:none");
}
