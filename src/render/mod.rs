pub mod pdf;
pub mod template;

pub use pdf::{fit_scale, html_to_pdf, MAX_CONTENT_HEIGHT_PX, MIN_SCALE};
pub use template::{render_html, save_html};
