use maud::{Markup, html};

/// Placeholder shown in place of a preview when there is nothing to render.
pub const SIN_IMAGEN: &str = "No hay imagen";

/// Preview cell for an image: an `<img>` sourced from its `data:` URI, or
/// the plain-text placeholder when the image has no displayable data.
pub fn preview_imagen(src: Option<&str>) -> Markup {
    html! {
        @if let Some(src) = src {
            img src=(src) style="max-width: 300px; max-height: 200px;";
        } @else {
            (SIN_IMAGEN)
        }
    }
}
