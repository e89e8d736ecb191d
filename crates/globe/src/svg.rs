//! SVG markup for the current scene.
//!
//! The content group holds the sea disk and the country paths in draw order
//! and carries the zoom transform. Countries entirely behind the horizon are
//! left out.

use std::fmt::Write;

use layers::escape_html;

use crate::view::GlobeView;

fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// The `<g>` content layer. `None` when nothing is mounted.
pub fn render_content(globe: &GlobeView) -> Option<String> {
    let viewport = globe.viewport()?;
    let transform = globe.zoom_transform()?;
    let sea = globe.config().palette.sea;

    let mut out = String::new();
    let _ = write!(out, "<g class=\"globe-content\" transform=\"{transform}\">");
    let _ = write!(
        out,
        "<circle class=\"sea\" cx=\"{c}\" cy=\"{c}\" r=\"{r}\" fill=\"{sea}\"/>",
        c = fmt_num(viewport.mid),
        r = fmt_num(viewport.radius),
    );
    for country in globe.drawn() {
        if country.path.is_empty() {
            continue;
        }
        let id = country
            .record
            .id
            .as_ref()
            .map(|id| escape_html(id.as_str()))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<path class=\"country\" data-index=\"{index}\" data-id=\"{id}\" d=\"{d}\" \
             fill=\"{fill}\" fill-rule=\"evenodd\" stroke=\"{stroke}\" stroke-width=\"{width}\"/>",
            index = country.index,
            d = country.path.to_svg_d(),
            fill = country.style.fill,
            stroke = country.style.stroke.color,
            width = fmt_num(country.style.stroke.width),
        );
    }
    out.push_str("</g>");
    Some(out)
}

/// A standalone SVG document of the globe.
pub fn render_document(globe: &GlobeView) -> Option<String> {
    let content = render_content(globe)?;
    let size = fmt_num(globe.viewport()?.size);
    Some(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
         viewBox=\"0 0 {size} {size}\">{content}</svg>\n"
    ))
}
