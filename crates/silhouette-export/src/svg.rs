//! SVG export serializer.
//!
//! Converts traced contours into an SVG string using the [`svg`] crate
//! for document construction, XML escaping, and path data formatting.
//!
//! Outer contours are emitted under `<g id="outer">`, hole contours under
//! `<g id="inner">`.  Each contour with two or more points becomes a
//! `<path>` of `M` (move to) and `L` (line to) commands; an isolated pixel
//! becomes a small filled `<circle>`.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements for
//! accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use silhouette_core::contour::ISOLATED_PIXEL_RADIUS;
use silhouette_core::{Contour, Dimensions};

/// Namespace URI of the `<silhouette:border>` metadata element.
const METADATA_NAMESPACE: &str = "https://github.com/silhouette-rs/silhouette/ns/1";

/// Metadata to embed in the SVG document.
///
/// All fields are optional.  When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the source image filename (without extension).
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized border configuration, emitted inside a `<metadata>`
    /// element wrapped in a namespaced `<silhouette:border>` element.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a contour.
///
/// Uses `M` for the first point and `L` for subsequent points.  The path
/// is left open, matching the raster stroke.  Returns an empty string for
/// contours with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use silhouette_core::{Contour, ContourKind, GridPoint};
/// use silhouette_export::build_path_data;
///
/// let contour = Contour::new(
///     1,
///     ContourKind::Outer,
///     vec![GridPoint::new(10, 20), GridPoint::new(30, 40)],
/// );
/// assert_eq!(build_path_data(&contour), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(contour: &Contour) -> String {
    let points = contour.points();
    if points.len() < 2 {
        return String::new();
    }

    let first = &points[0];
    let mut data = Data::new().move_to((first.x, first.y));
    for p in &points[1..] {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Build a `<g>` holding one element per non-empty contour, or `None` if
/// every contour is empty.
fn contour_group(id: &str, contours: &[Contour]) -> Option<Group> {
    let mut group = Group::new()
        .set("id", id)
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", 1);
    let mut count = 0usize;

    for contour in contours {
        if contour.is_isolated() {
            let p = contour.points()[0];
            group = group.add(
                Circle::new()
                    .set("cx", p.x)
                    .set("cy", p.y)
                    .set("r", ISOLATED_PIXEL_RADIUS)
                    .set("fill", "black"),
            );
            count += 1;
            continue;
        }

        let d = build_path_data(contour);
        if d.is_empty() {
            continue;
        }
        group = group.add(Path::new().set("d", d));
        count += 1;
    }

    (count > 0).then_some(group)
}

/// Serialize traced contours into an SVG document string.
///
/// The document's `width`, `height` and `viewBox` match `dimensions`, so
/// contour points land on the pixels they were traced from.
#[must_use]
pub fn to_svg(
    outer: &[Contour],
    inner: &[Contour],
    dimensions: Dimensions,
    metadata: &SvgMetadata<'_>,
) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut border_el = Element::new("silhouette:border");
        border_el.assign("xmlns:silhouette", METADATA_NAMESPACE);
        border_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(border_el);
        doc = doc.add(metadata_el);
    }

    if let Some(group) = contour_group("outer", outer) {
        doc = doc.add(group);
    }
    if let Some(group) = contour_group("inner", inner) {
        doc = doc.add(group);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
