//! Integration test: decode an in-memory PNG, compose its border, and
//! export the traced contours to SVG.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{Rgba, RgbaImage};
use silhouette_core::{BorderConfig, BorderState, Color, Dimensions, decode, process_bytes};
use silhouette_export::{SvgMetadata, to_svg};

/// Opaque ring (outer radius 30, inner radius 12) plus a lone pixel in the
/// corner, on a transparent 80x80 canvas.
fn ring_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(80, 80, |x, y| {
        let r = (f64::from(x) - 40.0).hypot(f64::from(y) - 40.0);
        if (12.0..=30.0).contains(&r) || (x, y) == (2, 77) {
            Rgba([30, 90, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    decode::encode_png(&img).unwrap()
}

#[test]
fn ring_pipeline_to_svg() {
    let config = BorderConfig {
        border_size: 6.0,
        color: Color::BLACK,
    };
    let state = BorderState::new(config);
    let output = process_bytes(&ring_png(), &state).expect("pipeline should succeed");
    assert_eq!(output.dimensions(), (80, 80));

    // Ring plus the isolated pixel; the ring's hole is one inner contour.
    assert_eq!(state.outer_contours().len(), 2);
    assert_eq!(state.inner_contours().len(), 1);
    assert!(state.outer_contours().iter().any(silhouette_core::Contour::is_isolated));

    // Small image: the stroke is capped, and something got drawn.
    let changed = output
        .pixels()
        .zip(decode::decode_rgba(&ring_png()).unwrap().pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed > 0, "expected the border to change some pixels");

    let traced = state.traced().unwrap();
    eprintln!("{}", traced.diagnostics.report());

    let config_json = serde_json::to_string(&config).unwrap();
    let svg = to_svg(
        state.outer_contours(),
        state.inner_contours(),
        Dimensions {
            width: 80,
            height: 80,
        },
        &SvgMetadata {
            title: Some("ring"),
            description: None,
            config_json: Some(&config_json),
        },
    );

    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"id="outer""#));
    assert!(svg.contains(r#"id="inner""#));
    assert_eq!(svg.matches("<path").count(), 2);
    assert_eq!(svg.matches("<circle").count(), 1);
    assert!(svg.contains(r#"cx="2""#));
    assert!(svg.contains(r#"cy="77""#));
    assert!(svg.contains("</svg>"));
}

#[test]
fn second_call_reuses_trace() {
    let state = BorderState::default();
    let png = ring_png();
    let first = process_bytes(&png, &state).unwrap();

    // A blank image would trace to nothing, but the cached trace wins.
    let blank = decode::encode_png(&RgbaImage::new(80, 80)).unwrap();
    let second = process_bytes(&blank, &state).unwrap();
    assert_eq!(state.outer_contours().len(), 2);
    assert_ne!(first, second);
    assert!(second.pixels().any(|p| p.0[3] > 0));
}
