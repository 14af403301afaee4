#![forbid(unsafe_code)]

//! Inline styles and attributes for the portal layers.
//!
//! Pure string building so the output can be checked without a browser.

use std::time::Duration;

use wayfind_tour::OverlayFrame;
use wayfind_tour::overlay::{ConnectorLayer, DotLayer, TooltipLayer};

/// Class on the portal root.
pub const PORTAL_CLASS: &str = "wayfind-tour-portal";
/// Base class on the tooltip.
pub const TOOLTIP_CLASS: &str = "wayfind-tour-tooltip";
/// Class on the dot.
pub const DOT_CLASS: &str = "wayfind-tour-dot";

/// Style for the hidden portal root.
pub const HIDDEN: &str = "display:none";

/// Tooltip `class` attribute: base class, arrow modifier, then host class.
#[must_use]
pub fn tooltip_class(layer: &TooltipLayer) -> String {
    let mut class = format!(
        "{TOOLTIP_CLASS} {TOOLTIP_CLASS}--arrow-{}",
        layer.arrow_placement.as_str()
    );
    if !layer.class_name.is_empty() {
        class.push(' ');
        class.push_str(&layer.class_name);
    }
    class
}

#[must_use]
pub fn tooltip_style(layer: &TooltipLayer, transition: Duration) -> String {
    let ms = transition.as_millis();
    format!(
        "position:fixed;top:{}px;left:{}px;width:{}px;max-height:{}px;overflow-y:auto;\
         z-index:{};opacity:{};transform:scale({});transform-origin:top center;\
         transition:opacity {ms}ms ease-out,transform {ms}ms ease-out",
        layer.top,
        layer.left,
        layer.width,
        layer.max_height,
        layer.z_index,
        layer.opacity,
        layer.scale,
    )
}

/// Style for the full-viewport SVG holding the connector.
#[must_use]
pub fn connector_svg_style(layer: &ConnectorLayer) -> String {
    format!(
        "position:fixed;top:0;left:0;width:100vw;height:100vh;pointer-events:none;z-index:{}",
        layer.z_index
    )
}

/// Attributes for the connector `<path>`, as `(name, value)` pairs.
#[must_use]
pub fn connector_path_attrs(layer: &ConnectorLayer, transition: Duration) -> Vec<(&'static str, String)> {
    let ms = transition.as_millis();
    vec![
        ("d", layer.path.to_string()),
        ("fill", "none".to_string()),
        ("stroke", "currentColor".to_string()),
        ("stroke-width", "1".to_string()),
        ("stroke-dasharray", layer.dash_array.to_string()),
        ("stroke-dashoffset", layer.dash_offset.to_string()),
        ("opacity", layer.opacity.to_string()),
        (
            "style",
            format!("transition:stroke-dashoffset {ms}ms ease-out,opacity {ms}ms ease-out"),
        ),
    ]
}

#[must_use]
pub fn dot_style(layer: &DotLayer, transition: Duration) -> String {
    let ms = transition.as_millis();
    format!(
        "position:fixed;top:{}px;left:{}px;width:{size}px;height:{size}px;border-radius:50%;\
         pointer-events:none;z-index:{};opacity:{};transform:scale({});\
         transition:opacity {ms}ms ease-out,transform {ms}ms ease-out",
        layer.top,
        layer.left,
        layer.z_index,
        layer.opacity,
        layer.scale,
        size = layer.size,
    )
}

/// Everything the portal writes for one frame, precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintPlan {
    pub tooltip_class: String,
    pub tooltip_style: String,
    pub svg_style: String,
    pub path_attrs: Vec<(&'static str, String)>,
    pub dot_style: String,
}

impl PaintPlan {
    #[must_use]
    pub fn for_frame(frame: &OverlayFrame) -> Self {
        Self {
            tooltip_class: tooltip_class(&frame.tooltip),
            tooltip_style: tooltip_style(&frame.tooltip, frame.transition),
            svg_style: connector_svg_style(&frame.connector),
            path_attrs: connector_path_attrs(&frame.connector, frame.transition),
            dot_style: dot_style(&frame.dot, frame.transition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wayfind_core::geometry::{Rect, Size};
    use wayfind_tour::{
        ActionLabels, ComputedPosition, ContentPhase, Placement, StepContent, TourConfig,
        TourStep, TourTiming,
    };

    fn frame() -> OverlayFrame {
        let config = TourConfig::navigation();
        let position = ComputedPosition::compute(
            &Rect::from_edges(100.0, 100.0, 300.0, 140.0),
            Placement::BottomCenter,
            &config,
            Size::new(1280.0, 800.0),
        );
        let step = TourStep::new("step-1", "Title", "Body");
        let content = StepContent::new(&step, 0, 3, &ActionLabels::default(), ContentPhase::Steady);
        OverlayFrame::new(&position, content, &config, &TourTiming::default(), "dark", 0)
    }

    #[test]
    fn tooltip_class_and_style() {
        let f = frame();
        assert_eq!(
            tooltip_class(&f.tooltip),
            "wayfind-tour-tooltip wayfind-tour-tooltip--arrow-top dark"
        );
        let css = tooltip_style(&f.tooltip, f.transition);
        assert!(css.starts_with("position:fixed;top:180px;left:40px;width:320px;max-height:400px;"));
        assert!(css.contains("z-index:9999;opacity:1;transform:scale(1);"));
        assert!(css.ends_with("transition:opacity 250ms ease-out,transform 250ms ease-out"));
    }

    #[test]
    fn hidden_frame_styles() {
        let f = frame().hidden();
        let plan = PaintPlan::for_frame(&f);
        assert!(plan.tooltip_style.contains("opacity:0;transform:scale(0.95)"));
        assert!(plan.dot_style.contains("opacity:0;transform:scale(0)"));
        assert!(plan.path_attrs.contains(&("stroke-dashoffset", "1000".to_string())));
        assert!(plan.path_attrs.contains(&("opacity", "0".to_string())));
    }

    #[test]
    fn connector_and_dot() {
        let plan = PaintPlan::for_frame(&frame());
        assert_eq!(plan.path_attrs[0], ("d", "M 200 140 L 200 180".to_string()));
        assert!(plan.svg_style.ends_with("z-index:9998"));
        assert!(plan.dot_style.starts_with("position:fixed;top:136px;left:196px;width:8px;height:8px;"));
    }
}
