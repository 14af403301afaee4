//! Property-based invariant tests for the placement engine.
//!
//! 1. Fallback correctness: the result is the first fitting candidate of the
//!    preference's fallback list, or the raw preferred coordinates if none fit.
//! 2. Idempotence: the same inputs give the same position.
//! 3. Dot anchoring: the dot sits at `(bottom - 4, center_x - 4)` whatever the
//!    preference.
//! 4. A fitting result always lies within the padded viewport.
//! 5. Unknown preference strings behave exactly like bottom-center.

use proptest::prelude::*;
use wayfind_core::geometry::{Coords, Rect, Size};
use wayfind_tour::{
    ComputedPosition, ESTIMATED_TOOLTIP_HEIGHT, Placement, TourConfig, compute_best_position,
    coordinates_for, fits_viewport,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn placement_strategy() -> impl Strategy<Value = Placement> {
    proptest::sample::select(Placement::ALL.to_vec())
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-200.0f64..2000.0, -200.0f64..1200.0, 0.0f64..600.0, 0.0f64..300.0)
        .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
}

fn viewport_strategy() -> impl Strategy<Value = Size> {
    (100.0f64..2560.0, 100.0f64..1440.0).prop_map(|(w, h)| Size::new(w, h))
}

fn config_strategy() -> impl Strategy<Value = TourConfig> {
    (
        prop_oneof![Just(TourConfig::navigation()), Just(TourConfig::base())],
        100.0f64..480.0,
        0.0f64..32.0,
    )
        .prop_map(|(base, width, padding)| base.tooltip_width(width).viewport_padding(padding))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Fallback correctness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn picks_first_fitting_candidate_or_raw_preference(
        target in rect_strategy(),
        preference in placement_strategy(),
        config in config_strategy(),
        viewport in viewport_strategy(),
    ) {
        let result = compute_best_position(&target, preference, &config, viewport);
        let fitting = preference
            .fallbacks()
            .into_iter()
            .find(|p| fits_viewport(coordinates_for(*p, &target, &config), &config, viewport));

        match fitting {
            Some(expected) => {
                prop_assert_eq!(result.placement, expected);
                prop_assert_eq!(result.coords(), coordinates_for(expected, &target, &config));
            }
            None => {
                prop_assert_eq!(result.placement, preference);
                prop_assert_eq!(result.coords(), coordinates_for(preference, &target, &config));
            }
        }
        prop_assert_eq!(result.arrow_offset, 0.0);
    }

    #[test]
    fn fitting_result_stays_inside_padded_viewport(
        target in rect_strategy(),
        preference in placement_strategy(),
        config in config_strategy(),
        viewport in viewport_strategy(),
    ) {
        let result = compute_best_position(&target, preference, &config, viewport);
        if fits_viewport(result.coords(), &config, viewport) {
            let p = config.viewport_padding;
            prop_assert!(result.left >= p);
            prop_assert!(result.top >= p);
            prop_assert!(result.left + config.tooltip_width <= viewport.width - p);
            prop_assert!(result.top + ESTIMATED_TOOLTIP_HEIGHT <= viewport.height - p);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unchanged_inputs_give_identical_position(
        target in rect_strategy(),
        preference in placement_strategy(),
        config in config_strategy(),
        viewport in viewport_strategy(),
    ) {
        let a = ComputedPosition::compute(&target, preference, &config, viewport);
        let b = ComputedPosition::compute(&target, preference, &config, viewport);
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Dot anchoring
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dot_is_anchored_to_target_bottom_center(
        target in rect_strategy(),
        preference in placement_strategy(),
        config in config_strategy(),
        viewport in viewport_strategy(),
    ) {
        let position = ComputedPosition::compute(&target, preference, &config, viewport);
        let expected = Coords::new(
            target.bottom() - 4.0,
            target.left + target.width / 2.0 - 4.0,
        );
        prop_assert_eq!(position.dot, expected);

        let path = position.connector();
        prop_assert_eq!(path.x, expected.left + 4.0);
        prop_assert_eq!(path.from_y, expected.top + 4.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Normalization
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_preferences_act_as_bottom_center(
        raw in "[a-z-]{0,16}",
        target in rect_strategy(),
        viewport in viewport_strategy(),
    ) {
        prop_assume!(raw.parse::<Placement>().is_err());
        let config = TourConfig::navigation();
        let normalized = Placement::normalize(Some(raw.as_str()));
        prop_assert_eq!(normalized, Placement::BottomCenter);
        prop_assert_eq!(
            compute_best_position(&target, normalized, &config, viewport),
            compute_best_position(&target, Placement::BottomCenter, &config, viewport)
        );
    }
}
