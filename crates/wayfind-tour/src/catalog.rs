#![forbid(unsafe_code)]

//! Built-in product tours and their English copy.

use wayfind_i18n::{I18nError, LocaleStrings, StringCatalog};

use crate::completion::StorageTarget;
use crate::overlay::ActionLabels;
use crate::placement::Placement;
use crate::step::TourStep;

const EN_STRINGS: &str = include_str!("../locales/en.json");

/// Locale of the embedded strings.
pub const DEFAULT_LOCALE: &str = "en";

const ORDINALS: [&str; 6] = ["zero", "one", "two", "three", "four", "five"];

/// Color scheme used to pick illustration variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Map a host theme name; anything but `"dark"` is light.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// `"{base}-{theme}.webp"`.
    #[must_use]
    pub fn asset_url(self, base: &str) -> String {
        format!("{base}-{}.webp", self.as_str())
    }
}

/// Tours shipped with the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTour {
    Navigation,
    WorkItems,
    Cycle,
    Module,
    Page,
    Intake,
}

impl BuiltinTour {
    pub const ALL: [BuiltinTour; 6] = [
        Self::Navigation,
        Self::WorkItems,
        Self::Cycle,
        Self::Module,
        Self::Page,
        Self::Intake,
    ];

    /// Key used in i18n paths and workspace properties.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::WorkItems => "workitems",
            Self::Cycle => "cycle",
            Self::Module => "module",
            Self::Page => "page",
            Self::Intake => "intake",
        }
    }

    #[must_use]
    pub const fn step_count(self) -> usize {
        match self {
            Self::Navigation => 3,
            Self::WorkItems | Self::Cycle | Self::Module => 5,
            Self::Page => 6,
            Self::Intake => 4,
        }
    }

    /// `data-tour` prefix and asset folder, if the tour has illustrations.
    const fn anchors(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Navigation => ("navigation-step", None),
            Self::WorkItems => ("work-item-step", Some("work-item")),
            Self::Cycle => ("cycle-tour-step", Some("cycle")),
            Self::Module => ("module-tour-step", Some("module")),
            Self::Page => ("page-tour-step", Some("page")),
            Self::Intake => ("intake-tour-step", Some("intake")),
        }
    }

    /// Step definitions; titles and descriptions are i18n keys.
    #[must_use]
    pub fn steps(self) -> Vec<TourStep> {
        let (anchor, assets) = self.anchors();
        (0..self.step_count())
            .map(|i| {
                // Navigation ids and anchors are one-based.
                let n = if self == Self::Navigation { i + 1 } else { i };
                let prefix = format!("product_tour.{}.step_{}", self.key(), ORDINALS[i]);
                let mut step = TourStep::new(
                    format!("step-{n}"),
                    format!("{prefix}.title"),
                    format!("{prefix}.description"),
                )
                .with_placement(Placement::BottomRight.as_str());
                // The opening card of feature tours is not anchored.
                let anchored = i > 0 || matches!(self, Self::Navigation | Self::Intake);
                if anchored {
                    step = step.target(format!("[data-tour=\"{anchor}-{n}\"]"));
                }
                if let Some(folder) = assets {
                    step = step.asset(format!("/tour/{folder}/step-{n}"));
                }
                step
            })
            .collect()
    }

    /// Where completion is recorded. Feature tours need a workspace.
    #[must_use]
    pub fn storage_target(self, workspace_slug: &str) -> StorageTarget {
        match self {
            Self::Navigation => StorageTarget::UserProfile,
            _ => StorageTarget::workspace(workspace_slug, self.key()),
        }
    }
}

/// Catalog preloaded with the embedded English strings.
pub fn english_catalog() -> Result<StringCatalog, I18nError> {
    let mut catalog = StringCatalog::new();
    catalog.add_locale(DEFAULT_LOCALE, LocaleStrings::from_json_str(EN_STRINGS)?)?;
    catalog.set_fallback_chain(vec![DEFAULT_LOCALE.to_string()]);
    Ok(catalog)
}

/// Button captions for `locale`.
#[must_use]
pub fn action_labels(catalog: &StringCatalog, locale: &str) -> ActionLabels {
    let defaults = ActionLabels::default();
    let label = |key: &str, fallback: String| {
        catalog
            .get(locale, &format!("product_tour.actions.{key}"))
            .map_or(fallback, str::to_string)
    };
    ActionLabels {
        close: label("close", defaults.close),
        next: label("next", defaults.next),
        back: label("back", defaults.back),
        done: label("done", defaults.done),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn step_counts() {
        let counts: Vec<_> = BuiltinTour::ALL.iter().map(|t| t.steps().len()).collect();
        assert_eq!(counts, vec![3, 5, 5, 5, 6, 4]);
    }

    #[test]
    fn navigation_steps_are_one_based_and_anchored() {
        let steps = BuiltinTour::Navigation.steps();
        assert_eq!(steps[0].id, "step-1");
        assert_eq!(
            steps[0].target_selector.as_deref(),
            Some("[data-tour=\"navigation-step-1\"]")
        );
        assert_eq!(steps[2].title, "product_tour.navigation.step_two.title");
        assert!(steps.iter().all(|s| s.asset.is_none()));
        assert!(steps.iter().all(|s| s.placement() == Placement::BottomRight));
    }

    #[test]
    fn feature_tours_open_with_unanchored_card() {
        for tour in [BuiltinTour::WorkItems, BuiltinTour::Cycle, BuiltinTour::Module, BuiltinTour::Page] {
            let steps = tour.steps();
            assert!(steps[0].target_selector.is_none(), "{tour:?}");
            assert!(steps[1].target_selector.is_some(), "{tour:?}");
        }
        let intake = BuiltinTour::Intake.steps();
        assert_eq!(
            intake[0].target_selector.as_deref(),
            Some("[data-tour=\"intake-tour-step-0\"]")
        );
    }

    #[test]
    fn assets_and_selectors_follow_folders() {
        let steps = BuiltinTour::WorkItems.steps();
        assert_eq!(steps[3].asset.as_deref(), Some("/tour/work-item/step-3"));
        assert_eq!(
            steps[3].target_selector.as_deref(),
            Some("[data-tour=\"work-item-step-3\"]")
        );
        let page = BuiltinTour::Page.steps();
        assert_eq!(page[5].title, "product_tour.page.step_five.title");
    }

    #[test]
    fn every_builtin_key_has_english_copy() {
        let catalog = english_catalog().unwrap();
        for tour in BuiltinTour::ALL {
            let steps = tour.steps();
            let keys: Vec<&str> = steps
                .iter()
                .flat_map(|s| [s.title.as_str(), s.description.as_str()])
                .collect();
            assert!(catalog.missing_keys("en", &keys).is_empty(), "{tour:?}");
        }
    }

    #[test]
    fn labels_from_catalog() {
        let catalog = english_catalog().unwrap();
        assert_eq!(action_labels(&catalog, "fr"), ActionLabels::default());
    }

    #[test]
    fn themes() {
        assert_eq!(Theme::from_name("Dark"), Theme::Dark);
        assert_eq!(Theme::from_name("system"), Theme::Light);
        assert_eq!(Theme::Dark.asset_url("/tour/cycle/step-1"), "/tour/cycle/step-1-dark.webp");
    }

    #[test]
    fn storage_targets() {
        assert_eq!(BuiltinTour::Navigation.storage_target("acme"), StorageTarget::UserProfile);
        assert_eq!(
            BuiltinTour::Cycle.storage_target("acme"),
            StorageTarget::workspace("acme", "cycle")
        );
    }
}
