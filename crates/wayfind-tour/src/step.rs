#![forbid(unsafe_code)]

//! Tour step definitions.

use serde::{Deserialize, Serialize};

use crate::placement::Placement;

/// One stop on a tour.
///
/// `title` and `description` hold either display text or i18n keys; built-in
/// tours store keys and translate them through the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourStep {
    pub id: String,
    pub title: String,
    pub description: String,
    /// CSS selector of the element to anchor to. `None` means the step
    /// cannot be positioned.
    #[serde(default, alias = "targetElement")]
    pub target_selector: Option<String>,
    /// Raw placement name as authored; see [`TourStep::placement`].
    #[serde(default, alias = "position")]
    pub placement: Option<String>,
    /// Illustration URL, or a base path expanded per theme.
    #[serde(default)]
    pub asset: Option<String>,
}

impl TourStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            target_selector: None,
            placement: None,
            asset: None,
        }
    }

    #[must_use]
    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: impl Into<String>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    #[must_use]
    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Normalized placement preference.
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement::normalize(self.placement.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_placement_normalization() {
        let step = TourStep::new("s1", "Search", "Find anything")
            .target("[data-tour=\"search\"]")
            .with_placement("diagonal");
        assert_eq!(step.placement(), Placement::BottomCenter);
        assert_eq!(step.target_selector.as_deref(), Some("[data-tour=\"search\"]"));

        let step = step.with_placement("right-top");
        assert_eq!(step.placement(), Placement::RightTop);
    }

    #[test]
    fn deserializes_host_shapes() {
        let step: TourStep = serde_json::from_str(
            r##"{"id":"a","title":"T","description":"D","targetElement":"#x","position":"top-left"}"##,
        )
        .unwrap();
        assert_eq!(step.target_selector.as_deref(), Some("#x"));
        assert_eq!(step.placement(), Placement::TopLeft);

        let step: TourStep =
            serde_json::from_str(r#"{"id":"b","title":"T","description":"D","targetSelector":".y"}"#)
                .unwrap();
        assert_eq!(step.target_selector.as_deref(), Some(".y"));
        assert!(step.asset.is_none());
    }
}
