use serde::{Deserialize, Serialize};

use crate::models::{Clip, PERSON_CLASS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DayNight {
    #[default]
    Any,
    Day,
    Night,
}

/// User-selected predicates. Every field is an independent toggle; the
/// default value of each is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    pub exclude_person: bool,
    pub hide_empty: bool,
    pub object_class: Option<String>,
    pub day_night: DayNight,
    pub search: Option<String>,
}

impl FilterSet {
    pub fn is_noop(&self) -> bool {
        !self.exclude_person
            && !self.hide_empty
            && self.object_class.as_deref().map_or(true, str::is_empty)
            && self.day_night == DayNight::Any
            && self.search.as_deref().map_or(true, |text| text.trim().is_empty())
    }

    /// Predicates are AND-ed in a fixed order: person, empty, class,
    /// day/night, search.
    pub fn matches(&self, clip: &Clip) -> bool {
        if self.exclude_person && clip.has_object(PERSON_CLASS) {
            return false;
        }

        if self.hide_empty && !clip.has_objects() {
            return false;
        }

        if let Some(class) = self.object_class.as_deref().filter(|class| !class.is_empty()) {
            if !clip.has_object(class) {
                return false;
            }
        }

        match self.day_night {
            DayNight::Any => {}
            DayNight::Day if clip.is_night() => return false,
            DayNight::Night if !clip.is_night() => return false,
            _ => {}
        }

        match self.search.as_deref().map(str::trim).filter(|text| !text.is_empty()) {
            Some(needle) => clip.name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Order-preserving subset of `clips` that satisfies every active predicate.
pub fn apply_filters(clips: &[Clip], filters: &FilterSet) -> Vec<Clip> {
    clips.iter().filter(|clip| filters.matches(clip)).cloned().collect()
}
