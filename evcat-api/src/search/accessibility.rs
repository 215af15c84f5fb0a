//! Accessibility join filter
//!
//! Joins events to the organizer snapshot by exact name and keeps the events
//! whose organizer satisfies every requested accessibility tag.

use serde::{Deserialize, Serialize};

use crate::models::{Event, Organizer, OrganizerDirectory};

/// Request-level accessibility requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessibilityTag {
    /// Parking available
    Kids,
    /// Disability-adapted entrance
    Disabled,
    /// Pets allowed
    Pets,
}

impl AccessibilityTag {
    pub fn is_satisfied_by(self, organizer: &Organizer) -> bool {
        match self {
            AccessibilityTag::Kids => organizer.parking,
            AccessibilityTag::Disabled => organizer.disabled_access,
            AccessibilityTag::Pets => organizer.pets_allowed,
        }
    }
}

/// Keep events whose organizer resolves and satisfies every tag (lazy)
///
/// An event with an unresolved organizer is always dropped, even for an
/// empty tag list. Callers skip this stage entirely when no tags were
/// requested.
pub fn filter_by_accessibility<'a>(
    events: impl IntoIterator<Item = Event> + 'a,
    tags: &'a [AccessibilityTag],
    directory: &'a OrganizerDirectory,
) -> impl Iterator<Item = Event> + 'a {
    events.into_iter().filter(move |event| {
        directory
            .for_event(event)
            .is_some_and(|organizer| tags.iter().all(|tag| tag.is_satisfied_by(organizer)))
    })
}
