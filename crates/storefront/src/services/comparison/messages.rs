//! Notices shown for comparison list changes.

use crate::notify::Notice;

use super::MAX_COMPARISON_ITEMS;

pub(super) fn already_selected(title: &str) -> Notice {
    Notice::new(
        "Already in comparison",
        format!("{title} is already in your comparison list."),
    )
}

pub(super) fn limit_reached() -> Notice {
    Notice::new(
        "Comparison Limit Reached",
        format!(
            "You can compare up to {MAX_COMPARISON_ITEMS} properties. Remove one to add another."
        ),
    )
}

pub(super) fn added(title: &str) -> Notice {
    Notice::new(
        "Added to comparison",
        format!("{title} has been added to comparison."),
    )
}

pub(super) fn removed() -> Notice {
    Notice::new("Removed from comparison", "Property removed from comparison.")
}

pub(super) fn cleared() -> Notice {
    Notice::new(
        "Comparison cleared",
        "All properties have been removed from comparison.",
    )
}

pub(super) fn add_failed() -> Notice {
    Notice::new("Error", "Failed to add property to comparison.")
}

pub(super) fn remove_failed() -> Notice {
    Notice::new("Error", "Failed to remove property from comparison.")
}

pub(super) fn clear_failed() -> Notice {
    Notice::new("Error", "Failed to clear comparison.")
}
