//! Comparison list commands.
//!
//! Every command loads the persisted list first so local checks (duplicate,
//! capacity) see the same state the remote API holds. Notices are reported
//! by the store's notifier; these functions only log results.

use stayhub_core::PropertyId;
use stayhub_storefront::error::AppError;
use stayhub_storefront::state::Services;
use stayhub_storefront::{AddOutcome, MutationOutcome, RefreshOutcome};
use tracing::info;

/// Load the comparison list, failing if the API cannot be reached.
async fn load(services: &Services) -> Result<(), AppError> {
    match services.comparison().refresh().await {
        RefreshOutcome::Failed(e) => Err(e.into()),
        RefreshOutcome::Applied | RefreshOutcome::Stale => Ok(()),
    }
}

/// Print the comparison list.
///
/// # Errors
///
/// Returns an error if the list cannot be fetched.
pub async fn list(services: &Services) -> Result<(), AppError> {
    load(services).await?;

    let store = services.comparison();
    let properties = store.properties();
    info!(identity = %store.identity(), count = properties.len(), "Comparison list");

    for (position, property) in properties.iter().enumerate() {
        info!(
            position = position + 1,
            id = %property.id,
            title = %property.title,
            price = %property.price.display(),
            city = property.city.as_deref().unwrap_or("-"),
            "Property"
        );
    }

    Ok(())
}

/// Add a property to the comparison list.
///
/// # Errors
///
/// Returns an error if the list or the property cannot be fetched, or the
/// add request fails. Duplicate and capacity rejections are not errors.
pub async fn add(services: &Services, property_id: PropertyId) -> Result<(), AppError> {
    load(services).await?;

    let property = services.api().get_property(property_id).await?;

    match services.comparison().add(&property).await {
        AddOutcome::Added => {
            info!(count = services.comparison().count(), "Comparison updated");
            Ok(())
        }
        AddOutcome::AlreadySelected | AddOutcome::LimitReached => Ok(()),
        AddOutcome::Failed(e) => Err(e.into()),
    }
}

/// Remove a property from the comparison list.
///
/// # Errors
///
/// Returns an error if the remove request fails.
pub async fn remove(services: &Services, property_id: PropertyId) -> Result<(), AppError> {
    load(services).await?;

    match services.comparison().remove(property_id).await {
        MutationOutcome::Applied => {
            info!(count = services.comparison().count(), "Comparison updated");
            Ok(())
        }
        MutationOutcome::Failed(e) => Err(e.into()),
    }
}

/// Remove every property from the comparison list.
///
/// # Errors
///
/// Returns an error if the clear request fails.
pub async fn clear(services: &Services) -> Result<(), AppError> {
    match services.comparison().clear().await {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Failed(e) => Err(e.into()),
    }
}

/// Print what the floating comparison bar would show.
///
/// # Errors
///
/// Returns an error if the list cannot be fetched.
pub async fn summary(services: &Services) -> Result<(), AppError> {
    load(services).await?;

    let summary = services.comparison().summary();
    if summary.is_empty() {
        info!("No properties selected for comparison");
        return Ok(());
    }

    for thumbnail in &summary.thumbnails {
        info!(
            id = %thumbnail.property_id,
            title = %thumbnail.title,
            image = thumbnail.image_url.as_deref().unwrap_or("-"),
            "Thumbnail"
        );
    }

    info!(
        count = summary.count,
        overflow = summary.overflow,
        cheapest = ?summary.cheapest.map(|id| id.to_string()),
        best_rated = ?summary.best_rated.map(|id| id.to_string()),
        average_price = ?summary.average_price.map(|p| p.to_string()),
        "Comparison summary"
    );

    Ok(())
}
