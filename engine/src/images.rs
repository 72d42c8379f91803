//! Per-item image resolution.

use futures_util::future::join_all;
use rideready_client::{ApiClient, ImageRequest};
use rideready_types::{PLACEHOLDER_IMAGE_PATH, RecommendationItem};

/// Resolve one image per item concurrently.
///
/// Each item gets an absolute `image_url`: an existing URL is kept, otherwise
/// the first hit from `/api/images`, otherwise the static placeholder. Failures
/// never propagate.
pub async fn resolve_images(client: &ApiClient, items: Vec<RecommendationItem>) -> Vec<RecommendationItem> {
    join_all(items.into_iter().map(|item| resolve_one(client, item))).await
}

async fn resolve_one(client: &ApiClient, mut item: RecommendationItem) -> RecommendationItem {
    if let Some(existing) = item.image_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        item.image_url = Some(client.resolve_url(existing));
        return item;
    }

    let found = match client.images(&ImageRequest::for_item(&item)).await {
        Ok(response) => response.first_url().map(ToString::to_string),
        Err(e) => {
            tracing::debug!(item = item.identity(), "Image lookup failed, using placeholder: {e}");
            None
        }
    };

    let url = found.unwrap_or_else(|| PLACEHOLDER_IMAGE_PATH.to_string());
    item.image_url = Some(client.resolve_url(&url));
    item
}
