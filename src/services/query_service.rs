//! Review read path: deterministic, bounded result sets.
//!
//! Translates a validated [`PageRequest`] into a filtered count plus one
//! ordered slice from the store, then wraps both in pagination metadata.

use crate::{
    error::AppError,
    models::page::{PageRequest, PagedReviews},
    store::{ReviewFilter, ReviewStore},
};

/// Fetch one page of reviews for a product.
///
/// `total` counts every row matching the filters before pagination, so the
/// metadata is accurate even for a page past the end, which returns an empty
/// review list rather than an error.
pub async fn list(
    store: &dyn ReviewStore,
    product_id: &str,
    request: &PageRequest,
) -> Result<PagedReviews, AppError> {
    let filter = ReviewFilter {
        ratings: request.ratings.clone(),
        status: request.status,
        date_from: request.date_from,
        date_to: request.date_to,
    };

    let total = store.count_reviews(product_id, &filter).await?;
    let reviews = store
        .list_reviews(
            product_id,
            &filter,
            request.sort_by,
            request.sort_order,
            request.page_size,
            request.offset(),
        )
        .await?;

    let total_pages = total.div_ceil(u64::from(request.page_size)) as u32;

    Ok(PagedReviews {
        reviews,
        total,
        page: request.page,
        page_size: request.page_size,
        total_pages,
        has_next: request.page < total_pages,
        has_prev: request.page > 1,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::{
        page::{ListParams, SortBy, SortOrder},
        review::{Review, ReviewStatus},
    };
    use crate::store::memory::MemoryStore;

    async fn seeded_store(count: usize) -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..count {
            store
                .insert_review(Review {
                    id: Uuid::new_v4(),
                    product_id: "p1".into(),
                    user_id: Some(format!("u{i}")),
                    rating: (i % 5 + 1) as i16,
                    comment: None,
                    status: ReviewStatus::Approved,
                    created_at: Utc::now() - Duration::seconds(i as i64),
                })
                .await
                .unwrap();
        }
        store
    }

    fn request(page: u32, page_size: u32) -> PageRequest {
        PageRequest::from_params(
            ListParams {
                page: Some(page.to_string()),
                page_size: Some(page_size.to_string()),
                ..Default::default()
            },
            50,
            100,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn total_pages_is_ceiling_of_total_over_page_size() {
        let store = seeded_store(23).await;

        let result = list(&store, "p1", &request(1, 10)).await.unwrap();
        assert_eq!(result.total, 23);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.reviews.len(), 10);
        assert!(result.has_next);
        assert!(!result.has_prev);

        let last = list(&store, "p1", &request(3, 10)).await.unwrap();
        assert_eq!(last.reviews.len(), 3);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[tokio::test]
    async fn page_beyond_the_end_is_empty_with_accurate_metadata() {
        let store = seeded_store(5).await;

        let result = list(&store, "p1", &request(4, 10)).await.unwrap();
        assert!(result.reviews.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(result.total_pages, 1);
        assert!(!result.has_next);
        assert!(result.has_prev);
    }

    #[tokio::test]
    async fn empty_product_has_zero_pages() {
        let store = MemoryStore::new();

        let result = list(&store, "nope", &request(1, 10)).await.unwrap();
        assert!(result.reviews.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_next);
        assert!(!result.has_prev);
    }

    #[tokio::test]
    async fn repeated_calls_return_identical_pages() {
        let store = seeded_store(30).await;
        let mut page_request = request(2, 7);
        page_request.sort_by = SortBy::Rating;
        page_request.sort_order = SortOrder::Desc;

        let first = list(&store, "p1", &page_request).await.unwrap();
        let second = list(&store, "p1", &page_request).await.unwrap();

        let ids: Vec<_> = first.reviews.iter().map(|r| r.id).collect();
        let ids_again: Vec<_> = second.reviews.iter().map(|r| r.id).collect();
        assert_eq!(ids, ids_again);
        assert_eq!(first.total, second.total);
    }

    #[tokio::test]
    async fn pages_partition_the_result_set() {
        let store = seeded_store(20).await;

        let mut seen = Vec::new();
        for page in 1..=4 {
            let result = list(&store, "p1", &request(page, 5)).await.unwrap();
            seen.extend(result.reviews.iter().map(|r| r.id));
        }
        seen.sort();
        seen.dedup();
        // no review appears on two pages, none is skipped
        assert_eq!(seen.len(), 20);
    }

    #[tokio::test]
    async fn rating_filter_is_or_combined() {
        let store = seeded_store(25).await; // ratings 1..=5, five of each
        let mut page_request = request(1, 50);
        page_request.ratings = vec![4, 5];

        let result = list(&store, "p1", &page_request).await.unwrap();
        assert_eq!(result.total, 10);
        assert!(result.reviews.iter().all(|r| r.rating >= 4));
    }
}
