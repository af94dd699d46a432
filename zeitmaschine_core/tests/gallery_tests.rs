//! Integration tests for accumulated gallery paging

use std::sync::Arc;
use zeitmaschine_core::{Gallery, ImageService};
use zeitmaschine_test_utils::{MockGallery, SearchResponseBuilder};

#[tokio::test]
async fn test_load_more_appends_pages() {
    let gallery = Arc::new(
        MockGallery::new()
            .with_search_response(SearchResponseBuilder::new().numbered_hits(0, 3).build())
            .with_search_response(SearchResponseBuilder::new().numbered_hits(3, 2).build()),
    );
    let service = Arc::new(ImageService::new(gallery.clone()).with_page_size(3));
    let mut state = Gallery::new(service);

    assert_eq!(state.load_more().await.unwrap(), 3);
    assert!(state.has_more());
    assert_eq!(state.load_more().await.unwrap(), 2);
    assert!(!state.has_more());

    let names: Vec<_> = state.images().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["image-0.jpg", "image-1.jpg", "image-2.jpg", "image-3.jpg", "image-4.jpg"]
    );

    let offsets: Vec<_> = gallery.queries().iter().map(|q| q.from).collect();
    assert_eq!(offsets, vec![0, 3]);
}

#[tokio::test]
async fn test_failed_page_leaves_state_unchanged() {
    let gallery = Arc::new(
        MockGallery::new()
            .with_search_response(SearchResponseBuilder::new().numbered_hits(0, 2).build())
            .with_search_failure(500),
    );
    let service = Arc::new(ImageService::new(gallery.clone()).with_page_size(2));
    let mut state = Gallery::new(service);

    state.load_more().await.unwrap();
    assert!(state.load_more().await.is_err());

    assert_eq!(state.len(), 2);
    assert!(state.has_more());
}

#[tokio::test]
async fn test_load_all_stops_on_short_page() {
    let gallery = Arc::new(
        MockGallery::new()
            .with_search_response(SearchResponseBuilder::new().numbered_hits(0, 2).build())
            .with_search_response(SearchResponseBuilder::new().numbered_hits(2, 2).build()),
    );
    let service = Arc::new(ImageService::new(gallery.clone()).with_page_size(2));
    let mut state = Gallery::new(service);

    // Third query hits the exhausted queue and gets an empty page
    assert_eq!(state.load_all().await.unwrap(), 4);
    assert_eq!(gallery.search_count(), 3);
    assert!(!state.has_more());
    assert_eq!(state.into_images().len(), 4);
}

#[tokio::test]
async fn test_empty_gallery() {
    let service = Arc::new(ImageService::new(Arc::new(MockGallery::new())));
    let mut state = Gallery::new(service);

    assert_eq!(state.load_more().await.unwrap(), 0);
    assert!(state.is_empty());
    assert!(!state.has_more());
}
