//! Tests for pagination setting validation.

use rstest::rstest;

use crate::QueryloomConfig;
use crate::github::error::IntakeError;

#[rstest]
fn defaults_are_valid() {
    let config = QueryloomConfig::default();

    assert_eq!(config.page_size, 100);
    assert_eq!(config.max_pages_per_scope, None);
    assert!(config.validate().is_ok());
}

#[rstest]
#[case::zero_page_size(0, None)]
#[case::oversized_page(101, None)]
#[case::zero_page_bound(100, Some(0))]
fn rejects_unusable_pagination(#[case] page_size: u32, #[case] max_pages: Option<u32>) {
    let config = QueryloomConfig {
        page_size,
        max_pages_per_scope: max_pages,
        ..Default::default()
    };

    let result = config.validate();

    assert!(
        matches!(result, Err(IntakeError::Configuration { .. })),
        "expected configuration error, got {result:?}"
    );
}
