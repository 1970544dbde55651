//! Users page against a mocked partner portal backend.

use kittest::Queryable;
use portal_ui::layout::Route;

use crate::common::TestCtx;

mod common;

#[tokio::test]
async fn test_users_first_page_is_fetched_on_start() {
    let mut ctx = TestCtx::new_app().await;
    ctx.settle().await;

    let harness = ctx.harness();
    assert_eq!(harness.state().users().users().len(), 10);
    assert!(harness.query_by_label_contains("Member 01").is_some());
    assert!(harness.query_by_label("Showing 1 to 10 of 25").is_some());
}

#[tokio::test]
async fn test_next_fetches_the_second_page() {
    let mut ctx = TestCtx::new_app().await;
    ctx.settle().await;

    ctx.harness_mut()
        .query_by_label("Next →")
        .unwrap()
        .click();
    ctx.settle().await;

    let harness = ctx.harness();
    assert_eq!(harness.state().users().page(), 2);
    assert!(harness.query_by_label_contains("Member 11").is_some());
    assert!(harness.query_by_label("Showing 11 to 20 of 25").is_some());

    let requests = ctx.mock_server().received_requests().await.unwrap_or_default();
    let pages: Vec<String> = requests
        .iter()
        .filter(|request| request.url.path().ends_with("/users"))
        .filter_map(|request| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value.into_owned())
        })
        .collect();
    assert_eq!(pages, vec!["1".to_owned(), "2".to_owned()]);
}

#[tokio::test]
async fn test_last_page_disables_next() {
    let mut ctx = TestCtx::new_app().await;
    ctx.settle().await;

    ctx.harness_mut().query_by_label("3").unwrap().click();
    ctx.settle().await;

    let harness = ctx.harness();
    assert_eq!(harness.state().users().page(), 3);
    assert!(harness.query_by_label("Showing 21 to 25 of 25").is_some());
}

#[tokio::test]
async fn test_navigate_to_assessments() {
    let mut ctx = TestCtx::new_app().await;
    ctx.settle().await;

    ctx.harness_mut()
        .query_by_label("Assessments")
        .unwrap()
        .click();
    ctx.settle().await;

    let harness = ctx.harness();
    assert_eq!(harness.state().route(), Route::Assessments);
    assert_eq!(harness.state().assessments().visible().len(), 1);
    assert!(harness.query_by_label("Hearing Check").is_some());
    assert!(harness.query_by_label("COMPLETED").is_some());
}

#[tokio::test]
async fn test_sign_out_shows_signed_out_screen() {
    let mut ctx = TestCtx::new_app().await;
    ctx.settle().await;

    ctx.harness_mut().query_by_label("Sign out").unwrap().click();
    ctx.settle().await;

    let harness = ctx.harness();
    assert!(!harness.state().session().is_authenticated());
    assert_eq!(harness.state().modal().listener_count(), 0);
    assert!(harness.query_by_label("Signed out").is_some());
}
