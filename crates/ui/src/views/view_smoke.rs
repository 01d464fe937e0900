use storage::LAST_LESSON_LANG_KEY;

use super::test_harness::{TEST_BASE_URL, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_shows_loading_first() {
    let mut harness = setup_view_harness(None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Loading lesson..."), "missing loading text in {html}");
    let footer = format!("Connected via {TEST_BASE_URL}");
    assert!(html.contains(&footer), "missing {footer} in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_renders_lesson_and_quiz() {
    let mut harness = setup_view_harness(None);
    harness.rebuild();
    let html = harness.drive_until("Welcome to the Platform").await;

    assert!(html.contains("English • Welcome to the Platform"), "missing header in {html}");
    assert!(html.contains("No attempts yet for ENGLISH"), "missing progress in {html}");
    assert!(html.contains("1. 1+1?"), "missing question in {html}");
    assert!(html.contains("Submit Quiz"), "missing submit in {html}");

    harness.drive_async().await;
    let stored = harness
        .storage
        .values
        .get(LAST_LESSON_LANG_KEY)
        .await
        .expect("read last language");
    assert_eq!(stored.as_deref(), Some("english"));
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_shows_retry_on_failure() {
    let mut harness = setup_view_harness(Some("tamil"));
    harness.rebuild();
    let html = harness.drive_until("Retry").await;

    assert!(
        html.contains("Could not load lesson. Check backend &amp; network."),
        "missing error text in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}
