// Unit tests for condition module

use super::*;
use crate::mock::{MockDriver, MockElement, MockPage};
use crate::types::By;
use std::time::Duration;

fn page() -> MockPage {
    MockPage::new(
        "https://en.wikipedia.org/w/index.php?search=panda",
        "Search - Wikipedia",
    )
    .with_element(
        MockElement::new("search-1", Query::new(By::Name, "search"))
            .with_tag("input")
            .with_attr("value", "red panda")
            .into_shared(),
    )
    .with_element(
        MockElement::new("spinner-1", Query::css(".spinner"))
            .hidden()
            .into_shared(),
    )
    .with_element(
        MockElement::new("go-1", Query::css("button.go"))
            .with_text("Search")
            .disabled()
            .into_shared(),
    )
}

#[tokio::test]
async fn test_url_and_title_conditions() {
    let driver = MockDriver::with_page(page());

    assert!(
        Condition::UrlIs("https://en.wikipedia.org/w/index.php?search=panda".into())
            .check(&driver)
            .await
            .unwrap()
    );
    assert!(!Condition::UrlIs("https://en.wikipedia.org/".into()).check(&driver).await.unwrap());
    assert!(Condition::UrlContains("search=".into()).check(&driver).await.unwrap());
    assert!(Condition::TitleIs("Search - Wikipedia".into()).check(&driver).await.unwrap());
    assert!(!Condition::TitleIs("Search".into()).check(&driver).await.unwrap());
    assert!(Condition::TitleContains("Wikipedia".into()).check(&driver).await.unwrap());
}

#[tokio::test]
async fn test_element_conditions() {
    let driver = MockDriver::with_page(page());
    let search = Query::new(By::Name, "search");
    let spinner = Query::css(".spinner");
    let go = Query::css("button.go");
    let missing = Query::new(By::Id, "missing");

    assert!(Condition::Present(search.clone()).check(&driver).await.unwrap());
    assert!(Condition::Present(spinner.clone()).check(&driver).await.unwrap());
    assert!(!Condition::Present(missing.clone()).check(&driver).await.unwrap());

    assert!(Condition::Visible(search.clone()).check(&driver).await.unwrap());
    assert!(!Condition::Visible(spinner.clone()).check(&driver).await.unwrap());
    assert!(!Condition::Visible(missing.clone()).check(&driver).await.unwrap());

    assert!(Condition::Invisible(spinner).check(&driver).await.unwrap());
    assert!(Condition::Invisible(missing.clone()).check(&driver).await.unwrap());
    assert!(!Condition::Invisible(search.clone()).check(&driver).await.unwrap());

    assert!(Condition::TextContains(go.clone(), "Sea".into()).check(&driver).await.unwrap());
    assert!(!Condition::TextContains(go.clone(), "Go".into()).check(&driver).await.unwrap());
    assert!(
        Condition::ValueContains(search.clone(), "panda".into())
            .check(&driver)
            .await
            .unwrap()
    );
    assert!(!Condition::ValueContains(go.clone(), "x".into()).check(&driver).await.unwrap());

    assert!(Condition::Clickable(search).check(&driver).await.unwrap());
    assert!(!Condition::Clickable(go).check(&driver).await.unwrap());
    assert!(!Condition::Clickable(missing).check(&driver).await.unwrap());
}

#[tokio::test]
async fn test_alert_condition() {
    let driver = MockDriver::new();
    assert!(!Condition::AlertPresent.check(&driver).await.unwrap());

    driver.set_alert(Some("Are you sure?"));
    assert!(Condition::AlertPresent.check(&driver).await.unwrap());
}

#[tokio::test]
async fn test_stale_element_counts_as_gone() {
    let element = MockElement::new("old-1", Query::css(".old")).into_shared();
    let driver = MockDriver::with_page(MockPage::default().with_element(element.clone()));
    element.set_stale(true);

    assert!(!Condition::Visible(Query::css(".old")).check(&driver).await.unwrap());
    assert!(Condition::Invisible(Query::css(".old")).check(&driver).await.unwrap());
}

#[tokio::test]
async fn test_driver_errors_propagate() {
    let driver = MockDriver::new();
    driver.set_broken(Some("session deleted"));

    let err = Condition::UrlContains("x".into()).check(&driver).await.unwrap_err();
    assert!(matches!(err, PageError::Driver(_)));
}

#[tokio::test(start_paused = true)]
async fn test_wait_times_out_with_condition_name() {
    let driver = MockDriver::new();
    let condition = Condition::TitleIs("Log in - Wikipedia".into());

    let err = condition
        .wait(&driver, Duration::from_secs(1), Duration::from_millis(100))
        .await
        .unwrap_err();

    match err {
        PageError::ConditionTimeout { condition, timeout } => {
            assert_eq!(condition, "title == 'Log in - Wikipedia'");
            assert_eq!(timeout, Duration::from_secs(1));
        }
        other => panic!("Expected ConditionTimeout, got {:?}", other),
    }
}

#[test]
fn test_condition_query() {
    let query = Query::css("h1");
    assert_eq!(Condition::Visible(query.clone()).query(), Some(&query));
    assert_eq!(Condition::AlertPresent.query(), None);
    assert_eq!(Condition::UrlIs("x".into()).query(), None);
}
