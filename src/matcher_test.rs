// Unit tests for matcher module

use super::*;
use crate::mock::{MockDriver, MockElement, MockPage};
use crate::types::By;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const POLL: Duration = Duration::from_millis(100);

fn setup(page: MockPage) -> (Arc<MockDriver>, SharedDriver) {
    let mock = Arc::new(MockDriver::with_page(page));
    let driver: SharedDriver = mock.clone();
    (mock, driver)
}

#[tokio::test]
async fn test_empty_matcher_always_matches() {
    let (_mock, driver) = setup(MockPage::default());
    let matcher = PageMatcher::new(driver);

    assert!(matcher.is_empty());
    assert!(matcher.matches(Duration::ZERO, POLL, false).await.unwrap());
}

#[tokio::test]
async fn test_conditions_keep_registration_order() {
    let (_mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_partial_url("Special:UserLogin")
        .match_title("Log in - Wikipedia")
        .match_presence(Locator::new(driver.clone(), By::Name, "wpName").named("username_input"))
        .match_element_text(Locator::new(driver.clone(), By::Css, "h1"), "Log in")
        .match_alert_present();

    assert_eq!(
        matcher.conditions(),
        &[
            Condition::UrlContains("Special:UserLogin".into()),
            Condition::TitleIs("Log in - Wikipedia".into()),
            Condition::Present(Query::new(By::Name, "wpName")),
            Condition::TextContains(Query::css("h1"), "Log in".into()),
            Condition::AlertPresent,
        ]
    );
    assert_eq!(matcher.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_matches_short_circuits_on_first_failure() {
    let page = MockPage::new("https://example.com/search", "Search")
        .with_element(MockElement::new("c-1", Query::css(".c")).into_shared());
    let (mock, driver) = setup(page);

    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_partial_url("search")
        .match_presence(Locator::new(driver.clone(), By::Css, ".b"))
        .match_presence(Locator::new(driver, By::Css, ".c"));

    assert!(!matcher.matches(Duration::from_millis(300), POLL, true).await.unwrap());
    assert!(mock.query_count(&Query::css(".b")) >= 1);
    assert_eq!(mock.query_count(&Query::css(".c")), 0);
}

#[tokio::test(start_paused = true)]
async fn test_matches_polls_until_condition_holds() {
    let (mock, driver) = setup(MockPage::new("https://example.com/", "Loading"));
    let mut matcher = PageMatcher::new(driver);
    matcher.match_title("Done");

    let waiter = matcher.matches(Duration::from_secs(2), POLL, false);
    let flip = async {
        tokio::time::sleep(Duration::from_millis(450)).await;
        mock.set_title("Done");
    };
    let (matched, ()) = tokio::join!(waiter, flip);

    assert!(matched.unwrap());
}

#[tokio::test]
async fn test_matches_propagates_driver_errors() {
    let (mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver);
    matcher.match_partial_url("x");
    mock.set_broken(Some("invalid session id"));

    let err = matcher.matches(Duration::ZERO, POLL, false).await.unwrap_err();
    assert!(matches!(err, PageError::Driver(_)));
}

#[tokio::test]
async fn test_unnamed_locators_get_generated_names() {
    let (_mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_presence(Locator::new(driver.clone(), By::Id, "a").named("first"))
        .match_visibility(Locator::new(driver.clone(), By::Id, "b"))
        .add_locator(Locator::new(driver, By::Id, "c"));

    let names = matcher.names();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"first"));

    let generated: Vec<&str> = names.into_iter().filter(|n| *n != "first").collect();
    for name in generated {
        assert_eq!(name.len(), 32);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[tokio::test]
async fn test_empty_names_get_generated_names() {
    let (_mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_presence(Locator::new(driver.clone(), By::Id, "a").named(""))
        .add_locator(Locator::new(driver, By::Id, "b").named(""));

    let names = matcher.names();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|name| name.len() == 32));
}

#[tokio::test]
async fn test_debug_lists_conditions_and_names() {
    let (_mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_title("Log in - Wikipedia")
        .add_locator(Locator::new(driver, By::Id, "pt-login").named("login_link"));

    let debug = format!("{:?}", matcher);
    assert!(debug.starts_with("PageMatcher"));
    assert!(debug.contains("TitleIs(\"Log in - Wikipedia\")"));
    assert!(debug.contains("\"login_link\""));
}

#[tokio::test]
async fn test_add_locator_by_name_renames_locator() {
    let (_mock, driver) = setup(MockPage::default());
    let link = Locator::new(driver.clone(), By::Id, "pt-login").named("old");
    let mut matcher = PageMatcher::new(driver);
    matcher.add_locator_by_name(link.clone(), "login_link");

    assert_eq!(link.name().as_deref(), Some("login_link"));
    assert!(matcher.locator("login_link").is_ok());
    assert!(matcher.locator("old").is_err());
}

#[tokio::test]
async fn test_reregistering_name_keeps_old_conditions() {
    let (_mock, driver) = setup(MockPage::default());
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_presence(Locator::new(driver.clone(), By::Id, "old").named("button"))
        .add_locator(Locator::new(driver, By::Id, "new").named("button"));

    assert_eq!(matcher.locator("button").unwrap().value(), "new");
    assert_eq!(
        matcher.conditions(),
        &[Condition::Present(Query::new(By::Id, "old"))]
    );
}

#[tokio::test]
async fn test_named_access() {
    let page = MockPage::default().with_element(
        MockElement::new("search-1", Query::new(By::Name, "search")).into_shared(),
    );
    let (mock, driver) = setup(page);
    let mut matcher = PageMatcher::new(driver.clone());
    matcher
        .match_presence(Locator::new(driver.clone(), By::Name, "search").named("search_input"))
        .add_locator(Locator::new(driver, By::Id, "pt-login").named("login_link"));

    let element = matcher.get("search_input").await.unwrap();
    assert_eq!(element.id(), "search-1");
    matcher.get("search_input").await.unwrap();
    assert_eq!(mock.query_count(&Query::new(By::Name, "search")), 1);

    let err = matcher.get("login_link").await.unwrap_err();
    assert!(err.is_not_found());

    match matcher.get("nothing").await {
        Err(PageError::UnknownReference(name)) => assert_eq!(name, "nothing"),
        other => panic!("Expected UnknownReference, got {:?}", other),
    }
}

#[tokio::test]
async fn test_named_access_for_multiple_locator() {
    let page = MockPage::default()
        .with_element(MockElement::new("r-1", Query::css(".result")).into_shared())
        .with_element(MockElement::new("r-2", Query::css(".result")).into_shared());
    let (_mock, driver) = setup(page);
    let mut matcher = PageMatcher::new(driver.clone());
    matcher.add_locator(Locator::new(driver, By::Css, ".result").all().named("search_results"));

    let results = matcher.get_all("search_results").await.unwrap();
    assert_eq!(results.len(), 2);
}
