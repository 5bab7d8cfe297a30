// Page waits, window discovery and graceful lookups against scripted windows
use pagestate::{By, Locator, Page, PageConfig, PageError, PageMatcher, Resolved, SharedDriver, WindowId};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::{Instant, sleep};

mod common;
use common::{fixtures, shared};

fn login_page(driver: &SharedDriver) -> Page {
    let mut template = PageMatcher::new(driver.clone());
    template
        .match_partial_url("Special:UserLogin")
        .match_title("Log in - Wikipedia")
        .match_visibility(Locator::new(driver.clone(), By::Id, "wpName1").named("username_input"));
    Page::new("WikipediaLogin", template)
}

fn search_page(driver: &SharedDriver) -> Page {
    let mut template = PageMatcher::new(driver.clone());
    template
        .match_partial_url("index.php?search=")
        .match_title("Search - Wikipedia")
        .match_presence(Locator::new(driver.clone(), By::Name, "search").named("search_input"))
        .add_locator(Locator::new(driver.clone(), By::Id, "pt-login").named("login_link"));

    let config = PageConfig {
        ready_settle_ms: 0,
        ..PageConfig::default()
    };
    Page::new("WikipediaSearch", template).with_config(config)
}

#[tokio::test]
async fn test_graceful_lookup_of_missing_element() {
    let (_mock, driver) = shared(fixtures::search_page());
    let page = search_page(&driver);
    let login_link = page.locator("login_link").unwrap();

    let resolved = login_link.graceful().resolve().await.unwrap();
    assert!(matches!(resolved, Resolved::NotFound));
    assert!(!login_link.is_found());

    let err = login_link.resolve().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "login_link unable to locate element by id, with locator 'pt-login'"
    );
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_locate_window_visits_windows_in_order() {
    let (mock, driver) = shared(fixtures::login_page());
    mock.add_window("w2", fixtures::search_page());
    mock.add_window("w3", fixtures::search_page());
    let page = search_page(&driver);

    let window = page.locate_window(None).await.unwrap();

    assert_eq!(window, WindowId::from("w2"));
    assert_eq!(mock.switches(), vec![WindowId::from("main"), WindowId::from("w2")]);
    assert!(!mock.switches().contains(&WindowId::from("w3")));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_from_login_to_search() {
    let (mock, driver) = shared(fixtures::login_page());
    let login = login_page(&driver);
    let search = search_page(&driver);

    assert!(login.matches(false).await.unwrap());
    assert!(!search.matches(false).await.unwrap());

    let navigate = async {
        sleep(Duration::from_millis(700)).await;
        mock.set_ready_state("loading");
        mock.set_url(fixtures::SEARCH_URL);
        mock.set_title("Search - Wikipedia");
        mock.remove_element("username-1");
        for element in fixtures::search_page().elements {
            mock.add_element(element);
        }
        sleep(Duration::from_millis(400)).await;
        mock.set_ready_state("complete");
    };
    let waits = async {
        login.wait_for_no_match().await?;
        search.wait_until_match_and_ready().await?;
        Ok::<_, PageError>(())
    };
    let start = Instant::now();
    let (result, ()) = tokio::join!(waits, navigate);

    result.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1100));
    assert_eq!(mock.visits(), Vec::<String>::new());

    search.get("search_input").await.unwrap().send_keys("red panda").await.unwrap();
    let value = search.get("search_input").await.unwrap().attr("value").await.unwrap();
    assert_eq!(value.as_deref(), Some("red panda"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_match_gives_up_after_bound() {
    let (_mock, driver) = shared(fixtures::login_page());
    let search = search_page(&driver).with_config(PageConfig {
        wait_timeout_ms: Some(2_000),
        ..PageConfig::default()
    });
    let start = Instant::now();

    let err = search.wait_for_match().await.unwrap_err();

    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(
        err.to_string(),
        "page WikipediaSearch did not match within 2s"
    );
}
