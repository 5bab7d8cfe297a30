// Common test utilities and fixtures

use pagestate::{By, MockDriver, MockElement, MockPage, Query, SharedDriver};
use std::sync::Arc;

/// A scripted driver plus the same driver as the trait object locators use
pub fn shared(page: MockPage) -> (Arc<MockDriver>, SharedDriver) {
    let mock = Arc::new(MockDriver::with_page(page));
    let driver: SharedDriver = mock.clone();
    (mock, driver)
}

/// Mock pages for testing
pub mod fixtures {
    use super::*;

    pub const SEARCH_URL: &str = "https://en.wikipedia.org/w/index.php?search=&title=Special%3ASearch";

    /// The Wikipedia search page: search box, results list and a login link
    pub fn search_page() -> MockPage {
        MockPage::new(SEARCH_URL, "Search - Wikipedia")
            .with_element(
                MockElement::new("input-1", Query::new(By::TagName, "input"))
                    .with_tag("input")
                    .into_shared(),
            )
            .with_element(
                MockElement::new("search-1", Query::new(By::Name, "search"))
                    .with_tag("input")
                    .into_shared(),
            )
            .with_element(
                MockElement::new("results-1", Query::css("ul.mw-search-results"))
                    .with_tag("ul")
                    .with_child(
                        MockElement::new("result-1", Query::new(By::TagName, "li"))
                            .with_text("Red panda"),
                    )
                    .with_child(
                        MockElement::new("result-2", Query::new(By::TagName, "li"))
                            .with_text("Giant panda"),
                    )
                    .into_shared(),
            )
    }

    /// The Wikipedia login page
    #[allow(dead_code)]
    pub fn login_page() -> MockPage {
        MockPage::new(
            "https://en.wikipedia.org/w/index.php?title=Special:UserLogin",
            "Log in - Wikipedia",
        )
        .with_element(
            MockElement::new("username-1", Query::new(By::Id, "wpName1"))
                .with_tag("input")
                .into_shared(),
        )
    }
}
