use anyhow::Result;
use serde_json::{Value, json};
use std::time::Duration;

use pagestate::{Page, PageConfig, SharedDriver};

use super::template::TemplateArgs;

/// Switch to the first open window that matches the page template
pub async fn handle_locate_window(
    driver: SharedDriver,
    template: &TemplateArgs,
    config: PageConfig,
    timeout_ms: Option<u64>,
) -> Result<Value> {
    let page = Page::new(template.name.as_str(), template.build(driver.clone())?).with_config(config);
    let timeout = timeout_ms
        .map(Duration::from_millis)
        .or(page.config().locate_timeout());

    let window = page.locate_window(timeout).await?;

    Ok(json!({
        "page": page.name(),
        "window": window.as_str(),
        "url": driver.current_url().await?,
        "title": driver.title().await?,
    }))
}
