use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use pagestate::{Page, PageConfig, SharedDriver};

use super::template::TemplateArgs;

/// Check (or wait for) the page template against the current window
pub async fn handle_check(
    driver: SharedDriver,
    template: &TemplateArgs,
    config: PageConfig,
    url: Option<String>,
    wait: bool,
    ready: bool,
    timeout_ms: Option<u64>,
) -> Result<Value> {
    let page = Page::new(template.name.as_str(), template.build(driver.clone())?).with_config(config);

    if let Some(url) = url {
        let parsed = url::Url::parse(&url).with_context(|| format!("Invalid URL: {}", url))?;
        driver.goto(parsed.as_str()).await?;
    }

    if ready {
        page.wait_until_ready().await?;
    }

    let matches = if wait {
        let timeout = timeout_ms
            .map(Duration::from_millis)
            .or(page.config().wait_timeout());
        page.wait_for_match_with(page.config().wait_poll(), timeout)
            .await?;
        true
    } else {
        page.matches(true).await?
    };

    info!("Page {} matches: {}", page.name(), matches);

    Ok(json!({
        "page": page.name(),
        "matches": matches,
        "url": driver.current_url().await?,
        "conditions": page
            .matcher()
            .conditions()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>(),
    }))
}
