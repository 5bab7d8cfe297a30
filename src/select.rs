//! Dropdown view over a `<select>` element

use tracing::debug;

use crate::driver::Element;
use crate::errors::{PageError, Result};
use crate::types::{By, Query};

/// A `<select>` element viewed as a selectable control
#[derive(Debug, Clone)]
pub struct Select {
    element: Element,
    multiple: bool,
}

impl Select {
    /// Wrap `element`, which must be a `<select>`
    pub async fn new(element: Element) -> Result<Self> {
        let tag = element.tag_name().await?;
        if !tag.eq_ignore_ascii_case("select") {
            return Err(PageError::UnexpectedTag(tag));
        }

        let multiple = element
            .attr("multiple")
            .await?
            .is_some_and(|value| value != "false");

        Ok(Select { element, multiple })
    }

    /// The underlying `<select>` element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Whether more than one option may be selected at once
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// All `<option>` elements, in document order
    pub async fn options(&self) -> Result<Vec<Element>> {
        self.element.find_all(&Query::new(By::TagName, "option")).await
    }

    pub async fn selected_options(&self) -> Result<Vec<Element>> {
        let mut selected = Vec::new();
        for option in self.options().await? {
            if is_selected(&option).await? {
                selected.push(option);
            }
        }
        Ok(selected)
    }

    pub async fn first_selected_option(&self) -> Result<Element> {
        self.selected_options()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PageError::NoSuchOption("that is selected".to_string()))
    }

    /// Select every option whose `value` attribute equals `value`
    /// (only the first one unless this is a multi-select)
    pub async fn select_by_value(&self, value: &str) -> Result<()> {
        let mut matched = false;
        for option in self.options().await? {
            if option.attr("value").await?.as_deref() == Some(value) {
                set_selected(&option).await?;
                matched = true;
                if !self.multiple {
                    break;
                }
            }
        }

        if !matched {
            return Err(PageError::NoSuchOption(format!("with value: {}", value)));
        }
        Ok(())
    }

    /// Select the option at `index` (0-based, document order)
    pub async fn select_by_index(&self, index: usize) -> Result<()> {
        let options = self.options().await?;
        let option = options
            .get(index)
            .ok_or_else(|| PageError::NoSuchOption(format!("with index: {}", index)))?;
        set_selected(option).await
    }

    /// Select every option whose trimmed text equals `text`
    /// (only the first one unless this is a multi-select)
    pub async fn select_by_visible_text(&self, text: &str) -> Result<()> {
        let mut matched = false;
        for option in self.options().await? {
            if option.text().await?.trim() == text {
                set_selected(&option).await?;
                matched = true;
                if !self.multiple {
                    break;
                }
            }
        }

        if !matched {
            return Err(PageError::NoSuchOption(format!("with visible text: {}", text)));
        }
        Ok(())
    }
}

async fn is_selected(option: &Element) -> Result<bool> {
    Ok(option.prop("selected").await?.as_deref() == Some("true"))
}

async fn set_selected(option: &Element) -> Result<()> {
    if !is_selected(option).await? {
        debug!("Selecting option {}", option.id());
        option.click().await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;
