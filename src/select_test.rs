// Unit tests for select module

use super::*;
use crate::mock::MockElement;
use std::sync::Arc;

fn option(id: &str, value: &str, text: &str) -> MockElement {
    MockElement::new(id, Query::new(By::TagName, "option"))
        .with_tag("option")
        .with_attr("value", value)
        .with_text(text)
}

fn languages(multiple: bool) -> Arc<MockElement> {
    let select = MockElement::new("lang-1", Query::new(By::Name, "lang"))
        .with_tag("SELECT")
        .with_child(option("opt-en", "en", "  English "))
        .with_child(option("opt-de", "de", "Deutsch"))
        .with_child(option("opt-de-ch", "de", "Schweizerdeutsch"));
    let select = if multiple {
        select.with_attr("multiple", "multiple")
    } else {
        select
    };
    select.into_shared()
}

#[tokio::test]
async fn test_single_select_stops_at_first_match() {
    let element = languages(false);
    let select = Select::new(element.clone()).await.unwrap();
    assert!(!select.is_multiple());

    select.select_by_value("de").await.unwrap();
    let selected = select.selected_options().await.unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), "opt-de");

    select.select_by_visible_text("English").await.unwrap();
    assert_eq!(element.scoped_queries().len(), 3);
}

#[tokio::test]
async fn test_multi_select_selects_every_match() {
    let select = Select::new(languages(true)).await.unwrap();
    assert!(select.is_multiple());

    select.select_by_value("de").await.unwrap();
    let ids: Vec<String> = select
        .selected_options()
        .await
        .unwrap()
        .iter()
        .map(|option| option.id())
        .collect();
    assert_eq!(ids, vec!["opt-de", "opt-de-ch"]);
}

#[tokio::test]
async fn test_selected_option_is_not_clicked_again() {
    let en = Arc::new(option("opt-en", "en", "English"));
    let element = MockElement::new("lang-1", Query::new(By::Name, "lang")).with_tag("select");
    element.add_child(en.clone());
    let select = Select::new(element.into_shared()).await.unwrap();

    select.select_by_index(0).await.unwrap();
    select.select_by_index(0).await.unwrap();
    assert_eq!(en.clicks(), 1);
}

#[tokio::test]
async fn test_nothing_selected() {
    let select = Select::new(languages(false)).await.unwrap();
    let err = select.first_selected_option().await.unwrap_err();
    assert_eq!(err.to_string(), "cannot locate option that is selected");
}
