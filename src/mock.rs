//! In-memory driver for testing page definitions without a browser
//!
//! Elements are matched by exact [`Query`] equality, which is enough to script
//! what a page "contains" and to observe which queries were issued where.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::driver::{Driver, Element, WebElement};
use crate::errors::{PageError, Result};
use crate::types::{Query, WindowId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
struct ElementState {
    tag: String,
    text: String,
    attrs: HashMap<String, String>,
    props: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    stale: bool,
    clicks: usize,
    typed: String,
}

/// A scripted element
#[derive(Debug)]
pub struct MockElement {
    id: String,
    query: Query,
    state: Mutex<ElementState>,
    children: Mutex<Vec<Arc<MockElement>>>,
    scoped_queries: Mutex<Vec<Query>>,
}

impl MockElement {
    /// Create a displayed, enabled `<div>` found by `query`
    pub fn new(id: impl Into<String>, query: Query) -> Self {
        MockElement {
            id: id.into(),
            query,
            state: Mutex::new(ElementState {
                tag: "div".to_string(),
                text: String::new(),
                attrs: HashMap::new(),
                props: HashMap::new(),
                displayed: true,
                enabled: true,
                stale: false,
                clicks: 0,
                typed: String::new(),
            }),
            children: Mutex::new(Vec::new()),
            scoped_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_tag(self, tag: &str) -> Self {
        lock(&self.state).tag = tag.to_string();
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        lock(&self.state).text = text.to_string();
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        lock(&self.state)
            .attrs
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(self, child: MockElement) -> Self {
        lock(&self.children).push(Arc::new(child));
        self
    }

    pub fn hidden(self) -> Self {
        lock(&self.state).displayed = false;
        self
    }

    pub fn disabled(self) -> Self {
        lock(&self.state).enabled = false;
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_displayed(&self, displayed: bool) {
        lock(&self.state).displayed = displayed;
    }

    pub fn set_text(&self, text: &str) {
        lock(&self.state).text = text.to_string();
    }

    /// Make every subsequent call on this element fail as stale
    pub fn set_stale(&self, stale: bool) {
        lock(&self.state).stale = stale;
    }

    pub fn add_child(&self, child: Arc<MockElement>) {
        lock(&self.children).push(child);
    }

    /// Number of clicks received
    pub fn clicks(&self) -> usize {
        lock(&self.state).clicks
    }

    /// Everything typed since the last clear
    pub fn typed(&self) -> String {
        lock(&self.state).typed.clone()
    }

    /// Queries issued with this element as the scope
    pub fn scoped_queries(&self) -> Vec<Query> {
        lock(&self.scoped_queries).clone()
    }

    fn live_state(&self) -> Result<MutexGuard<'_, ElementState>> {
        let state = lock(&self.state);
        if state.stale {
            return Err(PageError::StaleElement(format!(
                "element {} is no longer attached to the DOM",
                self.id
            )));
        }
        Ok(state)
    }

    fn matching_children(&self, query: &Query) -> Result<Vec<Element>> {
        drop(self.live_state()?);
        lock(&self.scoped_queries).push(query.clone());
        Ok(lock(&self.children)
            .iter()
            .filter(|child| child.query == *query)
            .map(|child| Arc::clone(child) as Element)
            .collect())
    }
}

#[async_trait]
impl WebElement for MockElement {
    fn id(&self) -> String {
        self.id.clone()
    }

    async fn find(&self, query: &Query) -> Result<Option<Element>> {
        Ok(self.matching_children(query)?.into_iter().next())
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<Element>> {
        self.matching_children(query)
    }

    async fn click(&self) -> Result<()> {
        let mut state = self.live_state()?;
        state.clicks += 1;
        if state.tag == "option" {
            state.props.insert("selected".to_string(), "true".to_string());
        }
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        let mut state = self.live_state()?;
        state.typed.push_str(text);
        let value = state.typed.clone();
        state.attrs.insert("value".to_string(), value);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.live_state()?;
        state.typed.clear();
        state.attrs.remove("value");
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.live_state()?.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.live_state()?.attrs.get(name).cloned())
    }

    async fn prop(&self, name: &str) -> Result<Option<String>> {
        Ok(self.live_state()?.props.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.live_state()?.displayed)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.live_state()?.enabled)
    }

    async fn tag_name(&self) -> Result<String> {
        Ok(self.live_state()?.tag.clone())
    }
}

/// Contents of one scripted window
#[derive(Debug, Clone)]
pub struct MockPage {
    pub url: String,
    pub title: String,
    pub ready_state: String,
    pub alert: Option<String>,
    pub elements: Vec<Arc<MockElement>>,
}

impl MockPage {
    pub fn new(url: &str, title: &str) -> Self {
        MockPage {
            url: url.to_string(),
            title: title.to_string(),
            ready_state: "complete".to_string(),
            alert: None,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Arc<MockElement>) -> Self {
        self.elements.push(element);
        self
    }
}

impl Default for MockPage {
    fn default() -> Self {
        MockPage::new("about:blank", "")
    }
}

#[derive(Debug)]
struct MockState {
    windows: Vec<(WindowId, MockPage)>,
    current: usize,
    broken: Option<String>,
    root_queries: Vec<Query>,
    switches: Vec<WindowId>,
    scripts: Vec<String>,
    visits: Vec<String>,
}

impl MockState {
    fn check(&self) -> Result<()> {
        match &self.broken {
            Some(msg) => Err(PageError::Driver(msg.clone())),
            None => Ok(()),
        }
    }

    fn page(&mut self) -> &mut MockPage {
        &mut self.windows[self.current].1
    }

    fn matching(&mut self, query: &Query) -> Result<Vec<Element>> {
        self.check()?;
        self.root_queries.push(query.clone());
        Ok(self
            .page()
            .elements
            .iter()
            .filter(|element| element.query == *query)
            .map(|element| Arc::clone(element) as Element)
            .collect())
    }
}

/// Mock driver for unit testing
#[derive(Debug)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create a driver with one blank window named "main"
    pub fn new() -> Self {
        MockDriver {
            state: Mutex::new(MockState {
                windows: vec![(WindowId::from("main"), MockPage::default())],
                current: 0,
                broken: None,
                root_queries: Vec::new(),
                switches: Vec::new(),
                scripts: Vec::new(),
                visits: Vec::new(),
            }),
        }
    }

    /// Create a driver whose only window shows `page`
    pub fn with_page(page: MockPage) -> Self {
        let driver = Self::new();
        lock(&driver.state).windows[0].1 = page;
        driver
    }

    /// Open another window; the current window does not change
    pub fn add_window(&self, id: &str, page: MockPage) {
        lock(&self.state).windows.push((WindowId::from(id), page));
    }

    pub fn current_window(&self) -> WindowId {
        let state = lock(&self.state);
        state.windows[state.current].0.clone()
    }

    pub fn set_url(&self, url: &str) {
        lock(&self.state).page().url = url.to_string();
    }

    pub fn set_title(&self, title: &str) {
        lock(&self.state).page().title = title.to_string();
    }

    pub fn set_ready_state(&self, ready_state: &str) {
        lock(&self.state).page().ready_state = ready_state.to_string();
    }

    pub fn set_alert(&self, alert: Option<&str>) {
        lock(&self.state).page().alert = alert.map(str::to_string);
    }

    /// Add an element to the current window
    pub fn add_element(&self, element: Arc<MockElement>) {
        lock(&self.state).page().elements.push(element);
    }

    /// Remove an element from the current window by id
    pub fn remove_element(&self, id: &str) {
        lock(&self.state)
            .page()
            .elements
            .retain(|element| element.id != id);
    }

    /// Make every driver call fail with `msg` (or recover with `None`)
    pub fn set_broken(&self, msg: Option<&str>) {
        lock(&self.state).broken = msg.map(str::to_string);
    }

    /// Queries issued against the document root, in order
    pub fn root_queries(&self) -> Vec<Query> {
        lock(&self.state).root_queries.clone()
    }

    /// Count of root queries equal to `query`
    pub fn query_count(&self, query: &Query) -> usize {
        lock(&self.state)
            .root_queries
            .iter()
            .filter(|q| *q == query)
            .count()
    }

    /// Windows switched to, in order
    pub fn switches(&self) -> Vec<WindowId> {
        lock(&self.state).switches.clone()
    }

    /// Scripts executed, in order
    pub fn scripts(&self) -> Vec<String> {
        lock(&self.state).scripts.clone()
    }

    /// URLs navigated to, in order
    pub fn visits(&self) -> Vec<String> {
        lock(&self.state).visits.clone()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn find(&self, query: &Query) -> Result<Option<Element>> {
        Ok(lock(&self.state).matching(query)?.into_iter().next())
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<Element>> {
        lock(&self.state).matching(query)
    }

    async fn current_url(&self) -> Result<String> {
        let mut state = lock(&self.state);
        state.check()?;
        Ok(state.page().url.clone())
    }

    async fn title(&self) -> Result<String> {
        let mut state = lock(&self.state);
        state.check()?;
        Ok(state.page().title.clone())
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        let mut state = lock(&self.state);
        state.check()?;
        state.scripts.push(script.to_string());
        if script.contains("document.readyState") {
            Ok(Value::String(state.page().ready_state.clone()))
        } else {
            Ok(Value::Null)
        }
    }

    async fn windows(&self) -> Result<Vec<WindowId>> {
        let state = lock(&self.state);
        state.check()?;
        Ok(state.windows.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn switch_to_window(&self, window: &WindowId) -> Result<()> {
        let mut state = lock(&self.state);
        state.check()?;
        let index = state
            .windows
            .iter()
            .position(|(id, _)| id == window)
            .ok_or_else(|| PageError::Driver(format!("no such window: {}", window)))?;
        state.current = index;
        state.switches.push(window.clone());
        Ok(())
    }

    async fn alert_text(&self) -> Result<Option<String>> {
        let mut state = lock(&self.state);
        state.check()?;
        Ok(state.page().alert.clone())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = lock(&self.state);
        state.check()?;
        state.visits.push(url.to_string());
        state.page().url = url.to_string();
        Ok(())
    }
}
