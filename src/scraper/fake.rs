//! Scripted in-memory listing used by the engine tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{NewswireError, Result};
use crate::fetcher::{file_stem, AssetDownloader};
use crate::scraper::{AutomationSurface, SelectorConfig, SurfaceError, SurfaceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Date,
    Summary,
    Image,
}

#[derive(Debug, Clone)]
pub struct FakeItem {
    title: Option<String>,
    date: Option<String>,
    summary: Option<String>,
    image: Option<String>,
    stale_field: Field,
    stale_reads: u32,
    broken_field: Option<Field>,
}

impl FakeItem {
    pub fn new(title: &str, date: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            summary: None,
            image: None,
            stale_field: Field::Title,
            stale_reads: 0,
            broken_field: None,
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image = Some(url.to_string());
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn without_date(mut self) -> Self {
        self.date = None;
        self
    }

    /// The next `reads` reads of `field` report a stale handle.
    pub fn stale_for(mut self, field: Field, reads: u32) -> Self {
        self.stale_field = field;
        self.stale_reads = reads;
        self
    }

    /// Reads of `field` fail as if the browser connection dropped.
    pub fn broken_at(mut self, field: Field) -> Self {
        self.broken_field = Some(field);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeHandle {
    page: usize,
    index: usize,
}

#[derive(Default)]
struct FakeState {
    current: usize,
    find_all_calls: usize,
    reads: Vec<Field>,
    calls: Vec<String>,
}

/// A paginated listing whose items live in memory.
///
/// Handles obtained on one page turn stale once the listing moves on.
pub struct FakeSurface {
    selectors: SelectorConfig,
    pages: Mutex<Vec<Vec<FakeItem>>>,
    hidden: HashSet<String>,
    timeout_on_page: Option<usize>,
    stalled_transition: Option<usize>,
    state: Mutex<FakeState>,
}

impl FakeSurface {
    pub fn new(pages: Vec<Vec<FakeItem>>) -> Self {
        Self {
            selectors: SelectorConfig::default(),
            pages: Mutex::new(pages),
            hidden: HashSet::new(),
            timeout_on_page: None,
            stalled_transition: None,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn single_page(items: Vec<FakeItem>) -> Self {
        Self::new(vec![items])
    }

    /// The results container never renders on page `page` (zero-based).
    pub fn with_timeout_on_page(mut self, page: usize) -> Self {
        self.timeout_on_page = Some(page);
        self
    }

    /// Leaving page `page` (zero-based) never finishes loading.
    pub fn with_stalled_transition(mut self, page: usize) -> Self {
        self.stalled_transition = Some(page);
        self
    }

    /// `locator` never becomes visible.
    pub fn with_hidden(mut self, locator: &str) -> Self {
        self.hidden.insert(locator.to_string());
        self
    }

    pub fn find_all_calls(&self) -> usize {
        self.state.lock().unwrap().find_all_calls
    }

    pub fn reads_of(&self, field: Field) -> usize {
        self.state
            .lock()
            .unwrap()
            .reads
            .iter()
            .filter(|f| **f == field)
            .count()
    }

    /// Page-level calls in the order they were made.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn log(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn field_for(&self, locator: &str) -> Option<Field> {
        let s = &self.selectors;
        if locator == s.title {
            Some(Field::Title)
        } else if locator == s.date {
            Some(Field::Date)
        } else if locator == s.summary {
            Some(Field::Summary)
        } else if locator == s.image {
            Some(Field::Image)
        } else {
            None
        }
    }

    fn read(&self, handle: &FakeHandle, locator: &str) -> SurfaceResult<Option<String>> {
        let field = self
            .field_for(locator)
            .ok_or_else(|| SurfaceError::NotFound(locator.to_string()))?;

        {
            let mut state = self.state.lock().unwrap();
            state.reads.push(field);
            if state.current != handle.page {
                return Err(SurfaceError::Stale);
            }
        }

        let mut pages = self.pages.lock().unwrap();
        let item = pages
            .get_mut(handle.page)
            .and_then(|items| items.get_mut(handle.index))
            .ok_or(SurfaceError::Stale)?;

        if item.broken_field == Some(field) {
            return Err(SurfaceError::Browser("websocket closed".into()));
        }
        if item.stale_field == field && item.stale_reads > 0 {
            item.stale_reads -= 1;
            return Err(SurfaceError::Stale);
        }

        Ok(match field {
            Field::Title => item.title.clone(),
            Field::Date => item.date.clone(),
            Field::Summary => item.summary.clone(),
            Field::Image => item.image.clone(),
        })
    }
}

#[async_trait]
impl AutomationSurface for FakeSurface {
    type Handle = FakeHandle;

    async fn navigate(&self, url: &str) -> SurfaceResult<()> {
        self.log(format!("navigate {}", url));
        Ok(())
    }

    async fn wait_visible(&self, locator: &str, timeout: Duration) -> SurfaceResult<()> {
        self.log(format!("wait {}", locator));
        let current = self.state.lock().unwrap().current;
        let container_missing =
            locator == self.selectors.results_container && self.timeout_on_page == Some(current);
        if container_missing || self.hidden.contains(locator) {
            return Err(SurfaceError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            });
        }
        Ok(())
    }

    async fn find_all(&self, locator: &str) -> SurfaceResult<Vec<FakeHandle>> {
        let mut state = self.state.lock().unwrap();
        state.find_all_calls += 1;
        if locator != self.selectors.result_items {
            return Ok(Vec::new());
        }
        let page = state.current;
        let count = self.pages.lock().unwrap().get(page).map_or(0, Vec::len);
        Ok((0..count).map(|index| FakeHandle { page, index }).collect())
    }

    async fn read_field(&self, handle: &FakeHandle, field: &str) -> SurfaceResult<Option<String>> {
        self.read(handle, field)
    }

    async fn read_attribute(
        &self,
        handle: &FakeHandle,
        field: &str,
        _attribute: &str,
    ) -> SurfaceResult<Option<String>> {
        self.read(handle, field)
    }

    async fn click(&self, locator: &str) -> SurfaceResult<()> {
        if self.hidden.contains(locator) {
            return Err(SurfaceError::NotFound(locator.to_string()));
        }
        self.log(format!("click {}", locator));
        Ok(())
    }

    async fn submit_text(&self, locator: &str, text: &str) -> SurfaceResult<()> {
        self.log(format!("submit {} {}", locator, text));
        Ok(())
    }

    async fn select_option(&self, locator: &str, value: &str) -> SurfaceResult<()> {
        self.log(format!("select {} {}", locator, value));
        Ok(())
    }

    async fn is_visible(&self, locator: &str) -> SurfaceResult<bool> {
        if locator != self.selectors.next_page {
            return Ok(!self.hidden.contains(locator));
        }
        let current = self.state.lock().unwrap().current;
        Ok(current + 1 < self.pages.lock().unwrap().len())
    }

    async fn go_next_page(&self, locator: &str) -> SurfaceResult<()> {
        self.log(format!("next {}", locator));
        let mut state = self.state.lock().unwrap();
        if self.stalled_transition == Some(state.current) {
            return Err(SurfaceError::Timeout {
                locator: locator.to_string(),
                waited: Duration::from_secs(15),
            });
        }
        if state.current + 1 >= self.pages.lock().unwrap().len() {
            return Err(SurfaceError::NotFound(locator.to_string()));
        }
        state.current += 1;
        Ok(())
    }
}

/// Records download requests and names files after the seed.
#[derive(Default)]
pub struct FakeDownloader {
    fail: bool,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeDownloader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetDownloader for FakeDownloader {
    async fn download(&self, url: &str, name_seed: &str) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), name_seed.to_string()));
        if self.fail {
            return Err(NewswireError::Browser("connection reset".into()));
        }
        Ok(format!("{}.png", file_stem(name_seed, url)))
    }
}
