use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{NewswireError, Result};
use crate::scraper::config::{is_xpath, BrowserConfig};
use crate::scraper::{AutomationSurface, SurfaceError, SurfaceResult};

const VISIBILITY_FN: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

/// Automation surface backed by a single Chrome tab via chromiumoxide
pub struct ChromeSurface {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    config: BrowserConfig,
}

impl ChromeSurface {
    /// Launch Chrome and open a blank tab
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = LaunchConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--disable-extensions");

        if !config.headless {
            builder = builder.with_head();
        }

        let launch_config = builder
            .build()
            .map_err(|e| NewswireError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(launch_config).await.map_err(|e| {
            NewswireError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Handle browser events
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| NewswireError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| NewswireError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Self {
            browser,
            page,
            handler,
            config: config.clone(),
        })
    }

    /// Shut the browser down
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        self.handler.abort();
        closed
            .map(|_| ())
            .map_err(|e| NewswireError::Browser(format!("Failed to close browser: {}", e)))
    }

    async fn find(&self, locator: &str) -> SurfaceResult<Element> {
        let found = if is_xpath(locator) {
            self.page.find_xpath(locator).await
        } else {
            self.page.find_element(locator).await
        };
        found.map_err(|e| classify(e, locator))
    }

    async fn settle(&self) {
        tokio::time::sleep(self.config.wait_after_load()).await;
    }
}

#[async_trait]
impl AutomationSurface for ChromeSurface {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> SurfaceResult<()> {
        let timeout = self.config.listing_timeout();
        bounded(url, timeout, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        })
        .await?;
        self.settle().await;
        Ok(())
    }

    async fn wait_visible(&self, locator: &str, timeout: Duration) -> SurfaceResult<()> {
        let poll = async {
            loop {
                if self.is_visible(locator).await? {
                    return Ok::<(), SurfaceError>(());
                }
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(SurfaceError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            }),
        }
    }

    async fn find_all(&self, locator: &str) -> SurfaceResult<Vec<Element>> {
        let found = if is_xpath(locator) {
            self.page.find_xpaths(locator).await
        } else {
            self.page.find_elements(locator).await
        };

        match found {
            Ok(elements) => Ok(elements),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(classify(e, locator)),
        }
    }

    async fn read_field(&self, handle: &Element, field: &str) -> SurfaceResult<Option<String>> {
        let child = match handle.find_element(field).await {
            Ok(child) => child,
            Err(CdpError::NotFound) => return Ok(None),
            Err(e) => return Err(classify(e, field)),
        };
        child.inner_text().await.map_err(|e| classify(e, field))
    }

    async fn read_attribute(
        &self,
        handle: &Element,
        field: &str,
        attribute: &str,
    ) -> SurfaceResult<Option<String>> {
        let child = match handle.find_element(field).await {
            Ok(child) => child,
            Err(CdpError::NotFound) => return Ok(None),
            Err(e) => return Err(classify(e, field)),
        };
        child
            .attribute(attribute)
            .await
            .map_err(|e| classify(e, field))
    }

    async fn click(&self, locator: &str) -> SurfaceResult<()> {
        let element = self.find(locator).await?;
        element.click().await.map_err(|e| classify(e, locator))?;
        self.settle().await;
        Ok(())
    }

    async fn submit_text(&self, locator: &str, text: &str) -> SurfaceResult<()> {
        let element = self.find(locator).await?;
        element
            .click()
            .await
            .map_err(|e| classify(e, locator))?
            .type_str(text)
            .await
            .map_err(|e| classify(e, locator))?
            .press_key("Enter")
            .await
            .map_err(|e| classify(e, locator))?;
        self.settle().await;
        Ok(())
    }

    async fn select_option(&self, locator: &str, value: &str) -> SurfaceResult<()> {
        let element = self.find(locator).await?;
        let script = format!(
            "function() {{ this.value = {}; this.dispatchEvent(new Event('change', {{ bubbles: true }})); }}",
            serde_json::Value::from(value)
        );
        element
            .call_js_fn(script, false)
            .await
            .map_err(|e| classify(e, locator))?;
        self.settle().await;
        Ok(())
    }

    async fn is_visible(&self, locator: &str) -> SurfaceResult<bool> {
        let element = match self.find(locator).await {
            Ok(element) => element,
            Err(SurfaceError::NotFound(_)) | Err(SurfaceError::Stale) => return Ok(false),
            Err(e) => return Err(e),
        };

        match element.call_js_fn(VISIBILITY_FN, false).await {
            Ok(returns) => Ok(returns
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false)),
            Err(e) => match classify(e, locator) {
                SurfaceError::Stale => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn go_next_page(&self, locator: &str) -> SurfaceResult<()> {
        let element = self.find(locator).await?;
        element.click().await.map_err(|e| classify(e, locator))?;
        bounded(locator, self.config.listing_timeout(), async {
            self.page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        })
        .await?;
        debug!("Followed {}", locator);
        self.settle().await;
        Ok(())
    }
}

/// Run a page transition under `timeout`, classifying CDP failures.
async fn bounded<F>(locator: &str, timeout: Duration, transition: F) -> SurfaceResult<()>
where
    F: Future<Output = std::result::Result<(), CdpError>>,
{
    match tokio::time::timeout(timeout, transition).await {
        Ok(result) => result.map_err(|e| classify(e, locator)),
        Err(_) => Err(SurfaceError::Timeout {
            locator: locator.to_string(),
            waited: timeout,
        }),
    }
}

fn classify(err: CdpError, locator: &str) -> SurfaceError {
    match err {
        CdpError::NotFound => SurfaceError::NotFound(locator.to_string()),
        other => {
            let message = other.to_string();
            if is_stale_message(&message) {
                SurfaceError::Stale
            } else {
                SurfaceError::Browser(message)
            }
        }
    }
}

/// CDP error texts reported when a node id outlived its DOM node.
fn is_stale_message(message: &str) -> bool {
    const STALE_MARKERS: &[&str] = &[
        "no node with given id",
        "could not find node with given id",
        "node with given id does not belong to the document",
        "node is detached",
        "cannot find context with specified id",
        "cannot find object with id",
    ];

    let message = message.to_ascii_lowercase();
    STALE_MARKERS.iter().any(|marker| message.contains(marker))
}
