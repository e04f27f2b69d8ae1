//! Browser control over the Chrome DevTools Protocol.
//!
//! Rust-native CDP via chromiumoxide: the harness launches a (headless by
//! default) Chromium, drives one page per scenario, and tears the browser
//! down at the end. One simulated user session, sequential control flow.

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::HarnessConfig;
use crate::result::{TableroError, TableroResult};

/// Browser instance with a live CDP connection
#[derive(Debug)]
pub struct Browser {
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a browser per the harness config.
    ///
    /// # Errors
    ///
    /// Returns [`TableroError::BrowserLaunch`] if Chromium cannot be
    /// started or the CDP handshake fails.
    pub async fn launch(config: &HarnessConfig) -> TableroResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        // CI containers run without a usable sandbox.
        builder = builder.no_sandbox();

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| TableroError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| TableroError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event loop until the connection drops.
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a fresh blank page.
    ///
    /// # Errors
    ///
    /// Returns [`TableroError::Page`] if the target cannot be created.
    pub async fn new_page(&self) -> TableroResult<CdpPage> {
        let browser = self.inner.lock().await;
        browser
            .new_page("about:blank")
            .await
            .map_err(|e| TableroError::Page {
                message: e.to_string(),
            })
    }

    /// Close the browser.
    ///
    /// # Errors
    ///
    /// Returns [`TableroError::BrowserLaunch`] if shutdown fails.
    pub async fn close(self) -> TableroResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| TableroError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
