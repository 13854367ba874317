//! # Capture Configuration Module
//!
//! Configuration for a page capture run: timeouts for the primary fetch and
//! for iframe resolution, redirect limits, and an optional cap on concurrent
//! iframe fetches. Uses a builder pattern for flexible configuration.

use std::time::Duration;

/// Configuration for a page capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// User agent to use for requests
    pub user_agent: String,

    /// Timeout for the primary page fetch
    pub page_timeout: Duration,

    /// Timeout applied to each individual iframe fetch
    pub frame_timeout: Duration,

    /// Deadline for the whole iframe fetch batch; on expiry every
    /// still-pending frame degrades to a failure placeholder
    pub frame_join_timeout: Duration,

    /// Maximum number of iframe fetches in flight at once; `None` issues
    /// them all together
    pub max_concurrent_frames: Option<usize>,

    /// Maximum number of redirects to follow when redirect following is
    /// enabled
    pub max_redirects: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pagesift/{}", env!("CARGO_PKG_VERSION")),
            page_timeout: Duration::from_secs(30),
            frame_timeout: Duration::from_secs(10),
            frame_join_timeout: Duration::from_secs(30),
            max_concurrent_frames: None,
            max_redirects: 10,
        }
    }
}

/// Builder for CaptureConfig
#[derive(Debug, Default)]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CaptureConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the timeout for the primary page fetch
    pub fn page_timeout(mut self, page_timeout: Duration) -> Self {
        self.config.page_timeout = page_timeout;
        self
    }

    /// Set the timeout for each individual iframe fetch
    pub fn frame_timeout(mut self, frame_timeout: Duration) -> Self {
        self.config.frame_timeout = frame_timeout;
        self
    }

    /// Set the deadline for the whole iframe fetch batch
    pub fn frame_join_timeout(mut self, frame_join_timeout: Duration) -> Self {
        self.config.frame_join_timeout = frame_join_timeout;
        self
    }

    /// Cap the number of iframe fetches in flight at once
    pub fn max_concurrent_frames(mut self, max_concurrent_frames: usize) -> Self {
        self.config.max_concurrent_frames = Some(max_concurrent_frames);
        self
    }

    /// Set the maximum number of redirects to follow
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CaptureConfig {
        self.config
    }
}

impl CaptureConfig {
    /// Create a new builder
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::new()
    }
}
