//! Host page access for third-party embeds.
//!
//! The chat option relies on a third-party widget that mounts its own
//! button somewhere in the host page. [`EmbedAdapter`] is the only place
//! that touches the page: it probes for elements with a bounded retry,
//! keeps track of everything it injected, and removes all of it on
//! [`teardown`](EmbedAdapter::teardown). [`VisibilityBridge`] carries the
//! third-party widget's show/hide changes to interested parties without
//! exposing its page structure.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{RenderError, Result};

/// Opaque reference to a node of the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// A node the adapter adds to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedNode {
    /// An external script.
    Script {
        /// Script URL.
        src: String,
    },
    /// A stylesheet with inline rules.
    Style {
        /// CSS text.
        css: String,
    },
}

/// The host page, as far as the embed adapter needs it.
pub trait HostDocument: Send + Sync {
    /// Finds the first element matching `selector`.
    fn query(&self, selector: &str) -> Option<NodeHandle>;

    /// Adds `node` to the page.
    fn inject(&self, node: EmbedNode) -> NodeHandle;

    /// Removes a node. Removing an unknown node does nothing.
    fn remove(&self, handle: NodeHandle);

    /// Sets one inline style property of a node.
    fn set_style(&self, handle: NodeHandle, property: &str, value: &str);

    /// Dispatches a click on a node.
    fn click(&self, handle: NodeHandle);
}

impl<T: HostDocument + ?Sized> HostDocument for Arc<T> {
    fn query(&self, selector: &str) -> Option<NodeHandle> {
        (**self).query(selector)
    }

    fn inject(&self, node: EmbedNode) -> NodeHandle {
        (**self).inject(node)
    }

    fn remove(&self, handle: NodeHandle) {
        (**self).remove(handle);
    }

    fn set_style(&self, handle: NodeHandle, property: &str, value: &str) {
        (**self).set_style(handle, property, value);
    }

    fn click(&self, handle: NodeHandle) {
        (**self).click(handle);
    }
}

/// Bounds for [`EmbedAdapter::wait_for_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between probes.
    pub interval: Duration,
    /// Maximum number of probes.
    pub max_attempts: u32,
    /// Maximum total wait.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 20,
            timeout: Duration::from_secs(10),
        }
    }
}

type VisibilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

struct Subscriber {
    id: Uuid,
    callback: VisibilityCallback,
}

/// Fans out visibility changes of an external widget.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use wawidget_render::VisibilityBridge;
///
/// let bridge = VisibilityBridge::new();
/// let seen = Arc::new(AtomicBool::new(false));
/// let flag = seen.clone();
/// let subscription = bridge.on_external_visibility_change(move |visible| {
///     flag.store(visible, Ordering::SeqCst);
/// });
///
/// bridge.notify(true);
/// assert!(seen.load(Ordering::SeqCst));
///
/// subscription.unsubscribe();
/// bridge.notify(false);
/// assert!(seen.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct VisibilityBridge {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl std::fmt::Debug for VisibilityBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityBridge")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl VisibilityBridge {
    /// Creates a bridge with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every later visibility change.
    #[must_use = "dropping the subscription does not unsubscribe; keep it to call unsubscribe()"]
    pub fn on_external_visibility_change(
        &self,
        callback: impl Fn(bool) + Send + Sync + 'static,
    ) -> VisibilitySubscription {
        let id = Uuid::new_v4();
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                callback: Arc::new(callback),
            });
        debug!(%id, "visibility subscription added");
        VisibilitySubscription {
            id,
            bridge: self.clone(),
        }
    }

    /// Reports a visibility change to every live subscriber.
    pub fn notify(&self, visible: bool) {
        let callbacks: Vec<VisibilityCallback> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| s.callback.clone())
            .collect();
        for callback in callbacks {
            callback(visible);
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn unsubscribe(&self, id: Uuid) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| s.id != id);
        debug!(%id, "visibility subscription removed");
    }
}

/// Handle returned by [`VisibilityBridge::on_external_visibility_change`].
#[derive(Debug)]
pub struct VisibilitySubscription {
    id: Uuid,
    bridge: VisibilityBridge,
}

impl VisibilitySubscription {
    /// Stops delivery to the callback.
    pub fn unsubscribe(self) {
        self.bridge.unsubscribe(self.id);
    }
}

/// Owns every interaction with the host page.
#[derive(Debug)]
pub struct EmbedAdapter<D> {
    document: D,
    bridge: VisibilityBridge,
    injected: Vec<NodeHandle>,
    subscriptions: Vec<VisibilitySubscription>,
    torn_down: bool,
}

impl<D: HostDocument> EmbedAdapter<D> {
    /// Wraps a host page.
    #[must_use]
    pub fn new(document: D) -> Self {
        Self {
            document,
            bridge: VisibilityBridge::new(),
            injected: Vec::new(),
            subscriptions: Vec::new(),
            torn_down: false,
        }
    }

    /// Returns the host page.
    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Returns the bridge external visibility changes are published on.
    #[must_use]
    pub const fn bridge(&self) -> &VisibilityBridge {
        &self.bridge
    }

    fn ensure_live(&self) -> Result<()> {
        if self.torn_down {
            Err(RenderError::EmbedTornDown)
        } else {
            Ok(())
        }
    }

    /// Adds a node to the page and remembers it for teardown.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmbedTornDown`] after teardown.
    pub fn inject(&mut self, node: EmbedNode) -> Result<NodeHandle> {
        self.ensure_live()?;
        let handle = self.document.inject(node);
        self.injected.push(handle);
        Ok(handle)
    }

    /// Subscribes to external visibility changes for the adapter's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmbedTornDown`] after teardown.
    pub fn watch_visibility(&mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Result<()> {
        self.ensure_live()?;
        let subscription = self.bridge.on_external_visibility_change(callback);
        self.subscriptions.push(subscription);
        Ok(())
    }

    /// Probes for `selector` until it appears.
    ///
    /// Probes once immediately, then once per `policy.interval`, and gives
    /// up after `policy.max_attempts` probes or `policy.timeout`, whichever
    /// comes first.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ElementNotFound`] when the bounds are
    /// exhausted and [`RenderError::EmbedTornDown`] after teardown.
    #[instrument(skip(self))]
    pub async fn wait_for_element(&self, selector: &str, policy: RetryPolicy) -> Result<NodeHandle> {
        self.ensure_live()?;
        let deadline = Instant::now() + policy.timeout;
        let mut attempts = 0;

        loop {
            attempts += 1;
            if let Some(handle) = self.document.query(selector) {
                debug!(attempts, "element found");
                return Ok(handle);
            }

            if attempts >= policy.max_attempts || Instant::now() + policy.interval > deadline {
                warn!(attempts, "element did not appear");
                return Err(RenderError::ElementNotFound {
                    selector: selector.to_string(),
                    attempts,
                });
            }
            sleep(policy.interval).await;
        }
    }

    /// Waits for the third-party chat button and clicks it.
    ///
    /// # Errors
    ///
    /// See [`wait_for_element`](Self::wait_for_element).
    pub async fn open_chat(&self, selector: &str, policy: RetryPolicy) -> Result<()> {
        let button = self.wait_for_element(selector, policy).await?;
        self.document.click(button);
        Ok(())
    }

    /// Hides or shows a page element by setting its `display` property.
    ///
    /// # Errors
    ///
    /// See [`wait_for_element`](Self::wait_for_element).
    pub async fn set_visible(&self, selector: &str, visible: bool, policy: RetryPolicy) -> Result<()> {
        let node = self.wait_for_element(selector, policy).await?;
        self.document
            .set_style(node, "display", if visible { "block" } else { "none" });
        Ok(())
    }

    /// Removes injected nodes and drops subscriptions. Calling it again
    /// does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for handle in self.injected.drain(..) {
            self.document.remove(handle);
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.torn_down = true;
        debug!("embed adapter torn down");
    }
}

impl<D> Drop for EmbedAdapter<D> {
    fn drop(&mut self) {
        if !self.torn_down && !self.injected.is_empty() {
            warn!(nodes = self.injected.len(), "embed adapter dropped without teardown");
        }
    }
}
