//! Observable connectivity state.
//!
//! The health monitor owns the only [`ConnectivityPublisher`]; everyone else
//! holds a [`ConnectivityWatch`] and reads the latest value on demand or
//! awaits changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

use crate::language::Language;

/// Backend connectivity as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectivityState {
    /// No probe sweep has completed yet.
    Checking,
    /// A live endpoint is bound.
    Connected {
        /// Base URL of the bound endpoint.
        endpoint: String,
    },
    /// The last sweep found no live endpoint.
    Disconnected,
}

impl ConnectivityState {
    /// Returns `true` when a live endpoint is bound.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// The bound endpoint, if connected.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Connected { endpoint } => Some(endpoint),
            _ => None,
        }
    }

    /// Short status banner for the presentation layer.
    pub fn banner(&self, language: Language) -> &'static str {
        match self {
            Self::Checking => language.pick("Connecting to AI...", "एआई से जुड़ रहे हैं..."),
            Self::Connected { .. } => language.pick("AI Mode - Connected", "एआई मोड - जुड़ा हुआ"),
            Self::Disconnected => language.pick(
                "Demo Mode - Try sample queries",
                "डेमो मोड - नमूना प्रश्न आज़माएँ",
            ),
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Connected { endpoint } => write!(f, "connected ({endpoint})"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Create a connectivity channel starting at [`ConnectivityState::Checking`].
pub fn channel() -> (ConnectivityPublisher, ConnectivityWatch) {
    let (tx, rx) = watch::channel(ConnectivityState::Checking);
    (ConnectivityPublisher { tx }, ConnectivityWatch { rx })
}

/// Write side of the connectivity state.
#[derive(Debug)]
pub struct ConnectivityPublisher {
    tx: watch::Sender<ConnectivityState>,
}

impl ConnectivityPublisher {
    /// Publish a new state. Subscribers are only woken when the value changes.
    ///
    /// Returns `true` if the state changed.
    pub fn publish(&self, state: ConnectivityState) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        })
    }

    /// Current value.
    pub fn current(&self) -> ConnectivityState {
        self.tx.borrow().clone()
    }

    /// A new read handle.
    pub fn watch(&self) -> ConnectivityWatch {
        ConnectivityWatch {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the connectivity state.
#[derive(Debug, Clone)]
pub struct ConnectivityWatch {
    rx: watch::Receiver<ConnectivityState>,
}

impl ConnectivityWatch {
    /// Latest published state. Never cache this across requests.
    pub fn current(&self) -> ConnectivityState {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new state.
    ///
    /// Returns `None` once the publisher has been dropped.
    pub async fn changed(&mut self) -> Option<ConnectivityState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until `predicate` holds for the current state and return it.
    ///
    /// Returns `None` once the publisher has been dropped.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&ConnectivityState) -> bool,
    ) -> Option<ConnectivityState> {
        self.rx
            .wait_for(|state| predicate(state))
            .await
            .ok()
            .map(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn starts_checking() {
        let (_publisher, watch) = channel();
        assert_eq!(watch.current(), ConnectivityState::Checking);
    }

    #[test]
    fn publish_reports_changes_only() {
        let (publisher, watch) = channel();
        assert!(publisher.publish(ConnectivityState::Disconnected));
        assert!(!publisher.publish(ConnectivityState::Disconnected));
        assert_eq!(watch.current(), ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let (publisher, mut watch) = channel();
        publisher.publish(ConnectivityState::Connected {
            endpoint: "http://b".into(),
        });
        let state = watch.changed().await.unwrap();
        assert_eq!(state.endpoint(), Some("http://b"));
        assert!(state.is_connected());
    }

    #[tokio::test]
    async fn changed_returns_none_when_publisher_dropped() {
        let (publisher, mut watch) = channel();
        drop(publisher);
        assert!(watch.changed().await.is_none());
    }

    #[test]
    fn banner_is_localized() {
        let state = ConnectivityState::Disconnected;
        assert!(state.banner(Language::English).starts_with("Demo Mode"));
        assert!(state.banner(Language::Hindi).starts_with("डेमो"));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_string(&ConnectivityState::Connected {
            endpoint: "http://x".into(),
        })
        .unwrap();
        assert!(json.contains("\"status\":\"connected\""));
    }
}
