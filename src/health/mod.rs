//! Endpoint health monitor.
//!
//! [`HealthMonitor`] walks the configured endpoint list in priority order,
//! binds the first one whose health route answers 2xx, and publishes the
//! resulting [`ConnectivityState`]. It is the only writer of that state.
//!
//! # Design
//!
//! The monitor runs as one background tokio task, so probe sweeps are
//! serialized: a scheduled tick, a `ConnectionLost` report and a `ProbeNow`
//! request are all handled by the same loop, one after another. Other
//! components talk to it through a cloneable [`MonitorHandle`].

mod probe;

pub use probe::{EndpointProbe, ProbeStatus};

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AgriConfig;
use crate::connectivity::{self, ConnectivityPublisher, ConnectivityState, ConnectivityWatch};
use crate::error::Result;

/// Out-of-band requests handled by the monitor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    /// The bound endpoint failed at the transport level during a request.
    ConnectionLost {
        /// Endpoint that stopped answering.
        endpoint: String,
    },
    /// Run a sweep now instead of waiting for the next tick.
    ProbeNow,
}

/// Cloneable read/request handle onto a [`HealthMonitor`].
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    watch: ConnectivityWatch,
    commands: mpsc::UnboundedSender<MonitorCommand>,
}

impl MonitorHandle {
    /// Latest connectivity state.
    pub fn current(&self) -> ConnectivityState {
        self.watch.current()
    }

    /// A subscription that is woken on every state change.
    pub fn watch(&self) -> ConnectivityWatch {
        self.watch.clone()
    }

    /// Report that `endpoint` dropped during an active request.
    ///
    /// The monitor marks the state disconnected (if still bound to that
    /// endpoint) and re-probes immediately.
    pub fn report_connection_lost(&self, endpoint: &str) {
        self.send(MonitorCommand::ConnectionLost {
            endpoint: endpoint.to_owned(),
        });
    }

    /// Ask for an immediate probe sweep.
    pub fn probe_now(&self) {
        self.send(MonitorCommand::ProbeNow);
    }

    fn send(&self, command: MonitorCommand) {
        if self.commands.send(command).is_err() {
            debug!("health monitor no longer running; command dropped");
        }
    }

    /// A handle with no monitor behind it: the test owns the publisher and
    /// sees every command.
    #[cfg(test)]
    pub(crate) fn detached(
        state: ConnectivityState,
    ) -> (
        Self,
        ConnectivityPublisher,
        mpsc::UnboundedReceiver<MonitorCommand>,
    ) {
        let (publisher, watch) = connectivity::channel();
        publisher.publish(state);
        let (commands, rx) = mpsc::unbounded_channel();
        (Self { watch, commands }, publisher, rx)
    }
}

/// Probes a prioritized endpoint list and publishes connectivity.
#[derive(Debug)]
pub struct HealthMonitor {
    endpoints: Vec<String>,
    interval: Duration,
    probe: EndpointProbe,
    publisher: ConnectivityPublisher,
    commands_tx: mpsc::UnboundedSender<MonitorCommand>,
    commands_rx: mpsc::UnboundedReceiver<MonitorCommand>,
}

impl HealthMonitor {
    /// Create a monitor for the endpoints, timeouts and routes in `config`.
    ///
    /// The state starts at [`ConnectivityState::Checking`].
    ///
    /// # Errors
    ///
    /// Fails if the probe's HTTP client cannot be built.
    pub fn new(config: &AgriConfig) -> Result<Self> {
        let probe = EndpointProbe::new(config.monitor.probe_timeout(), &config.routes)?;
        let (publisher, _watch) = connectivity::channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        Ok(Self {
            endpoints: config.endpoints.urls.clone(),
            interval: config.monitor.interval(),
            probe,
            publisher,
            commands_tx,
            commands_rx,
        })
    }

    /// A handle for the dispatcher and presentation layer.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            watch: self.publisher.watch(),
            commands: self.commands_tx.clone(),
        }
    }

    /// Latest published state.
    pub fn current(&self) -> ConnectivityState {
        self.publisher.current()
    }

    /// Run one sweep: try endpoints in order, stop at the first live one.
    ///
    /// Individual failures are logged and swallowed; only the aggregate
    /// state is published.
    pub async fn probe(&self) -> ConnectivityState {
        let mut next = ConnectivityState::Disconnected;
        for endpoint in &self.endpoints {
            let status = self.probe.check(endpoint).await;
            if status.is_available() {
                debug!(endpoint = %endpoint, %status, "endpoint live");
                next = ConnectivityState::Connected {
                    endpoint: endpoint.clone(),
                };
                break;
            }
            warn!(endpoint = %endpoint, %status, "endpoint probe failed");
        }

        if matches!(next, ConnectivityState::Disconnected) {
            warn!(
                endpoints = self.endpoints.len(),
                "all backend endpoints failed"
            );
        }
        self.publish(next.clone());
        next
    }

    /// Run until `cancel` fires: probe at startup, then every interval and
    /// whenever a command arrives.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            endpoints = self.endpoints.len(),
            interval_secs = self.interval.as_secs(),
            "health monitor started"
        );

        if !self.sweep_unless_cancelled(&cancel).await {
            info!("health monitor cancelled");
            return;
        }

        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let proceed = tokio::select! {
                biased;
                _ = cancel.cancelled() => false,
                _ = ticker.tick() => self.sweep_unless_cancelled(&cancel).await,
                Some(command) = self.commands_rx.recv() => {
                    self.handle_command(command, &cancel).await
                }
            };
            if !proceed {
                break;
            }
        }
        info!("health monitor cancelled");
    }

    /// Spawn [`run`](Self::run) as a background task.
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn handle_command(&self, command: MonitorCommand, cancel: &CancellationToken) -> bool {
        match command {
            MonitorCommand::ConnectionLost { endpoint } => {
                let bound = self.publisher.current();
                if bound.endpoint() != Some(endpoint.as_str()) {
                    debug!(endpoint = %endpoint, state = %bound, "stale connection-lost report ignored");
                    return true;
                }
                warn!(endpoint = %endpoint, "bound endpoint dropped, re-probing");
                self.publish(ConnectivityState::Disconnected);
                self.sweep_unless_cancelled(cancel).await
            }
            MonitorCommand::ProbeNow => self.sweep_unless_cancelled(cancel).await,
        }
    }

    /// Returns `false` if cancellation interrupted the sweep.
    async fn sweep_unless_cancelled(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = self.probe() => true,
        }
    }

    fn publish(&self, state: ConnectivityState) {
        let label = state.to_string();
        if self.publisher.publish(state) {
            info!(state = %label, "connectivity changed");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(urls: Vec<String>, probe_timeout_ms: u64) -> AgriConfig {
        let mut config = AgriConfig::default();
        config.endpoints.urls = urls;
        config.monitor.probe_timeout_ms = probe_timeout_ms;
        config
    }

    async fn live_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    async fn never_probed_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn first_live_endpoint_wins_and_later_ones_are_skipped() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&slow)
            .await;
        let live = live_server().await;
        let skipped = never_probed_server().await;

        let monitor = HealthMonitor::new(&config_for(
            vec![slow.uri(), live.uri(), skipped.uri()],
            300,
        ))
        .unwrap();

        let started = Instant::now();
        let state = monitor.probe().await;
        let elapsed = started.elapsed();

        assert_eq!(
            state,
            ConnectivityState::Connected {
                endpoint: live.uri()
            }
        );
        assert!(elapsed >= Duration::from_millis(300), "A's timeout must elapse");
        assert!(elapsed < Duration::from_secs(3), "probe took {elapsed:?}");
        // `skipped` verifies `.expect(0)` on drop.
    }

    #[tokio::test]
    async fn all_failing_is_disconnected() {
        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&broken)
            .await;

        let monitor = HealthMonitor::new(&config_for(
            vec![broken.uri(), "http://127.0.0.1:59997".into()],
            500,
        ))
        .unwrap();
        assert_eq!(monitor.current(), ConnectivityState::Checking);
        assert_eq!(monitor.probe().await, ConnectivityState::Disconnected);
        assert_eq!(monitor.handle().current(), ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn run_probes_at_startup_and_stops_on_cancel() {
        let live = live_server().await;
        let monitor = HealthMonitor::new(&config_for(vec![live.uri()], 1_000)).unwrap();
        let handle = monitor.handle();
        let mut watch = handle.watch();
        let cancel = CancellationToken::new();
        let task = monitor.spawn(cancel.clone());

        let state = tokio::time::timeout(Duration::from_secs(2), watch.wait_for(|s| s.is_connected()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.endpoint(), Some(live.uri().as_str()));

        cancel.cancel();
        let finished = tokio::time::timeout(Duration::from_secs(2), task).await;
        assert!(finished.is_ok(), "monitor task should finish after cancel");
    }

    #[tokio::test]
    async fn connection_lost_triggers_immediate_reprobe() {
        let first = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .mount(&first)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&first)
            .await;
        let second = live_server().await;

        let mut config = config_for(vec![first.uri(), second.uri()], 1_000);
        config.monitor.interval_secs = 3_600;
        let monitor = HealthMonitor::new(&config).unwrap();
        let handle = monitor.handle();
        let mut watch = handle.watch();
        let cancel = CancellationToken::new();
        let task = monitor.spawn(cancel.clone());

        let first_uri = first.uri();
        tokio::time::timeout(
            Duration::from_secs(2),
            watch.wait_for(|s| s.endpoint() == Some(first_uri.as_str())),
        )
        .await
        .unwrap()
        .unwrap();

        handle.report_connection_lost(&first.uri());

        let second_uri = second.uri();
        let state = tokio::time::timeout(
            Duration::from_secs(2),
            watch.wait_for(|s| s.endpoint() == Some(second_uri.as_str())),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(state.is_connected());

        cancel.cancel();
        let _ = task.await;
    }

    #[tokio::test]
    async fn stale_connection_lost_is_ignored() {
        let live = live_server().await;
        let mut config = config_for(vec![live.uri()], 1_000);
        config.monitor.interval_secs = 3_600;
        let monitor = HealthMonitor::new(&config).unwrap();
        monitor.probe().await;

        let cancel = CancellationToken::new();
        let handled = monitor
            .handle_command(
                MonitorCommand::ConnectionLost {
                    endpoint: "http://elsewhere".into(),
                },
                &cancel,
            )
            .await;
        assert!(handled);
        assert!(monitor.current().is_connected());
    }

    #[tokio::test]
    async fn handle_outlives_monitor_without_panicking() {
        let monitor =
            HealthMonitor::new(&config_for(vec!["http://127.0.0.1:59996".into()], 100)).unwrap();
        let handle = monitor.handle();
        drop(monitor);
        handle.probe_now();
        handle.report_connection_lost("http://127.0.0.1:59996");
        assert_eq!(handle.current(), ConnectivityState::Checking);
    }
}
