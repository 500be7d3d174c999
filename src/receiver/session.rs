//! Receiver session management
//!
//! Owns the multicast socket and receive thread for one audio source and
//! drives them through start, stop and reconfiguration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use super::config::ReceiverConfig;
use super::hint::{NoPerformanceHint, PerformanceHint, PerformanceToken};
use super::rtp_receiver::RtpReceiveLoop;
use super::socket::{MulticastBinder, SocketBinder};
use super::stats::{ReceiverStats, ReceiverStatsSnapshot};
use crate::audio::AudioSink;
use crate::error::{Aes67Error, Result};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No socket, no thread
    Stopped,
    /// Binding the socket and spawning the receive thread
    Starting,
    /// Receive thread is delivering audio
    Running,
    /// Waiting for the receive thread to exit
    Stopping,
}

impl SessionState {
    /// Check if transition to new state is valid
    #[must_use]
    pub fn can_transition_to(&self, new_state: SessionState) -> bool {
        use SessionState::{Running, Starting, Stopped, Stopping};

        matches!(
            (self, new_state),
            (Stopped, Starting)
                | (Starting, Running | Stopped)
                | (Running, Stopping)
                | (Stopping, Stopped)
        )
    }

    /// Is the receive thread alive in this state?
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Running | SessionState::Stopping)
    }
}

/// One AES67 receiver
///
/// Exclusively owns its socket and receive thread. Dropping the session
/// stops it.
pub struct ReceiverSession {
    config: ReceiverConfig,
    state: SessionState,
    sink: Arc<dyn AudioSink>,
    binder: Arc<dyn SocketBinder>,
    hint: Arc<dyn PerformanceHint>,
    running: Arc<AtomicBool>,
    stats: Arc<ReceiverStats>,
    worker: Option<JoinHandle<Result<()>>>,
    last_failure: Option<Aes67Error>,
}

impl ReceiverSession {
    /// Create a stopped session that joins real multicast groups
    pub fn new(config: ReceiverConfig, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            config,
            state: SessionState::Stopped,
            sink,
            binder: Arc::new(MulticastBinder),
            hint: Arc::new(NoPerformanceHint),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(ReceiverStats::new()),
            worker: None,
            last_failure: None,
        }
    }

    /// Use a different socket binder
    #[must_use]
    pub fn with_binder(mut self, binder: Arc<dyn SocketBinder>) -> Self {
        self.binder = binder;
        self
    }

    /// Use a performance hint for the receive thread
    #[must_use]
    pub fn with_performance_hint(mut self, hint: Arc<dyn PerformanceHint>) -> Self {
        self.hint = hint;
        self
    }

    /// Get current state
    ///
    /// A session whose receive thread exited on its own reports `Stopped`.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.state == SessionState::Running && self.worker_exited() {
            SessionState::Stopped
        } else {
            self.state
        }
    }

    /// Get the active configuration
    #[must_use]
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Snapshot of the receive counters
    #[must_use]
    pub fn stats(&self) -> ReceiverStatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether the receive thread is up and has not exited on its own
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
            && self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    fn worker_exited(&self) -> bool {
        self.worker.as_ref().is_some_and(JoinHandle::is_finished)
    }

    fn set_state(&mut self, new_state: SessionState) {
        debug_assert!(
            self.state.can_transition_to(new_state),
            "invalid session transition {:?} -> {:?}",
            self.state,
            new_state
        );
        tracing::debug!("Session state {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
    }

    /// Bind the socket and start receiving
    ///
    /// Succeeds without doing anything if the session is already running or
    /// no multicast group is configured. A receive thread that exited on its
    /// own is reaped first, so the session binds again; the error that ended
    /// it stays available from [`poll`](Self::poll).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unusable config, `BindFailed` if the
    /// socket cannot be set up, or `ThreadSpawn`. The session stays `Stopped`.
    pub fn start(&mut self) -> Result<()> {
        if self.worker_exited() {
            self.join_worker();
        }

        if self.state != SessionState::Stopped {
            return Ok(());
        }

        self.config.validate()?;

        if !self.config.has_group() {
            tracing::info!("No multicast group configured, receiver idle");
            return Ok(());
        }

        self.set_state(SessionState::Starting);

        let socket = match self.binder.bind(&self.config) {
            Ok(socket) => socket,
            Err(e) => {
                tracing::warn!("Receiver start failed: {}", e);
                self.set_state(SessionState::Stopped);
                return Err(e);
            }
        };

        self.running.store(true, Ordering::Release);

        let receive_loop = RtpReceiveLoop::new(
            socket,
            self.config.stream_format(),
            Arc::clone(&self.sink),
            Arc::clone(&self.running),
            Arc::clone(&self.stats),
            self.config.receive_timeout,
        );
        let hint = Arc::clone(&self.hint);

        let spawned = thread::Builder::new()
            .name("aes67-rx".to_string())
            .spawn(move || {
                let _token = PerformanceToken::acquire(hint);
                receive_loop.run()
            });

        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                self.running.store(false, Ordering::Release);
                self.set_state(SessionState::Stopped);
                return Err(Aes67Error::ThreadSpawn(e));
            }
        }

        self.set_state(SessionState::Running);
        tracing::info!(
            "Receiving {} {} {} from {}:{} (interface {})",
            self.config.sample_format,
            self.config.sample_rate,
            self.config.speaker_layout,
            self.config.multicast_group,
            self.config.port,
            self.config.interface_addr().unwrap_or("any"),
        );

        Ok(())
    }

    /// Stop receiving and wait for the receive thread to exit
    ///
    /// A no-op when the session is not running.
    pub fn stop(&mut self) {
        if self.join_worker() {
            tracing::info!("Stopped receiving from {}", self.config.multicast_group);
        }
    }

    /// Join the receive thread, keeping the error that ended it for `poll`
    ///
    /// Returns whether there was a thread to join.
    fn join_worker(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };

        self.set_state(SessionState::Stopping);
        self.running.store(false, Ordering::Release);

        match worker.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("Receive loop failed: {}", e);
                self.last_failure = Some(e);
            }
            Err(_) => {
                tracing::error!("Receive thread panicked");
                self.last_failure = Some(Aes67Error::ReceiverPanicked);
            }
        }

        self.set_state(SessionState::Stopped);
        true
    }

    /// Replace the configuration, restarting if the session was running
    ///
    /// Always performs a full stop before the new configuration takes effect.
    ///
    /// # Errors
    ///
    /// Returns any error from [`start`](Self::start); the session is then `Stopped`.
    pub fn reconfigure(&mut self, config: ReceiverConfig) -> Result<()> {
        self.stop();
        self.config = config;
        self.stats.reset();
        self.start()
    }

    /// Reap a receive thread that exited on its own
    ///
    /// Returns the error that ended the last receive thread, once, even if
    /// the session was stopped or restarted since. Afterwards the session is
    /// `Stopped` unless it was started again.
    pub fn poll(&mut self) -> Option<Aes67Error> {
        if self.worker_exited() {
            self.join_worker();
        }
        self.last_failure.take()
    }
}

impl Drop for ReceiverSession {
    fn drop(&mut self) {
        self.stop();
    }
}
