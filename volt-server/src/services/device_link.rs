//! Managed serial link to one microcontroller.
//!
//! A [`DeviceLink`] owns at most one open transport. Every write goes through
//! the link guard, so lines sent to the same board never interleave, and a
//! missing or broken transport is reopened lazily by the next caller.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tokio::sync::Mutex;
use tokio::task;
use volt_api::protocol::{FacePose, HandPose};

use crate::configs::LinkSettings;
use crate::errors::DeviceError;

/// Byte-level access to an open port.
pub trait LinkTransport: Send {
    /// Writes the whole line and flushes.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Discards anything buffered in either direction.
    fn clear_buffers(&mut self) -> io::Result<()>;

    /// Returns one pending line if the board sent anything, without blocking
    /// on an idle port.
    fn read_ack(&mut self) -> io::Result<Option<String>>;
}

pub trait LinkConnector: Send + Sync {
    fn open(&self, port_path: &str, baud_rate: u32) -> io::Result<Box<dyn LinkTransport>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Hand,
    Face,
}

impl DeviceKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceKind::Hand => "Hand",
            DeviceKind::Face => "Face",
        }
    }

    /// Neutral pose written right after the port opens.
    pub fn probe_line(&self) -> String {
        match self {
            DeviceKind::Hand => HandPose::OPEN.to_command(),
            DeviceKind::Face => FacePose::NEUTRAL.to_command(),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Slot = Option<Box<dyn LinkTransport>>;

pub struct DeviceLink {
    kind: DeviceKind,
    settings: LinkSettings,
    connector: Arc<dyn LinkConnector>,
    transport: Mutex<Slot>,
    connected: AtomicBool,
}

impl DeviceLink {
    pub fn new(kind: DeviceKind, settings: LinkSettings, connector: Arc<dyn LinkConnector>) -> Self {
        Self {
            kind,
            settings,
            connector,
            transport: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn port_path(&self) -> &str {
        &self.settings.port_path
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Reopens the port, dropping any transport currently held.
    pub async fn connect(self: &Arc<Self>) -> Result<(), DeviceError> {
        self.blocking(|link| {
            let mut slot = link.transport.blocking_lock();
            link.connect_locked(&mut slot)
        })
        .await
    }

    /// Sends one command line and returns the acknowledgement, if the board
    /// answered within the wait window.
    pub async fn send(self: &Arc<Self>, line: impl Into<String>) -> Result<Option<String>, DeviceError> {
        let line = line.into();
        self.blocking(move |link| link.send_blocking(&line)).await
    }

    /// Reports connectivity, attempting exactly one reconnect when the link
    /// is down. A transport opened by a concurrent caller is kept as is.
    pub async fn probe(self: &Arc<Self>) -> bool {
        if self.is_connected() {
            return true;
        }

        let outcome = self
            .blocking(|link| {
                let mut slot = link.transport.blocking_lock();
                if slot.is_some() {
                    return Ok(());
                }
                link.connect_locked(&mut slot)
            })
            .await;

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{} probe failed: {}", self.kind, e);
                false
            }
        }
    }

    pub async fn close(self: &Arc<Self>) {
        let closed = self
            .blocking(|link| {
                let mut slot = link.transport.blocking_lock();
                if slot.take().is_some() {
                    tracing::info!("Arduino {} port {} closed", link.kind, link.settings.port_path);
                }
                link.connected.store(false, Ordering::Release);
                Ok(())
            })
            .await;

        if let Err(e) = closed {
            tracing::warn!("Closing Arduino {} failed: {}", self.kind, e);
        }
    }

    async fn blocking<T, F>(self: &Arc<Self>, f: F) -> Result<T, DeviceError>
    where
        T: Send + 'static,
        F: FnOnce(&DeviceLink) -> Result<T, DeviceError> + Send + 'static,
    {
        let link = Arc::clone(self);

        task::spawn_blocking(move || f(&link))
            .await
            .map_err(|e| DeviceError::TaskFailed(e.to_string()))?
    }

    fn send_blocking(&self, line: &str) -> Result<Option<String>, DeviceError> {
        let mut line = line.to_string();
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let mut slot = self.transport.blocking_lock();

        if slot.is_none() {
            self.connect_locked(&mut slot)?;
        }

        let Some(transport) = slot.as_mut() else {
            return Err(self.not_connected("port closed"));
        };

        if let Err(e) = transport.write_line(&line) {
            tracing::warn!("Arduino {} write failed: {}", self.kind, e);
            *slot = None;
            self.connected.store(false, Ordering::Release);
            return Err(DeviceError::Transport {
                device: self.kind.name(),
                reason: e.to_string(),
            });
        }

        tracing::debug!("-> {}: {}", self.kind, line.trim_end());

        thread::sleep(self.settings.ack_wait());

        Ok(self.drain_ack(&mut **transport))
    }

    fn connect_locked(&self, slot: &mut Slot) -> Result<(), DeviceError> {
        slot.take();
        self.connected.store(false, Ordering::Release);

        let path = self.settings.port_path.as_str();

        tracing::info!("Connecting to Arduino {} on {}", self.kind, path);

        let mut transport = self
            .connector
            .open(path, self.settings.baud_rate)
            .map_err(|e| {
                tracing::warn!("Arduino {} unavailable on {}: {}", self.kind, path, e);
                self.not_connected(e)
            })?;

        thread::sleep(self.settings.settle());

        transport
            .clear_buffers()
            .and_then(|_| transport.write_line(&format!("{}\n", self.kind.probe_line())))
            .map_err(|e| {
                tracing::warn!("Arduino {} probe failed: {}", self.kind, e);
                self.not_connected(e)
            })?;

        thread::sleep(self.settings.probe_wait());
        self.drain_ack(&mut *transport);

        *slot = Some(transport);
        self.connected.store(true, Ordering::Release);

        tracing::info!("Arduino {} ready on {}", self.kind, path);

        Ok(())
    }

    fn drain_ack(&self, transport: &mut dyn LinkTransport) -> Option<String> {
        match transport.read_ack() {
            Ok(Some(ack)) => {
                tracing::debug!("<- {}: {}", self.kind, ack);
                Some(ack)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Arduino {} ack read failed: {}", self.kind, e);
                None
            }
        }
    }

    fn not_connected(&self, reason: impl ToString) -> DeviceError {
        DeviceError::NotConnected {
            device: self.kind.name(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::services::mock::{FakeConnector, link_settings};

    fn link(kind: DeviceKind, fake: &FakeConnector) -> Arc<DeviceLink> {
        Arc::new(DeviceLink::new(kind, link_settings("/dev/fake"), Arc::new(fake.clone())))
    }

    #[tokio::test]
    async fn test_send_connects_lazily_and_probes() {
        let fake = FakeConnector::new();
        let hand = link(DeviceKind::Hand, &fake);

        assert!(!hand.is_connected());

        hand.send("30,0,0,0,180,180,0").await.unwrap();

        assert!(hand.is_connected());
        assert_eq!(fake.open_count(), 1);
        assert_eq!(fake.sent(), vec!["0,0,0,0,180,180,0", "30,0,0,0,180,180,0"]);
    }

    #[tokio::test]
    async fn test_face_probe_line() {
        let fake = FakeConnector::new();
        let face = link(DeviceKind::Face, &fake);

        face.connect().await.unwrap();

        assert_eq!(fake.sent(), vec!["E90 M0"]);
    }

    #[tokio::test]
    async fn test_send_returns_ack() {
        let fake = FakeConnector::new().with_ack("OK");
        let hand = link(DeviceKind::Hand, &fake);

        let ack = hand.send("0,0,0,0,180,180,0").await.unwrap();

        assert_eq!(ack.as_deref(), Some("OK"));
    }

    #[tokio::test]
    async fn test_send_without_port_is_not_connected() {
        let fake = FakeConnector::offline();
        let face = link(DeviceKind::Face, &fake);

        let err = face.send("E85").await.unwrap_err();

        assert!(matches!(err, DeviceError::NotConnected { device: "Face", .. }));
        assert_eq!(fake.open_count(), 1);
        assert!(fake.sent().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_drops_link_and_next_send_reconnects_once() {
        let fake = FakeConnector::new();
        let hand = link(DeviceKind::Hand, &fake);
        hand.connect().await.unwrap();
        fake.clear();

        fake.fail_next_write();
        let err = hand.send("0,180,180,180,0,0,180").await.unwrap_err();
        assert!(matches!(err, DeviceError::Transport { .. }));
        assert!(!hand.is_connected());

        hand.send("0,180,180,180,0,0,180").await.unwrap();
        assert_eq!(fake.open_count(), 2);
        assert_eq!(fake.sent(), vec!["0,0,0,0,180,180,0", "0,180,180,180,0,0,180"]);
    }

    #[tokio::test]
    async fn test_probe_reconnects_exactly_once() {
        let fake = FakeConnector::offline();
        let hand = link(DeviceKind::Hand, &fake);

        assert!(!hand.probe().await);
        assert_eq!(fake.open_count(), 1);

        fake.set_available(true);
        assert!(hand.probe().await);
        assert_eq!(fake.open_count(), 2);

        // A live link answers without touching the port.
        assert!(hand.probe().await);
        assert_eq!(fake.open_count(), 2);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let fake = FakeConnector::new();
        let hand = link(DeviceKind::Hand, &fake);
        hand.connect().await.unwrap();

        hand.close().await;
        hand.close().await;

        assert!(!hand.is_connected());
    }

    #[tokio::test]
    async fn test_probe_keeps_link_opened_by_concurrent_send() {
        let fake = FakeConnector::new();
        let settings = LinkSettings {
            settle_ms: 200,
            ..link_settings("/dev/fake")
        };
        let hand = Arc::new(DeviceLink::new(DeviceKind::Hand, settings, Arc::new(fake.clone())));

        let sending = tokio::spawn({
            let hand = Arc::clone(&hand);
            async move { hand.send("45,0,0,0,180,180,0").await }
        });

        // Let the send take the guard and start settling.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!hand.is_connected());

        assert!(hand.probe().await);
        sending.await.unwrap().unwrap();

        assert_eq!(fake.open_count(), 1);
        assert_eq!(fake.sent(), vec!["0,0,0,0,180,180,0", "45,0,0,0,180,180,0"]);
    }

    #[tokio::test]
    async fn test_links_do_not_block_each_other() {
        let hand_fake = FakeConnector::new();
        let face_fake = FakeConnector::new();
        let hand = link(DeviceKind::Hand, &hand_fake);
        let face = link(DeviceKind::Face, &face_fake);
        hand.connect().await.unwrap();
        face.connect().await.unwrap();

        hand_fake.set_write_delay(Duration::from_millis(500));
        let held = tokio::spawn({
            let hand = Arc::clone(&hand);
            async move { hand.send("0,180,180,180,0,0,180").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = Instant::now();
        face.send("E100 M40").await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(300));
        assert!(!held.is_finished());
        assert_eq!(face_fake.sent().last().unwrap(), "E100 M40");

        held.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_sends_on_one_link_are_serialized() {
        let fake = FakeConnector::new();
        let hand = link(DeviceKind::Hand, &fake);
        hand.connect().await.unwrap();
        fake.clear();
        fake.set_write_delay(Duration::from_millis(5));

        let lines: Vec<String> = (0..8).map(|i| format!("{},0,0,0,180,180,0", i * 10)).collect();
        let tasks: Vec<_> = lines
            .iter()
            .cloned()
            .map(|line| {
                let hand = Arc::clone(&hand);
                tokio::spawn(async move { hand.send(line).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut sent = fake.sent();
        sent.sort();
        let mut expected = lines;
        expected.sort();

        assert_eq!(sent, expected);
        assert_eq!(fake.overlapping_writes(), 0);
        assert_eq!(fake.open_count(), 0);
    }
}
