//! In-memory serial fakes for tests.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::configs::LinkSettings;
use crate::services::{LinkConnector, LinkTransport};

/// Link settings with every wait set to zero.
pub fn link_settings(port_path: &str) -> LinkSettings {
    LinkSettings {
        port_path: port_path.to_string(),
        baud_rate: 115200,
        settle_ms: 0,
        ack_wait_ms: 0,
        probe_wait_ms: 0,
    }
}

#[derive(Debug, Default)]
struct FakeState {
    offline: bool,
    opens: usize,
    sent: Vec<String>,
    fail_next_write: bool,
    ack: Option<String>,
    pending_ack: bool,
    write_delay: Duration,
    writes_in_flight: usize,
    overlapping_writes: usize,
}

/// Records every line written through any transport it opened.
///
/// Clones share state, so a test keeps one handle while the link owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector whose port cannot be opened until `set_available(true)`.
    pub fn offline() -> Self {
        let fake = Self::default();
        fake.set_available(false);
        fake
    }

    /// Answers every written line with `ack`.
    pub fn with_ack(self, ack: &str) -> Self {
        self.lock().ack = Some(ack.to_string());
        self
    }

    pub fn set_available(&self, available: bool) {
        self.lock().offline = !available;
    }

    pub fn fail_next_write(&self) {
        self.lock().fail_next_write = true;
    }

    /// Holds every subsequent write for `delay` before it is recorded.
    pub fn set_write_delay(&self, delay: Duration) {
        self.lock().write_delay = delay;
    }

    /// Writes that started while another write on this connector was still
    /// in progress.
    pub fn overlapping_writes(&self) -> usize {
        self.lock().overlapping_writes
    }

    pub fn open_count(&self) -> usize {
        self.lock().opens
    }

    /// Lines written so far, without terminators.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.sent.clear();
        state.opens = 0;
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LinkConnector for FakeConnector {
    fn open(&self, port_path: &str, _baud_rate: u32) -> io::Result<Box<dyn LinkTransport>> {
        let mut state = self.lock();
        state.opens += 1;

        if state.offline {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{port_path}: no such device"),
            ));
        }

        Ok(Box::new(FakeTransport {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LinkTransport for FakeTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let delay = {
            let mut state = self.lock();

            if std::mem::take(&mut state.fail_next_write) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
            }

            state.writes_in_flight += 1;
            if state.writes_in_flight > 1 {
                state.overlapping_writes += 1;
            }
            state.write_delay
        };

        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let mut state = self.lock();
        state.writes_in_flight -= 1;
        state.sent.push(line.trim_end_matches(['\r', '\n']).to_string());
        state.pending_ack = state.ack.is_some();

        Ok(())
    }

    fn clear_buffers(&mut self) -> io::Result<()> {
        self.lock().pending_ack = false;
        Ok(())
    }

    fn read_ack(&mut self) -> io::Result<Option<String>> {
        let mut state = self.lock();

        if std::mem::take(&mut state.pending_ack) {
            Ok(state.ack.clone())
        } else {
            Ok(None)
        }
    }
}
