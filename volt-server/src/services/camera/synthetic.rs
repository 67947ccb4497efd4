use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use image::{Rgb, RgbImage};

use crate::errors::CameraError;
use crate::services::camera::{CameraBackend, CameraSource, CaptureHints};

/// Generated test pattern for benches without a camera.
///
/// By default every index opens. Tests narrow that down with
/// [`SyntheticBackend::with_indices`] and mark indices whose reads always
/// fail with [`SyntheticBackend::with_dead_indices`]. Clones share their
/// counters, so a test can keep a handle while the service owns another.
#[derive(Debug, Clone, Default)]
pub struct SyntheticBackend {
    indices: Option<HashSet<u32>>,
    dead: HashSet<u32>,
    read_delay: Duration,
    attempts: Arc<Mutex<Vec<u32>>>,
    read_failures: Arc<AtomicU32>,
    live: Arc<AtomicUsize>,
    peak_live: Arc<AtomicUsize>,
}

impl SyntheticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.indices = Some(indices.into_iter().collect());
        self
    }

    pub fn with_dead_indices(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.dead = indices.into_iter().collect();
        self
    }

    /// Makes every read block for `delay` before producing its frame.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// The next `count` reads on any open source fail, then reads recover.
    pub fn fail_next_reads(&self, count: u32) {
        self.read_failures.store(count, Ordering::Release);
    }

    pub fn pending_read_failures(&self) -> u32 {
        self.read_failures.load(Ordering::Acquire)
    }

    /// Indices `open` was called with, in call order.
    pub fn attempts(&self) -> Vec<u32> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most sources ever open at the same time.
    pub fn peak_live_sources(&self) -> usize {
        self.peak_live.load(Ordering::Acquire)
    }
}

impl CameraBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn open(&self, index: u32, hints: CaptureHints) -> Result<Box<dyn CameraSource>, CameraError> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(index);

        if self.indices.as_ref().is_some_and(|set| !set.contains(&index)) {
            return Err(CameraError::Open {
                index,
                reason: "no such device".into(),
            });
        }

        let live = self.live.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_live.fetch_max(live, Ordering::AcqRel);

        Ok(Box::new(SyntheticSource {
            width: hints.width.max(1),
            height: hints.height.max(1),
            dead: self.dead.contains(&index),
            read_delay: self.read_delay,
            read_failures: Arc::clone(&self.read_failures),
            live: Arc::clone(&self.live),
            tick: 0,
        }))
    }
}

struct SyntheticSource {
    width: u32,
    height: u32,
    dead: bool,
    read_delay: Duration,
    read_failures: Arc<AtomicU32>,
    live: Arc<AtomicUsize>,
    tick: u32,
}

impl CameraSource for SyntheticSource {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        if self.dead {
            return Err(CameraError::Read("synthetic device returns no data".into()));
        }

        if !self.read_delay.is_zero() {
            thread::sleep(self.read_delay);
        }

        if self
            .read_failures
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CameraError::Read("synthetic read dropped".into()));
        }

        self.tick = self.tick.wrapping_add(1);

        // Diagonal gradient with a vertical bar sweeping across.
        let bar = (self.tick * 4) % self.width;
        let (w, h) = (self.width, self.height);
        Ok(RgbImage::from_fn(w, h, |x, y| {
            if x.abs_diff(bar) < 4 {
                Rgb([255, 255, 255])
            } else {
                Rgb([(x * 255 / w) as u8, (y * 255 / h) as u8, 128])
            }
        }))
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}
