use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use image::RgbImage;
use image::imageops::{self, FilterType};
use tokio::sync::Mutex;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

use crate::configs::CameraSettings;
use crate::errors::CameraError;
use crate::services::camera::{CameraBackend, CameraSource, CaptureHints, mjpeg};

/// How long `stop` waits for the capture loop before returning anyway.
const STOP_TIMEOUT: Duration = Duration::from_millis(500);

/// Longest uninterrupted sleep inside the capture loop.
const PAUSE_SLICE: Duration = Duration::from_millis(50);

/// A captured frame and its multipart stream part, encoded once on the
/// capture thread and shared by every stream reader.
#[derive(Debug)]
pub struct Frame {
    pub image: RgbImage,
    pub part: Bytes,
}

impl Frame {
    pub fn encode(image: RgbImage, stream_quality: u8) -> Result<Self, CameraError> {
        let jpeg = mjpeg::encode_jpeg(&image, stream_quality)?;

        Ok(Self {
            part: mjpeg::part(&jpeg),
            image,
        })
    }
}

/// Holds only the most recent frame. Writers replace it, readers clone the `Arc`.
#[derive(Debug, Default)]
pub struct FrameSlot {
    frame: RwLock<Option<Arc<Frame>>>,
}

impl FrameSlot {
    pub fn publish(&self, frame: Frame) {
        *self.frame.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(frame));
    }

    pub fn latest(&self) -> Option<Arc<Frame>> {
        self.frame.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.frame.write().unwrap_or_else(PoisonError::into_inner).take();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { index: u32 },
    AlreadyRunning,
}

struct CaptureRun {
    alive: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct CaptureState {
    run: Option<CaptureRun>,
    /// A loop that outlived `stop` and may still hold the device.
    draining: Option<JoinHandle<()>>,
}

pub struct CameraService {
    settings: CameraSettings,
    backend: Arc<dyn CameraBackend>,
    slot: Arc<FrameSlot>,
    running: AtomicBool,
    active_index: AtomicU32,
    state: Mutex<CaptureState>,
}

impl CameraService {
    pub fn new(settings: CameraSettings, backend: Arc<dyn CameraBackend>) -> Self {
        let index = settings.index;

        Self {
            settings,
            backend,
            slot: Arc::new(FrameSlot::default()),
            running: AtomicBool::new(false),
            active_index: AtomicU32::new(index),
            state: Mutex::new(CaptureState::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Index of the open camera, or the configured one while stopped.
    pub fn camera_index(&self) -> u32 {
        self.active_index.load(Ordering::Acquire)
    }

    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.slot.latest()
    }

    /// Opens the first camera that delivers a frame and starts the capture loop.
    pub async fn start(&self) -> Result<StartOutcome, CameraError> {
        let mut state = self.state.lock().await;

        if state.run.is_some() {
            return Ok(StartOutcome::AlreadyRunning);
        }

        if let Some(handle) = state.draining.take() {
            tracing::debug!("Waiting for the previous capture loop to release the camera");
            if let Err(e) = handle.await {
                tracing::warn!("Previous capture loop failed: {}", e);
            }
        }

        let backend = Arc::clone(&self.backend);
        let settings = self.settings.clone();
        let (source, index, first) = task::spawn_blocking(move || {
            let (source, index, image) = open_first(backend.as_ref(), &settings)?;
            let frame = Frame::encode(fit_frame(image, &settings), settings.stream_quality)?;
            Ok::<_, CameraError>((source, index, frame))
        })
        .await
        .map_err(|e| CameraError::TaskFailed(e.to_string()))??;

        self.slot.publish(first);
        self.active_index.store(index, Ordering::Release);

        let alive = Arc::new(AtomicBool::new(true));
        let handle = task::spawn_blocking({
            let alive = Arc::clone(&alive);
            let slot = Arc::clone(&self.slot);
            let settings = self.settings.clone();
            move || capture_loop(source, &alive, &slot, &settings)
        });

        state.run = Some(CaptureRun { alive, handle });
        self.running.store(true, Ordering::Release);

        tracing::info!("Camera {} started ({} backend)", index, self.backend.name());

        Ok(StartOutcome::Started { index })
    }

    /// Stops the capture loop and clears the frame slot. Safe to call when stopped.
    ///
    /// Waits at most [`STOP_TIMEOUT`]. A loop still blocked in a read after
    /// that is kept, and the next `start` waits for it to let go of the device.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;

        self.running.store(false, Ordering::Release);

        if let Some(CaptureRun { alive, mut handle }) = state.run.take() {
            alive.store(false, Ordering::Release);

            match time::timeout(STOP_TIMEOUT, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Capture loop failed: {}", e),
                Err(_) => {
                    tracing::warn!("Capture loop did not stop within {:?}", STOP_TIMEOUT);
                    state.draining = Some(handle);
                }
            }

            tracing::info!("Camera stopped");
        }

        self.slot.clear();
        self.active_index.store(self.settings.index, Ordering::Release);
    }

    /// Latest frame as a JPEG at snapshot quality.
    pub async fn snapshot(&self) -> Result<Bytes, CameraError> {
        if !self.is_running() {
            return Err(CameraError::NoFrame);
        }

        let frame = self.slot.latest().ok_or(CameraError::NoFrame)?;
        let quality = self.settings.snapshot_quality;

        task::spawn_blocking(move || mjpeg::encode_jpeg(&frame.image, quality))
            .await
            .map_err(|e| CameraError::TaskFailed(e.to_string()))?
    }

    /// Multipart body parts, one per pacing tick, until the camera stops.
    pub fn stream(self: &Arc<Self>) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + use<> {
        let mut ticker = time::interval(self.settings.stream_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let watcher = Arc::clone(self);
        let camera = Arc::clone(self);

        IntervalStream::new(ticker)
            .take_while(move |_| watcher.is_running())
            .filter_map(move |_| {
                camera
                    .latest_frame()
                    .map(|frame| Ok::<_, Infallible>(frame.part.clone()))
            })
    }
}

fn open_first(
    backend: &dyn CameraBackend,
    settings: &CameraSettings,
) -> Result<(Box<dyn CameraSource>, u32, RgbImage), CameraError> {
    let hints = CaptureHints {
        width: settings.capture_width,
        height: settings.capture_height,
        fps: settings.capture_fps,
    };

    for index in settings.candidate_indices() {
        let mut source = match backend.open(index, hints) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Camera {} unavailable: {}", index, e);
                continue;
            }
        };

        for attempt in 1..=settings.open_attempts {
            match source.read_frame() {
                Ok(frame) => return Ok((source, index, frame)),
                Err(e) => tracing::debug!("Camera {} read attempt {} failed: {}", index, attempt, e),
            }
        }

        tracing::warn!("Camera {} opened but produced no frame", index);
    }

    Err(CameraError::NoCameraAvailable)
}

fn capture_loop(
    mut source: Box<dyn CameraSource>,
    alive: &AtomicBool,
    slot: &FrameSlot,
    settings: &CameraSettings,
) {
    while alive.load(Ordering::Acquire) {
        match source.read_frame() {
            Ok(image) => {
                match Frame::encode(fit_frame(image, settings), settings.stream_quality) {
                    Ok(frame) => {
                        if !alive.load(Ordering::Acquire) {
                            break;
                        }
                        slot.publish(frame);
                    }
                    Err(e) => tracing::warn!("Dropping captured frame: {}", e),
                }
            }
            Err(e) => {
                tracing::warn!("Camera read failed: {}", e);
                pause(alive, settings.retry_backoff());
                continue;
            }
        }

        pause(alive, settings.frame_interval());
    }

    drop(source);
    tracing::debug!("Capture loop exited, camera released");
}

fn fit_frame(frame: RgbImage, settings: &CameraSettings) -> RgbImage {
    if frame.dimensions() == (settings.frame_width, settings.frame_height) {
        frame
    } else {
        imageops::resize(&frame, settings.frame_width, settings.frame_height, FilterType::Triangle)
    }
}

/// Sleeps for `duration` in short slices, returning early once `alive` clears.
fn pause(alive: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;

    while alive.load(Ordering::Acquire) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(PAUSE_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::CameraBackendKind;
    use crate::services::camera::SyntheticBackend;

    fn settings() -> CameraSettings {
        CameraSettings {
            backend: CameraBackendKind::Synthetic,
            index: 1,
            fallback_indices: vec![0, 2, 3],
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30,
            frame_width: 320,
            frame_height: 240,
            frame_interval_ms: 5,
            stream_interval_ms: 5,
            stream_quality: 80,
            snapshot_quality: 95,
            open_attempts: 5,
            retry_backoff_ms: 20,
        }
    }

    fn camera(backend: SyntheticBackend) -> Arc<CameraService> {
        Arc::new(CameraService::new(settings(), Arc::new(backend)))
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        time::timeout(Duration::from_secs(2), async {
            while !condition() {
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_snapshot_before_start_has_no_frame() {
        let camera = camera(SyntheticBackend::new());

        assert!(matches!(camera.snapshot().await, Err(CameraError::NoFrame)));
        assert!(!camera.is_running());
    }

    #[tokio::test]
    async fn test_start_publishes_resized_frame() {
        let camera = camera(SyntheticBackend::new());

        assert_eq!(camera.start().await.unwrap(), StartOutcome::Started { index: 1 });
        assert!(camera.is_running());

        let frame = camera.latest_frame().unwrap();
        assert_eq!(frame.image.dimensions(), (320, 240));
        assert!(frame.part.starts_with(b"--frame\r\n"));

        let jpeg = camera.snapshot().await.unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));

        camera.stop().await;
    }

    #[tokio::test]
    async fn test_start_twice_reports_already_running() {
        let camera = camera(SyntheticBackend::new());

        camera.start().await.unwrap();
        assert_eq!(camera.start().await.unwrap(), StartOutcome::AlreadyRunning);

        camera.stop().await;
    }

    #[tokio::test]
    async fn test_start_walks_fallbacks_in_order() {
        let backend = SyntheticBackend::new()
            .with_indices([0, 3])
            .with_dead_indices([0]);
        let camera = camera(backend.clone());

        assert_eq!(camera.start().await.unwrap(), StartOutcome::Started { index: 3 });
        assert_eq!(backend.attempts(), vec![1, 0, 2, 3]);
        assert_eq!(camera.camera_index(), 3);

        camera.stop().await;
        assert_eq!(camera.camera_index(), 1);
    }

    #[tokio::test]
    async fn test_start_fails_without_camera() {
        let camera = camera(SyntheticBackend::new().with_indices(Vec::<u32>::new()));

        assert!(matches!(camera.start().await, Err(CameraError::NoCameraAvailable)));
        assert!(!camera.is_running());
    }

    #[tokio::test]
    async fn test_stop_clears_slot_and_is_idempotent() {
        let camera = camera(SyntheticBackend::new());
        camera.start().await.unwrap();

        camera.stop().await;
        camera.stop().await;

        assert!(!camera.is_running());
        assert!(camera.latest_frame().is_none());
        assert!(matches!(camera.snapshot().await, Err(CameraError::NoFrame)));
    }

    #[tokio::test]
    async fn test_capture_recovers_after_read_failures() {
        let backend = SyntheticBackend::new();
        let camera = camera(backend.clone());
        camera.start().await.unwrap();

        backend.fail_next_reads(3);
        wait_until(|| backend.pending_read_failures() == 0).await;

        let stale = camera.latest_frame().unwrap();
        wait_until(|| {
            camera
                .latest_frame()
                .is_some_and(|frame| !Arc::ptr_eq(&frame, &stale))
        })
        .await;
        assert!(camera.is_running());

        camera.stop().await;
    }

    #[tokio::test]
    async fn test_restart_waits_for_slow_capture_loop() {
        let backend = SyntheticBackend::new().with_read_delay(Duration::from_millis(800));
        let camera = camera(backend.clone());

        camera.start().await.unwrap();
        // The loop is blocked in a read longer than the stop timeout.
        camera.stop().await;
        assert!(!camera.is_running());

        camera.start().await.unwrap();
        assert_eq!(backend.peak_live_sources(), 1);

        camera.stop().await;
    }

    #[tokio::test]
    async fn test_stream_yields_parts_and_ends_on_stop() {
        let camera = camera(SyntheticBackend::new());
        camera.start().await.unwrap();

        let mut stream = Box::pin(camera.stream());
        let part = stream.next().await.unwrap().unwrap();
        assert!(part.starts_with(b"--frame\r\nContent-Type: image/jpeg\r\n"));

        camera.stop().await;
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_before_start_is_empty() {
        let camera = camera(SyntheticBackend::new());

        let mut stream = Box::pin(camera.stream());

        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_frame_slot_replaces() {
        let slot = FrameSlot::default();
        slot.publish(Frame::encode(RgbImage::new(2, 2), 80).unwrap());
        slot.publish(Frame::encode(RgbImage::new(4, 4), 80).unwrap());

        assert_eq!(slot.latest().unwrap().image.dimensions(), (4, 4));

        slot.clear();
        assert!(slot.latest().is_none());
    }
}
