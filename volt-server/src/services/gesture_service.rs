use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use volt_api::protocol::{GESTURE_STEP_DELAY, Gesture};

use crate::errors::{ApiError, CommandError};
use crate::services::DeviceLink;

/// Plays named gestures on the hand, one at a time.
pub struct GestureService {
    hand: Arc<DeviceLink>,
    busy: AtomicBool,
    step_delay: Duration,
}

/// Clears the busy flag however the run ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl GestureService {
    pub fn new(hand: Arc<DeviceLink>) -> Self {
        Self::with_step_delay(hand, GESTURE_STEP_DELAY)
    }

    pub fn with_step_delay(hand: Arc<DeviceLink>, step_delay: Duration) -> Self {
        Self {
            hand,
            busy: AtomicBool::new(false),
            step_delay,
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Sends every step of `gesture`, returning how many were written.
    ///
    /// The first failing step aborts the run.
    pub async fn run(&self, gesture: Gesture) -> Result<usize, ApiError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CommandError::GestureInProgress.into());
        }
        let _guard = BusyGuard(&self.busy);

        tracing::info!("Playing gesture {}", gesture);

        let steps = gesture.steps();
        for (i, pose) in steps.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.step_delay).await;
            }
            self.hand.send(pose.to_command()).await?;
        }

        Ok(steps.len())
    }
}
