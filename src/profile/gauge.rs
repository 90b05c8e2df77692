//! Animated rating gauge.
//!
//! The displayed percentage eases linearly from its current reading to a
//! new target over a fixed one-second window, ticking at display refresh
//! cadence. Setting a new target restarts the animation from wherever the
//! value currently sits; the superseded task is cancelled, never stacked.
//! Dropping the gauge cancels any outstanding animation.

use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;

const ANIMATION_WINDOW: Duration = Duration::from_millis(1000);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct RatingGauge {
    value: watch::Sender<f64>,
    current: Mutex<Option<AbortHandle>>,
}

/// Cancellation handle for one in-flight animation.
pub struct AnimationHandle {
    abort: AbortHandle,
}

impl AnimationHandle {
    /// Stop the animation, freezing the gauge at its current reading.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

impl RatingGauge {
    pub fn new(initial: f64) -> Self {
        let (value, _) = watch::channel(initial);
        Self {
            value,
            current: Mutex::new(None),
        }
    }

    /// Current gauge reading.
    pub fn value(&self) -> f64 {
        *self.value.borrow()
    }

    /// Follow the interpolation without polling.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.value.subscribe()
    }

    /// Drive the gauge toward `target` over the animation window. Any
    /// in-flight animation is cancelled first, so targets restart rather
    /// than accumulate.
    pub fn animate_to(&self, target: f64) -> AnimationHandle {
        let mut current = self.current.lock().expect("gauge lock poisoned");
        if let Some(prev) = current.take() {
            prev.abort();
        }

        let start = *self.value.borrow();
        let tx = self.value.clone();
        let task = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut frames = tokio::time::interval(FRAME_INTERVAL);
            loop {
                frames.tick().await;
                let progress =
                    (started.elapsed().as_secs_f64() / ANIMATION_WINDOW.as_secs_f64()).min(1.0);
                tx.send_replace(start + (target - start) * progress);
                if progress >= 1.0 {
                    break;
                }
            }
        });

        let abort = task.abort_handle();
        *current = Some(abort.clone());
        AnimationHandle { abort }
    }
}

impl Drop for RatingGauge {
    fn drop(&mut self) {
        if let Some(handle) = self.current.lock().expect("gauge lock poisoned").take() {
            handle.abort();
        }
    }
}
