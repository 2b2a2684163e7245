//! Simulated playback source
//!
//! Stands in for the media element of the source video: it owns a position
//! channel, publishes a time-update on every tick while playing and counts
//! registered listeners.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::model::PlaybackPosition;
use crate::ports::{PlaybackPort, PlaybackSubscription};

/// Interval between time-update events, close to what browsers emit
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Clock-driven playback source
#[derive(Debug)]
pub struct PlaybackClock {
    sender: watch::Sender<PlaybackPosition>,
    listeners: Arc<AtomicUsize>,
}

impl PlaybackClock {
    /// Source positioned at zero with the given duration (`None` = not loaded)
    pub fn new(duration: Option<f64>) -> Self {
        let (sender, _) = watch::channel(PlaybackPosition::new(0.0, duration));
        Self {
            sender,
            listeners: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn position(&self) -> PlaybackPosition {
        *self.sender.borrow()
    }

    /// Jump to `time` and emit a time-update
    pub fn seek(&self, time: f64) {
        let duration = self.position().duration;
        let time = match duration {
            Some(d) if d.is_finite() => time.clamp(0.0, d.max(0.0)),
            _ => time.max(0.0),
        };
        self.sender.send_replace(PlaybackPosition::new(time, duration));
    }

    /// Media finished loading; emit a time-update carrying the duration
    pub fn set_duration(&self, duration: Option<f64>) {
        let current = self.position().current_time;
        self.sender.send_replace(PlaybackPosition::new(current, duration));
    }

    /// Play to the end, advancing `tick * speed` of media time per tick.
    ///
    /// Returns immediately when the duration is unknown or `speed` is not a
    /// finite positive number.
    pub async fn play(&self, tick: Duration, speed: f64) {
        let Some(duration) = self.position().known_duration() else {
            debug!("Playback skipped: duration unknown");
            return;
        };
        if !(speed.is_finite() && speed > 0.0) {
            warn!(speed, "Playback skipped: speed must be a positive number");
            return;
        }
        let step = tick.as_secs_f64() * speed;
        let mut interval = tokio::time::interval(tick);
        interval.tick().await;

        loop {
            interval.tick().await;
            let next = (self.position().current_time + step).min(duration);
            self.seek(next);
            if next >= duration {
                debug!(duration, "Playback reached the end");
                break;
            }
        }
    }
}

impl PlaybackPort for PlaybackClock {
    fn subscribe(&self) -> PlaybackSubscription {
        PlaybackSubscription::register(self.sender.subscribe(), Arc::clone(&self.listeners))
    }

    fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }
}
