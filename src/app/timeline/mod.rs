//! Timeline overlay
//!
//! Maps the time domain of the source video onto fractions of the timeline
//! width: a moving progress indicator plus one static band per removed
//! segment. Fractions are `0.0..=1.0` of the full width; band fractions are
//! not clamped, so a segment ending past the duration yields a band running
//! past the right edge.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::model::*;
use crate::ports::{PlaybackPort, PlaybackSubscription};

/// Horizontal placement of one removed segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentBand {
    pub left: f64,
    pub width: f64,
}

/// Everything needed to draw the overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineModel {
    /// Playback position as a fraction of the duration
    pub progress: f64,
    pub bands: Vec<SegmentBand>,
}

/// Bands for `segments` over a known, positive `duration`
pub fn compute_bands(segments: &[RemovedSegment], duration: f64) -> Vec<SegmentBand> {
    segments
        .iter()
        .map(|segment| SegmentBand {
            left: segment.start / duration,
            width: (segment.end - segment.start) / duration,
        })
        .collect()
}

/// Progress fraction, `None` while the duration is unknown or zero
pub fn progress_fraction(position: &PlaybackPosition) -> Option<f64> {
    let duration = position.known_duration()?;
    Some((position.current_time / duration).clamp(0.0, 1.0))
}

/// Overlay state bound to at most one playback source
#[derive(Debug)]
pub struct TimelineOverlay {
    segments: Arc<[RemovedSegment]>,
    bands: Vec<SegmentBand>,
    bands_duration: Option<f64>,
    position: PlaybackPosition,
    subscription: Option<PlaybackSubscription>,
}

impl Default for TimelineOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineOverlay {
    pub fn new() -> Self {
        Self {
            segments: Arc::from(Vec::new()),
            bands: Vec::new(),
            bands_duration: None,
            position: PlaybackPosition::default(),
            subscription: None,
        }
    }

    /// Listen to `source`, releasing any previous subscription first
    pub fn attach(&mut self, source: &dyn PlaybackPort) {
        self.subscription = None;
        let subscription = source.subscribe();
        let position = subscription.current();
        self.subscription = Some(subscription);
        debug!(?position, "Timeline attached to playback source");
        self.on_time_update(position);
    }

    /// Stop listening; the overlay keeps its last position
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Timeline detached from playback source");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the segment list; bands are recomputed only for a new list
    pub fn set_segments(&mut self, segments: Arc<[RemovedSegment]>) {
        if Arc::ptr_eq(&self.segments, &segments) {
            return;
        }
        self.segments = segments;
        self.recompute_bands();
    }

    pub fn segments(&self) -> &[RemovedSegment] {
        &self.segments
    }

    /// Handle one time-update event
    pub fn on_time_update(&mut self, position: PlaybackPosition) {
        trace!(current = position.current_time, duration = ?position.duration, "Time update");
        self.position = position;
        if self.bands_duration != position.known_duration() {
            self.recompute_bands();
        }
    }

    /// Wait for the next time-update from the attached source.
    ///
    /// Returns `None` when detached or once the source has gone away.
    pub async fn next_update(&mut self) -> Option<PlaybackPosition> {
        let position = self.subscription.as_mut()?.changed().await?;
        self.on_time_update(position);
        Some(position)
    }

    /// Current rendering model, absent until the duration is known
    pub fn model(&self) -> Option<TimelineModel> {
        let progress = progress_fraction(&self.position)?;
        Some(TimelineModel {
            progress,
            bands: self.bands.clone(),
        })
    }

    fn recompute_bands(&mut self) {
        self.bands_duration = self.position.known_duration();
        self.bands = match self.bands_duration {
            Some(duration) => compute_bands(&self.segments, duration),
            None => Vec::new(),
        };
    }
}

impl TimelineModel {
    /// Draw the overlay as a single line of `width` cells.
    ///
    /// `=` marks kept video, `x` removed segments and `|` the playhead.
    /// Bands running past either edge are cut at the edge.
    pub fn render_bar(&self, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let mut cells = vec!['='; width];
        for band in &self.bands {
            let (from, to) = cell_span(band.left, band.left + band.width, width);
            for cell in &mut cells[from..to] {
                *cell = 'x';
            }
        }
        let playhead = ((self.progress * width as f64) as usize).min(width - 1);
        cells[playhead] = '|';
        cells.into_iter().collect()
    }
}

fn cell_span(start: f64, end: f64, width: usize) -> (usize, usize) {
    let to_cell = |fraction: f64| (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    let from = to_cell(start);
    // Non-empty bands always cover at least one cell
    let to = to_cell(end).max(if end > start { from + 1 } else { from });
    (from.min(width), to.min(width))
}
