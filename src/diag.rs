//! Structured diagnostic events emitted by the pipeline.
//!
//! The pipeline records what it skipped, degraded or failed as explicit
//! events rather than interleaving log calls with the logic. Each event is
//! also mirrored to `tracing` so a host subscriber sees it immediately, but
//! no control-flow decision depends on whether diagnostics are captured.

use tracing::{debug, warn};

use crate::geometry::SegmentKey;
use crate::operations::extrude_panel::ExtrudeStrategy;

/// Reason a strip panel could not be built for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelReject {
    /// Segment shorter than the tolerance.
    ShortSegment,
    /// Segment has no horizontal extent to offset across.
    NoHorizontalExtent,
    /// The container refused to create the face, or created a degenerate one.
    CreationFailed,
}

/// One diagnostic event from a tape build run.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagEvent {
    /// An input point had a non-finite coordinate and was discarded.
    InvalidPoint { index: usize },
    /// Fewer than 3 points survived cleaning; nothing to build.
    DegenerateRing { survivors: usize },
    /// A boundary segment shorter than the tolerance was dropped.
    DroppedSegment { index: usize, length: f64 },
    /// The segment's undirected edge was already processed this run.
    DuplicateSegment { key: SegmentKey },
    /// The conflict-check collaborator vetoed the segment.
    ConflictSkipped { key: SegmentKey },
    /// Panel corners deviate from a common plane by more than the tolerance.
    NonPlanarPanel { deviation: f64 },
    /// No panel was produced for the segment.
    PanelRejected { reason: PanelReject },
    /// One extrusion strategy failed; the next one will be attempted.
    StrategyFailed { strategy: ExtrudeStrategy },
    /// All extrusion strategies failed; the flat panel was returned.
    ExtrusionDegraded,
    /// The panel became invalid after the elevation translate.
    ElevationFailed,
    /// An unexpected error was isolated at the per-segment boundary.
    SegmentFailed { detail: String },
}

/// Sink for pipeline diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<DiagEvent>,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event and mirrors it to `tracing`.
    pub fn record(&mut self, event: DiagEvent) {
        match &event {
            DiagEvent::NonPlanarPanel { .. }
            | DiagEvent::StrategyFailed { .. }
            | DiagEvent::ExtrusionDegraded
            | DiagEvent::ElevationFailed
            | DiagEvent::SegmentFailed { .. } => warn!(?event, "tape build degradation"),
            _ => debug!(?event, "tape build skip"),
        }
        self.events.push(event);
    }

    /// All recorded events, in order.
    #[must_use]
    pub fn events(&self) -> &[DiagEvent] {
        &self.events
    }

    /// Returns `true` if any recorded event matches the predicate.
    pub fn any(&self, pred: impl Fn(&DiagEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}
