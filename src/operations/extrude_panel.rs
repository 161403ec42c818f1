use crate::diag::{DiagEvent, Diagnostics};
use crate::error::Result;
use crate::geometry::{FaceSet, StripPanel};
use crate::math::{Point3, Vector3};
use crate::scene::{FaceId, FaceTag, Scene};

use super::ResolveAdjacency;

/// Phase of the extrusion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrudeState {
    /// Applying the configured vertical elevation offset.
    Elevating,
    /// Attempting the extrusion strategies in order.
    Extruding,
    /// A strategy succeeded and the face set was resolved.
    Done,
    /// Every strategy failed; the flat panel is the result.
    Failed,
}

/// One of the ordered extrusion strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrudeStrategy {
    /// Native push/pull primitive on the panel face.
    Direct,
    /// Copy into a temporary sub-container, extrude there, merge back.
    ScopedCopy,
    /// Explicit reconstruction of top and side faces.
    Manual,
}

/// Result of raising a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtrudeOutcome {
    /// The volume was raised; all of its faces were discovered.
    Extruded(FaceSet),
    /// Degraded result: the flat (possibly elevated) panel face.
    ///
    /// Returned for non-positive heights and when every strategy failed.
    /// Callers must treat this as a valid outcome, not an error.
    Flat(FaceId),
}

/// Uniform signature shared by all extrusion strategies.
///
/// `Ok(Some(seed))` hands back one face of the raised volume;
/// `Ok(None)` means the strategy failed and left the container unchanged.
type Strategy<S> = fn(&StripPanel, f64, &mut S) -> Result<Option<FaceId>>;

/// Raises a strip panel into a volume, with fallbacks.
///
/// Runs an `Elevating → Extruding → Done | Failed` state machine: an
/// optional rigid lift, then the three strategies in order, each attempted
/// only if the previous one failed. Strategies
/// are transactional: a failed strategy removes anything it created before
/// the next one runs.
#[derive(Debug)]
pub struct ExtrudePanel {
    height: f64,
    elevation: f64,
}

impl ExtrudePanel {
    /// Creates a new extrusion operation.
    #[must_use]
    pub fn new(height: f64, elevation: f64) -> Self {
        Self { height, elevation }
    }

    /// Executes the extrusion.
    ///
    /// Height and elevation ≤ 0 are no-ops for their respective phases. A
    /// degraded flat result is returned instead of an error when all
    /// strategies fail.
    ///
    /// # Errors
    ///
    /// Returns an error on container faults.
    pub fn execute<S: Scene>(
        &self,
        panel: StripPanel,
        scene: &mut S,
        diag: &mut Diagnostics,
    ) -> Result<ExtrudeOutcome> {
        let mut panel = panel;
        let mut state = ExtrudeState::Elevating;
        let mut seed: Option<FaceId> = None;

        loop {
            match state {
                ExtrudeState::Elevating => {
                    if self.elevation > 0.0 {
                        let lift = Vector3::new(0.0, 0.0, self.elevation);
                        // The container may answer with a replacement face.
                        let face = scene.translate_face(panel.face, &lift)?;
                        if !scene.is_face_valid(face) {
                            diag.record(DiagEvent::ElevationFailed);
                            panel.face = face;
                            state = ExtrudeState::Failed;
                            continue;
                        }
                        panel.face = face;
                        for corner in &mut panel.corners {
                            corner.z += self.elevation;
                        }
                    }
                    state = ExtrudeState::Extruding;
                }
                ExtrudeState::Extruding => {
                    if self.height <= 0.0 {
                        return Ok(ExtrudeOutcome::Flat(panel.face));
                    }
                    let strategies: [(ExtrudeStrategy, Strategy<S>); 3] = [
                        (ExtrudeStrategy::Direct, extrude_direct::<S>),
                        (ExtrudeStrategy::ScopedCopy, extrude_scoped_copy::<S>),
                        (ExtrudeStrategy::Manual, extrude_manual::<S>),
                    ];
                    for (strategy, run) in strategies {
                        if let Some(found) = run(&panel, self.height, scene)? {
                            seed = Some(found);
                            break;
                        }
                        diag.record(DiagEvent::StrategyFailed { strategy });
                    }
                    state = if seed.is_some() {
                        ExtrudeState::Done
                    } else {
                        ExtrudeState::Failed
                    };
                }
                ExtrudeState::Done => {
                    let Some(seed) = seed else { unreachable!() };
                    let faces = ResolveAdjacency::new(seed, self.height).execute(scene)?;
                    return Ok(ExtrudeOutcome::Extruded(faces));
                }
                ExtrudeState::Failed => {
                    diag.record(DiagEvent::ExtrusionDegraded);
                    return Ok(ExtrudeOutcome::Flat(panel.face));
                }
            }
        }
    }
}

/// Strategy A: native push/pull on the panel face itself.
fn extrude_direct<S: Scene>(
    panel: &StripPanel,
    height: f64,
    scene: &mut S,
) -> Result<Option<FaceId>> {
    if scene.push_pull(panel.face, height)? {
        Ok(Some(panel.face))
    } else {
        Ok(None)
    }
}

/// Strategy B: copy the panel into a temporary sub-container, extrude the
/// copy there, then flatten the sub-container back into the parent.
///
/// All-or-nothing: if the copy cannot be created or extruded, the
/// sub-container is discarded with everything in it.
fn extrude_scoped_copy<S: Scene>(
    panel: &StripPanel,
    height: f64,
    scene: &mut S,
) -> Result<Option<FaceId>> {
    let group = scene.create_group();
    let Some(copy) = scene.create_face_in_group(group, &panel.corners, Some(FaceTag::Tape))?
    else {
        scene.discard_group(group)?;
        return Ok(None);
    };
    if !scene.push_pull(copy, height)? {
        scene.discard_group(group)?;
        return Ok(None);
    }
    scene.merge_group(group)?;
    Ok(Some(copy))
}

/// Strategy C: manual reconstruction — build the top face from the raised
/// corners and one side quadrilateral per panel edge.
///
/// Succeeds when the top face and at least one side face are valid; sides
/// that fail individually are tolerated. On failure every created face is
/// removed again.
fn extrude_manual<S: Scene>(
    panel: &StripPanel,
    height: f64,
    scene: &mut S,
) -> Result<Option<FaceId>> {
    let lift = Vector3::new(0.0, 0.0, height);
    let top_points: Vec<Point3> = panel.corners.iter().map(|c| c + lift).collect();

    let Some(top) = scene.create_face(&top_points, Some(FaceTag::Tape))? else {
        return Ok(None);
    };

    let n = panel.corners.len();
    let mut sides = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let quad = [
            panel.corners[i],
            panel.corners[j],
            top_points[j],
            top_points[i],
        ];
        if let Some(side) = scene.create_face(&quad, Some(FaceTag::Tape))? {
            sides.push(side);
        }
    }

    if !scene.is_face_valid(top) || sides.is_empty() {
        for side in sides {
            scene.remove_face(side)?;
        }
        scene.remove_face(top)?;
        return Ok(None);
    }
    Ok(Some(top))
}
