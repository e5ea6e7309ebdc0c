/*
 * Instance Correlation
 *
 * Maps a designated instantiation instruction to the abstract object the
 * points-to analysis allocated for it. Exactly one candidate must match;
 * zero and several are both reported as errors rather than resolved by
 * guessing, since either would silently attach results to the wrong
 * pipeline.
 */

use crate::errors::{Result, StreamStateError};
use crate::features::engine::ports::PointsToAnalysis;
use crate::shared::models::{AbstractObject, InstructionRef};

/// Resolve the unique abstract object produced by `instruction` among
/// `candidates`.
pub fn correlate<P: PointsToAnalysis>(
    points_to: &P,
    instruction: &InstructionRef,
    candidates: impl IntoIterator<Item = AbstractObject>,
) -> Result<AbstractObject> {
    let mut candidates: Vec<AbstractObject> = candidates.into_iter().collect();
    candidates.sort_by_key(|o| o.id);
    candidates.dedup();

    let mut matched: Vec<AbstractObject> = Vec::new();
    for candidate in &candidates {
        let produced = points_to.produced_by(candidate, instruction);
        tracing::debug!(
            "correlating {instruction}: candidate {candidate} {}",
            if produced { "matches" } else { "does not match" }
        );
        if produced {
            matched.push(*candidate);
        }
    }

    match matched.as_slice() {
        [object] => Ok(*object),
        [] => Err(StreamStateError::CorrelationMissing {
            instruction: instruction.to_string(),
            candidates: candidates.len(),
        }),
        _ => Err(StreamStateError::CorrelationAmbiguous {
            instruction: instruction.to_string(),
            matched: matched.len(),
        }),
    }
}
