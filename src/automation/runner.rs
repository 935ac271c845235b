//! Detection runner - drives the state machine until an error stops it.

use anyhow::{Context, Result};
use log::info;

use crate::automation::state::{DetectionContext, DetectionState};

/// Runs the detection loop forever.
///
/// Only returns on an unrecoverable error (history store failure, prompt
/// input closed); each completed match restarts the cycle.
pub fn run_detection_loop(ctx: &mut DetectionContext<'_>) -> Result<()> {
    info!("Detection started: {}", ctx.state);
    let mut matches_recorded: u32 = 0;

    loop {
        let recording = matches!(ctx.state, DetectionState::ResultRecorded { .. });
        let before = ctx.state.to_string();

        ctx.step()
            .with_context(|| format!("Detection failed in state: {}", before))?;

        if recording {
            matches_recorded += 1;
            info!("Matches recorded this session: {}", matches_recorded);
        }
    }
}
