//! Two-step delete confirmation gate.
//!
//! # Invariants
//! - Step 2 input must equal the record title exactly (case and whitespace
//!   included).
//! - An abort never reaches the store.

use super::error::AbortReason;
use crate::ports::Confirmer;

pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this knowledge?";
pub const DELETE_PROMPT_MESSAGE: &str = "Type the title to confirm deletion";
pub const TITLE_MISMATCH_ALERT: &str = "Title does not match. Deletion aborted.";

/// Runs the yes/no question, then the retype-the-title prompt.
///
/// Declining step 1 aborts silently; a cancelled or mismatched step 2 shows
/// `TITLE_MISMATCH_ALERT`.
pub fn confirm_delete(confirmer: &mut dyn Confirmer, title: &str) -> Result<(), AbortReason> {
    if !confirmer.confirm(DELETE_CONFIRM_MESSAGE) {
        return Err(AbortReason::Declined);
    }

    let reason = match confirmer.prompt(DELETE_PROMPT_MESSAGE) {
        Some(input) if input == title => return Ok(()),
        Some(_) => AbortReason::TitleMismatch,
        None => AbortReason::PromptCancelled,
    };
    confirmer.alert(TITLE_MISMATCH_ALERT);
    Err(reason)
}
