//! Change tracking state machine.
//!
//! Each clause is either `Clean` or `Pending(change_type)`. The only ways
//! between the two are [`flag_change`] (an external diff detected a
//! difference) and [`clear_change`] (the reviewer accepted or rejected it).
//!
//! Flagging a clause that is already pending replaces its change type and
//! hands back the previous one.

use crate::{ChangeType, Clause, ReviewError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    Clean,
    Pending(ChangeType),
}

impl ChangeState {
    pub fn of(clause: &Clause) -> Self {
        match clause.change {
            Some(ct) => Self::Pending(ct),
            None => Self::Clean,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// `clean → pending`, or replace the type of an already pending change.
///
/// Returns the change type that was pending before, if any.
pub fn flag_change(clause: &mut Clause, change_type: ChangeType) -> Option<ChangeType> {
    clause.change.replace(change_type)
}

/// `pending → clean`. Fails with `NoChangePending` on a clean clause.
pub fn clear_change(clause: &mut Clause) -> Result<ChangeType, ReviewError> {
    clause
        .change
        .take()
        .ok_or(ReviewError::NoChangePending(clause.id))
}
