//! Session-scoped boolean latches that suppress reentrant side effects.
//!
//! The set is owned by the pipeline and passed by reference into the calls
//! that honor it; there is no process-wide state.

/// Named latch identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Raised while persisted history is replayed into the live buffer, so
    /// the replay neither re-persists nor re-collapses what it restores.
    Restoring,
}

/// Latches for one chat session. Every flag starts lowered.
#[derive(Debug, Default, Clone)]
pub struct FlagSet {
    restoring: bool,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, flag: Flag) {
        match flag {
            Flag::Restoring => self.restoring = true,
        }
    }

    pub fn lower(&mut self, flag: Flag) {
        match flag {
            Flag::Restoring => self.restoring = false,
        }
    }

    pub fn is_raised(&self, flag: Flag) -> bool {
        match flag {
            Flag::Restoring => self.restoring,
        }
    }
}
