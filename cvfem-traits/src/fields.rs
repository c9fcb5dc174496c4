//! Identifiers for mesh fields and their time states.
use std::fmt::{Display, Formatter};

/// The category of mesh entity a field lives on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRank {
    Node,
    Element,
}

/// A time level of a time-leveled field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldState {
    /// The next (unknown) time level, n+1.
    Np1,
    /// The current time level, n.
    N,
    /// The previous time level, n-1.
    Nm1,
}

impl FieldState {
    /// The state of a field without time history. Single-state fields only store this state.
    pub const NONE: FieldState = FieldState::Np1;

    /// The position of the state in a state-ordered storage, newest first.
    pub fn index(&self) -> usize {
        match self {
            FieldState::Np1 => 0,
            FieldState::N => 1,
            FieldState::Nm1 => 2,
        }
    }
}

impl Display for FieldState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldState::Np1 => write!(f, "n+1"),
            FieldState::N => write!(f, "n"),
            FieldState::Nm1 => write!(f, "n-1"),
        }
    }
}

/// A handle to a field registered with a [`FieldRegistry`](crate::FieldRegistry), independent of time state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHandle(pub usize);

/// Identifies one time state of a field.
///
/// Two identifiers compare equal if and only if they refer to the same storage. In particular,
/// the n-1 state of a field with only two states is the same `FieldId` as its n state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub field: FieldHandle,
    pub state: FieldState,
}

impl FieldId {
    pub fn new(field: FieldHandle, state: FieldState) -> Self {
        Self { field, state }
    }
}
