/// Index of a fixed simulation step. Tick 0 is the state before the first step.
pub type Tick = u64;

/// Monotonic identifier assigned to every submitted action.
pub type ActionId = u64;
