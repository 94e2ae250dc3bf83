/// Observable state of a [`ProgramSlot`].
///
/// Building happens inside a single call and a failed build never touches the
/// slot, so only these two states are ever visible to the renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotState {
    Uninitialized,
    Active,
}

/// Holds the one program the renderer draws with.
///
/// The slot is owned by the application and passed by reference; there is no
/// ambient "current program" anywhere else.
#[derive(Debug)]
pub struct ProgramSlot<P> {
    current: Option<P>,
}

impl<P> ProgramSlot<P> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn state(&self) -> SlotState {
        match self.current {
            Some(_) => SlotState::Active,
            None => SlotState::Uninitialized,
        }
    }

    pub fn get(&self) -> Option<&P> {
        self.current.as_ref()
    }

    /// Makes `program` current, then releases the previous one.
    ///
    /// The old program is dropped only after the new one is in place.
    pub fn install(&mut self, program: P) {
        let previous = self.current.replace(program);
        drop(previous);
    }
}

impl<P> Default for ProgramSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let slot: ProgramSlot<u32> = ProgramSlot::new();
        assert_eq!(slot.state(), SlotState::Uninitialized);
        assert!(slot.get().is_none());
    }

    #[test]
    fn install_activates_and_replaces() {
        let mut slot = ProgramSlot::new();
        slot.install(1);
        assert_eq!(slot.state(), SlotState::Active);
        slot.install(2);
        assert_eq!(slot.get(), Some(&2));
    }
}
