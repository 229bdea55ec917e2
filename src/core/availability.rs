/// Whether a card's referee has been booked for a match during the
/// current render. Booking happens once; later activations are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleState {
    #[default]
    Available,
    Scheduled,
}

impl ScheduleState {
    /// Moves to `Scheduled`. Returns `true` only for the activation that
    /// made the transition.
    pub fn activate(&mut self) -> bool {
        match self {
            ScheduleState::Available => {
                *self = ScheduleState::Scheduled;
                true
            }
            ScheduleState::Scheduled => false,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ScheduleState::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_fires_once() {
        let mut state = ScheduleState::default();
        assert!(state.is_available());

        assert!(state.activate());
        assert!(!state.is_available());

        assert!(!state.activate());
        assert!(!state.activate());
        assert_eq!(state, ScheduleState::Scheduled);
    }
}
