//! Scheduler state definition

/// Scheduler states
///
/// The switch between two plugins happens inside a single `step` call and
/// is never observable from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// `start` not called yet, or stopped
    #[default]
    Unstarted,
    /// Plugin at this registry index owns the display
    Active(usize),
}

impl SchedulerState {
    /// Index of the active plugin, if any
    pub fn active(&self) -> Option<usize> {
        match self {
            SchedulerState::Active(index) => Some(*index),
            SchedulerState::Unstarted => None,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, SchedulerState::Active(_))
    }
}

/// Why a switch happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchCause {
    /// Debounced button press
    Button,
    /// Remote selection by id
    RemoteSelect,
    /// Remote request for the next plugin
    RemoteNext,
    /// Auto-cycle interval elapsed
    Timeout,
}

/// A completed switch from one plugin to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub cause: SwitchCause,
}

/// Index after `index` in a registry of `count` plugins
pub fn next_index(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (index + 1) % count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_index_wraps() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(next_index(0, 1), 0);
        assert_eq!(next_index(5, 0), 0);
    }

    #[test]
    fn test_state_accessors() {
        assert_eq!(SchedulerState::default(), SchedulerState::Unstarted);
        assert_eq!(SchedulerState::Unstarted.active(), None);
        assert!(!SchedulerState::Unstarted.is_started());
        assert_eq!(SchedulerState::Active(2).active(), Some(2));
        assert!(SchedulerState::Active(2).is_started());
    }
}
