use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::models::phase::Phase;

/// Time left before a phase closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    Open(Duration),
    Closed,
    NoDeadline,
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRemaining::Open(left) => f.write_str(&format_remaining(*left)),
            TimeRemaining::Closed => f.write_str("closed"),
            TimeRemaining::NoDeadline => f.write_str("no deadline"),
        }
    }
}

/// Day/hour/minute rendering, e.g. "2d 3h 15min", "1h 0min", "42min".
pub fn format_remaining(left: Duration) -> String {
    let total_seconds = left.num_seconds().max(0);
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}min", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}min", hours, minutes)
    } else {
        format!("{}min", minutes)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseStatus {
    pub phase: Phase,
    pub closes_at: Option<DateTime<Utc>>,
    pub open: bool,
    pub remaining: String,
}

/// Per-phase submission cutoffs. Every match of a phase shares one cutoff.
#[derive(Debug, Clone, Default)]
pub struct PhaseDeadlines {
    deadlines: HashMap<Phase, DateTime<Utc>>,
}

impl PhaseDeadlines {
    pub fn new(deadlines: HashMap<Phase, DateTime<Utc>>) -> Self {
        Self { deadlines }
    }

    pub fn deadline(&self, phase: Phase) -> Option<DateTime<Utc>> {
        self.deadlines.get(&phase).copied()
    }

    /// Open when no deadline is configured or `now` is strictly before it.
    pub fn is_open(&self, phase: Phase, now: DateTime<Utc>) -> bool {
        match self.deadlines.get(&phase) {
            Some(deadline) => now < *deadline,
            None => true,
        }
    }

    pub fn time_remaining(&self, phase: Phase, now: DateTime<Utc>) -> TimeRemaining {
        match self.deadlines.get(&phase) {
            None => TimeRemaining::NoDeadline,
            Some(deadline) if now < *deadline => TimeRemaining::Open(*deadline - now),
            Some(_) => TimeRemaining::Closed,
        }
    }

    pub fn status(&self, phase: Phase, now: DateTime<Utc>) -> PhaseStatus {
        PhaseStatus {
            phase,
            closes_at: self.deadline(phase),
            open: self.is_open(phase, now),
            remaining: self.time_remaining(phase, now).to_string(),
        }
    }

    /// Status of every phase, in display order.
    pub fn board(&self, now: DateTime<Utc>) -> Vec<PhaseStatus> {
        Phase::ALL.iter().map(|phase| self.status(*phase, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn final_at_16h() -> PhaseDeadlines {
        PhaseDeadlines::new(HashMap::from([(
            Phase::Final,
            Utc.with_ymd_and_hms(2026, 6, 20, 16, 0, 0).unwrap(),
        )]))
    }

    #[test]
    fn test_open_one_hour_before_final() {
        let deadlines = final_at_16h();
        let now = Utc.with_ymd_and_hms(2026, 6, 20, 15, 0, 0).unwrap();

        assert!(deadlines.is_open(Phase::Final, now));
        assert_eq!(deadlines.time_remaining(Phase::Final, now).to_string(), "1h 0min");
    }

    #[test]
    fn test_closed_at_and_after_deadline() {
        let deadlines = final_at_16h();
        let at = Utc.with_ymd_and_hms(2026, 6, 20, 16, 0, 0).unwrap();

        assert!(!deadlines.is_open(Phase::Final, at));
        assert!(!deadlines.is_open(Phase::Final, at + Duration::seconds(1)));
        assert!(deadlines.is_open(Phase::Final, at - Duration::seconds(1)));
        assert_eq!(deadlines.time_remaining(Phase::Final, at), TimeRemaining::Closed);
    }

    #[test]
    fn test_phase_without_deadline_is_always_open() {
        let deadlines = final_at_16h();
        let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        assert!(deadlines.is_open(Phase::SemiFinal, far_future));
        assert_eq!(
            deadlines.time_remaining(Phase::SemiFinal, far_future).to_string(),
            "no deadline"
        );
    }

    #[test]
    fn test_format_remaining_granularity() {
        assert_eq!(format_remaining(Duration::seconds(59)), "0min");
        assert_eq!(format_remaining(Duration::minutes(42)), "42min");
        assert_eq!(format_remaining(Duration::minutes(61)), "1h 1min");
        assert_eq!(format_remaining(Duration::hours(24)), "1d 0h 0min");
        assert_eq!(
            format_remaining(Duration::days(2) + Duration::hours(3) + Duration::minutes(15)),
            "2d 3h 15min"
        );
    }

    #[test]
    fn test_board_lists_all_phases_in_order() {
        let deadlines = final_at_16h();
        let now = Utc.with_ymd_and_hms(2026, 6, 21, 0, 0, 0).unwrap();

        let board = deadlines.board(now);
        assert_eq!(board.len(), Phase::ALL.len());
        assert_eq!(board[0].phase, Phase::GroupStage);
        assert!(board[0].open);
        let last = board.last().unwrap();
        assert_eq!(last.phase, Phase::Final);
        assert!(!last.open);
        assert_eq!(last.remaining, "closed");
    }
}
