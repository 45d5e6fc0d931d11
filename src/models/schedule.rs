//! Exam schedule (solution) model.
//!
//! An exam schedule is the result of one scheduling run: the sections that
//! were placed into (day, slot, room) triples, the sections that could not
//! be placed with the reason why, and the sections that never took part.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{Cohort, ExamSection};

/// A (day, slot) pair, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Day index.
    pub day: usize,
    /// Slot index within the day.
    pub slot: usize,
}

/// Scheduler phase that committed a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// General-education subjects in their preferred blocks.
    GenEd,
    /// Mathematics and architecture subjects.
    HighPriority,
    /// Remaining major subjects, largest first, load-balanced.
    Bulk,
    /// Last-resort placement of leftovers; sections of one subject may split.
    Fallback,
}

/// A placed section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledExam {
    /// The placed section.
    #[serde(flatten)]
    pub section: ExamSection,
    /// Assigned (day, slot). For double-width sections this is the first slot.
    pub period: Period,
    /// Human-readable day label (e.g., "Day 1").
    pub day_label: String,
    /// Human-readable slot label (e.g., "7:30-9:00").
    pub slot_label: String,
    /// Assigned room identifier.
    pub room: String,
    /// Phase that committed this placement.
    pub phase: Phase,
}

/// Why a section could not be placed.
///
/// Reports the failure of the attempt that came closest to success.
/// Variants are ordered by how far placement got before failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureReason {
    /// A double-width exam cannot start in the day's final slot.
    EndOfDay,
    /// A conflicting subject of the same cohort already holds the period.
    SlotConflict,
    /// The cohort has another exam too close on the same day.
    InsufficientBreak,
    /// No eligible room was free.
    NoRoom,
}

/// A section left out of the output after every phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unplaced {
    /// The section.
    pub section: ExamSection,
    /// Closest failure observed.
    pub reason: FailureReason,
}

/// Why a section does not take part in scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Department is not examined.
    Department,
    /// Subject id is on the static exclusion list.
    ExcludedSubject,
    /// Subject id matches an excluded text pattern (lab, practicum, ...).
    Pattern,
    /// Alphabetic subject prefix is excluded.
    Prefix,
}

/// A section filtered out before scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedSection {
    /// The section.
    pub section: ExamSection,
    /// Which rule excluded it.
    pub reason: ExclusionReason,
}

/// Per-phase placement summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// The phase.
    pub phase: Phase,
    /// Sections placed by this phase.
    pub placed: usize,
    /// Sections handed on to later phases (or reported unplaced after the last).
    pub carried: usize,
}

/// Result of a scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamSchedule {
    /// Placed sections, in commit order.
    pub exams: Vec<ScheduledExam>,
    /// Eligible sections that could not be placed.
    pub unplaced: Vec<Unplaced>,
    /// Sections removed by the eligibility filter.
    pub excluded: Vec<ExcludedSection>,
    /// Per-phase summaries, in execution order.
    pub phases: Vec<PhaseReport>,
    /// Number of days scheduled over.
    pub num_days: usize,
}

/// A detected breach of a schedule invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (room, cohort, subject, or section code).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// A room holds two sections in one period.
    RoomDoubleBooked,
    /// Two different subjects of one cohort share a period.
    CohortConflict,
    /// Two exams of one cohort on one day are closer than the minimum break.
    BreakTooShort,
    /// Sections of one subject sit in different periods outside the fallback phase.
    SubjectSplit,
    /// A double-width exam runs past the day's final slot.
    MultiSlotOverflow,
}

impl Period {
    /// Creates a period.
    #[inline]
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }

    /// The following slot on the same day.
    #[inline]
    pub fn next_slot(self) -> Self {
        Self::new(self.day, self.slot + 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} slot {}", self.day + 1, self.slot + 1)
    }
}

impl ScheduledExam {
    /// Slots covered by this placement (one or two consecutive periods).
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        (0..self.section.width.slots()).map(|i| Period::new(self.period.day, self.period.slot + i))
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl ExamSchedule {
    /// Creates an empty schedule over `num_days` days.
    pub fn new(num_days: usize) -> Self {
        Self {
            num_days,
            ..Self::default()
        }
    }

    /// Number of placed sections.
    pub fn exam_count(&self) -> usize {
        self.exams.len()
    }

    /// Number of sections that took part (placed + unplaced).
    pub fn eligible_count(&self) -> usize {
        self.exams.len() + self.unplaced.len()
    }

    /// Whether every eligible section was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Finds the placement of a section by code.
    pub fn exam_for_code(&self, code: &str) -> Option<&ScheduledExam> {
        self.exams.iter().find(|e| e.section.code == code)
    }

    /// Placements occupying a period (double-width exams count in both slots).
    pub fn exams_in_period(&self, period: Period) -> Vec<&ScheduledExam> {
        self.exams
            .iter()
            .filter(|e| e.periods().any(|p| p == period))
            .collect()
    }

    /// Placements in a given room.
    pub fn exams_for_room(&self, room: &str) -> Vec<&ScheduledExam> {
        self.exams.iter().filter(|e| e.room == room).collect()
    }

    /// Placements of a given cohort.
    pub fn exams_for_cohort(&self, cohort: &Cohort) -> Vec<&ScheduledExam> {
        self.exams
            .iter()
            .filter(|e| e.section.cohort().as_ref() == Some(cohort))
            .collect()
    }

    /// Placements of a given subject.
    pub fn exams_for_subject(&self, subject_id: &str) -> Vec<&ScheduledExam> {
        self.exams
            .iter()
            .filter(|e| e.section.subject_id == subject_id)
            .collect()
    }

    /// Distinct rooms in use.
    pub fn rooms_used(&self) -> BTreeSet<&str> {
        self.exams.iter().map(|e| e.room.as_str()).collect()
    }

    /// Placed sections per day index (every day present, zero if empty).
    pub fn day_distribution(&self) -> BTreeMap<usize, usize> {
        let mut load: BTreeMap<usize, usize> = (0..self.num_days).map(|d| (d, 0)).collect();
        for e in &self.exams {
            *load.entry(e.period.day).or_insert(0) += 1;
        }
        load
    }

    /// Subjects whose sections ended up in more than one period.
    pub fn split_subjects(&self) -> BTreeSet<&str> {
        let mut periods: BTreeMap<&str, BTreeSet<Period>> = BTreeMap::new();
        for e in &self.exams {
            periods
                .entry(e.section.subject_id.as_str())
                .or_default()
                .insert(e.period);
        }
        periods
            .into_iter()
            .filter(|(_, p)| p.len() > 1)
            .map(|(s, _)| s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotWidth;

    fn placed(code: &str, subject: &str, day: usize, slot: usize, room: &str) -> ScheduledExam {
        ScheduledExam {
            section: ExamSection::new(code, subject, "BSCS", 1),
            period: Period::new(day, slot),
            day_label: format!("Day {}", day + 1),
            slot_label: String::new(),
            room: room.to_string(),
            phase: Phase::Bulk,
        }
    }

    fn sample_schedule() -> ExamSchedule {
        let mut s = ExamSchedule::new(3);
        s.exams.push(placed("1", "MATH 1013", 0, 0, "N-11"));
        s.exams.push(placed("2", "MATH 1013", 0, 0, "N-12"));
        s.exams.push(placed("3", "ENGL 1013", 1, 2, "N-11"));
        s
    }

    #[test]
    fn test_queries() {
        let s = sample_schedule();
        assert_eq!(s.exam_count(), 3);
        assert_eq!(s.exams_for_room("N-11").len(), 2);
        assert_eq!(s.exams_for_subject("MATH 1013").len(), 2);
        assert_eq!(s.exams_for_cohort(&Cohort::new("BSCS", 1)).len(), 3);
        assert_eq!(s.exams_in_period(Period::new(0, 0)).len(), 2);
        assert_eq!(s.exam_for_code("3").unwrap().period, Period::new(1, 2));
        assert!(s.exam_for_code("99").is_none());
    }

    #[test]
    fn test_day_distribution() {
        let s = sample_schedule();
        let d = s.day_distribution();
        assert_eq!(d[&0], 2);
        assert_eq!(d[&1], 1);
        assert_eq!(d[&2], 0);
    }

    #[test]
    fn test_rooms_used() {
        let s = sample_schedule();
        let rooms: Vec<_> = s.rooms_used().into_iter().collect();
        assert_eq!(rooms, vec!["N-11", "N-12"]);
    }

    #[test]
    fn test_double_width_periods() {
        let mut e = placed("1", "ARCH 1013", 0, 3, "C-21");
        e.section.width = SlotWidth::Double;
        let periods: Vec<_> = e.periods().collect();
        assert_eq!(periods, vec![Period::new(0, 3), Period::new(0, 4)]);

        let mut s = ExamSchedule::new(1);
        s.exams.push(e);
        assert_eq!(s.exams_in_period(Period::new(0, 4)).len(), 1);
    }

    #[test]
    fn test_split_subjects() {
        let mut s = sample_schedule();
        assert!(s.split_subjects().is_empty());
        s.exams.push(placed("4", "MATH 1013", 2, 0, "N-11"));
        assert!(s.split_subjects().contains("MATH 1013"));
    }

    #[test]
    fn test_completeness() {
        let mut s = sample_schedule();
        assert!(s.is_complete());
        s.unplaced.push(Unplaced {
            section: ExamSection::new("9", "PHED 1012", "BSCS", 1),
            reason: FailureReason::NoRoom,
        });
        assert!(!s.is_complete());
        assert_eq!(s.eligible_count(), 4);
    }

    #[test]
    fn test_serde_flattens_section() {
        let e = placed("1", "MATH 1013", 0, 0, "N-11");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["subject_id"], "MATH 1013");
        assert_eq!(json["room"], "N-11");
        let back: ScheduledExam = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }
}
