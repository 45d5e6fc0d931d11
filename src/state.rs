//! Run-scoped scheduling state.
//!
//! Created empty at the start of a run, threaded by value through the
//! phases, and consumed into the output list at the end. Holds room
//! occupancy per period, the periods each subject occupies, and the
//! per-cohort daily exam windows used for break checks.
//!
//! `commit` does not check legality: callers gate every commit through
//! the conflict check and the room selector.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::SchedulerConfig;
use crate::models::{Cohort, ExamSection, Period, Phase, ScheduledExam};

/// An exam of one cohort on one day, as seen by break checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortExam {
    /// Subject of the exam.
    pub subject_id: String,
    /// First slot.
    pub slot: usize,
    /// Number of slots.
    pub width: usize,
}

/// Mutable bookkeeping for one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct SchedulingState {
    num_days: usize,
    exams: Vec<ScheduledExam>,
    /// (start period, room) → indices into `exams`.
    assignments: HashMap<(Period, String), Vec<usize>>,
    room_usage: HashMap<Period, HashSet<String>>,
    subject_periods: HashMap<String, BTreeSet<Period>>,
    cohort_days: HashMap<(Cohort, usize), Vec<CohortExam>>,
}

impl SchedulingState {
    /// Creates an empty state over `num_days` days.
    pub fn new(num_days: usize) -> Self {
        Self {
            num_days,
            ..Self::default()
        }
    }

    /// Number of days.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Whether a room is unoccupied in a period.
    pub fn is_room_free(&self, period: Period, room: &str) -> bool {
        self.room_usage
            .get(&period)
            .map_or(true, |used| !used.contains(room))
    }

    /// Rooms occupied in a period.
    pub fn rooms_in_use(&self, period: Period) -> usize {
        self.room_usage.get(&period).map_or(0, HashSet::len)
    }

    /// Periods a subject occupies (one, unless split by the fallback phase).
    pub fn subject_periods(&self, subject_id: &str) -> Option<&BTreeSet<Period>> {
        self.subject_periods.get(subject_id)
    }

    /// Whether a subject is committed at exactly this period.
    pub fn is_subject_at(&self, subject_id: &str, period: Period) -> bool {
        self.subject_periods
            .get(subject_id)
            .is_some_and(|p| p.contains(&period))
    }

    /// Exams a cohort already has on a day.
    pub fn cohort_exams_on(&self, cohort: &Cohort, day: usize) -> &[CohortExam] {
        self.cohort_days
            .get(&(cohort.clone(), day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sections placed in a room starting at a period.
    pub fn sections_at(&self, period: Period, room: &str) -> Vec<&ScheduledExam> {
        self.assignments
            .get(&(period, room.to_string()))
            .map(|idx| idx.iter().filter_map(|&i| self.exams.get(i)).collect())
            .unwrap_or_default()
    }

    /// Records a placement: output entry, room reservation for every
    /// covered slot, the subject's period, and the cohort's window.
    pub fn commit(
        &mut self,
        section: &ExamSection,
        period: Period,
        room: &str,
        phase: Phase,
        config: &SchedulerConfig,
    ) {
        let width = section.width.slots();
        let index = self.exams.len();
        self.exams.push(ScheduledExam {
            section: section.clone(),
            period,
            day_label: config.day_label(period.day),
            slot_label: config.slot_label(period.slot).to_string(),
            room: room.to_string(),
            phase,
        });

        self.assignments
            .entry((period, room.to_string()))
            .or_default()
            .push(index);

        for offset in 0..width {
            self.room_usage
                .entry(Period::new(period.day, period.slot + offset))
                .or_default()
                .insert(room.to_string());
        }

        self.subject_periods
            .entry(section.subject_id.clone())
            .or_default()
            .insert(period);

        if let Some(cohort) = section.cohort() {
            self.cohort_days
                .entry((cohort, period.day))
                .or_default()
                .push(CohortExam {
                    subject_id: section.subject_id.clone(),
                    slot: period.slot,
                    width,
                });
        }
    }

    /// Placed sections per day (indexed by day).
    pub fn day_loads(&self) -> Vec<usize> {
        let mut loads = vec![0; self.num_days];
        for exam in &self.exams {
            if let Some(load) = loads.get_mut(exam.period.day) {
                *load += 1;
            }
        }
        loads
    }

    /// Placed sections, in commit order.
    pub fn exams(&self) -> &[ScheduledExam] {
        &self.exams
    }

    /// Number of placed sections.
    pub fn placed_count(&self) -> usize {
        self.exams.len()
    }

    /// Consumes the state into the output list.
    pub fn into_exams(self) -> Vec<ScheduledExam> {
        self.exams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotWidth;

    #[test]
    fn test_commit_single() {
        let config = SchedulerConfig::default();
        let mut state = SchedulingState::new(3);
        let s = ExamSection::new("1", "MATH101", "BSCS", 1);
        state.commit(&s, Period::new(0, 2), "N-11", Phase::Bulk, &config);

        assert!(!state.is_room_free(Period::new(0, 2), "N-11"));
        assert!(state.is_room_free(Period::new(0, 3), "N-11"));
        assert!(state.is_room_free(Period::new(0, 2), "N-12"));
        assert!(state.is_subject_at("MATH101", Period::new(0, 2)));
        assert_eq!(state.rooms_in_use(Period::new(0, 2)), 1);

        let exam = &state.exams()[0];
        assert_eq!(exam.day_label, "Day 1");
        assert_eq!(exam.slot_label, "10:30-12:00");
        assert_eq!(state.sections_at(Period::new(0, 2), "N-11").len(), 1);
    }

    #[test]
    fn test_commit_double_reserves_both_slots() {
        let config = SchedulerConfig::default();
        let mut state = SchedulingState::new(1);
        let s = ExamSection::new("1", "ARCH101", "BSAR", 2).with_width(SlotWidth::Double);
        state.commit(&s, Period::new(0, 4), "C-21", Phase::HighPriority, &config);

        assert!(!state.is_room_free(Period::new(0, 4), "C-21"));
        assert!(!state.is_room_free(Period::new(0, 5), "C-21"));
        // Subject recorded at its starting period only
        assert!(!state.is_subject_at("ARCH101", Period::new(0, 5)));
        let window = &state.cohort_exams_on(&Cohort::new("BSAR", 2), 0)[0];
        assert_eq!((window.slot, window.width), (4, 2));
    }

    #[test]
    fn test_day_loads() {
        let config = SchedulerConfig::default();
        let mut state = SchedulingState::new(3);
        for (i, day) in [0, 0, 2].into_iter().enumerate() {
            let s = ExamSection::new(i.to_string(), "X", "C", 1);
            state.commit(&s, Period::new(day, 0), &format!("N-1{i}"), Phase::Bulk, &config);
        }
        assert_eq!(state.day_loads(), vec![2, 0, 1]);
        assert_eq!(state.placed_count(), 3);
        assert_eq!(state.into_exams().len(), 3);
    }

    #[test]
    fn test_cohortless_not_tracked() {
        let config = SchedulerConfig::default();
        let mut state = SchedulingState::new(1);
        let s = ExamSection::new("1", "X", "", 0);
        state.commit(&s, Period::new(0, 0), "N-11", Phase::Fallback, &config);
        assert!(state.cohort_exams_on(&Cohort::new("", 0), 0).is_empty());
    }
}
