//! Placement legality and the atomic group placement primitive.
//!
//! [`Placer::check`] is the single authority on whether a section may sit
//! in a period; every commit in every phase goes through it.

use std::collections::HashSet;

use super::rooms::{fits_in_day, RoomSelector};
use crate::config::SchedulerConfig;
use crate::conflict::ConflictMatrix;
use crate::models::{ExamSection, FailureReason, Period, Phase};
use crate::state::SchedulingState;

/// Read-only context shared by all phases of one run.
#[derive(Debug, Clone, Copy)]
pub struct Placer<'r> {
    /// Scheduler configuration.
    pub config: &'r SchedulerConfig,
    /// Cohort conflict matrix of the eligible sections.
    pub matrix: &'r ConflictMatrix,
    /// Room universe.
    pub rooms: &'r RoomSelector,
}

impl<'r> Placer<'r> {
    /// Creates a placer.
    pub fn new(
        config: &'r SchedulerConfig,
        matrix: &'r ConflictMatrix,
        rooms: &'r RoomSelector,
    ) -> Self {
        Self {
            config,
            matrix,
            rooms,
        }
    }

    /// Checks cohort legality of placing `section` at `period`.
    ///
    /// Fails with [`FailureReason::SlotConflict`] if a conflicting subject of
    /// the section's cohort already holds this period, or with
    /// [`FailureReason::InsufficientBreak`] if the cohort has an exam of
    /// another subject that day whose window is closer than the minimum
    /// break (overlap included). Sections without a cohort always pass.
    pub fn check(
        &self,
        section: &ExamSection,
        period: Period,
        state: &SchedulingState,
    ) -> Result<(), FailureReason> {
        let Some(cohort) = section.cohort() else {
            return Ok(());
        };

        if let Some(conflicts) = self.matrix.conflicts(&cohort, &section.subject_id) {
            if conflicts.iter().any(|s| state.is_subject_at(s, period)) {
                return Err(FailureReason::SlotConflict);
            }
        }

        let (start, end) = self.window(period.slot, section.width.slots());
        let min_break = self.config.min_break_minutes;
        let too_close = state
            .cohort_exams_on(&cohort, period.day)
            .iter()
            .filter(|other| other.subject_id != section.subject_id)
            .any(|other| {
                let (other_start, other_end) = self.window(other.slot, other.width);
                !(start >= other_end.saturating_add(min_break)
                    || other_start >= end.saturating_add(min_break))
            });
        if too_close {
            return Err(FailureReason::InsufficientBreak);
        }
        Ok(())
    }

    /// Whether `section` may not sit at `period` (cohort rules only).
    pub fn has_conflict(&self, section: &ExamSection, period: Period, state: &SchedulingState) -> bool {
        self.check(section, period, state).is_err()
    }

    /// Places every section of one subject at `period`, or nothing.
    ///
    /// All sections are checked and given distinct rooms before any is
    /// committed. On failure the state is untouched and the first failure
    /// is returned.
    pub fn try_schedule_group(
        &self,
        group: &[&ExamSection],
        period: Period,
        state: &mut SchedulingState,
        phase: Phase,
    ) -> Result<(), FailureReason> {
        let mut plan: Vec<(&ExamSection, &str)> = Vec::with_capacity(group.len());
        let mut taken: HashSet<(Period, &str)> = HashSet::new();

        for &section in group {
            if !fits_in_day(section, period, self.config) {
                return Err(FailureReason::EndOfDay);
            }
            self.check(section, period, state)?;

            let room = self
                .rooms
                .candidates(section, period, state, self.config)
                .into_iter()
                .map(|r| r.id.as_str())
                .find(|&id| covered(section, period, id).all(|key| !taken.contains(&key)))
                .ok_or(FailureReason::NoRoom)?;

            taken.extend(covered(section, period, room));
            plan.push((section, room));
        }

        for (section, room) in plan {
            state.commit(section, period, room, phase, self.config);
        }
        Ok(())
    }

    /// Places one section at `period` in its best free room.
    pub fn try_schedule_section(
        &self,
        section: &ExamSection,
        period: Period,
        state: &mut SchedulingState,
        phase: Phase,
    ) -> Result<(), FailureReason> {
        self.try_schedule_group(&[section], period, state, phase)
    }

    /// (start, end) minutes of a window of `width` slots starting at `slot`.
    fn window(&self, slot: usize, width: usize) -> (u32, u32) {
        let start = self.config.slot_start(slot);
        let last = slot + width.max(1) - 1;
        let end = self
            .config
            .slot_start(last)
            .saturating_add(self.config.slot_minutes);
        (start, end)
    }
}

/// (period, room) keys a section reserves when starting at `period`.
fn covered<'a>(
    section: &ExamSection,
    period: Period,
    room: &'a str,
) -> impl Iterator<Item = (Period, &'a str)> {
    (0..section.width.slots()).map(move |offset| (Period::new(period.day, period.slot + offset), room))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotWidth;

    struct Fixture {
        config: SchedulerConfig,
        matrix: ConflictMatrix,
        rooms: RoomSelector,
    }

    impl Fixture {
        fn new(sections: &[ExamSection], rooms: &[&str]) -> Self {
            Self {
                config: SchedulerConfig::default(),
                matrix: ConflictMatrix::build(sections),
                rooms: RoomSelector::new(rooms.iter().copied()),
            }
        }

        fn placer(&self) -> Placer<'_> {
            Placer::new(&self.config, &self.matrix, &self.rooms)
        }
    }

    fn section(code: &str, subject: &str, course: &str) -> ExamSection {
        ExamSection::new(code, subject, course, 1).with_department("SACE")
    }

    #[test]
    fn test_conflicting_subject_same_period() {
        let sections = vec![section("1", "MATH101", "BSCS"), section("2", "ENGL101", "BSCS")];
        let fx = Fixture::new(&sections, &["N-11", "N-12"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);

        let p = Period::new(0, 0);
        placer
            .try_schedule_group(&[&sections[0]], p, &mut state, Phase::Bulk)
            .unwrap();
        assert_eq!(
            placer.check(&sections[1], p, &state),
            Err(FailureReason::SlotConflict)
        );
        assert!(placer.has_conflict(&sections[1], p, &state));
    }

    #[test]
    fn test_break_enforced() {
        let sections = vec![section("1", "MATH101", "BSCS"), section("2", "ENGL101", "BSCS")];
        let fx = Fixture::new(&sections, &["N-11"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(2);
        placer
            .try_schedule_section(&sections[0], Period::new(0, 2), &mut state, Phase::Bulk)
            .unwrap();

        // Adjacent slots on either side: no break
        for slot in [1, 3] {
            assert_eq!(
                placer.check(&sections[1], Period::new(0, slot), &state),
                Err(FailureReason::InsufficientBreak)
            );
        }
        // One free slot in between is exactly 90 minutes
        assert!(placer.check(&sections[1], Period::new(0, 0), &state).is_ok());
        assert!(placer.check(&sections[1], Period::new(0, 4), &state).is_ok());
        // Other day is unconstrained
        assert!(placer.check(&sections[1], Period::new(1, 3), &state).is_ok());
    }

    #[test]
    fn test_huge_break_rejects_same_day() {
        let sections = vec![section("1", "MATH101", "BSCS"), section("2", "ENGL101", "BSCS")];
        let mut fx = Fixture::new(&sections, &["N-11"]);
        fx.config = SchedulerConfig::default().with_min_break(u32::MAX);
        let placer = fx.placer();
        let mut state = SchedulingState::new(2);
        placer
            .try_schedule_section(&sections[0], Period::new(0, 0), &mut state, Phase::Bulk)
            .unwrap();

        assert_eq!(
            placer.check(&sections[1], Period::new(0, 7), &state),
            Err(FailureReason::InsufficientBreak)
        );
        assert!(placer.check(&sections[1], Period::new(1, 0), &state).is_ok());
    }

    #[test]
    fn test_break_counts_double_width() {
        let double = section("1", "ARCH101", "BSAR").with_width(SlotWidth::Double);
        let other = section("2", "HIST101", "BSAR");
        let sections = vec![double.clone(), other.clone()];
        let fx = Fixture::new(&sections, &["C-21", "N-11"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);
        placer
            .try_schedule_section(&double, Period::new(0, 0), &mut state, Phase::Bulk)
            .unwrap();

        // Double occupies slots 0-1; slot 2 touches its end
        assert_eq!(
            placer.check(&other, Period::new(0, 2), &state),
            Err(FailureReason::InsufficientBreak)
        );
        assert!(placer.check(&other, Period::new(0, 3), &state).is_ok());
    }

    #[test]
    fn test_parallel_sections_colocate() {
        let a = section("1", "MATH101", "BSCS");
        let b = section("2", "MATH101", "BSCS");
        let sections = vec![a.clone(), b.clone()];
        let fx = Fixture::new(&sections, &["N-11", "N-12"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);
        placer
            .try_schedule_section(&a, Period::new(0, 0), &mut state, Phase::Fallback)
            .unwrap();
        assert!(placer.check(&b, Period::new(0, 0), &state).is_ok());
    }

    #[test]
    fn test_group_gets_distinct_rooms() {
        let sections = vec![
            section("1", "MATH101", "BSCS"),
            section("2", "MATH101", "BSIT"),
        ];
        let fx = Fixture::new(&sections, &["N-11", "N-12"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);
        let group: Vec<&ExamSection> = sections.iter().collect();
        placer
            .try_schedule_group(&group, Period::new(0, 0), &mut state, Phase::Bulk)
            .unwrap();
        let rooms: Vec<_> = state.exams().iter().map(|e| e.room.as_str()).collect();
        assert_eq!(rooms, vec!["N-11", "N-12"]);
    }

    #[test]
    fn test_group_is_atomic() {
        let sections = vec![
            section("1", "MATH101", "BSCS"),
            section("2", "MATH101", "BSIT"),
        ];
        let fx = Fixture::new(&sections, &["N-11"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);
        let group: Vec<&ExamSection> = sections.iter().collect();
        let result = placer.try_schedule_group(&group, Period::new(0, 0), &mut state, Phase::Bulk);
        assert_eq!(result, Err(FailureReason::NoRoom));
        assert_eq!(state.placed_count(), 0);
        assert!(state.is_room_free(Period::new(0, 0), "N-11"));
        assert!(state.subject_periods("MATH101").is_none());
    }

    #[test]
    fn test_end_of_day() {
        let double = section("1", "CSCI101", "BSCS").with_width(SlotWidth::Double);
        let sections = vec![double.clone()];
        let fx = Fixture::new(&sections, &["N-11"]);
        let placer = fx.placer();
        let mut state = SchedulingState::new(1);
        assert_eq!(
            placer.try_schedule_section(&double, Period::new(0, 7), &mut state, Phase::Bulk),
            Err(FailureReason::EndOfDay)
        );
        assert_eq!(state.placed_count(), 0);
    }
}
