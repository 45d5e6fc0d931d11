//! Schedule quality metrics (KPIs).
//!
//! Computes summary indicators from a completed exam schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Scheduled / eligible sections, in percent |
//! | Rooms used | Distinct rooms holding at least one exam |
//! | Day load | Scheduled sections per day |
//! | Split subjects | Subjects spread over more than one period |
//! | Cohort conflicts | Pairs of distinct subjects of one cohort sharing a period |
//!
//! A correct run always has zero cohort conflicts; split subjects can
//! only come from the fallback phase.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Cohort, ExamSchedule, Period, Phase};

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Sections that passed the eligibility filter.
    pub eligible: usize,
    /// Sections placed.
    pub scheduled: usize,
    /// Sections left unplaced.
    pub unplaced: usize,
    /// Placed fraction of eligible sections (0.0..=100.0).
    pub coverage_pct: f64,
    /// Distinct rooms used.
    pub rooms_used: usize,
    /// Placed sections per day, indexed by day.
    pub day_load: Vec<usize>,
    /// Placements per phase, in phase order.
    pub placed_by_phase: Vec<(Phase, usize)>,
    /// Subjects whose sections sit in more than one period.
    pub split_subjects: usize,
    /// Same-cohort, same-period pairs of distinct subjects.
    pub cohort_conflicts: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &ExamSchedule) -> Self {
        let eligible = schedule.eligible_count();
        let scheduled = schedule.exam_count();
        let coverage_pct = if eligible == 0 {
            100.0
        } else {
            scheduled as f64 / eligible as f64 * 100.0
        };

        let day_load = (0..schedule.num_days)
            .map(|day| schedule.exams.iter().filter(|e| e.period.day == day).count())
            .collect();

        let placed_by_phase = schedule.phases.iter().map(|r| (r.phase, r.placed)).collect();

        let mut by_cohort_period: HashMap<(Cohort, Period), BTreeSet<&str>> = HashMap::new();
        for exam in &schedule.exams {
            if let Some(cohort) = exam.section.cohort() {
                by_cohort_period
                    .entry((cohort, exam.period))
                    .or_default()
                    .insert(exam.section.subject_id.as_str());
            }
        }
        let cohort_conflicts = by_cohort_period
            .values()
            .map(|subjects| subjects.len() * subjects.len().saturating_sub(1) / 2)
            .sum();

        Self {
            eligible,
            scheduled,
            unplaced: schedule.unplaced.len(),
            coverage_pct,
            rooms_used: schedule.rooms_used().len(),
            day_load,
            placed_by_phase,
            split_subjects: schedule.split_subjects().len(),
            cohort_conflicts,
        }
    }

    /// Whether the schedule reaches the coverage target without any
    /// cohort conflict.
    pub fn meets_thresholds(&self, min_coverage_pct: f64) -> bool {
        self.cohort_conflicts == 0 && self.coverage_pct >= min_coverage_pct
    }
}
