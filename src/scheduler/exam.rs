//! Four-phase greedy exam scheduler.
//!
//! # Algorithm
//!
//! 1. Drop ineligible sections and build the cohort conflict matrix over
//!    the rest.
//! 2. Classify each eligible section (gen-ed, mathematics, architecture,
//!    major).
//! 3. Run the phases in order, threading one state through them:
//!    gen-ed blocks, high priority, bulk majors, individual fallback.
//!    Leftovers of phases 1-3 feed the fallback in that order.
//!
//! # Complexity
//! O(n * d * s * r) in the worst case, where n = eligible sections,
//! d = days, s = slots per day, r = rooms. The fallback phase dominates.
//!
//! # Reference
//! Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//! Strategies and Applications"

use std::collections::HashMap;

use tracing::info;

use super::classify::{classify, SubjectClass};
use super::phases;
use super::placement::Placer;
use super::rooms::RoomSelector;
use crate::config::SchedulerConfig;
use crate::conflict::ConflictMatrix;
use crate::eligibility::{self, Eligibility};
use crate::error::Result;
use crate::models::{standard_rooms, ExamSchedule, ExamSection};
use crate::state::SchedulingState;

/// Input container for one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Sections to schedule, in input order.
    pub sections: Vec<ExamSection>,
    /// Room identifiers.
    pub rooms: Vec<String>,
    /// Number of exam days.
    pub num_days: usize,
}

impl ScheduleRequest {
    /// Creates a request over the standard room universe.
    pub fn new(sections: Vec<ExamSection>, num_days: usize) -> Self {
        Self {
            sections,
            rooms: standard_rooms(),
            num_days,
        }
    }

    /// Replaces the room universe.
    pub fn with_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rooms = rooms.into_iter().map(Into::into).collect();
        self
    }
}

/// Four-phase greedy exam scheduler.
///
/// Never fails: sections it cannot place are returned in
/// [`ExamSchedule::unplaced`] with the reason of their closest attempt.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::ExamSection;
/// use u_exam_schedule::scheduler::{ExamScheduler, ScheduleRequest};
///
/// let sections = vec![
///     ExamSection::new("101", "MATH 1013", "BSCS", 1).with_department("SACE"),
///     ExamSection::new("102", "CSCI 1013", "BSCS", 1).with_department("SACE"),
/// ];
/// let request = ScheduleRequest::new(sections, 3);
///
/// let schedule = ExamScheduler::default().schedule_request(&request);
/// assert_eq!(schedule.exam_count(), 2);
/// assert!(schedule.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamScheduler {
    config: SchedulerConfig,
}

impl ExamScheduler {
    /// Creates a scheduler with the given configuration, unchecked.
    ///
    /// The configuration is used as is: an empty slot table leaves every
    /// section unplaced. Use [`ExamScheduler::try_new`] for configurations
    /// that were not built by [`SchedulerConfig::from_json`].
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Creates a scheduler after validating the configuration.
    ///
    /// # Errors
    /// Returns any error of [`SchedulerConfig::validate`].
    pub fn try_new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The scheduler's configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules a request.
    pub fn schedule_request(&self, request: &ScheduleRequest) -> ExamSchedule {
        self.schedule(&request.sections, &request.rooms, request.num_days)
    }

    /// Schedules sections into `num_days` days over the given rooms.
    ///
    /// Output exams are in commit order. Identical input always yields an
    /// identical schedule.
    pub fn schedule<S: AsRef<str>>(
        &self,
        sections: &[ExamSection],
        rooms: &[S],
        num_days: usize,
    ) -> ExamSchedule {
        info!(
            sections = sections.len(),
            rooms = rooms.len(),
            num_days,
            "exam scheduling started"
        );

        let Eligibility { eligible, excluded } =
            eligibility::partition(sections, &self.config.eligibility);
        let matrix = ConflictMatrix::build(eligible.iter().copied());
        let selector = RoomSelector::new(rooms.iter().map(AsRef::as_ref));
        let placer = Placer::new(&self.config, &matrix, &selector);

        let mut gen_ed = Vec::new();
        let mut math = Vec::new();
        let mut architecture = Vec::new();
        let mut majors = Vec::new();
        // A subject's first section decides the class of all its sections
        let mut classes: HashMap<&str, SubjectClass<'_>> = HashMap::new();
        for &section in &eligible {
            let class = *classes
                .entry(section.subject_id.as_str())
                .or_insert_with(|| classify(section, &self.config));
            match class {
                SubjectClass::GenEd(category) => gen_ed.push((section, category)),
                SubjectClass::Math => math.push(section),
                SubjectClass::Architecture => architecture.push(section),
                SubjectClass::Major => majors.push(section),
            }
        }
        info!(
            eligible = eligible.len(),
            excluded = excluded.len(),
            cohorts = matrix.cohort_count(),
            gen_ed = gen_ed.len(),
            math = math.len(),
            architecture = architecture.len(),
            majors = majors.len(),
            "sections classified"
        );

        let state = SchedulingState::new(num_days);
        let gen_ed_out = phases::gen_ed_phase(&placer, state, &gen_ed);
        let priority_out =
            phases::high_priority_phase(&placer, gen_ed_out.state, &math, &architecture);
        let bulk_out = phases::bulk_phase(&placer, priority_out.state, &majors);

        let leftovers: Vec<&ExamSection> = gen_ed_out
            .carried
            .iter()
            .chain(&priority_out.carried)
            .chain(&bulk_out.carried)
            .copied()
            .collect();
        let fallback_out = phases::fallback_phase(&placer, bulk_out.state, &leftovers);

        let schedule = ExamSchedule {
            exams: fallback_out.state.into_exams(),
            unplaced: fallback_out.unplaced,
            excluded,
            phases: vec![
                gen_ed_out.report,
                priority_out.report,
                bulk_out.report,
                fallback_out.report,
            ],
            num_days,
        };
        info!(
            scheduled = schedule.exam_count(),
            unplaced = schedule.unplaced.len(),
            rooms_used = schedule.rooms_used().len(),
            "exam scheduling finished"
        );
        schedule
    }
}
