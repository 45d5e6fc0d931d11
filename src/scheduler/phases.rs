//! The four placement phases.
//!
//! Each phase takes the state by value, commits what it can with
//! first-fit (no backtracking), and hands back the state together with
//! the sections it could not place. No phase revisits an earlier
//! phase's placements.
//!
//! | Phase | Sections | Candidate periods |
//! |-------|----------|-------------------|
//! | GenEd | gen-ed categories | the category's listed blocks |
//! | HighPriority | mathematics, then architecture | every period, day-major |
//! | Bulk | majors, largest subject first | days by load, every slot |
//! | Fallback | all leftovers, section by section | days by load, every slot |

use tracing::{debug, info, warn};

use super::classify::{group_by_subject, SubjectGroup};
use super::placement::Placer;
use crate::config::FallbackMode;
use crate::models::{ExamSection, FailureReason, Period, Phase, PhaseReport, Unplaced};
use crate::state::SchedulingState;

/// State and leftovers after one phase.
#[derive(Debug)]
pub struct PhaseOutcome<'a> {
    /// State after the phase.
    pub state: SchedulingState,
    /// Sections handed on, in the order they were given up.
    pub carried: Vec<&'a ExamSection>,
    /// Summary.
    pub report: PhaseReport,
}

/// Result of the last phase: nothing is carried any further.
#[derive(Debug)]
pub struct FallbackOutcome {
    /// Final state.
    pub state: SchedulingState,
    /// Sections that could not be placed anywhere.
    pub unplaced: Vec<Unplaced>,
    /// Summary.
    pub report: PhaseReport,
}

/// Phase 1: each gen-ed subject tries its category's blocks in order.
///
/// Categories are processed in order of first appearance. Blocks outside
/// the run's days and the category's skipped slots are never tried.
/// Categories without blocks are carried whole.
pub fn gen_ed_phase<'a>(
    placer: &Placer<'_>,
    mut state: SchedulingState,
    sections: &[(&'a ExamSection, &str)],
) -> PhaseOutcome<'a> {
    let start = state.placed_count();
    let num_days = state.num_days();
    let mut carried = Vec::new();

    let mut categories: Vec<(&str, Vec<&'a ExamSection>)> = Vec::new();
    for &(section, category) in sections {
        match categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(section),
            None => categories.push((category, vec![section])),
        }
    }

    for (name, members) in categories {
        let Some(category) = placer.config.gen_ed.iter().find(|c| c.name == name) else {
            carried.extend(members);
            continue;
        };
        if category.blocks.is_empty() {
            debug!(category = name, sections = members.len(), "no gen-ed block defined");
            carried.extend(members);
            continue;
        }

        for group in group_by_subject(members) {
            let placed = category
                .blocks
                .iter()
                .filter(|b| b.day < num_days && !category.skip_slots.contains(&b.slot))
                .find(|&&block| {
                    placer
                        .try_schedule_group(&group.sections, block, &mut state, Phase::GenEd)
                        .is_ok()
                });
            match placed {
                Some(block) => debug!(
                    category = name,
                    subject = group.subject_id,
                    sections = group.len(),
                    %block,
                    "gen-ed subject placed"
                ),
                None => carried.extend(group.sections),
            }
        }
    }

    finish(Phase::GenEd, state, start, carried)
}

/// Phase 2: mathematics subjects, then architecture subjects, each at the
/// first legal period in day-major order.
pub fn high_priority_phase<'a>(
    placer: &Placer<'_>,
    mut state: SchedulingState,
    math: &[&'a ExamSection],
    architecture: &[&'a ExamSection],
) -> PhaseOutcome<'a> {
    let start = state.placed_count();
    let mut carried = Vec::new();
    let periods: Vec<Period> = (0..state.num_days())
        .flat_map(|day| (0..placer.config.slot_count()).map(move |slot| Period::new(day, slot)))
        .collect();

    for class in [math, architecture] {
        for group in group_by_subject(class.iter().copied()) {
            let placed = periods.iter().find(|&&period| {
                placer
                    .try_schedule_group(&group.sections, period, &mut state, Phase::HighPriority)
                    .is_ok()
            });
            match placed {
                Some(period) => debug!(
                    subject = group.subject_id,
                    sections = group.len(),
                    %period,
                    "high-priority subject placed"
                ),
                None => carried.extend(group.sections),
            }
        }
    }

    finish(Phase::HighPriority, state, start, carried)
}

/// Phase 3: remaining subjects, largest first, steered to the least
/// loaded day.
///
/// Groups are stably sorted by descending section count so equal sizes
/// keep input order. Day loads start from everything already placed and
/// grow by each committed group's size.
pub fn bulk_phase<'a>(
    placer: &Placer<'_>,
    mut state: SchedulingState,
    sections: &[&'a ExamSection],
) -> PhaseOutcome<'a> {
    let start = state.placed_count();
    let mut carried = Vec::new();
    let mut loads = state.day_loads();
    let penalty = placer.config.load_balance.bulk_penalty;

    let mut groups = group_by_subject(sections.iter().copied());
    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    for group in groups {
        let days = day_order(&loads, placer, penalty);
        match place_group_by_load(placer, &mut state, &group, &days, Phase::Bulk) {
            Some(period) => {
                loads[period.day] += group.len();
                debug!(
                    subject = group.subject_id,
                    sections = group.len(),
                    %period,
                    "bulk subject placed"
                );
            }
            None => carried.extend(group.sections),
        }
    }

    info!(loads = ?loads, "day loads after bulk placement");
    finish(Phase::Bulk, state, start, carried)
}

/// Phase 4: every leftover section on its own.
///
/// Sections of one subject may land in different periods here. With
/// [`FallbackMode::CoLocateFirst`] each leftover subject is first retried
/// as a whole. A section that fits nowhere is reported with the closest
/// failure seen.
pub fn fallback_phase(
    placer: &Placer<'_>,
    mut state: SchedulingState,
    sections: &[&ExamSection],
) -> FallbackOutcome {
    let start = state.placed_count();
    let mut loads = state.day_loads();
    let penalty = placer.config.load_balance.fallback_penalty;

    let mut remaining: Vec<&ExamSection> = sections.to_vec();
    if placer.config.fallback == FallbackMode::CoLocateFirst {
        remaining.clear();
        for group in group_by_subject(sections.iter().copied()) {
            let days = day_order(&loads, placer, penalty);
            match place_group_by_load(placer, &mut state, &group, &days, Phase::Fallback) {
                Some(period) => loads[period.day] += group.len(),
                None => remaining.extend(group.sections),
            }
        }
    }

    let mut unplaced = Vec::new();
    for section in remaining {
        let days = day_order(&loads, placer, penalty);
        let mut closest: Option<FailureReason> = None;
        let mut placed = None;

        'search: for &day in &days {
            for slot in 0..placer.config.slot_count() {
                let period = Period::new(day, slot);
                match placer.try_schedule_section(section, period, &mut state, Phase::Fallback) {
                    Ok(()) => {
                        placed = Some(period);
                        break 'search;
                    }
                    Err(reason) => closest = closest.max(Some(reason)),
                }
            }
        }

        match placed {
            Some(period) => {
                loads[period.day] += 1;
                debug!(code = %section.code, subject = %section.subject_id, %period, "section placed individually");
            }
            None => {
                let reason = closest.unwrap_or(FailureReason::NoRoom);
                warn!(
                    code = %section.code,
                    subject = %section.subject_id,
                    cohort = %section.course,
                    year = section.year_level,
                    ?reason,
                    "section could not be placed"
                );
                unplaced.push(Unplaced {
                    section: section.clone(),
                    reason,
                });
            }
        }
    }

    let report = PhaseReport {
        phase: Phase::Fallback,
        placed: state.placed_count() - start,
        carried: unplaced.len(),
    };
    info!(phase = ?report.phase, placed = report.placed, unplaced = report.carried, "phase complete");
    FallbackOutcome {
        state,
        unplaced,
        report,
    }
}

/// Days ordered by load plus the penalty on the penalized day; ties keep
/// day order.
pub fn day_order(loads: &[usize], placer: &Placer<'_>, penalty: usize) -> Vec<usize> {
    let penalized = placer.config.load_balance.penalized_day;
    let mut days: Vec<usize> = (0..loads.len()).collect();
    days.sort_by_key(|&day| loads[day] + if penalized == Some(day) { penalty } else { 0 });
    days
}

fn place_group_by_load(
    placer: &Placer<'_>,
    state: &mut SchedulingState,
    group: &SubjectGroup<'_>,
    days: &[usize],
    phase: Phase,
) -> Option<Period> {
    days.iter()
        .flat_map(|&day| (0..placer.config.slot_count()).map(move |slot| Period::new(day, slot)))
        .find(|&period| {
            placer
                .try_schedule_group(&group.sections, period, state, phase)
                .is_ok()
        })
}

fn finish<'a>(
    phase: Phase,
    state: SchedulingState,
    start: usize,
    carried: Vec<&'a ExamSection>,
) -> PhaseOutcome<'a> {
    let report = PhaseReport {
        phase,
        placed: state.placed_count() - start,
        carried: carried.len(),
    };
    info!(phase = ?phase, placed = report.placed, carried = report.carried, "phase complete");
    PhaseOutcome {
        state,
        carried,
        report,
    }
}
