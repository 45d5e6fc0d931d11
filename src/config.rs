//! Scheduler configuration.
//!
//! Every institution-specific table (slot times, gen-ed blocks, exclusion
//! lists, building allow-lists, load-balancing constants) lives in one
//! [`SchedulerConfig`] value that is handed to the scheduler. Defaults
//! reproduce the reference institution's term setup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::{ConfigError, Result};
use crate::models::Period;

/// Complete scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Daily slot table, in chronological order.
    pub slots: Vec<SlotDefinition>,
    /// Length of one slot (minutes).
    pub slot_minutes: u32,
    /// Minimum gap between two exams of one cohort on one day (minutes).
    pub min_break_minutes: u32,
    /// Prefix of day labels ("Day" → "Day 1", "Day 2", ...).
    pub day_label_prefix: String,
    /// Which sections take part at all.
    pub eligibility: EligibilityRules,
    /// General-education categories with their preferred blocks.
    pub gen_ed: Vec<GenEdCategory>,
    /// Identification of high-priority subject classes.
    pub priority: PriorityRules,
    /// Building allow-lists.
    pub buildings: BuildingRules,
    /// Day load-balancing constants.
    pub load_balance: LoadBalance,
    /// Behaviour of the last-resort phase.
    pub fallback: FallbackMode,
}

/// One daily time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Display label (e.g., "7:30-9:00").
    pub label: String,
    /// Start time in minutes after midnight.
    pub start_minute: u32,
}

/// Section exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityRules {
    /// Department codes whose sections are never examined (case-insensitive).
    pub excluded_departments: Vec<String>,
    /// Normalized subject ids never examined (uppercase, single spaces).
    pub excluded_subjects: BTreeSet<String>,
    /// Lowercase substrings marking non-examined subjects.
    pub excluded_patterns: Vec<String>,
    /// Alphabetic subject prefixes never examined.
    pub excluded_prefixes: Vec<String>,
}

/// A general-education category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenEdCategory {
    /// Category name (e.g., "ENGL").
    pub name: String,
    /// Subject-id prefixes belonging to the category.
    pub prefixes: Vec<String>,
    /// Candidate periods, primary first. Empty = no preferred block.
    pub blocks: Vec<Period>,
    /// Slot indices this category must never use.
    #[serde(default)]
    pub skip_slots: Vec<usize>,
}

/// High-priority subject classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityRules {
    /// Subject-id prefix of mathematics subjects.
    pub math_prefix: String,
    /// Department owning mathematics subjects.
    pub math_department: String,
    /// Substring of subject ids marking architecture subjects.
    pub arch_marker: String,
}

/// Building allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingRules {
    /// Buildings usable by architecture subjects.
    pub architecture: Vec<String>,
    /// Building ranked first for architecture subjects.
    pub architecture_preferred: String,
    /// Department lookups, checked in order; first substring match wins.
    pub by_department: Vec<DepartmentBuildings>,
    /// Buildings for departments without a lookup entry.
    pub default: Vec<String>,
}

/// Buildings available to one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentBuildings {
    /// Substring matched against the uppercase department code.
    pub department: String,
    /// Allowed buildings.
    pub buildings: Vec<String>,
}

/// Day load-balancing constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalance {
    /// Day biased against when ordering days by load.
    pub penalized_day: Option<usize>,
    /// Penalty added to the penalized day during bulk placement.
    pub bulk_penalty: usize,
    /// Penalty added to the penalized day during fallback placement.
    pub fallback_penalty: usize,
}

/// How the fallback phase treats leftover subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackMode {
    /// Place every leftover section on its own; siblings may split.
    #[default]
    Independent,
    /// Retry each leftover subject as a group first, then place
    /// what remains section by section.
    CoLocateFirst,
}

impl SchedulerConfig {
    /// Parses a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input or any error of
    /// [`SchedulerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }
        if self.slot_minutes == 0 {
            return Err(ConfigError::ZeroSlotLength);
        }
        for (index, pair) in self.slots.windows(2).enumerate() {
            if pair[1].start_minute <= pair[0].start_minute {
                return Err(ConfigError::UnorderedSlots {
                    index: index + 1,
                    start: pair[1].start_minute,
                });
            }
        }

        let mut names = HashSet::new();
        for category in &self.gen_ed {
            if !names.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            if let Some(block) = category.blocks.iter().find(|b| b.slot >= self.slots.len()) {
                return Err(ConfigError::BlockOutOfRange {
                    category: category.name.clone(),
                    slot: block.slot,
                    slots: self.slots.len(),
                });
            }
        }
        Ok(())
    }

    /// Sets the minimum break between same-cohort exams.
    pub fn with_min_break(mut self, minutes: u32) -> Self {
        self.min_break_minutes = minutes;
        self
    }

    /// Sets the fallback mode.
    pub fn with_fallback(mut self, mode: FallbackMode) -> Self {
        self.fallback = mode;
        self
    }

    /// Sets the gen-ed categories.
    pub fn with_gen_ed(mut self, categories: Vec<GenEdCategory>) -> Self {
        self.gen_ed = categories;
        self
    }

    /// Number of slots per day.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Label of a slot (empty if out of range).
    pub fn slot_label(&self, slot: usize) -> &str {
        self.slots.get(slot).map_or("", |s| s.label.as_str())
    }

    /// Start minute of a slot.
    pub fn slot_start(&self, slot: usize) -> u32 {
        self.slots.get(slot).map_or(0, |s| s.start_minute)
    }

    /// Label of a day (0-based index).
    pub fn day_label(&self, day: usize) -> String {
        format!("{} {}", self.day_label_prefix, day + 1)
    }

    /// Gen-ed category of a subject, if any.
    pub fn gen_ed_category(&self, subject_id: &str) -> Option<&GenEdCategory> {
        let upper = subject_id.to_uppercase();
        self.gen_ed
            .iter()
            .find(|c| c.prefixes.iter().any(|p| upper.starts_with(p.as_str())))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let slots = [
            ("7:30-9:00", 450),
            ("9:00-10:30", 540),
            ("10:30-12:00", 630),
            ("12:00-13:30", 720),
            ("13:30-15:00", 810),
            ("15:00-16:30", 900),
            ("16:30-18:00", 990),
            ("18:00-19:30", 1080),
        ]
        .into_iter()
        .map(|(label, start_minute)| SlotDefinition {
            label: label.to_string(),
            start_minute,
        })
        .collect();

        Self {
            slots,
            slot_minutes: 90,
            min_break_minutes: 90,
            day_label_prefix: "Day".to_string(),
            eligibility: EligibilityRules::default(),
            gen_ed: default_gen_ed(),
            priority: PriorityRules::default(),
            buildings: BuildingRules::default(),
            load_balance: LoadBalance::default(),
            fallback: FallbackMode::default(),
        }
    }
}

impl GenEdCategory {
    /// Creates a category matched by its own name as the only prefix.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            prefixes: vec![name.clone()],
            name,
            blocks: Vec::new(),
            skip_slots: Vec::new(),
        }
    }

    /// Adds a subject-id prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Appends a candidate block.
    pub fn with_block(mut self, day: usize, slot: usize) -> Self {
        self.blocks.push(Period::new(day, slot));
        self
    }

    /// Forbids a slot for this category.
    pub fn skipping_slot(mut self, slot: usize) -> Self {
        self.skip_slots.push(slot);
        self
    }
}

fn default_gen_ed() -> Vec<GenEdCategory> {
    vec![
        GenEdCategory::new("ETHC").with_block(0, 0).with_block(0, 1),
        GenEdCategory::new("ENGL")
            .with_block(0, 2)
            .with_block(2, 0)
            .with_block(0, 1),
        GenEdCategory::new("PHED")
            .with_block(0, 3)
            .with_block(1, 0)
            .with_block(2, 3),
        GenEdCategory::new("CFED")
            .with_block(0, 4)
            .with_block(1, 1)
            .with_block(1, 2)
            .with_block(0, 5)
            .with_block(1, 4)
            .skipping_slot(0),
        GenEdCategory::new("CONW")
            .with_block(1, 5)
            .with_block(0, 5)
            .with_block(2, 5),
        GenEdCategory::new("LANG")
            .with_prefix("JAPN")
            .with_prefix("CHIN")
            .with_prefix("SPAN")
            .with_block(2, 3)
            .with_block(2, 4)
            .with_block(1, 3),
        GenEdCategory::new("LITR")
            .with_block(2, 4)
            .with_block(2, 5)
            .with_block(0, 4),
        GenEdCategory::new("ICTE"),
        GenEdCategory::new("OMGT"),
        GenEdCategory::new("GGSR"),
        GenEdCategory::new("RZAL"),
        GenEdCategory::new("PDEV"),
    ]
}

impl Default for EligibilityRules {
    fn default() -> Self {
        const EXCLUDED: &[&str] = &[
            "RESM 1023", "ARMS 1023", "BRES 1023", "RESM 1013", "RESM 1022", "THES 1023",
            "ACCT 1183", "ACCT 1213", "ACCT 1193", "ACCT 1223", "ACCT 1203", "ACCT 1236",
            "PRAC 1033", "PRAC 1023", "PRAC 1013", "PRAC 1012", "PRAC 1036", "PRAC 1026",
            "MKTG 1183", "MKTG 1153", "ARCH 1505", "ARCH 1163", "ARCH 1254", "ARCH 1385",
            "HOAS 1013", "FMGT 1123", "CPAR 1013", "CVIL 1222", "CADD 1011", "COME 1151",
            "GEOD 1253", "CVIL 1065", "CAPS 1021", "EDUC 1123", "ELEM 1063", "ELEM 1073",
            "ELEM 1083", "SCED 1023", "MAPE 1073", "JOUR 1013", "LITR 1043", "LITR 1073",
            "LITR 1033", "LITR 1023", "SOCS 1073", "SOCS 1083", "PSYC 1133", "SOCS 1183",
            "SOCS 1063", "SOCS 1213", "SOCS 1193", "SOCS 1093", "SOCS 1173", "SOCS 1203",
            "CFED 1061", "CFED 1043", "CFED 1081", "CORE 1016", "CORE 1026", "ENLT 1153",
            "ENLT 1013", "ENLT 1143", "ENLT 1063", "ENLT 1133", "ENLT 1123", "NSTP 1023",
            "NURS 1015", "NURS 1236", "MELS 1053", "MELS 1044", "MELS 13112", "MELS 1323",
            "PNCM 1178", "PNCM 1169", "PNCM 10912", "PNCM 1228",
        ];
        const PATTERNS: &[&str] = &[
            "(lab)", "(rle)", "lab)", "rle)", "practicum", "internship", "thesis",
            "research method", "capstone",
        ];
        const PREFIXES: &[&str] = &["PRAC", "THES", "CAPS", "RESM", "ARMS", "BRES"];

        Self {
            excluded_departments: vec!["SAS".to_string()],
            excluded_subjects: EXCLUDED.iter().map(|s| s.to_string()).collect(),
            excluded_patterns: PATTERNS.iter().map(|s| s.to_string()).collect(),
            excluded_prefixes: PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self {
            math_prefix: "MATH".to_string(),
            math_department: "SACE".to_string(),
            arch_marker: "ARCH".to_string(),
        }
    }
}

impl Default for BuildingRules {
    fn default() -> Self {
        let list = |b: &[&str]| b.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let dept = |d: &str, b: &[&str]| DepartmentBuildings {
            department: d.to_string(),
            buildings: list(b),
        };
        Self {
            architecture: list(&["C", "K"]),
            architecture_preferred: "C".to_string(),
            by_department: vec![
                dept("SECAP", &["A", "B", "J"]),
                dept("SABH", &["A"]),
                dept("SACE", &["N", "K", "C"]),
                dept("SHAS", &["L", "M", "N", "K", "J"]),
            ],
            default: list(&["A", "N", "K", "L", "M", "B", "C", "J"]),
        }
    }
}

impl Default for LoadBalance {
    fn default() -> Self {
        Self {
            penalized_day: Some(2),
            bulk_penalty: 50,
            fallback_penalty: 30,
        }
    }
}
