use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Suffix appended to history labels of shared assignments.
pub const SHARED_SUFFIX: &str = " (Shared Assignment)";

/// One person's chore for a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person: String,
    pub chore: String,
    pub shared: bool,
}

impl Assignment {
    /// Label as recorded in the person's history.
    pub fn history_label(&self) -> String {
        if self.shared {
            format!("{}{}", self.chore, SHARED_SUFFIX)
        } else {
            self.chore.clone()
        }
    }
}

/// Where a person stands with a chore in the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreStatus {
    /// Held this week.
    Assigned,
    /// Done earlier this cycle.
    Done,
    Open,
}

/// Roster, catalog, progress and position of a weekly chore rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    pub(crate) roster: Vec<String>,
    pub(crate) catalog: Vec<String>,
    pub(crate) completed: HashMap<String, BTreeSet<String>>,
    pub(crate) history: HashMap<String, Vec<String>>,
    pub(crate) cycle: u32,
    pub(crate) week: u32,
    pub(crate) seed: i64,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) last_assignments: Vec<Assignment>,
    pub(crate) started: bool,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(
            ["Raking", "Shoveling", "Gardening", "Exercising", "Sweeping", "Vacuuming"],
            ["Steve", "Mary", "Sue"],
            1,
        )
    }
}

impl RotationState {
    /// Builds a fresh state at cycle 1, week 1. Blank and repeated names are skipped.
    pub fn new<C, P>(catalog: C, roster: P, seed: i64) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut state = RotationState {
            roster: Vec::new(),
            catalog: Vec::new(),
            completed: HashMap::new(),
            history: HashMap::new(),
            cycle: 1,
            week: 1,
            seed,
            start_date: None,
            last_assignments: Vec::new(),
            started: false,
        };
        for chore in catalog {
            let _ = state.add_chore(chore.as_ref());
        }
        for person in roster {
            let _ = state.add_person(person.as_ref());
        }
        state
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Chores the person has already had this cycle.
    pub fn completed(&self, person: &str) -> Option<&BTreeSet<String>> {
        self.completed.get(person)
    }

    /// Every label ever assigned to the person, oldest first.
    pub fn history(&self, person: &str) -> Option<&[String]> {
        self.history.get(person).map(Vec::as_slice)
    }

    /// The last `limit` history labels for a person.
    pub fn recent_history(&self, person: &str, limit: usize) -> &[String] {
        match self.history.get(person) {
            Some(entries) => &entries[entries.len().saturating_sub(limit)..],
            None => &[],
        }
    }

    pub fn last_assignments(&self) -> &[Assignment] {
        &self.last_assignments
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.start_date = start_date;
    }

    pub fn is_configured(&self) -> bool {
        !self.roster.is_empty() && !self.catalog.is_empty()
    }

    /// True once every person has done every chore in the catalog.
    pub fn is_cycle_complete(&self) -> bool {
        self.roster.iter().all(|person| {
            self.completed
                .get(person)
                .is_some_and(|done| self.catalog.iter().all(|chore| done.contains(chore)))
        })
    }

    pub fn status_of(&self, person: &str, chore: &str) -> ChoreStatus {
        let done = self
            .completed
            .get(person)
            .is_some_and(|set| set.contains(chore));
        if !done {
            return ChoreStatus::Open;
        }
        let this_week = self
            .last_assignments
            .iter()
            .any(|a| a.person == person && a.chore == chore);
        if this_week {
            ChoreStatus::Assigned
        } else {
            ChoreStatus::Done
        }
    }

    /// Back to cycle 1, week 1 with empty progress. Roster, catalog, seed and
    /// start date are kept.
    pub(crate) fn restart(&mut self) {
        self.cycle = 1;
        self.week = 1;
        self.last_assignments.clear();
        self.started = false;
        self.completed = self
            .roster
            .iter()
            .map(|p| (p.clone(), BTreeSet::new()))
            .collect();
        self.history = self.roster.iter().map(|p| (p.clone(), Vec::new())).collect();
    }

    /// Full reset: cycle 1, week 1, seed 1, no history.
    pub fn reset_all(&mut self) {
        self.seed = 1;
        self.restart();
        tracing::info!("rotation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_household() {
        let state = RotationState::default();
        assert_eq!(state.roster(), ["Steve", "Mary", "Sue"]);
        assert_eq!(state.catalog().len(), 6);
        assert_eq!((state.cycle(), state.week(), state.seed()), (1, 1, 1));
        for person in state.roster() {
            assert!(state.completed(person).unwrap().is_empty());
            assert!(state.history(person).unwrap().is_empty());
        }
    }

    #[test]
    fn new_skips_blank_and_repeated_names() {
        let state = RotationState::new(["A", " ", "B", "A"], ["X", "X ", ""], 5);
        assert_eq!(state.catalog(), ["A", "B"]);
        assert_eq!(state.roster(), ["X"]);
    }

    #[test]
    fn shared_label_carries_suffix() {
        let a = Assignment {
            person: "X".into(),
            chore: "A".into(),
            shared: true,
        };
        assert_eq!(a.history_label(), "A (Shared Assignment)");
    }

    #[test]
    fn empty_roster_counts_as_complete() {
        let state = RotationState::new(["A"], Vec::<String>::new(), 1);
        assert!(!state.is_configured());
        assert!(state.is_cycle_complete());
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut state = RotationState::new(["A"], ["X"], 1);
        state
            .history
            .insert("X".into(), (1..=10).map(|i| format!("c{i}")).collect());
        assert_eq!(state.recent_history("X", 3), ["c8", "c9", "c10"]);
        assert!(state.recent_history("nobody", 3).is_empty());
    }

    #[test]
    fn reset_all_clears_progress_and_seed() {
        let mut state = RotationState::new(["A", "B"], ["X"], 9);
        state.cycle = 4;
        state.week = 2;
        state.started = true;
        state.completed.get_mut("X").unwrap().insert("A".into());
        state.reset_all();
        assert_eq!((state.cycle(), state.week(), state.seed()), (1, 1, 1));
        assert!(state.completed("X").unwrap().is_empty());
        assert!(!state.started);
    }
}
