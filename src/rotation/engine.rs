use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::random::{seeded_random, shuffle};
use super::types::{Assignment, RotationState};
use crate::error::RotaError;

/// Attempts per person per pass before giving up on them. The candidate list
/// is the same on every attempt; only the seed offset moves.
const MAX_ATTEMPTS: i64 = 10;

impl RotationState {
    /// Assigns one chore to every person for the next week.
    ///
    /// The week advances on every call except the first one after a reset.
    /// When everyone has done every chore (or the week runs past the size of
    /// the catalog) the completed sets are cleared and a new cycle starts.
    ///
    /// People are visited in an order shuffled from the week seed. The first
    /// pass hands out chores nobody else holds this week, preferring chores
    /// that were not done last week. People left over get a shared chore in a
    /// second pass.
    ///
    /// If someone cannot be given any chore at all the week is still
    /// committed for everyone else and [`RotaError::Assignment`] names who
    /// was left out.
    pub fn assign_week(&mut self) -> Result<&[Assignment], RotaError> {
        if !self.is_configured() {
            return Err(RotaError::not_configured());
        }

        if self.started {
            self.week += 1;
        }
        if self.is_cycle_complete() || self.week as usize > self.catalog.len() {
            self.start_next_cycle();
        }

        // Wrapping keeps extreme seeds deterministic in every build profile.
        let week_seed = self
            .seed
            .wrapping_add(i64::from(self.week))
            .wrapping_add(i64::from(self.cycle) * 1000);
        debug!(cycle = self.cycle, week = self.week, week_seed, "assigning week");

        let mut order = self.roster.clone();
        shuffle(&mut order, week_seed)?;

        let last_week: HashSet<String> = self
            .last_assignments
            .iter()
            .map(|a| a.chore.clone())
            .collect();

        let mut assignments = Vec::with_capacity(order.len());
        let mut used_this_week: HashSet<String> = HashSet::new();
        let mut deferred = Vec::new();

        for (index, person) in order.iter().enumerate() {
            let base = week_seed.wrapping_add(index as i64);
            match self.pick_chore(person, base, Some(&used_this_week), &last_week)? {
                Some(chore) => {
                    used_this_week.insert(chore.clone());
                    assignments.push(self.record(person, chore, false));
                }
                None => deferred.push((index, person)),
            }
        }

        let mut unassigned = Vec::new();
        for (index, person) in deferred {
            let base = week_seed.wrapping_add(index as i64);
            match self.pick_chore(person, base, None, &last_week)? {
                Some(chore) => assignments.push(self.record(person, chore, true)),
                None => {
                    warn!(person = %person, "no chore left to assign this cycle");
                    unassigned.push(person.clone());
                }
            }
        }

        self.last_assignments = assignments;
        self.started = true;

        if unassigned.is_empty() {
            Ok(&self.last_assignments)
        } else {
            Err(RotaError::Assignment { people: unassigned })
        }
    }

    fn start_next_cycle(&mut self) {
        for done in self.completed.values_mut() {
            done.clear();
        }
        self.cycle += 1;
        self.week = 1;
        info!(cycle = self.cycle, "starting new cycle");
    }

    /// Picks a chore the person has not done this cycle.
    ///
    /// `used_this_week` is `None` in the shared pass, where chores may be
    /// doubled up. Last week's chores are avoided unless nothing else is left.
    fn pick_chore(
        &self,
        person: &str,
        base_seed: i64,
        used_this_week: Option<&HashSet<String>>,
        last_week: &HashSet<String>,
    ) -> Result<Option<String>, RotaError> {
        let done = self.completed.get(person);
        for attempt in 0..MAX_ATTEMPTS {
            let open: Vec<&String> = self
                .catalog
                .iter()
                .filter(|chore| !done.is_some_and(|d| d.contains(*chore)))
                .filter(|chore| !used_this_week.is_some_and(|u| u.contains(*chore)))
                .collect();
            let fresh: Vec<&String> = open
                .iter()
                .copied()
                .filter(|chore| !last_week.contains(*chore))
                .collect();
            let candidates = if fresh.is_empty() { open } else { fresh };

            if !candidates.is_empty() {
                let pick = seeded_random(base_seed.wrapping_add(attempt), candidates.len())?;
                return Ok(Some(candidates[pick].clone()));
            }
        }
        Ok(None)
    }

    fn record(&mut self, person: &str, chore: String, shared: bool) -> Assignment {
        let assignment = Assignment {
            person: person.to_string(),
            chore,
            shared,
        };
        self.completed
            .entry(person.to_string())
            .or_default()
            .insert(assignment.chore.clone());
        self.history
            .entry(person.to_string())
            .or_default()
            .push(assignment.history_label());
        assignment
    }
}
