use chrono::{Local, NaiveDate};
use rand::Rng;
use tracing::debug;

use super::types::RotationState;
use crate::error::RotaError;

/// How far past the target a replay may run before it is abandoned.
const DRIFT_LIMIT: u32 = 100;

/// Furthest week (counted from cycle 1, week 1) a replay may reach.
/// About 190 years of weekly chores.
pub const MAX_REPLAY_WEEKS: u64 = 10_000;

/// Anchor for date navigation when no start date is set (Jan 1, 2024).
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Folds a week past the end of the cycle into the following cycles.
pub fn normalize_position(cycle: u32, week: u32, weeks_per_cycle: usize) -> (u32, u32) {
    let per_cycle = weeks_per_cycle.max(1) as u64;
    let absolute = (u64::from(cycle) - 1) * per_cycle + (u64::from(week) - 1);
    let cycle = absolute / per_cycle + 1;
    let week = absolute % per_cycle + 1;
    (u32::try_from(cycle).unwrap_or(u32::MAX), week as u32)
}

/// Maps a calendar date to a (cycle, week) position.
///
/// Week 1 of cycle 1 is the seven days starting at `start`; each cycle lasts
/// one week per chore. Dates before `start` land on cycle 1, week 1.
pub fn date_to_position(
    start: NaiveDate,
    target: NaiveDate,
    catalog_size: usize,
) -> Result<(u32, u32), RotaError> {
    if catalog_size == 0 {
        return Err(RotaError::not_configured());
    }
    let days = (target - start).num_days();
    let total_weeks = (days.div_euclid(7) + 1).max(1) as u64;
    let per_cycle = catalog_size as u64;
    let cycle = (total_weeks - 1) / per_cycle + 1;
    let week = (total_weeks - 1) % per_cycle + 1;
    Ok((u32::try_from(cycle).unwrap_or(u32::MAX), week as u32))
}

impl RotationState {
    /// Rebuilds the rotation from cycle 1, week 1 up to the given position.
    ///
    /// Replay runs on a copy; on any error the state is left as it was.
    pub fn jump_to(&mut self, target_cycle: u32, target_week: u32) -> Result<(), RotaError> {
        if target_cycle < 1 || target_week < 1 {
            return Err(RotaError::Validation(
                "Cycle and Week numbers must be positive integers.".to_string(),
            ));
        }
        if !self.is_configured() {
            return Err(RotaError::not_configured());
        }
        let weeks = (u64::from(target_cycle) - 1) * self.catalog.len() as u64
            + u64::from(target_week);
        if weeks > MAX_REPLAY_WEEKS {
            return Err(RotaError::Validation(format!(
                "Cycle {target_cycle}, week {target_week} is too far ahead; at most {MAX_REPLAY_WEEKS} weeks can be replayed."
            )));
        }
        let target = normalize_position(target_cycle, target_week, self.catalog.len());
        debug!(cycle = target.0, week = target.1, "replaying rotation");

        let mut sim = self.clone();
        sim.restart();
        loop {
            sim.assign_week()?;
            if (sim.cycle, sim.week) >= target {
                break;
            }
            if sim.cycle > target.0.saturating_add(DRIFT_LIMIT)
                || sim.week > target.1.saturating_add(DRIFT_LIMIT)
            {
                return Err(RotaError::Simulation {
                    cycle: sim.cycle,
                    week: sim.week,
                });
            }
        }
        *self = sim;
        Ok(())
    }

    /// The (cycle, week) a calendar date falls in.
    pub fn position_for_date(&self, date: NaiveDate) -> Result<(u32, u32), RotaError> {
        if !self.is_configured() {
            return Err(RotaError::not_configured());
        }
        let start = self.start_date.unwrap_or_else(default_start_date);
        date_to_position(start, date, self.catalog.len())
    }

    pub fn jump_to_date(&mut self, date: NaiveDate) -> Result<(u32, u32), RotaError> {
        let (cycle, week) = self.position_for_date(date)?;
        self.jump_to(cycle, week)?;
        Ok((cycle, week))
    }

    pub fn jump_to_today(&mut self) -> Result<(u32, u32), RotaError> {
        self.jump_to_date(Local::now().date_naive())
    }

    /// Changes the seed. If weeks have already been handed out they are
    /// replayed under the new seed up to the current position.
    pub fn set_seed(&mut self, seed: i64) -> Result<(), RotaError> {
        if !self.started || !self.is_configured() {
            self.seed = seed;
            return Ok(());
        }
        let (cycle, week) = (self.cycle, self.week);
        let previous = self.seed;
        self.seed = seed;
        if let Err(err) = self.jump_to(cycle, week) {
            self.seed = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Picks a fresh seed in `1..=9999` and replays with it.
    pub fn set_random_seed(&mut self) -> Result<i64, RotaError> {
        let seed = rand::thread_rng().gen_range(1..=9999);
        self.set_seed(seed)?;
        Ok(seed)
    }
}
