use chrono::NaiveDate;
use tracing::info;

use crate::error::RotaError;
use crate::rotation::RotationState;

/// Date format of the optional fourth line (e.g. "01/01/24").
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// Settings read from the three- or four-line text format.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationSettings {
    pub catalog: Vec<String>,
    pub roster: Vec<String>,
    pub cycle: u32,
    pub week: u32,
    pub seed: i64,
    pub start_date: Option<NaiveDate>,
}

/// Splits a comma-separated list, trimming entries and dropping blanks and repeats
fn parse_list(line: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for part in line.split(',') {
        let trimmed = part.trim();
        if !trimmed.is_empty() && !items.iter().any(|i| i == trimmed) {
            items.push(trimmed.to_string());
        }
    }
    items
}

/// Parses a positive counter such as a cycle or week number
fn parse_position(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RotaError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        RotaError::Validation(format!("Invalid start date '{}'. Use MM/DD/YY.", value.trim()))
    })
}

/// Parses exported settings text. Nothing is applied here.
pub fn parse_rotation_text(text: &str) -> Result<RotationSettings, RotaError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(RotaError::Validation("Please enter settings to apply.".to_string()));
    }
    parse_settings_lines(&lines, true)
}

/// Parses a saved state file. Unlike [`parse_rotation_text`], a blank chores
/// or names line is read as an empty list, since a rotation may be saved
/// after its last person or chore was removed.
pub fn parse_saved_text(text: &str) -> Result<RotationSettings, RotaError> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    parse_settings_lines(&lines, false)
}

fn parse_settings_lines(lines: &[&str], require_lists: bool) -> Result<RotationSettings, RotaError> {
    if lines.len() != 3 && lines.len() != 4 {
        return Err(RotaError::Validation(
            "Invalid format. Expected three lines (chores, names, cycle/week/seed) and an optional start date."
                .to_string(),
        ));
    }

    let catalog = parse_list(lines[0]);
    if require_lists && catalog.is_empty() {
        return Err(RotaError::Validation(
            "Invalid chores list. Please enter at least one chore.".to_string(),
        ));
    }

    let roster = parse_list(lines[1]);
    if require_lists && roster.is_empty() {
        return Err(RotaError::Validation(
            "Invalid names list. Please enter at least one name.".to_string(),
        ));
    }

    let parts: Vec<&str> = lines[2].split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(RotaError::Validation(
            "Invalid Cycle, Week, Seed line. Please enter three comma-separated numbers."
                .to_string(),
        ));
    }
    let (Some(cycle), Some(week), Ok(seed)) = (
        parse_position(parts[0]),
        parse_position(parts[1]),
        parts[2].parse::<i64>(),
    ) else {
        return Err(RotaError::Validation(
            "Cycle and Week must be positive integers, and Seed must be a number.".to_string(),
        ));
    };

    let start_date = match lines.get(3) {
        Some(line) => Some(parse_date(line)?),
        None => None,
    };

    Ok(RotationSettings {
        catalog,
        roster,
        cycle,
        week,
        seed,
        start_date,
    })
}

impl RotationState {
    /// Replaces the whole rotation with the settings in `text` and replays
    /// up to the position it names. On error nothing changes.
    pub fn import_text(&mut self, text: &str) -> Result<(), RotaError> {
        let settings = parse_rotation_text(text)?;
        let mut imported = RotationState::new(&settings.catalog, &settings.roster, settings.seed);
        imported.set_start_date(settings.start_date);
        imported.jump_to(settings.cycle, settings.week)?;
        info!(
            people = imported.roster().len(),
            chores = imported.catalog().len(),
            cycle = imported.cycle(),
            week = imported.week(),
            "settings applied"
        );
        *self = imported;
        Ok(())
    }

    /// Like [`RotationState::import_text`] but for a saved state file. A
    /// rotation with nobody or nothing in it cannot be replayed, so it comes
    /// back at cycle 1, week 1 with its seed and start date.
    pub fn restore_text(&mut self, text: &str) -> Result<(), RotaError> {
        let settings = parse_saved_text(text)?;
        let mut restored = RotationState::new(&settings.catalog, &settings.roster, settings.seed);
        restored.set_start_date(settings.start_date);
        if restored.is_configured() {
            restored.jump_to(settings.cycle, settings.week)?;
        }
        *self = restored;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_three_lines() {
        let settings =
            parse_rotation_text("Raking, Sweeping , Dusting\nSteve, Mary\n2,3,42\n").unwrap();
        assert_eq!(settings.catalog, ["Raking", "Sweeping", "Dusting"]);
        assert_eq!(settings.roster, ["Steve", "Mary"]);
        assert_eq!((settings.cycle, settings.week, settings.seed), (2, 3, 42));
        assert_eq!(settings.start_date, None);
    }

    #[test]
    fn parses_optional_start_date() {
        let settings = parse_rotation_text("A, B\nX\n1, 1, -7\n03/04/24").unwrap();
        assert_eq!(settings.seed, -7);
        assert_eq!(settings.start_date, NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let settings = parse_rotation_text("\n  A,,B, A \n\n X ,\n 1,2,3 \n\n").unwrap();
        assert_eq!(settings.catalog, ["A", "B"]);
        assert_eq!(settings.roster, ["X"]);
    }

    #[test]
    fn rejects_malformed_text() {
        let bad = [
            "",
            "A\nX",
            "A\nX\n1,1,1\n01/01/24\nextra",
            " , \nX\n1,1,1",
            "A\n,\n1,1,1",
            "A\nX\n1,1",
            "A\nX\n0,1,1",
            "A\nX\n1,-2,1",
            "A\nX\n1,1,seed",
            "A\nX\n1,1,1\n2024-01-01",
            "A\nX\n1,1,1\n13/45/24",
        ];
        for text in bad {
            assert_matches!(
                parse_rotation_text(text),
                Err(RotaError::Validation(_)),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn import_replays_to_position() {
        let mut state = RotationState::default();
        state.import_text("A, B, C\nX, Y\n2,2,5").unwrap();
        assert_eq!(state.catalog(), ["A", "B", "C"]);
        assert_eq!(state.roster(), ["X", "Y"]);
        assert_eq!((state.cycle(), state.week(), state.seed()), (2, 2, 5));
        assert_eq!(state.history("X").unwrap().len(), 5);
        assert_eq!(state.last_assignments().len(), 2);
    }

    #[test]
    fn import_accepts_extreme_seeds() {
        for text in ["A, B\nX, Y\n1,1,9223372036854775807", "A, B\nX, Y\n1,1,-9223372036854775808"] {
            let mut state = RotationState::default();
            state.import_text(text).unwrap();
            assert_eq!(state.last_assignments().len(), 2);
            assert_eq!(state.export_text(), text);
        }
        let mut state = RotationState::default();
        state.import_text("A, B\nX, Y\n3,2,9223372036854775807").unwrap();
        assert_eq!((state.cycle(), state.week()), (3, 2));
    }

    #[test]
    fn saved_text_may_have_empty_lists() {
        let settings = parse_saved_text("A, B\n\n2,1,4\n").unwrap();
        assert_eq!(settings.catalog, ["A", "B"]);
        assert!(settings.roster.is_empty());

        let settings = parse_saved_text("\nX\n1,1,1\n03/04/24\n").unwrap();
        assert!(settings.catalog.is_empty());
        assert_eq!(settings.roster, ["X"]);

        assert_matches!(parse_rotation_text("A, B\n\n2,1,4"), Err(RotaError::Validation(_)));
        assert_matches!(parse_saved_text("A\nX\n0,1,1"), Err(RotaError::Validation(_)));
    }

    #[test]
    fn restore_keeps_an_empty_roster() {
        let mut state = RotationState::default();
        state.restore_text("A, B\n\n2,1,4\n").unwrap();
        assert_eq!(state.catalog(), ["A", "B"]);
        assert!(state.roster().is_empty());
        assert_eq!((state.cycle(), state.week(), state.seed()), (1, 1, 4));

        state.restore_text("A, B\nX\n2,1,4\n").unwrap();
        assert_eq!((state.cycle(), state.week()), (2, 1));
    }

    #[test]
    fn failed_import_leaves_state_alone() {
        let mut state = RotationState::default();
        state.assign_week().unwrap();
        let before = state.clone();
        assert!(state.import_text("A\nX\n1,1,nope").is_err());
        assert_eq!(state, before);
    }
}
