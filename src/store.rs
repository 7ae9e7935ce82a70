use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::error::RotaError;
use crate::rotation::{RotationState, SHARED_SUFFIX};

/// Loads a rotation from a settings file.
///
/// A missing file yields the default household with its first week assigned.
/// A file saved with no people or no chores loads as that empty rotation.
pub fn load_state(path: &Path) -> Result<RotationState, RotaError> {
    if !path.exists() {
        info!(path = %path.display(), "no state file, starting a new rotation");
        let mut state = RotationState::default();
        state.assign_week()?;
        return Ok(state);
    }
    let text = fs::read_to_string(path)?;
    let mut state = RotationState::default();
    state.restore_text(&text)?;
    debug!(path = %path.display(), cycle = state.cycle(), week = state.week(), "state loaded");
    Ok(state)
}

pub fn save_state(path: &Path, state: &RotationState) -> Result<(), RotaError> {
    let mut text = state.export_text();
    text.push('\n');
    fs::write(path, text)?;
    debug!(path = %path.display(), "state saved");
    Ok(())
}

/// Writes every history entry as `person,entry,chore,shared` rows.
pub fn write_history_csv(state: &RotationState, path: &Path) -> Result<usize, RotaError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(["person", "entry", "chore", "shared"])?;

    let mut rows = 0;
    for person in state.roster() {
        for (index, label) in state.history(person).unwrap_or_default().iter().enumerate() {
            let (chore, shared) = match label.strip_suffix(SHARED_SUFFIX) {
                Some(chore) => (chore, "true"),
                None => (label.as_str(), "false"),
            };
            let entry = (index + 1).to_string();
            wtr.write_record([person.as_str(), entry.as_str(), chore, shared])?;
            rows += 1;
        }
    }

    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_default_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("chores.txt")).unwrap();
        assert_eq!(state.roster(), ["Steve", "Mary", "Sue"]);
        assert_eq!(state.last_assignments().len(), 3);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.txt");
        let mut state = RotationState::new(["A", "B", "C"], ["X", "Y"], 8);
        state.jump_to(2, 3).unwrap();

        save_state(&path, &state).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A, B, C\nX, Y\n2,3,8\n");
        assert_eq!(load_state(&path).unwrap(), state);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.txt");
        fs::write(&path, "just one line").unwrap();
        assert!(matches!(load_state(&path), Err(RotaError::Validation(_))));
    }

    #[test]
    fn removing_everyone_still_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.txt");
        let mut state = RotationState::new(["A", "B"], ["X"], 1);
        state.assign_week().unwrap();
        state.remove_person("X").unwrap();

        save_state(&path, &state).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A, B\n\n1,1,1\n");

        let mut loaded = load_state(&path).unwrap();
        assert_eq!(loaded.catalog(), ["A", "B"]);
        assert!(loaded.roster().is_empty());

        loaded.add_person("Y").unwrap();
        assert_eq!(loaded.assign_week().unwrap().len(), 1);
        save_state(&path, &loaded).unwrap();
        assert_eq!(load_state(&path).unwrap(), loaded);
    }

    #[test]
    fn removing_every_chore_still_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.txt");
        let mut state = RotationState::new(["A"], ["X", "Y"], 5);
        state.assign_week().unwrap();
        state.remove_chore("A").unwrap();

        save_state(&path, &state).unwrap();
        let mut loaded = load_state(&path).unwrap();
        assert!(loaded.catalog().is_empty());
        assert_eq!(loaded.roster(), ["X", "Y"]);
        assert_eq!(loaded.seed(), 5);

        loaded.add_chore("B").unwrap();
        assert_eq!(loaded.assign_week().unwrap().len(), 2);
    }

    #[test]
    fn history_csv_has_one_row_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut state = RotationState::new(["A", "B"], ["X", "Y", "Z"], 1);
        state.jump_to(1, 2).unwrap();

        let rows = write_history_csv(&state, &path).unwrap();
        assert_eq!(rows, 6);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 6);
        assert_eq!(records.iter().filter(|r| &r[3] == "true").count(), 2);
        assert!(records.iter().all(|r| &r[2] == "A" || &r[2] == "B"));
    }
}
