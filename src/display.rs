use crate::parser::DATE_FORMAT;
use crate::rotation::{ChoreStatus, RotationState};

/// How many history entries are shown per person.
pub const RECENT_HISTORY: usize = 7;

impl RotationState {
    /// Settings text: chores, names, `cycle,week,seed`, and the start date when set.
    pub fn export_text(&self) -> String {
        let mut text = format!(
            "{}\n{}\n{},{},{}",
            self.catalog().join(", "),
            self.roster().join(", "),
            self.cycle(),
            self.week(),
            self.seed()
        );
        if let Some(start) = self.start_date() {
            text.push('\n');
            text.push_str(&start.format(DATE_FORMAT).to_string());
        }
        text
    }
}

/// Formats an assignment line, e.g. "Steve: Raking (shared)"
pub fn format_assignment(person: &str, chore: &str, shared: bool) -> String {
    if shared {
        format!("{}: {} (shared)", person, chore)
    } else {
        format!("{}: {}", person, chore)
    }
}

/// Recent history joined with arrows, or a placeholder when empty
pub fn format_history(state: &RotationState, person: &str) -> String {
    let recent = state.recent_history(person, RECENT_HISTORY);
    if recent.is_empty() {
        format!("{}: No history yet.", person)
    } else {
        format!("{}: {}", person, recent.join(" → "))
    }
}

fn status_cell(status: ChoreStatus, person: &str) -> &str {
    match status {
        ChoreStatus::Assigned => person,
        ChoreStatus::Done => "Done",
        ChoreStatus::Open => "",
    }
}

/// Prints the current week, completion table and recent history.
pub fn print_rotation(state: &RotationState) {
    println!("\n=== Cycle {}, Week {} (seed {}) ===", state.cycle(), state.week(), state.seed());

    if state.last_assignments().is_empty() {
        println!("No chores assigned yet.");
    } else {
        for a in state.last_assignments() {
            println!("  {}", format_assignment(&a.person, &a.chore, a.shared));
        }
    }

    let width = state
        .catalog()
        .iter()
        .chain(state.roster())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("\nCompleted this cycle:");
    let header: Vec<String> = state.catalog().iter().map(|c| format!("{:<width$}", c)).collect();
    println!("  {:<width$} | {}", "", header.join(" | "));
    for person in state.roster() {
        let cells: Vec<String> = state
            .catalog()
            .iter()
            .map(|chore| format!("{:<width$}", status_cell(state.status_of(person, chore), person)))
            .collect();
        println!("  {:<width$} | {}", person, cells.join(" | "));
    }

    println!("\nHistory:");
    for person in state.roster() {
        println!("  {}", format_history(state, person));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn exports_three_lines() {
        let state = RotationState::new(["Raking", "Sweeping"], ["Steve", "Mary"], 12);
        assert_eq!(state.export_text(), "Raking, Sweeping\nSteve, Mary\n1,1,12");
    }

    #[test]
    fn exports_start_date_as_fourth_line() {
        let mut state = RotationState::new(["A"], ["X"], 1);
        state.set_start_date(NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(state.export_text(), "A\nX\n1,1,1\n03/04/24");
    }

    #[test]
    fn round_trip_restores_the_rotation() {
        let mut state = RotationState::new(["A", "B", "C", "D"], ["X", "Y", "Z"], 77);
        state.set_start_date(NaiveDate::from_ymd_opt(2025, 9, 1));
        state.jump_to(3, 2).unwrap();

        let mut restored = RotationState::default();
        restored.import_text(&state.export_text()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn history_formatting() {
        let mut state = RotationState::new(["A"], ["X", "Y"], 1);
        assert_eq!(format_history(&state, "X"), "X: No history yet.");
        state.assign_week().unwrap();
        let line = format_history(&state, "X");
        assert!(line == "X: A" || line == "X: A (Shared Assignment)", "{line}");
        assert_eq!(format_assignment("X", "A", true), "X: A (shared)");
    }
}
