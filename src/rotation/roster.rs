use std::collections::BTreeSet;

use super::types::{RotationState, SHARED_SUFFIX};
use crate::error::RotaError;

fn clean_name(kind: &str, name: &str) -> Result<String, RotaError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RotaError::Validation(format!("{kind} name is required")));
    }
    Ok(trimmed.to_string())
}

impl RotationState {
    pub fn add_person(&mut self, name: &str) -> Result<(), RotaError> {
        let name = clean_name("Person", name)?;
        if self.roster.contains(&name) {
            return Err(RotaError::Validation(format!("{name} is already on the roster")));
        }
        self.completed.insert(name.clone(), BTreeSet::new());
        self.history.insert(name.clone(), Vec::new());
        self.roster.push(name);
        Ok(())
    }

    pub fn remove_person(&mut self, name: &str) -> Result<(), RotaError> {
        let name = name.trim();
        let Some(index) = self.roster.iter().position(|p| p == name) else {
            return Err(RotaError::Validation(format!("{name} is not on the roster")));
        };
        self.roster.remove(index);
        self.completed.remove(name);
        self.history.remove(name);
        self.last_assignments.retain(|a| a.person != name);
        Ok(())
    }

    pub fn add_chore(&mut self, name: &str) -> Result<(), RotaError> {
        let name = clean_name("Chore", name)?;
        if self.catalog.contains(&name) {
            return Err(RotaError::Validation(format!("{name} is already a chore")));
        }
        self.catalog.push(name);
        Ok(())
    }

    /// Drops the chore and every trace of it in progress, history and last week.
    pub fn remove_chore(&mut self, name: &str) -> Result<(), RotaError> {
        let name = name.trim();
        let Some(index) = self.catalog.iter().position(|c| c == name) else {
            return Err(RotaError::Validation(format!("{name} is not a chore")));
        };
        self.catalog.remove(index);
        for done in self.completed.values_mut() {
            done.remove(name);
        }
        let shared_label = format!("{name}{SHARED_SUFFIX}");
        for entries in self.history.values_mut() {
            entries.retain(|label| label != name && *label != shared_label);
        }
        self.last_assignments.retain(|a| a.chore != name);
        Ok(())
    }
}
