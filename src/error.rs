/// Errors produced by the rotation core and its persistence helpers.
#[derive(Debug, thiserror::Error)]
pub enum RotaError {
    /// The PRNG was asked for a value in an empty range.
    #[error("random bound must be positive, got {bound}")]
    Domain { bound: usize },

    /// Roster or catalog is empty.
    #[error("{0}")]
    Configuration(String),

    /// Bad user input: names, numbers, dates or import text.
    #[error("{0}")]
    Validation(String),

    /// No chore could be found for these people this week.
    /// Assignments made for everyone else still stand.
    #[error("unable to find suitable chore assignment for {}; check your chore distribution", .people.join(", "))]
    Assignment { people: Vec<String> },

    /// Replay drifted past the target without reaching it.
    #[error("simulation overshot the target at cycle {cycle}, week {week}")]
    Simulation { cycle: u32, week: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl RotaError {
    pub(crate) fn not_configured() -> Self {
        RotaError::Configuration("need at least one person and one chore".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_error_names_every_person() {
        let err = RotaError::Assignment {
            people: vec!["Steve".into(), "Sue".into()],
        };
        assert_eq!(
            err.to_string(),
            "unable to find suitable chore assignment for Steve, Sue; check your chore distribution"
        );
    }

    #[test]
    fn configuration_message() {
        assert_eq!(
            RotaError::not_configured().to_string(),
            "need at least one person and one chore"
        );
    }
}
