//! Personnel record model.

use serde::{Deserialize, Serialize};

use garrison_core::types::PersonnelId;

/// A registered member of personnel.
///
/// Looked up at login by `military_id`, the external business key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    /// Unique record identifier.
    pub id: PersonnelId,
    /// Registration number, digits only once normalized.
    pub military_id: String,
    /// Full name.
    pub name: String,
    /// Rank abbreviation, if assigned.
    pub rank: Option<String>,
}

impl Personnel {
    /// Creates a record with a fresh identifier.
    pub fn new(
        military_id: impl Into<String>,
        name: impl Into<String>,
        rank: Option<String>,
    ) -> Self {
        Self {
            id: PersonnelId::new(),
            military_id: military_id.into(),
            name: name.into(),
            rank,
        }
    }

    /// Name prefixed by rank when one is assigned.
    pub fn display_name(&self) -> String {
        match &self.rank {
            Some(rank) => format!("{rank} {}", self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let with_rank = Personnel::new("1234", "Kim", Some("SGT".to_string()));
        assert_eq!(with_rank.display_name(), "SGT Kim");
        let without = Personnel::new("1235", "Lee", None);
        assert_eq!(without.display_name(), "Lee");
    }
}
