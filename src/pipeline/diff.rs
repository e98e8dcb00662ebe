//! Change detection between the current fetch and the previous state.
//!
//! Intentionally naive: trimmed exact-equality per tracked field. Leading
//! and trailing whitespace from the source is normalized, nothing deeper.

use crate::storage::PreviousState;

/// Which tracked fields differ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub changed_fields: Vec<&'static str>,
}

impl ChangeReport {
    pub fn has_changes(&self) -> bool {
        !self.changed_fields.is_empty()
    }
}

/// Compare current against previous, field by field.
pub fn compare(current: &PreviousState, previous: &PreviousState) -> ChangeReport {
    let mut changed_fields = Vec::new();

    if current.historico.trim() != previous.historico.trim() {
        changed_fields.push("historico");
    }
    if current.info_complementar.trim() != previous.info_complementar.trim() {
        changed_fields.push("info_complementar");
    }

    ChangeReport { changed_fields }
}

/// Pure predicate: any tracked field differing marks the record changed.
pub fn changed(current: &PreviousState, previous: &PreviousState) -> bool {
    compare(current, previous).has_changes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(historico: &str, info: &str) -> PreviousState {
        PreviousState {
            historico: historico.into(),
            info_complementar: info.into(),
        }
    }

    #[test]
    fn test_identical_states_are_unchanged() {
        let s = state("Em pauta", "Anexo I");
        assert!(!changed(&s, &s));
    }

    #[test]
    fn test_single_field_difference_marks_changed() {
        let prev = state("Em pauta", "Anexo I");

        let hist_only = state("Aprovado", "Anexo I");
        assert!(changed(&hist_only, &prev));
        assert_eq!(compare(&hist_only, &prev).changed_fields, vec!["historico"]);

        let info_only = state("Em pauta", "Anexo II");
        assert!(changed(&info_only, &prev));
        assert_eq!(
            compare(&info_only, &prev).changed_fields,
            vec!["info_complementar"]
        );
    }

    #[test]
    fn test_trimming_idempotence() {
        let raw = state("  Em pauta \n", "\tAnexo I  ");
        let trimmed = state("Em pauta", "Anexo I");
        assert!(!changed(&trimmed, &raw));
        assert!(!changed(&raw, &trimmed));
    }

    #[test]
    fn test_interior_whitespace_still_counts() {
        let a = state("Em  pauta", "x");
        let b = state("Em pauta", "x");
        assert!(changed(&a, &b));
    }

    #[test]
    fn test_first_run_against_empty_previous() {
        let current = state("X", "Y");
        assert!(changed(&current, &PreviousState::default()));
    }

    #[test]
    fn test_both_fields_reported() {
        let report = compare(&state("a", "b"), &state("c", "d"));
        assert_eq!(report.changed_fields, vec!["historico", "info_complementar"]);
    }
}
