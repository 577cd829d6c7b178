//! Testing utilities for the detective game.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for scripted walks through a mansion
//! - Assertion helpers for verifying clues and suspects

use crate::case::{CaseFile, RoomSpec};
use crate::investigation::{Investigation, InvestigationError, StepOutcome};
use crate::map::Choice;

/// Test harness for running investigation scenarios.
pub struct TestHarness {
    /// The investigation under test.
    pub investigation: Investigation,
    /// Rejected keystrokes and failed moves, in order.
    pub rejected: Vec<String>,
}

impl TestHarness {
    /// Harness over the built-in mansion.
    pub fn new() -> Result<Self, InvestigationError> {
        Self::with_case(&CaseFile::mansion_default())
    }

    /// Harness over a custom case.
    pub fn with_case(case: &CaseFile) -> Result<Self, InvestigationError> {
        Ok(Self {
            investigation: Investigation::new(case)?,
            rejected: Vec::new(),
        })
    }

    /// Harness over a single map with no title worth mentioning.
    pub fn with_map(map: RoomSpec) -> Result<Self, InvestigationError> {
        Self::with_case(&CaseFile {
            title: "Test Case".to_string(),
            fallback_suspect: crate::case::DEFAULT_FALLBACK_SUSPECT.to_string(),
            map,
        })
    }

    /// Explore from the entrance using one keystroke per character.
    ///
    /// Unknown keys and missing paths are collected in `rejected` and the
    /// walk carries on. Stops at the first `s`. Any other error ends the walk.
    pub fn explore(&mut self, keys: &str) -> Result<Vec<StepOutcome>, InvestigationError> {
        let mut outcomes = vec![self.investigation.begin_exploration()?];
        for key in keys.chars() {
            let Some(choice) = Choice::from_key(key) else {
                self.rejected.push(format!("invalid key '{key}'"));
                continue;
            };
            match self.investigation.step(choice) {
                Ok(StepOutcome::Stopped) => {
                    outcomes.push(StepOutcome::Stopped);
                    break;
                }
                Ok(outcome) => outcomes.push(outcome),
                Err(InvestigationError::Map(e)) => self.rejected.push(e.to_string()),
                Err(e) => return Err(e),
            }
        }
        Ok(outcomes)
    }

    /// Add a manual clue.
    pub fn note(&mut self, clue: &str, suspect: &str) -> Result<&mut Self, InvestigationError> {
        self.investigation.record_manual(clue, suspect)?;
        Ok(self)
    }

    /// Clues in the order the store lists them.
    pub fn clue_list(&self) -> Vec<String> {
        self.investigation
            .clues()
            .in_order()
            .map(str::to_string)
            .collect()
    }

    /// Number of clues linked to `name`, or `None` if unknown.
    pub fn clue_count(&self, name: &str) -> Option<usize> {
        self.investigation
            .suspects()
            .find(name)
            .map(|s| s.clue_count())
    }

    pub fn current_room(&self) -> &str {
        self.investigation.current_room()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the clue store lists exactly `expected`, in order.
#[track_caller]
pub fn assert_clues(harness: &TestHarness, expected: &[&str]) {
    let actual = harness.clue_list();
    assert_eq!(actual, expected, "Unexpected clue listing");
}

/// Assert `name` has exactly `count` linked clues.
#[track_caller]
pub fn assert_suspect_count(harness: &TestHarness, name: &str, count: usize) {
    let actual = harness.clue_count(name);
    assert_eq!(
        actual,
        Some(count),
        "Expected suspect '{name}' with {count} clue(s), got {actual:?}"
    );
}

/// Assert the leading suspect is `name` with `count` clues.
#[track_caller]
pub fn assert_leading(harness: &TestHarness, name: &str, count: usize) {
    let leading = harness
        .investigation
        .leading_suspect()
        .map(|s| (s.name.as_str(), s.clue_count()));
    assert_eq!(
        leading,
        Some((name, count)),
        "Expected leading suspect '{name}' ({count})"
    );
}

/// Assert no suspect has been recorded.
#[track_caller]
pub fn assert_no_suspects(harness: &TestHarness) {
    assert!(
        harness.investigation.suspects().is_empty(),
        "Expected no suspects to be recorded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_explore_collects_clues() {
        let mut harness = TestHarness::new().unwrap();
        harness.explore("ees").unwrap();

        assert_eq!(harness.current_room(), "Sotao");
        assert_clues(
            &harness,
            &["Carta rasgada encontrada", "Livros deslocados", "Pegadas na entrada"],
        );
        assert_suspect_count(&harness, "Maria", 1);
        assert!(harness.rejected.is_empty());
    }

    #[test]
    fn test_harness_records_rejections() {
        let mut harness = TestHarness::new().unwrap();
        harness.explore("xedds").unwrap();

        // x is not a key; the second d runs into the Escritorio's missing right child
        assert_eq!(harness.rejected.len(), 2);
        assert!(harness.rejected[0].contains("invalid key"));
        assert!(harness.rejected[1].contains("Escritorio"));
        assert_eq!(harness.current_room(), "Escritorio");
    }

    #[test]
    fn test_harness_custom_map() {
        let mut harness = TestHarness::with_map(
            RoomSpec::new("Porão").with_clue("Faca escondida", "Zeca"),
        )
        .unwrap();
        assert_no_suspects(&harness);
        harness.explore("s").unwrap();
        assert_leading(&harness, "Zeca", 1);
    }

    #[test]
    fn test_harness_reports_setup_and_note_errors() {
        let broken = TestHarness::with_map(RoomSpec::new(""));
        assert!(matches!(broken, Err(InvestigationError::Case(_))));

        let mut harness = TestHarness::new().unwrap();
        let noted = harness.note("\r\n", "Maria");
        assert!(matches!(noted, Err(InvestigationError::EmptyClue)));
        assert_no_suspects(&harness);
    }
}
