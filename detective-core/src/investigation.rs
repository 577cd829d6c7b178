//! The running investigation.
//!
//! [`Investigation`] owns the mansion, the clue store and the suspect index
//! for one run and is the only thing the console talks to. Every discovery
//! goes to both collections: the store keeps each clue once, the index
//! keeps every link, repeats included.

use crate::case::{CaseError, CaseFile, Mansion};
use crate::clues::ClueStore;
use crate::map::{Choice, LocationId, MapError};
use crate::suspects::{IndexError, Suspect, SuspectIndex};
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from investigation operations.
#[derive(Debug, Error)]
pub enum InvestigationError {
    #[error("{0}")]
    Map(#[from] MapError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("Out of memory while recording clue: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Clue text cannot be empty")]
    EmptyClue,

    #[error("Case error: {0}")]
    Case(#[from] CaseError),
}

/// What happened after a navigation choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved into a room; carries the room name and any clue found there.
    Entered {
        room: String,
        clue: Option<String>,
    },
    /// The player left the mansion.
    Stopped,
}

/// End-of-run totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub title: String,
    pub clues: usize,
    pub suspects: usize,
    pub associations: usize,
    pub leading_suspect: Option<String>,
    pub leading_count: usize,
}

/// One run of the game.
pub struct Investigation {
    title: String,
    fallback_suspect: String,
    mansion: Mansion,
    clues: ClueStore,
    suspects: SuspectIndex,
    position: LocationId,
}

impl Investigation {
    pub fn new(case: &CaseFile) -> Result<Self, InvestigationError> {
        let mansion = case.build()?;
        info!(title = %case.title, "investigation opened");
        Ok(Self {
            title: case.title.clone(),
            fallback_suspect: case.fallback_suspect.clone(),
            position: mansion.root,
            mansion,
            clues: ClueStore::new(),
            suspects: SuspectIndex::new(),
        })
    }

    /// Start from the built-in mansion.
    pub fn mansion_default() -> Result<Self, InvestigationError> {
        Self::new(&CaseFile::mansion_default())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mansion(&self) -> &Mansion {
        &self.mansion
    }

    pub fn clues(&self) -> &ClueStore {
        &self.clues
    }

    pub fn suspects(&self) -> &SuspectIndex {
        &self.suspects
    }

    pub fn position(&self) -> LocationId {
        self.position
    }

    pub fn current_room(&self) -> &str {
        self.mansion.room_name(self.position)
    }

    pub fn leading_suspect(&self) -> Option<&Suspect> {
        self.suspects.most_associated()
    }

    /// Record that `clue` points at `suspect`.
    pub fn discover(&mut self, clue: &str, suspect: &str) -> Result<(), InvestigationError> {
        let mut text = String::new();
        text.try_reserve_exact(clue.len())?;
        text.push_str(clue);

        // Index first: if it runs out of memory the store is still untouched.
        self.suspects.associate(suspect, clue)?;
        self.clues = std::mem::take(&mut self.clues).insert(text);
        Ok(())
    }

    /// Record a clue typed in by the player.
    ///
    /// Empty text is rejected; an empty suspect name falls back to the
    /// case's fallback suspect.
    pub fn record_manual(&mut self, clue: &str, suspect: &str) -> Result<(), InvestigationError> {
        let clue = clue.trim_end_matches(['\r', '\n']);
        if clue.is_empty() {
            warn!("empty clue rejected");
            return Err(InvestigationError::EmptyClue);
        }
        let suspect = suspect.trim_end_matches(['\r', '\n']);
        let suspect = if suspect.is_empty() {
            self.fallback_suspect.clone()
        } else {
            suspect.to_string()
        };
        self.discover(clue, &suspect)
    }

    /// Go back to the entrance and enter it.
    pub fn begin_exploration(&mut self) -> Result<StepOutcome, InvestigationError> {
        self.position = self.mansion.root;
        self.enter_current()
    }

    /// Apply one navigation choice.
    ///
    /// A missing path leaves the position and every collection unchanged.
    pub fn step(&mut self, choice: Choice) -> Result<StepOutcome, InvestigationError> {
        match choice {
            Choice::Stop => {
                debug!(room = self.current_room(), "exploration stopped");
                Ok(StepOutcome::Stopped)
            }
            Choice::Go(direction) => {
                let next = self.mansion.graph.traverse(self.position, direction)?;
                self.position = next;
                self.enter_current()
            }
        }
    }

    fn enter_current(&mut self) -> Result<StepOutcome, InvestigationError> {
        let room = self.current_room().to_string();
        debug!(%room, "entered room");
        let planted = self.mansion.clue_at(self.position).cloned();
        let clue = match planted {
            Some(planted) => {
                self.discover(&planted.text, &planted.suspect)?;
                Some(planted.text)
            }
            None => None,
        };
        Ok(StepOutcome::Entered { room, clue })
    }

    pub fn summary(&self) -> CaseSummary {
        let leading = self.suspects.most_associated();
        CaseSummary {
            title: self.title.clone(),
            clues: self.clues.len(),
            suspects: self.suspects.len(),
            associations: self.suspects.association_count(),
            leading_suspect: leading.map(|s| s.name.clone()),
            leading_count: leading.map_or(0, Suspect::clue_count),
        }
    }

    /// End the run and release everything it collected.
    pub fn close(self) -> CaseSummary {
        let summary = self.summary();
        let Investigation {
            clues, suspects, ..
        } = self;
        drop(clues);
        let released = suspects.teardown();
        info!(
            title = %summary.title,
            clues = summary.clues,
            suspects = released,
            "investigation closed"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Direction;

    fn investigation() -> Investigation {
        Investigation::mansion_default().unwrap()
    }

    #[test]
    fn test_discover_feeds_both_collections() {
        let mut inv = investigation();
        inv.discover("Carta rasgada encontrada", "Carlos").unwrap();
        inv.discover("Carta rasgada encontrada", "Carlos").unwrap();

        assert_eq!(inv.clues().len(), 1);
        assert_eq!(inv.suspects().find("Carlos").unwrap().clue_count(), 2);
    }

    #[test]
    fn test_entering_hall_records_its_clue() {
        let mut inv = investigation();
        let outcome = inv.begin_exploration().unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Entered {
                room: "Hall de Entrada".to_string(),
                clue: Some("Pegadas na entrada".to_string()),
            }
        );
        assert!(inv.clues().contains("Pegadas na entrada"));
    }

    #[test]
    fn test_missing_path_changes_nothing() {
        let mut inv = investigation();
        inv.begin_exploration().unwrap();
        inv.step(Choice::Go(Direction::Right)).unwrap();
        inv.step(Choice::Go(Direction::Left)).unwrap();
        assert_eq!(inv.current_room(), "Jardim");

        let before = inv.summary();
        let err = inv.step(Choice::Go(Direction::Left)).unwrap_err();
        assert!(matches!(
            err,
            InvestigationError::Map(MapError::NoSuchPath { .. })
        ));
        assert_eq!(inv.current_room(), "Jardim");
        assert_eq!(inv.summary(), before);
    }

    #[test]
    fn test_stop_keeps_position() {
        let mut inv = investigation();
        inv.begin_exploration().unwrap();
        inv.step(Choice::Go(Direction::Left)).unwrap();
        assert_eq!(inv.step(Choice::Stop).unwrap(), StepOutcome::Stopped);
        assert_eq!(inv.current_room(), "Biblioteca");
    }

    #[test]
    fn test_manual_clue_rules() {
        let mut inv = investigation();
        let err = inv.record_manual("\n", "Maria").unwrap_err();
        assert!(matches!(err, InvestigationError::EmptyClue));
        assert!(inv.clues().is_empty());
        assert!(inv.suspects().is_empty());

        inv.record_manual("Luvas no jardim\n", "").unwrap();
        let unknown = inv.suspects().find("Desconhecido").unwrap();
        assert_eq!(unknown.clues, vec!["Luvas no jardim".to_string()]);
    }

    #[test]
    fn test_close_reports_totals() {
        let mut inv = investigation();
        inv.begin_exploration().unwrap();
        inv.step(Choice::Go(Direction::Right)).unwrap();

        let summary = inv.close();
        assert_eq!(summary.clues, 2);
        assert_eq!(summary.suspects, 1);
        assert_eq!(summary.associations, 2);
        assert_eq!(summary.leading_suspect.as_deref(), Some("Maria"));
        assert_eq!(summary.leading_count, 2);
    }
}
