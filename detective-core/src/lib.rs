//! Detective game engine.
//!
//! This crate provides:
//! - A fixed mansion map to explore room by room
//! - An alphabetical, duplicate-free store of discovered clues
//! - A suspect index that links clues to suspects and names the leading one
//! - JSON case files describing the mansion and its planted clues
//!
//! # Quick Start
//!
//! ```
//! use detective_core::{Choice, Direction, Investigation};
//!
//! let mut investigation = Investigation::mansion_default()?;
//! investigation.begin_exploration()?;
//! investigation.step(Choice::Go(Direction::Right))?;
//! investigation.record_manual("Luvas sujas de terra", "Maria")?;
//!
//! let leading = investigation.leading_suspect().unwrap();
//! assert_eq!(leading.name, "Maria");
//! assert_eq!(leading.clue_count(), 3);
//! # Ok::<(), detective_core::InvestigationError>(())
//! ```

pub mod case;
pub mod clues;
pub mod investigation;
pub mod map;
pub mod report;
pub mod suspects;
pub mod testing;

// Primary public API
pub use case::{CaseError, CaseFile, Mansion, RoomClue, RoomSpec};
pub use clues::ClueStore;
pub use investigation::{CaseSummary, Investigation, InvestigationError, StepOutcome};
pub use map::{Choice, Direction, LocationGraph, LocationId, MapError};
pub use suspects::{bucket_index, IndexError, Suspect, SuspectId, SuspectIndex};
pub use testing::TestHarness;
