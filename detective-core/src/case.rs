//! Case files: the mansion layout and the clue waiting in each room.
//!
//! A case file is a small JSON document:
//!
//! ```json
//! {
//!   "title": "O Caso da Mansão",
//!   "fallback_suspect": "Desconhecido",
//!   "map": {
//!     "name": "Hall de Entrada",
//!     "clue": { "text": "Pegadas na entrada", "suspect": "Maria" },
//!     "left": { "name": "Biblioteca" },
//!     "right": { "name": "Cozinha" }
//!   }
//! }
//! ```

use crate::map::{LocationGraph, LocationId, MapError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Suspect used when a manual clue names nobody.
pub const DEFAULT_FALLBACK_SUSPECT: &str = "Desconhecido";

/// Errors from loading or validating a case file.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Room names cannot be empty")]
    EmptyRoomName,

    #[error("Room '{0}' has a clue with empty text")]
    EmptyClue(String),

    #[error("Invalid map: {0}")]
    Map(#[from] MapError),
}

/// A clue found automatically on entering a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomClue {
    pub text: String,
    pub suspect: String,
}

impl RoomClue {
    pub fn new(text: impl Into<String>, suspect: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suspect: suspect.into(),
        }
    }
}

/// One room and the rooms reachable from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<RoomClue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<RoomSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<RoomSpec>>,
}

impl RoomSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clue: None,
            left: None,
            right: None,
        }
    }

    pub fn with_clue(mut self, text: impl Into<String>, suspect: impl Into<String>) -> Self {
        self.clue = Some(RoomClue::new(text, suspect));
        self
    }

    pub fn with_left(mut self, room: RoomSpec) -> Self {
        self.left = Some(Box::new(room));
        self
    }

    pub fn with_right(mut self, room: RoomSpec) -> Self {
        self.right = Some(Box::new(room));
        self
    }
}

/// A complete case: title, map and fallback suspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub title: String,
    #[serde(default = "default_fallback_suspect")]
    pub fallback_suspect: String,
    pub map: RoomSpec,
}

fn default_fallback_suspect() -> String {
    DEFAULT_FALLBACK_SUSPECT.to_string()
}

impl CaseFile {
    /// The classic mansion with its four planted clues.
    pub fn mansion_default() -> Self {
        let library = RoomSpec::new("Biblioteca")
            .with_clue("Livros deslocados", "Joaquim")
            .with_left(RoomSpec::new("Sotao").with_clue("Carta rasgada encontrada", "Carlos"))
            .with_right(RoomSpec::new("Escritorio"));
        let kitchen = RoomSpec::new("Cozinha")
            .with_clue("Pegadas úmidas na cozinha", "Maria")
            .with_left(RoomSpec::new("Jardim"));
        let hall = RoomSpec::new("Hall de Entrada")
            .with_clue("Pegadas na entrada", "Maria")
            .with_left(library)
            .with_right(kitchen);

        Self {
            title: "Detective Quest".to_string(),
            fallback_suspect: default_fallback_suspect(),
            map: hall,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CaseError> {
        let case: Self = serde_json::from_str(json)?;
        case.validate()?;
        Ok(case)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let case = Self::from_json(&json)?;
        info!(path = %path.display(), title = %case.title, "loaded case file");
        Ok(case)
    }

    pub fn to_json(&self) -> Result<String, CaseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject empty room names and empty clue text.
    pub fn validate(&self) -> Result<(), CaseError> {
        let mut pending = vec![&self.map];
        while let Some(room) = pending.pop() {
            if room.name.trim().is_empty() {
                return Err(CaseError::EmptyRoomName);
            }
            if let Some(clue) = &room.clue {
                if clue.text.trim().is_empty() {
                    return Err(CaseError::EmptyClue(room.name.clone()));
                }
            }
            pending.extend(room.left.as_deref());
            pending.extend(room.right.as_deref());
        }
        Ok(())
    }

    /// Build the room graph and the table of planted clues.
    pub fn build(&self) -> Result<Mansion, CaseError> {
        self.validate()?;
        let mut graph = LocationGraph::new();
        let mut clues = HashMap::new();
        let root = build_room(&mut graph, &mut clues, &self.map)?;
        info!(title = %self.title, rooms = graph.len(), "mansion built");
        Ok(Mansion { graph, root, clues })
    }
}

impl Default for CaseFile {
    fn default() -> Self {
        Self::mansion_default()
    }
}

fn build_room(
    graph: &mut LocationGraph,
    clues: &mut HashMap<LocationId, RoomClue>,
    spec: &RoomSpec,
) -> Result<LocationId, CaseError> {
    let id = graph.create(spec.name.clone());
    if let Some(clue) = &spec.clue {
        clues.insert(id, clue.clone());
    }
    let left = spec
        .left
        .as_deref()
        .map(|room| build_room(graph, clues, room))
        .transpose()?;
    let right = spec
        .right
        .as_deref()
        .map(|room| build_room(graph, clues, room))
        .transpose()?;
    graph.connect(id, left, right)?;
    Ok(id)
}

/// The built map plus the clue planted in each room.
#[derive(Debug, Clone)]
pub struct Mansion {
    pub graph: LocationGraph,
    pub root: LocationId,
    clues: HashMap<LocationId, RoomClue>,
}

impl Mansion {
    pub fn clue_at(&self, room: LocationId) -> Option<&RoomClue> {
        self.clues.get(&room)
    }

    pub fn room_name(&self, room: LocationId) -> &str {
        self.graph.name(room).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Direction;

    #[test]
    fn test_default_mansion_layout() {
        let mansion = CaseFile::mansion_default().build().unwrap();
        let names: Vec<_> = mansion
            .graph
            .walk_preorder(mansion.root)
            .map(|(depth, l)| (depth, l.name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "Hall de Entrada".to_string()),
                (1, "Biblioteca".to_string()),
                (2, "Sotao".to_string()),
                (2, "Escritorio".to_string()),
                (1, "Cozinha".to_string()),
                (2, "Jardim".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_mansion_clues() {
        let mansion = CaseFile::mansion_default().build().unwrap();
        let library = mansion.graph.traverse(mansion.root, Direction::Left).unwrap();
        let clue = mansion.clue_at(library).unwrap();
        assert_eq!(clue.text, "Livros deslocados");
        assert_eq!(clue.suspect, "Joaquim");

        let study = mansion.graph.traverse(library, Direction::Right).unwrap();
        assert!(mansion.clue_at(study).is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_layout() {
        let case = CaseFile::mansion_default();
        let json = case.to_json().unwrap();
        assert_eq!(CaseFile::from_json(&json).unwrap(), case);
    }

    #[test]
    fn test_fallback_suspect_defaults() {
        let case = CaseFile::from_json(r#"{"title": "Tiny", "map": {"name": "Sala"}}"#).unwrap();
        assert_eq!(case.fallback_suspect, DEFAULT_FALLBACK_SUSPECT);
        assert!(case.map.left.is_none());
    }

    #[test]
    fn test_rejects_empty_room_name() {
        let err = CaseFile::from_json(
            r#"{"title": "Bad", "map": {"name": "Sala", "left": {"name": "  "}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CaseError::EmptyRoomName));
    }

    #[test]
    fn test_rejects_empty_clue() {
        let err = CaseFile::from_json(
            r#"{"title": "Bad", "map": {"name": "Sala", "clue": {"text": "", "suspect": "Ana"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CaseError::EmptyClue(room) if room == "Sala"));
    }

    #[test]
    fn test_malformed_json() {
        let err = CaseFile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CaseError::Json(_)));
    }

    #[test]
    fn test_load_from_disk() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("case.json");
        std::fs::write(&path, CaseFile::mansion_default().to_json().unwrap()).unwrap();

        let loaded = CaseFile::load(&path).unwrap();
        assert_eq!(loaded.title, "Detective Quest");

        let missing = CaseFile::load(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, CaseError::Io(_)));
    }
}
