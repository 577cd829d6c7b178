//! Plain-text renderings shown on the console.

use crate::clues::ClueStore;
use crate::investigation::CaseSummary;
use crate::map::{LocationGraph, LocationId};
use crate::suspects::{Suspect, SuspectIndex};
use std::fmt::Write;

/// The map, one room per line, indented two spaces per level.
pub fn render_map(graph: &LocationGraph, root: LocationId) -> String {
    let mut out = String::new();
    graph.visit_preorder(root, |depth, location| {
        let _ = writeln!(out, "{}- {}", "  ".repeat(depth), location.name);
    });
    out
}

/// Every clue, alphabetically.
pub fn render_clues(clues: &ClueStore) -> String {
    let mut out = String::new();
    clues.visit_in_order(|text| {
        let _ = writeln!(out, "- {text}");
    });
    out
}

/// Suspects with their clues, in index order.
pub fn render_suspects(index: &SuspectIndex) -> String {
    let mut out = String::new();
    index.for_each(|name, clues| {
        let _ = writeln!(out, "{name} (pistas: {}):", clues.len());
        for clue in clues {
            let _ = writeln!(out, "  - {clue}");
        }
    });
    out
}

/// One line naming the leading suspect, or saying there is none.
pub fn render_leading(leading: Option<&Suspect>) -> String {
    match leading {
        Some(s) => format!("Suspeito mais provável: {} (pistas: {})", s.name, s.clue_count()),
        None => "Nenhum suspeito registrado ainda.".to_string(),
    }
}

pub fn render_summary(summary: &CaseSummary) -> String {
    let mut out = format!(
        "{}: {} pista(s), {} suspeito(s), {} associação(ões)\n",
        summary.title, summary.clues, summary.suspects, summary.associations
    );
    match &summary.leading_suspect {
        Some(name) => {
            let _ = writeln!(
                out,
                "Suspeito mais provável ao final: {name} (pistas: {})",
                summary.leading_count
            );
        }
        None => out.push_str("Nenhum suspeito identificado.\n"),
    }
    out
}
