//! Suspect index: a chained hash table keyed by suspect name.
//!
//! ## Layout
//!
//! ```text
//!   bucket  0 ('a') ─► Ana ─► Alberto
//!   bucket  9 ('j') ─► Joaquim
//!   bucket 12 ('m') ─► Maria
//!   ...
//!   bucket 26 (other) ─► 7zz ─► ""
//! ```
//!
//! A name's bucket depends only on its first character. New suspects are
//! linked at the head of their chain, so within a bucket the most recently
//! created suspect comes first. Entries live in an arena and chains link
//! them by [`SuspectId`].

use std::collections::TryReserveError;
use thiserror::Error;
use tracing::debug;

/// Number of buckets: one per letter plus the overflow bucket.
pub const BUCKET_COUNT: usize = 27;

/// Bucket for names that are empty or do not start with an ASCII letter.
pub const OVERFLOW_BUCKET: usize = BUCKET_COUNT - 1;

/// Bucket for `name`, decided by its first character alone.
pub fn bucket_index(name: &str) -> usize {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            let letter = c.to_ascii_lowercase() as usize - 'a' as usize;
            letter % (BUCKET_COUNT - 1)
        }
        _ => OVERFLOW_BUCKET,
    }
}

/// Errors from the suspect index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Out of memory while recording suspect: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

/// Stable handle to a suspect entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuspectId(usize);

/// A suspect and the clues pointing at them, in the order they were linked.
#[derive(Debug, Clone)]
pub struct Suspect {
    pub name: String,
    pub clues: Vec<String>,
    next: Option<SuspectId>,
}

impl Suspect {
    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }
}

/// Suspects grouped by bucket.
#[derive(Debug, Clone)]
pub struct SuspectIndex {
    entries: Vec<Suspect>,
    heads: [Option<SuspectId>; BUCKET_COUNT],
}

impl Default for SuspectIndex {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            heads: [None; BUCKET_COUNT],
        }
    }
}

impl SuspectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name` in its bucket, creating it at the chain head if absent.
    pub fn find_or_create(&mut self, name: &str) -> Result<SuspectId, IndexError> {
        let bucket = bucket_index(name);
        if let Some(id) = self.find_in_bucket(bucket, name) {
            return Ok(id);
        }
        let owned = copy_str(name)?;
        self.entries.try_reserve(1)?;
        Ok(self.link_new(bucket, owned, Vec::new()))
    }

    /// Link `clue` to `name`. Repeated clues are kept and counted.
    ///
    /// Every allocation happens before the index is touched, so on error no
    /// suspect is created and no clue is linked.
    pub fn associate(&mut self, name: &str, clue: &str) -> Result<SuspectId, IndexError> {
        self.associate_with(name, clue, copy_str)
    }

    fn associate_with<C>(
        &mut self,
        name: &str,
        clue: &str,
        copy: C,
    ) -> Result<SuspectId, IndexError>
    where
        C: Fn(&str) -> Result<String, TryReserveError>,
    {
        let owned_clue = copy(clue)?;
        let bucket = bucket_index(name);

        let id = match self.find_in_bucket(bucket, name) {
            Some(id) => {
                let suspect = &mut self.entries[id.0];
                suspect.clues.try_reserve(1)?;
                suspect.clues.push(owned_clue);
                id
            }
            None => {
                let owned_name = copy(name)?;
                let mut clues = Vec::new();
                clues.try_reserve(1)?;
                clues.push(owned_clue);
                self.entries.try_reserve(1)?;
                self.link_new(bucket, owned_name, clues)
            }
        };
        debug!(
            suspect = name,
            clue,
            count = self.entries[id.0].clues.len(),
            "clue associated"
        );
        Ok(id)
    }

    /// Push a fully built entry and make it the head of `bucket`.
    ///
    /// Callers reserve arena space first.
    fn link_new(&mut self, bucket: usize, name: String, clues: Vec<String>) -> SuspectId {
        let id = SuspectId(self.entries.len());
        debug!(suspect = %name, bucket, "new suspect");
        self.entries.push(Suspect {
            name,
            clues,
            next: self.heads[bucket],
        });
        self.heads[bucket] = Some(id);
        id
    }

    fn find_in_bucket(&self, bucket: usize, name: &str) -> Option<SuspectId> {
        self.chain(bucket).find(|(_, s)| s.name == name).map(|(id, _)| id)
    }

    /// The suspect named exactly `name`.
    pub fn find(&self, name: &str) -> Option<&Suspect> {
        self.find_in_bucket(bucket_index(name), name)
            .map(|id| &self.entries[id.0])
    }

    /// The suspect behind `id`, or `None` if it came from another index.
    pub fn get(&self, id: SuspectId) -> Option<&Suspect> {
        self.entries.get(id.0)
    }

    /// Number of distinct suspects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total clue links across all suspects, duplicates included.
    pub fn association_count(&self) -> usize {
        self.entries.iter().map(Suspect::clue_count).sum()
    }

    fn chain(&self, bucket: usize) -> Chain<'_> {
        Chain {
            index: self,
            cursor: self.heads.get(bucket).copied().flatten(),
        }
    }

    /// Suspects in one bucket, head first.
    pub fn bucket(&self, bucket: usize) -> impl Iterator<Item = &Suspect> {
        self.chain(bucket).map(|(_, s)| s)
    }

    /// All suspects, bucket by bucket, each chain head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Suspect> {
        (0..BUCKET_COUNT).flat_map(move |b| self.bucket(b))
    }

    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &[String]),
    {
        for suspect in self.iter() {
            visit(&suspect.name, &suspect.clues);
        }
    }

    /// The suspect with the most clues.
    ///
    /// Ties go to whichever maximal suspect the scan meets first: lower
    /// bucket first, then nearer the chain head.
    pub fn most_associated(&self) -> Option<&Suspect> {
        let mut best: Option<&Suspect> = None;
        for suspect in self.iter() {
            if best.map_or(true, |b| suspect.clue_count() > b.clue_count()) {
                best = Some(suspect);
            }
        }
        best
    }

    /// Release every entry, walking each bucket's chain once.
    ///
    /// Returns how many suspects were released.
    pub fn teardown(mut self) -> usize {
        let mut released = 0;
        for bucket in 0..BUCKET_COUNT {
            let mut cursor = self.heads[bucket].take();
            while let Some(id) = cursor {
                let entry = &mut self.entries[id.0];
                cursor = entry.next.take();
                entry.clues = Vec::new();
                entry.name = String::new();
                released += 1;
            }
        }
        debug!(released, "suspect index released");
        released
    }
}

fn copy_str(text: &str) -> Result<String, TryReserveError> {
    let mut owned = String::new();
    owned.try_reserve_exact(text.len())?;
    owned.push_str(text);
    Ok(owned)
}

struct Chain<'a> {
    index: &'a SuspectIndex,
    cursor: Option<SuspectId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (SuspectId, &'a Suspect);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let suspect = &self.index.entries[id.0];
        self.cursor = suspect.next;
        Some((id, suspect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_index_letters() {
        assert_eq!(bucket_index("Ana"), 0);
        assert_eq!(bucket_index("ana"), 0);
        assert_eq!(bucket_index("Joaquim"), 9);
        assert_eq!(bucket_index("Maria"), 12);
        assert_eq!(bucket_index("zeca"), 25);
        assert_eq!(bucket_index("Zeca"), bucket_index("zulu"));
    }

    #[test]
    fn test_bucket_index_overflow() {
        assert_eq!(bucket_index(""), OVERFLOW_BUCKET);
        assert_eq!(bucket_index("7zz"), OVERFLOW_BUCKET);
        assert_eq!(bucket_index("_x"), OVERFLOW_BUCKET);
        assert_eq!(bucket_index("Élio"), OVERFLOW_BUCKET);
    }

    #[test]
    fn test_find_or_create_is_idempotent() {
        let mut index = SuspectIndex::new();
        let first = index.find_or_create("Maria").unwrap();
        let second = index.find_or_create("Maria").unwrap();
        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut index = SuspectIndex::new();
        let upper = index.find_or_create("Maria").unwrap();
        let lower = index.find_or_create("maria").unwrap();
        assert_ne!(upper, lower);
        assert_eq!(index.bucket(12).count(), 2);
    }

    #[test]
    fn test_associate_counts_duplicates() {
        let mut index = SuspectIndex::new();
        for _ in 0..4 {
            index.associate("Carlos", "Carta rasgada encontrada").unwrap();
        }
        let carlos = index.find("Carlos").unwrap();
        assert_eq!(carlos.clue_count(), 4);
        assert_eq!(index.association_count(), 4);
    }

    #[test]
    fn test_chain_is_head_inserted() {
        let mut index = SuspectIndex::new();
        index.associate("Maria", "a").unwrap();
        index.associate("Marcos", "b").unwrap();
        index.associate("Mateus", "c").unwrap();
        let names: Vec<_> = index.bucket(12).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mateus", "Marcos", "Maria"]);
    }

    #[test]
    fn test_iteration_is_bucket_then_chain() {
        let mut index = SuspectIndex::new();
        index.associate("7zz", "x").unwrap();
        index.associate("Maria", "x").unwrap();
        index.associate("Ana", "x").unwrap();
        index.associate("Alberto", "x").unwrap();

        let mut seen = Vec::new();
        index.for_each(|name, clues| seen.push((name.to_string(), clues.len())));
        assert_eq!(
            seen,
            vec![
                ("Alberto".to_string(), 1),
                ("Ana".to_string(), 1),
                ("Maria".to_string(), 1),
                ("7zz".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_most_associated() {
        let mut index = SuspectIndex::new();
        assert!(index.most_associated().is_none());

        index.associate("Joaquim", "Livros deslocados").unwrap();
        index.associate("Maria", "Pegadas úmidas na cozinha").unwrap();
        index.associate("Maria", "Pegadas na entrada").unwrap();

        let top = index.most_associated().unwrap();
        assert_eq!(top.name, "Maria");
        assert_eq!(top.clue_count(), 2);
    }

    #[test]
    fn test_most_associated_tie_break_follows_scan_order() {
        let mut index = SuspectIndex::new();
        index.associate("Maria", "x").unwrap();
        index.associate("Joaquim", "y").unwrap();
        // Joaquim's bucket is scanned before Maria's
        assert_eq!(index.most_associated().unwrap().name, "Joaquim");

        let mut same_bucket = SuspectIndex::new();
        same_bucket.associate("Maria", "x").unwrap();
        same_bucket.associate("Marcos", "y").unwrap();
        // Marcos sits at the chain head
        assert_eq!(same_bucket.most_associated().unwrap().name, "Marcos");
    }

    #[test]
    fn test_associate_creates_suspect_with_its_first_clue() {
        let mut index = SuspectIndex::new();
        let id = index.associate("Maria", "Pegadas na entrada").unwrap();
        let maria = index.get(id).unwrap();
        assert_eq!(maria.clues, vec!["Pegadas na entrada".to_string()]);
        assert!(index.iter().all(|s| s.clue_count() > 0));
    }

    fn refuse(text: &str) -> Result<String, TryReserveError> {
        let mut owned = String::new();
        owned.try_reserve_exact(usize::MAX)?;
        owned.push_str(text);
        Ok(owned)
    }

    #[test]
    fn test_failed_name_copy_leaves_index_untouched() {
        let mut index = SuspectIndex::new();
        index.associate("Carlos", "Carta rasgada encontrada").unwrap();

        // The clue copy succeeds, the new suspect's name copy does not
        let err = index
            .associate_with("Maria", "Pegadas na entrada", |text| {
                if text == "Maria" {
                    refuse(text)
                } else {
                    copy_str(text)
                }
            })
            .unwrap_err();
        assert!(matches!(err, IndexError::OutOfMemory(_)));

        assert!(index.find("Maria").is_none());
        assert_eq!(index.len(), 1);
        assert_eq!(index.bucket(bucket_index("Maria")).count(), 0);
        assert!(index.iter().all(|s| s.clue_count() > 0));
    }

    #[test]
    fn test_failed_clue_copy_links_nothing() {
        let mut index = SuspectIndex::new();
        index.associate("Carlos", "Carta rasgada encontrada").unwrap();

        assert!(index.associate_with("Carlos", "Faca", refuse).is_err());
        assert!(index.associate_with("Zeca", "Faca", refuse).is_err());

        assert_eq!(index.len(), 1);
        assert_eq!(index.association_count(), 1);
        assert!(index.find("Zeca").is_none());
    }

    #[test]
    fn test_teardown_releases_every_entry() {
        let mut index = SuspectIndex::new();
        for name in ["Ana", "Alberto", "Maria", "", "7zz", "Zeca"] {
            index.associate(name, "pista").unwrap();
        }
        assert_eq!(index.teardown(), 6);
    }
}
