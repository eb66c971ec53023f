//! Petitions, the petition list and the aggregate vote tally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// Sequential petition identifier assigned by the contract, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PetitionId(u64);

impl PetitionId {
    pub const FIRST: Self = Self(1);

    pub fn new(id: u64) -> Result<Self, TypesError> {
        if id == 0 {
            return Err(TypesError::ZeroPetitionId);
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Position of this petition inside a [`PetitionList`], if addressable
    /// on this target.
    fn index(self) -> Option<usize> {
        usize::try_from(self.0 - 1).ok()
    }

    fn from_index(index: usize) -> Self {
        Self(index as u64 + 1)
    }
}

impl fmt::Display for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of a single petition as read from the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    pub id: PetitionId,
    pub name: String,
    pub vote_count: u64,
}

/// Ordered petitions, index 0 holding id 1.
///
/// There is no way to patch an entry in place: a refresh builds a new list
/// and the caller swaps it in whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetitionList(Vec<Petition>);

impl PetitionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `(name, vote_count)` pairs read in id order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        Self(
            records
                .into_iter()
                .enumerate()
                .map(|(index, (name, vote_count))| Petition {
                    id: PetitionId::from_index(index),
                    name,
                    vote_count,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `id` names a petition in this list (`1..=len`).
    pub fn contains(&self, id: PetitionId) -> bool {
        id.get() <= self.0.len() as u64
    }

    pub fn get(&self, id: PetitionId) -> Option<&Petition> {
        id.index().and_then(|i| self.0.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Petition> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Petition] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a PetitionList {
    type Item = &'a Petition;
    type IntoIter = std::slice::Iter<'a, Petition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Total votes across all petitions, as reported by the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoteTally(pub u64);

impl VoteTally {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VoteTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
