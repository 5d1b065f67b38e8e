// crates/filter-bench-core/src/filter_set.rs
// ============================================================================
// Module: Filter Set
// Description: Immutable set of account ids selected for a benchmark run.
// Purpose: Share one id selection across every strategy of a run.
// Dependencies: rand, thiserror
// ============================================================================

//! ## Overview
//! A [`FilterSet`] is an ordered sequence of unique account ids. It is built
//! once per run, usually by sampling a percentage of the id space, and then
//! only read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;
use thiserror::Error;

use crate::model::AccountId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Filter set construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterSetError {
    /// Sample percentage outside `0..=100`.
    #[error("sample percent must be within 0..=100, got {0}")]
    InvalidPercent(u8),
    /// Id space is empty.
    #[error("id space must contain at least one account")]
    EmptyIdSpace,
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Account id space `1..=num_accounts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSpace {
    /// Number of accounts (the largest valid id).
    num_accounts: u32,
}

impl IdSpace {
    /// Creates an id space of `num_accounts` ids starting at 1.
    ///
    /// # Errors
    ///
    /// Returns [`FilterSetError::EmptyIdSpace`] when `num_accounts` is zero.
    pub const fn new(num_accounts: u32) -> Result<Self, FilterSetError> {
        if num_accounts == 0 {
            return Err(FilterSetError::EmptyIdSpace);
        }
        Ok(Self {
            num_accounts,
        })
    }

    /// Returns the number of ids in the space.
    #[must_use]
    pub const fn num_accounts(self) -> u32 {
        self.num_accounts
    }

    /// Returns true when `id` lies inside the space.
    #[must_use]
    pub fn contains(self, id: AccountId) -> bool {
        (1 ..= AccountId::from(self.num_accounts)).contains(&id)
    }
}

/// Ordered, duplicate-free account ids used to filter the fact table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Ids in first-occurrence order.
    ids: Vec<AccountId>,
}

impl FilterSet {
    /// Builds a filter set, dropping repeated ids but keeping first-seen order.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = AccountId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self {
            ids,
        }
    }

    /// Returns an empty filter set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ids: Vec::new(),
        }
    }

    /// Samples `percent`% of the id space without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`FilterSetError::InvalidPercent`] when `percent > 100`.
    pub fn sample<R: Rng + ?Sized>(
        space: IdSpace,
        percent: u8,
        rng: &mut R,
    ) -> Result<Self, FilterSetError> {
        if percent > 100 {
            return Err(FilterSetError::InvalidPercent(percent));
        }
        let total = u64::from(space.num_accounts);
        let amount = total * u64::from(percent) / 100;
        let length = usize::try_from(total).unwrap_or(usize::MAX);
        let amount = usize::try_from(amount).unwrap_or(length);
        let ids = index::sample(rng, length, amount)
            .into_iter()
            .filter_map(|idx| AccountId::try_from(idx).ok())
            .map(|idx| idx + 1);
        Ok(Self::new(ids))
    }

    /// Returns the ids in order.
    #[must_use]
    pub fn ids(&self) -> &[AccountId] {
        &self.ids
    }

    /// Returns the number of ids.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when the set holds no ids.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates the ids in order.
    pub fn iter(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<AccountId> for FilterSet {
    fn from_iter<T: IntoIterator<Item = AccountId>>(iter: T) -> Self {
        Self::new(iter)
    }
}
