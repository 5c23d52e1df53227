//! Unique name resolution against a universe of taken names.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use super::compose::{compose_from_stem, stem};
use super::request::NameRequest;
use crate::error::{RenameError, Result};

/// Upper bound on collision retries for a single request.
pub const DEFAULT_MAX_RETRIES: usize = 10_000;

/// Set of names considered taken. Read-only from the resolver's side.
pub trait NameUniverse {
    fn contains(&self, name: &str) -> bool;
}

impl<S: BuildHasher> NameUniverse for HashSet<String, S> {
    fn contains(&self, name: &str) -> bool {
        HashSet::contains(self, name)
    }
}

impl NameUniverse for BTreeSet<String> {
    fn contains(&self, name: &str) -> bool {
        BTreeSet::contains(self, name)
    }
}

impl NameUniverse for [String] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }
}

impl NameUniverse for Vec<String> {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }
}

impl NameUniverse for [&str] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| *n == name)
    }
}

impl<U: NameUniverse + ?Sized> NameUniverse for &U {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}

/// Universe backed by an existence predicate, e.g. a host lookup.
pub struct FromFn<F>(pub F);

impl<F: Fn(&str) -> bool> NameUniverse for FromFn<F> {
    fn contains(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

/// Union of two universes, typically host names and names emitted this batch.
pub struct Layered<A, B>(pub A, pub B);

impl<A: NameUniverse, B: NameUniverse> NameUniverse for Layered<A, B> {
    fn contains(&self, name: &str) -> bool {
        self.0.contains(name) || self.1.contains(name)
    }
}

/// Composes candidates and steps the index until one is free.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    max_retries: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Resolver {
    pub fn new(max_retries: usize) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Resolve one request. A request without an index that collides starts
    /// indexing at 0.
    pub fn resolve<U: NameUniverse + ?Sized>(
        &self,
        req: &NameRequest,
        universe: &U,
    ) -> Result<String> {
        req.validate()?;
        let stem = stem(req);
        let mut index = req.index;
        let mut attempts = 0usize;
        loop {
            let candidate = compose_from_stem(req, &stem, index)?;
            if !universe.contains(&candidate) {
                if attempts > 0 {
                    tracing::debug!(
                        "resolved '{}' after {} collision(s) for stem '{}'",
                        candidate,
                        attempts,
                        stem
                    );
                }
                return Ok(candidate);
            }
            attempts += 1;
            let exhausted = || RenameError::RetriesExhausted {
                base: stem.clone(),
                attempts,
            };
            if attempts > self.max_retries {
                return Err(exhausted());
            }
            index = Some(match index {
                Some(i) => i.checked_add(1).ok_or_else(exhausted)?,
                None => 0,
            });
        }
    }

    /// Resolve a batch in order, treating every name emitted earlier in the
    /// batch as taken.
    pub fn resolve_batch<U: NameUniverse + ?Sized>(
        &self,
        requests: &[NameRequest],
        universe: &U,
    ) -> Result<Vec<String>> {
        let mut emitted: HashSet<String> = HashSet::with_capacity(requests.len());
        let mut out = Vec::with_capacity(requests.len());
        for req in requests {
            let name = self.resolve(req, &Layered(universe, &emitted))?;
            emitted.insert(name.clone());
            out.push(name);
        }
        tracing::info!("resolved {} name(s)", out.len());
        Ok(out)
    }
}
