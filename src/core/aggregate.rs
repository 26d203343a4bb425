//! Multi-key, multi-counter accumulator
//!
//! The compliance report needs several named tallies per student plus
//! running grand totals. [`Aggregator`] tracks both: counters are
//! registered up front, then counted against arbitrary keys. Counter ids
//! are compile-time enums (any `Copy + Eq + Hash + Display` type) rather
//! than strings, so a typo is a compile error while the register-then-count
//! contract is preserved.

use crate::domain::errors::AggregateError;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Marker for counter id types
pub trait CounterId: Copy + Eq + Hash + fmt::Display {}

impl<T: Copy + Eq + Hash + fmt::Display> CounterId for T {}

/// Registration-time description of one counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSpec<C> {
    pub id: C,
    pub title: String,
    pub initial: i64,
    pub increment: i64,
}

impl<C> CounterSpec<C> {
    /// A counter starting at 0 and stepping by 1
    pub fn new(id: C, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            initial: 0,
            increment: 1,
        }
    }

    /// Override the initial value each key starts from
    pub fn initial(mut self, initial: i64) -> Self {
        self.initial = initial;
        self
    }

    /// Override the default increment
    pub fn increment(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }
}

/// One counter's running total, as reported by [`Aggregator::totals`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterTotal<C> {
    pub id: C,
    pub title: String,
    pub total: i64,
}

/// A set of named counters with a per-key value and a running total each
///
/// Keys appear in first-touch order. Totals accumulate every increment ever
/// applied and are never decreased: removing a key drops its per-key
/// record but leaves the totals untouched, so totals represent cumulative
/// activity rather than current membership.
#[derive(Debug, Clone)]
pub struct Aggregator<K, C> {
    specs: Vec<CounterSpec<C>>,
    index: HashMap<C, usize>,
    order: Vec<K>,
    data: HashMap<K, Vec<i64>>,
    totals: Vec<i64>,
}

impl<K, C> Aggregator<K, C>
where
    K: Eq + Hash + Clone,
    C: CounterId,
{
    /// An aggregator with no counters registered
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            index: HashMap::new(),
            order: Vec::new(),
            data: HashMap::new(),
            totals: Vec::new(),
        }
    }

    /// Register a counter. Must happen before any `count` references its id.
    ///
    /// Re-registering an id replaces its spec and resets its running total
    /// to the new initial value; per-key values already accumulated are
    /// kept. Keys touched before a late registration are seeded with the
    /// new counter's initial value.
    pub fn register(&mut self, spec: CounterSpec<C>) {
        if let Some(&slot) = self.index.get(&spec.id) {
            self.totals[slot] = spec.initial;
            self.specs[slot] = spec;
        } else {
            let slot = self.specs.len();
            self.index.insert(spec.id, slot);
            self.totals.push(spec.initial);
            for row in self.data.values_mut() {
                row.push(spec.initial);
            }
            self.specs.push(spec);
        }
    }

    /// Apply one increment to `id` under `key`
    ///
    /// The first touch of a key seeds a per-key record with every
    /// registered counter's initial value. The increment is the counter's
    /// default unless overridden, and is applied to both the per-key value
    /// and the running total.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::UnknownCounter`] if `id` was never
    /// registered.
    pub fn count(&mut self, key: K, id: C, increment: Option<i64>) -> Result<(), AggregateError> {
        let slot = *self
            .index
            .get(&id)
            .ok_or_else(|| AggregateError::UnknownCounter(id.to_string()))?;

        let row = match self.data.entry(key.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                self.order.push(key);
                entry.insert(self.specs.iter().map(|s| s.initial).collect())
            }
        };

        let step = increment.unwrap_or(self.specs[slot].increment);
        row[slot] += step;
        self.totals[slot] += step;
        Ok(())
    }

    /// The current value of one counter under one key, if the key has been
    /// touched and the id registered
    pub fn value(&self, key: &K, id: C) -> Option<i64> {
        let slot = *self.index.get(&id)?;
        self.data.get(key).map(|row| row[slot])
    }

    /// All counter values under one key, in registration order
    pub fn counts(&self, key: &K) -> Option<Vec<(C, i64)>> {
        let row = self.data.get(key)?;
        Some(
            self.specs
                .iter()
                .zip(row.iter())
                .map(|(spec, value)| (spec.id, *value))
                .collect(),
        )
    }

    /// The running total for one counter
    pub fn total(&self, id: C) -> Option<i64> {
        self.index.get(&id).map(|&slot| self.totals[slot])
    }

    /// All running totals, in registration order
    pub fn totals(&self) -> Vec<CounterTotal<C>> {
        self.specs
            .iter()
            .zip(self.totals.iter())
            .map(|(spec, total)| CounterTotal {
                id: spec.id,
                title: spec.title.clone(),
                total: *total,
            })
            .collect()
    }

    /// Drop the per-key record for `key`. Totals are not decremented.
    pub fn remove(&mut self, key: &K) -> bool {
        if self.data.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    /// Whether `key` has been touched
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    /// Number of distinct keys touched (not counters registered)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no key has been touched yet
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in first-touch order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

impl<K, C> Default for Aggregator<K, C>
where
    K: Eq + Hash + Clone,
    C: CounterId,
{
    fn default() -> Self {
        Self::new()
    }
}
