//! Parallel remapping of many compilation units.
//!
//! Units are independent: each traversal owns its frame stack and edit batch,
//! and the shared [`MappingSet`](tugremap_core::mappings::MappingSet) is only
//! written through its concurrency-safe paths (class creation and memoized
//! completion). A unit that fails reports its error in its own
//! [`UnitOutcome`]; sibling units are unaffected.

use rayon::prelude::*;

use tugremap_core::error::{RemapError, RemapResult};
use tugremap_core::patch::EditBatch;
use tugremap_tree::binding::BindingProvider;
use tugremap_tree::nodes::CompilationUnit;

use crate::remapper::Remapper;
use crate::stats::RemapStats;

/// A compilation unit paired with its bindings.
#[derive(Debug, Clone)]
pub struct ResolvedUnit<B> {
    pub unit: CompilationUnit,
    pub bindings: B,
}

impl<B> ResolvedUnit<B> {
    pub fn new(unit: CompilationUnit, bindings: B) -> Self {
        ResolvedUnit { unit, bindings }
    }
}

/// The edits and counters for one successfully remapped unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitRemap {
    pub edits: EditBatch,
    pub stats: RemapStats,
}

/// The result of remapping one unit.
#[derive(Debug)]
pub struct UnitOutcome {
    pub path: String,
    pub result: RemapResult<UnitRemap>,
}

impl UnitOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Sum the counters of every successful outcome.
pub fn total_stats(outcomes: &[UnitOutcome]) -> RemapStats {
    let mut total = RemapStats::default();
    for outcome in outcomes {
        if let Ok(remap) = &outcome.result {
            total.merge(&remap.stats);
        }
    }
    total
}

impl Remapper<'_> {
    /// Remap every unit in parallel.
    ///
    /// Outcomes are returned in input order. Uses a dedicated pool of
    /// `config.threads` workers when set, rayon's global pool otherwise. Only
    /// a failure to build that pool is returned as an error.
    pub fn remap_units<B>(&self, units: &[ResolvedUnit<B>]) -> RemapResult<Vec<UnitOutcome>>
    where
        B: BindingProvider + Sync,
    {
        match self.config().threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| RemapError::ThreadPool {
                        message: e.to_string(),
                    })?;
                Ok(pool.install(|| self.remap_all(units)))
            }
            None => Ok(self.remap_all(units)),
        }
    }

    fn remap_all<B>(&self, units: &[ResolvedUnit<B>]) -> Vec<UnitOutcome>
    where
        B: BindingProvider + Sync,
    {
        let outcomes: Vec<UnitOutcome> = units
            .par_iter()
            .map(|resolved| self.remap_one(resolved))
            .collect();

        let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
        tracing::debug!(
            "remapped {} unit(s), {} failed: {}",
            outcomes.len(),
            failed,
            total_stats(&outcomes)
        );
        outcomes
    }

    fn remap_one<B>(&self, resolved: &ResolvedUnit<B>) -> UnitOutcome
    where
        B: BindingProvider,
    {
        let mut edits = EditBatch::new();
        let result = self
            .remap_unit_into(&resolved.unit, &resolved.bindings, &mut edits)
            .map(|stats| UnitRemap { edits, stats });
        if let Err(err) = &result {
            tracing::warn!("remap failed for {}: {}", resolved.unit.path, err);
        }
        UnitOutcome {
            path: resolved.unit.path.clone(),
            result,
        }
    }
}
