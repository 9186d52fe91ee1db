//! Project-level remapping: load `.tugremap/config.toml` and remap every unit.

use std::path::Path;

use tugremap_core::config::RemapConfig;
use tugremap_core::error::RemapResult;
use tugremap_core::mappings::{InheritanceProvider, MappingSet};
use tugremap_java::driver::{total_stats, ResolvedUnit, UnitOutcome};
use tugremap_java::stats::RemapStats;
use tugremap_java::Remapper;
use tugremap_tree::binding::BindingProvider;

/// The outcome of remapping a project.
#[derive(Debug)]
pub struct ProjectRemap {
    /// The configuration the pass ran with.
    pub config: RemapConfig,
    /// One outcome per unit, in input order.
    pub outcomes: Vec<UnitOutcome>,
}

impl ProjectRemap {
    /// Counters summed over successful units.
    pub fn stats(&self) -> RemapStats {
        total_stats(&self.outcomes)
    }

    /// Units that failed.
    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }

    /// Rewritten source text for every successful unit that has edits.
    ///
    /// `units` must be the slice the pass ran over. Failed units and units
    /// without edits are omitted.
    pub fn rewrite<B>(&self, units: &[ResolvedUnit<B>]) -> RemapResult<Vec<(String, String)>> {
        let mut rewritten = Vec::new();
        for (resolved, outcome) in units.iter().zip(&self.outcomes) {
            let Ok(remap) = &outcome.result else {
                continue;
            };
            if remap.edits.is_empty() {
                continue;
            }
            let source = remap.edits.apply(&resolved.unit.source)?;
            rewritten.push((resolved.unit.path.clone(), source));
        }
        Ok(rewritten)
    }
}

/// Remap `units` with the configuration found under `project_root`.
///
/// A missing config file means defaults. Individual unit failures are
/// reported in the outcomes; only config and thread pool problems fail the
/// whole pass.
pub fn remap_project<B>(
    project_root: &Path,
    mappings: &MappingSet,
    inheritance: &dyn InheritanceProvider,
    units: &[ResolvedUnit<B>],
) -> RemapResult<ProjectRemap>
where
    B: BindingProvider + Sync,
{
    let config = RemapConfig::load_from_project(project_root)?;
    if config.renames_nothing() {
        tracing::warn!(
            "{} disables every rename category; no edits will be proposed",
            project_root.display()
        );
    }
    tracing::debug!(
        "remapping {} unit(s) under {} with {:?}",
        units.len(),
        project_root.display(),
        config
    );
    let outcomes = Remapper::new(mappings, inheritance)
        .with_config(config.clone())
        .remap_units(units)?;
    Ok(ProjectRemap { config, outcomes })
}
