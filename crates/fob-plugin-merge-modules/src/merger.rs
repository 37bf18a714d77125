//! Entry point that merges all bundles of a project.

use fob_docs::Project;

use crate::config::MergeMode;
use crate::grouping::GroupingStrategy;

/// Outcome of a merge run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Bundles that were merged, single-module bundles included.
    pub bundles_merged: usize,
    /// Modules that were folded into a target and removed from the project.
    pub modules_removed: usize,
}

/// Builds bundles with a [`GroupingStrategy`] and merges each of them.
#[derive(Debug, Clone)]
pub struct ModuleMerger {
    strategy: GroupingStrategy,
}

impl ModuleMerger {
    pub fn new(strategy: GroupingStrategy) -> Self {
        Self { strategy }
    }

    /// Merger for the configured mode, or `None` when merging is turned off.
    pub fn for_mode(mode: &MergeMode) -> Option<Self> {
        match mode {
            MergeMode::Off => None,
            MergeMode::Project => Some(Self::new(GroupingStrategy::Project)),
            MergeMode::Module(group_by) => {
                Some(Self::new(GroupingStrategy::Module(group_by.clone())))
            }
        }
    }

    /// Merge the project in place.
    ///
    /// Bundles cover disjoint module sets, so the order they are merged in does not
    /// affect the result.
    pub fn execute(&self, project: &mut Project) -> MergeReport {
        let bundles = self.strategy.bundles(project);
        let mut report = MergeReport::default();

        for bundle in bundles {
            report.modules_removed += bundle.merge(project);
            report.bundles_merged += 1;
        }

        tracing::info!(
            "[merge-modules] merged {} bundle(s), removed {} module(s)",
            report.bundles_merged,
            report.modules_removed
        );
        report
    }
}
