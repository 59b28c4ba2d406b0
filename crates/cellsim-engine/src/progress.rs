//! Tick callback that reports population progress through `tracing`.
//!
//! Logs a per-species head count every few ticks and calls out the tick a
//! species loses its last live cell.

use std::collections::BTreeSet;

use cellsim_core::runner::TickCallback;
use cellsim_core::stats::PopulationStats;
use cellsim_core::tick::{SimulationState, TickSummary};
use cellsim_types::Species;
use tracing::{debug, info};

/// Callback that logs population progress.
pub struct ProgressCallback {
    report_every: u64,
    present: BTreeSet<Species>,
}

impl ProgressCallback {
    /// Report head counts every `report_every` ticks (0 disables the
    /// periodic report; extinctions are still logged).
    pub const fn new(report_every: u64) -> Self {
        Self {
            report_every,
            present: BTreeSet::new(),
        }
    }

    /// Species that had live cells at the last call but have none now.
    fn newly_extinct(&mut self, stats: &PopulationStats) -> Vec<Species> {
        let now: BTreeSet<Species> = stats
            .per_species
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(species, _)| *species)
            .collect();
        let gone = self.present.difference(&now).copied().collect();
        self.present = now;
        gone
    }

    const fn due(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.report_every), Some(0))
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        for species in self.newly_extinct(&summary.population) {
            info!(tick = summary.tick, %species, "Species died out");
        }

        if !self.due(summary.tick) {
            debug!(tick = summary.tick, live = summary.population.live, "Tick observed");
            return;
        }
        for species in Species::ALL {
            info!(
                tick = summary.tick,
                %species,
                count = summary.population.count_of(species),
                "Population"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn stats(counts: &[(Species, usize)]) -> PopulationStats {
        let per_species: BTreeMap<Species, usize> = counts.iter().copied().collect();
        let live = per_species.values().sum();
        PopulationStats {
            live,
            dead: 0,
            total: live,
            per_species,
        }
    }

    #[test]
    fn reports_species_once_when_they_vanish() {
        let mut progress = ProgressCallback::new(10);
        assert!(
            progress
                .newly_extinct(&stats(&[(Species::Weed, 3), (Species::Leech, 1)]))
                .is_empty()
        );
        assert_eq!(
            progress.newly_extinct(&stats(&[(Species::Weed, 2)])),
            vec![Species::Leech]
        );
        assert!(progress.newly_extinct(&stats(&[(Species::Weed, 2)])).is_empty());
    }

    #[test]
    fn periodic_report_schedule() {
        let progress = ProgressCallback::new(25);
        assert!(!progress.due(1));
        assert!(progress.due(25));
        assert!(progress.due(50));
        assert!(!ProgressCallback::new(0).due(25));
    }
}
