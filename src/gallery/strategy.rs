//! Ordered fetch strategies and the predicates that drive escalation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::FilterSpec;
use crate::config::GallerySettings;

/// Yield of one fetch phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseYield {
    pub raw_records: usize,
    pub usable_records: usize,
    pub answered_pages: usize,
    pub failed_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Two adjacent pages at a random offset within the safe range.
    RandomOffset,
    /// A fixed run of pages starting at page 0.
    Sequential,
}

impl Strategy {
    /// Strategies to attempt, in order, for the given filters.
    ///
    /// Random sampling only makes sense for the unfiltered collection;
    /// filtered results are scarce and live on the first pages.
    pub fn plan(filters: &FilterSpec) -> Vec<Strategy> {
        if filters.has_active_filters() {
            vec![Strategy::Sequential]
        } else {
            vec![Strategy::RandomOffset, Strategy::Sequential]
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Strategy::RandomOffset => "random_offset",
            Strategy::Sequential => "sequential",
        }
    }

    /// Page indices this strategy fetches.
    pub fn pages<R: Rng + ?Sized>(
        &self,
        filters_active: bool,
        settings: &GallerySettings,
        rng: &mut R,
    ) -> Vec<u32> {
        match self {
            Strategy::RandomOffset => {
                let start = rng.random_range(0..settings.random_offset_max_page.max(1));
                vec![start, start.saturating_add(1)]
            }
            Strategy::Sequential => {
                let count = if filters_active {
                    settings.sequential_pages_filtered
                } else {
                    settings.sequential_pages_unfiltered
                };
                (0..count).collect()
            }
        }
    }

    /// Whether the phase produced anything worth showing.
    pub fn succeeded(&self, phase: &PhaseYield) -> bool {
        phase.usable_records > 0
    }

    /// Whether escalation can stop after this phase.
    pub fn is_sufficient(&self, phase: &PhaseYield, settings: &GallerySettings) -> bool {
        match self {
            Strategy::RandomOffset => {
                self.succeeded(phase) && phase.raw_records >= settings.min_random_offset_records
            }
            Strategy::Sequential => true,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plan_depends_on_filters() {
        assert_eq!(
            Strategy::plan(&FilterSpec::default()),
            vec![Strategy::RandomOffset, Strategy::Sequential]
        );

        let filtered = FilterSpec {
            material: Some("gold".to_string()),
            ..Default::default()
        };
        assert_eq!(Strategy::plan(&filtered), vec![Strategy::Sequential]);
    }

    #[test]
    fn random_offset_picks_adjacent_pages_in_safe_range() {
        let settings = GallerySettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pages = Strategy::RandomOffset.pages(false, &settings, &mut rng);
            assert_eq!(pages.len(), 2);
            assert!(pages[0] < settings.random_offset_max_page);
            assert_eq!(pages[1], pages[0] + 1);
        }
    }

    #[test]
    fn random_offset_stays_in_range_for_huge_max_page() {
        let settings = GallerySettings {
            random_offset_max_page: u32::MAX,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let pages = Strategy::RandomOffset.pages(false, &settings, &mut rng);
            assert!(pages[0] < u32::MAX);
            assert_eq!(pages[1], pages[0] + 1);
        }
    }

    #[test]
    fn random_offset_is_deterministic_for_a_seed() {
        let settings = GallerySettings::default();
        let a = Strategy::RandomOffset.pages(false, &settings, &mut StdRng::seed_from_u64(42));
        let b = Strategy::RandomOffset.pages(false, &settings, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn sequential_fetches_fewer_pages_when_filtered() {
        let settings = GallerySettings::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Strategy::Sequential.pages(false, &settings, &mut rng),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(
            Strategy::Sequential.pages(true, &settings, &mut rng),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn sufficiency_thresholds() {
        let settings = GallerySettings::default();
        let thin = PhaseYield {
            raw_records: 19,
            usable_records: 19,
            answered_pages: 2,
            failed_pages: 0,
        };
        let full = PhaseYield {
            raw_records: 200,
            usable_records: 198,
            ..thin
        };

        assert!(Strategy::RandomOffset.succeeded(&thin));
        assert!(!Strategy::RandomOffset.is_sufficient(&thin, &settings));
        assert!(Strategy::RandomOffset.is_sufficient(&full, &settings));
        assert!(Strategy::Sequential.is_sufficient(&PhaseYield::default(), &settings));
        assert!(!Strategy::Sequential.succeeded(&PhaseYield::default()));
    }

    #[test]
    fn serializes_as_tag() {
        assert_eq!(
            serde_json::to_string(&Strategy::RandomOffset).unwrap(),
            "\"random_offset\""
        );
        assert_eq!(Strategy::Sequential.to_string(), "sequential");
    }
}
