//! Bottleneck ranking over the clinical stages.
//!
//! Identifies which of the three timed stages (triage, lab, social work)
//! has the highest mean duration. Selection works on the already-computed
//! means, so it is deterministic under any permutation of the input rows.

use super::aggregate::OverallStats;
use serde::Serialize;

/// A timed clinical stage. Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Triage,
    Lab,
    Sw,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Triage => "Triage",
            Stage::Lab => "Lab",
            Stage::Sw => "SW",
        }
    }
}

/// The slowest stage, or an explicit no-data marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bottleneck {
    Stage { stage: Stage, mean_minutes: f64 },
    /// No stage has a single valid observation
    NoData,
}

/// Pick the stage with the largest defined mean.
///
/// Exactly equal means resolve to the first stage in the fixed priority
/// order Triage, Lab, SW. A stage with no valid observations is never
/// selected; when all three are undefined the result is [`Bottleneck::NoData`].
pub fn find_bottleneck(stats: &OverallStats) -> Bottleneck {
    let candidates = [
        (Stage::Triage, stats.triage),
        (Stage::Lab, stats.lab),
        (Stage::Sw, stats.sw),
    ];

    let mut best: Option<(Stage, f64)> = None;
    for (stage, mean) in candidates {
        let Some(mean) = mean else { continue };
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((stage, mean)),
        }
    }

    match best {
        Some((stage, mean_minutes)) => Bottleneck::Stage {
            stage,
            mean_minutes,
        },
        None => Bottleneck::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(triage: Option<f64>, lab: Option<f64>, sw: Option<f64>) -> OverallStats {
        OverallStats {
            triage,
            lab,
            sw,
            ..Default::default()
        }
    }

    #[test]
    fn test_largest_mean_wins() {
        let result = find_bottleneck(&stats(Some(10.0), Some(25.0), Some(5.0)));
        assert_eq!(
            result,
            Bottleneck::Stage {
                stage: Stage::Lab,
                mean_minutes: 25.0
            }
        );
    }

    #[test]
    fn test_tie_resolves_by_priority_order() {
        // triage 10, lab 15, sw 15 → Lab comes before SW in priority
        let result = find_bottleneck(&stats(Some(10.0), Some(15.0), Some(15.0)));
        assert_eq!(
            result,
            Bottleneck::Stage {
                stage: Stage::Lab,
                mean_minutes: 15.0
            }
        );

        // full three-way tie → Triage
        let result = find_bottleneck(&stats(Some(8.0), Some(8.0), Some(8.0)));
        assert!(matches!(
            result,
            Bottleneck::Stage {
                stage: Stage::Triage,
                ..
            }
        ));
    }

    #[test]
    fn test_undefined_stage_is_never_selected() {
        let result = find_bottleneck(&stats(None, Some(3.0), None));
        assert_eq!(
            result,
            Bottleneck::Stage {
                stage: Stage::Lab,
                mean_minutes: 3.0
            }
        );
    }

    #[test]
    fn test_all_undefined_signals_no_data() {
        assert_eq!(find_bottleneck(&stats(None, None, None)), Bottleneck::NoData);
    }
}
