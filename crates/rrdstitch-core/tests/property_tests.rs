//! # Property-Based Tests
//!
//! Invariants of the resolution cascade and of incremental output, checked
//! with proptest over generated resolution levels.

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use rrdstitch_core::{
    CascadeMerge, CombinedRow, IncrementalCsvWriter, Metrics, ResumeState, StitchError, Timestamp,
    Timestamped,
};

// =============================================================================
// GENERATORS
// =============================================================================

/// A merged point tagged with the rank of the level it came from
/// (0 = coarsest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tagged {
    epoch: i64,
    rank: usize,
}

impl Timestamped for Tagged {
    fn epoch(&self) -> i64 {
        self.epoch
    }
}

/// Raw material for one level: where it starts inside the coarser level,
/// an offset from that point, and the gaps between its rows.
type LevelSeed = (Index, i64, Vec<i64>);

/// Build well-formed levels, coarsest first: each level strictly ascending,
/// each finer level starting inside the range of the level before it.
fn build_levels(seeds: &[LevelSeed]) -> Vec<Vec<i64>> {
    let mut levels: Vec<Vec<i64>> = Vec::with_capacity(seeds.len());
    for (start, offset, gaps) in seeds {
        let first = match levels.last() {
            None => *offset,
            Some(coarser) => {
                let anchor = coarser[start.index(coarser.len())];
                let last = coarser[coarser.len() - 1];
                (anchor + offset).min(last)
            }
        };
        let mut epochs = Vec::with_capacity(gaps.len() + 1);
        epochs.push(first);
        let mut epoch = first;
        for gap in gaps {
            epoch += gap;
            epochs.push(epoch);
        }
        levels.push(epochs);
    }
    levels
}

fn level_seeds() -> impl Strategy<Value = Vec<LevelSeed>> {
    vec((any::<Index>(), 0i64..3, vec(1i64..50, 0..30)), 1..5)
}

type Rows = std::vec::IntoIter<Result<Tagged, StitchError>>;

fn merge(levels: &[Vec<i64>]) -> Vec<Tagged> {
    let inputs: Vec<Rows> = levels
        .iter()
        .enumerate()
        .map(|(rank, epochs)| {
            epochs
                .iter()
                .map(|&epoch| Ok(Tagged { epoch, rank }))
                .collect::<Vec<_>>()
                .into_iter()
        })
        .collect();
    CascadeMerge::new(inputs)
        .collect::<Result<Vec<_>, _>>()
        .expect("merge")
}

fn combined(epoch: i64, populated: bool) -> CombinedRow {
    let value = if populated { 1.0 } else { f64::NAN };
    CombinedRow::new(
        Timestamp::new(epoch, format!("d{epoch}")),
        Metrics::new(value, value),
        Metrics::new(value, value),
    )
}

fn write(rows: &[CombinedRow], resume: ResumeState) -> String {
    let mut writer = IncrementalCsvWriter::new(Vec::new(), resume).expect("writer");
    writer
        .write_series(rows.iter().cloned().map(Ok))
        .expect("write");
    String::from_utf8(writer.finish().expect("finish")).expect("utf8")
}

fn data_epochs(csv: &str) -> Vec<i64> {
    csv.lines()
        .filter_map(|line| line.split(',').next()?.parse().ok())
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The merged series is strictly ascending: no epoch appears twice.
    #[test]
    fn merged_series_strictly_ascending(seeds in level_seeds()) {
        let levels = build_levels(&seeds);
        let merged = merge(&levels);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].epoch < pair[1].epoch, "{:?}", pair);
        }
    }

    /// Once a finer level is reached, no coarser level is read again.
    #[test]
    fn level_progression_is_monotonic(seeds in level_seeds()) {
        let levels = build_levels(&seeds);
        let merged = merge(&levels);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].rank <= pair[1].rank, "{:?}", pair);
        }
    }

    /// The finest level is always written in full.
    #[test]
    fn finest_level_fully_present(seeds in level_seeds()) {
        let levels = build_levels(&seeds);
        let merged = merge(&levels);
        let finest_rank = levels.len() - 1;
        let finest: Vec<i64> = merged
            .iter()
            .filter(|p| p.rank == finest_rank)
            .map(|p| p.epoch)
            .collect();
        prop_assert_eq!(&finest, &levels[finest_rank]);
    }

    /// Every merged point comes from its own level at that epoch, and a
    /// coarser point is only kept before the next finer level starts.
    #[test]
    fn coarser_points_precede_finer_windows(seeds in level_seeds()) {
        let levels = build_levels(&seeds);
        let merged = merge(&levels);
        for point in &merged {
            prop_assert!(levels[point.rank].contains(&point.epoch));
            if let Some(finer) = levels.get(point.rank + 1) {
                prop_assert!(point.epoch < finer[0]);
            }
        }
    }

    /// Resuming from the last written epoch neither repeats nor loses rows.
    #[test]
    fn resume_is_idempotent(
        epochs in proptest::collection::btree_set(0i64..10_000, 0..60),
        populated in vec(any::<bool>(), 60),
        split in any::<Index>(),
    ) {
        let rows: Vec<CombinedRow> = epochs
            .iter()
            .zip(&populated)
            .map(|(&epoch, &filled)| combined(epoch, filled))
            .collect();
        let cut = split.index(rows.len() + 1);

        let mut output = write(&rows[..cut], ResumeState::fresh());
        let resume = ResumeState::from_reader(output.as_bytes()).expect("resume");
        output.push_str(&write(&rows, resume));

        let expected: Vec<i64> = rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| row.timestamp.epoch)
            .collect();
        prop_assert_eq!(data_epochs(&output), expected);
        prop_assert_eq!(output.matches("EPOCH").count(), 1);
        prop_assert!(!output.contains("NaN"));
    }
}
