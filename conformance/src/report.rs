//! Report types: per-cycle anomaly lists and the aggregate statistics.

use serde::Serialize;

/// Trace positions of one kind of anomaly, plus the number of frames they
/// account for. For missing frames one position may stand for several
/// frames, so `count` can exceed `positions.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Anomalies {
    /// Trace lines where the anomaly was observed, in trace order.
    pub positions: Vec<usize>,
    /// Number of frames affected.
    pub count: usize,
}

impl Anomalies {
    /// Records `frames` affected frames at `position`.
    pub fn record(&mut self, position: usize, frames: usize) {
        self.positions.push(position);
        self.count += frames;
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Classification results for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// 1-based cycle number within the analysed span.
    pub number: usize,
    /// Trace line of the first observation in the cycle.
    pub first_position: usize,
    /// Trace line of the last observation in the cycle.
    pub last_position: usize,
    /// Number of observations in the cycle.
    pub observations: usize,
    /// Skipped scheduled frames.
    pub missing: Anomalies,
    /// Immediately repeated frames.
    pub duplicates: Anomalies,
    /// Frames arriving after the cycle had moved past them.
    pub out_of_order: Anomalies,
}

impl CycleReport {
    /// Creates a report with no anomalies recorded.
    #[must_use]
    pub fn new(number: usize, first_position: usize, last_position: usize, observations: usize) -> Self {
        Self {
            number,
            first_position,
            last_position,
            observations,
            missing: Anomalies::default(),
            duplicates: Anomalies::default(),
            out_of_order: Anomalies::default(),
        }
    }

    /// Returns true if any anomaly was recorded.
    #[must_use]
    pub fn has_anomalies(&self) -> bool {
        !(self.missing.is_empty() && self.duplicates.is_empty() && self.out_of_order.is_empty())
    }
}

/// Observation counts carried from the earlier pipeline stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    /// Observations read from the trace.
    pub ingested: usize,
    /// Observations whose identifier is scheduled.
    pub aligned: usize,
    /// Aligned observations kept after trimming.
    pub retained: usize,
    /// Whether partial edge cycles were trimmed.
    pub trimmed: bool,
}

/// Whole-trace conformance statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Frames per cycle (N).
    pub schedule_size: usize,
    /// Observations read from the trace.
    pub ingested: usize,
    /// Observations whose identifier is scheduled.
    pub aligned: usize,
    /// Observations kept after trimming partial edge cycles.
    pub retained: usize,
    /// False when fewer than two cycle boundaries were found, in which case
    /// the first and last cycles may be partial.
    pub trimmed: bool,
    /// Number of cycles analysed.
    pub completed_cycles: usize,
    /// Missing frames across all cycles.
    pub total_missing: usize,
    /// Duplicate frames across all cycles.
    pub total_duplicates: usize,
    /// Out-of-order frames across all cycles.
    pub total_out_of_order: usize,
    /// `retained / (completed_cycles * N) * 100`, or 0 when nothing was expected.
    pub presence_percent: f64,
    /// `total_missing / (completed_cycles * N) * 100`, or 0 when nothing was expected.
    pub missing_percent: f64,
    /// Every cycle, in trace order.
    pub cycles: Vec<CycleReport>,
}

impl AggregateReport {
    /// The zero-valued report for a trace sharing no identifier with the schedule.
    #[must_use]
    pub fn no_overlap(schedule_size: usize, ingested: usize) -> Self {
        aggregate(
            schedule_size,
            StageCounts {
                ingested,
                ..StageCounts::default()
            },
            Vec::new(),
        )
    }

    /// Frames the analysed cycles should have carried.
    #[must_use]
    pub fn total_expected(&self) -> usize {
        self.completed_cycles * self.schedule_size
    }

    /// Cycles with at least one anomaly, in trace order.
    pub fn anomalous_cycles(&self) -> impl Iterator<Item = &CycleReport> {
        self.cycles.iter().filter(|c| c.has_anomalies())
    }

    /// Returns true if no cycle had any anomaly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total_missing == 0 && self.total_duplicates == 0 && self.total_out_of_order == 0
    }
}

/// Combines per-cycle reports into whole-trace statistics.
#[must_use]
pub fn aggregate(schedule_size: usize, counts: StageCounts, cycles: Vec<CycleReport>) -> AggregateReport {
    let completed_cycles = cycles.len();
    let total_missing = cycles.iter().map(|c| c.missing.count).sum();
    let total_duplicates = cycles.iter().map(|c| c.duplicates.count).sum();
    let total_out_of_order = cycles.iter().map(|c| c.out_of_order.count).sum();
    let total_expected = completed_cycles * schedule_size;

    AggregateReport {
        schedule_size,
        ingested: counts.ingested,
        aligned: counts.aligned,
        retained: counts.retained,
        trimmed: counts.trimmed,
        completed_cycles,
        total_missing,
        total_duplicates,
        total_out_of_order,
        presence_percent: percent(counts.retained, total_expected),
        missing_percent: percent(total_missing, total_expected),
        cycles,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(number: usize, missing: &[(usize, usize)], duplicates: &[usize]) -> CycleReport {
        let mut report = CycleReport::new(number, number * 10, number * 10 + 9, 10);
        for &(pos, frames) in missing {
            report.missing.record(pos, frames);
        }
        for &pos in duplicates {
            report.duplicates.record(pos, 1);
        }
        report
    }

    #[test]
    fn sums_and_percentages() {
        let counts = StageCounts {
            ingested: 40,
            aligned: 35,
            retained: 17,
            trimmed: true,
        };
        let report = aggregate(
            10,
            counts,
            vec![cycle(1, &[(14, 2)], &[]), cycle(2, &[(23, 1)], &[25])],
        );
        assert_eq!(report.completed_cycles, 2);
        assert_eq!(report.total_expected(), 20);
        assert_eq!(report.total_missing, 3);
        assert_eq!(report.total_duplicates, 1);
        assert_eq!(report.total_out_of_order, 0);
        assert!((report.presence_percent - 85.0).abs() < 1e-9);
        assert!((report.missing_percent - 15.0).abs() < 1e-9);
        assert!(!report.is_clean());
    }

    #[test]
    fn clean_cycles_are_counted_but_not_listed() {
        let report = aggregate(
            10,
            StageCounts::default(),
            vec![cycle(1, &[], &[]), cycle(2, &[(5, 1)], &[]), cycle(3, &[], &[])],
        );
        assert_eq!(report.completed_cycles, 3);
        let listed: Vec<usize> = report.anomalous_cycles().map(|c| c.number).collect();
        assert_eq!(listed, vec![2]);
    }

    #[test]
    fn no_overlap_report_is_zero_valued() {
        let report = AggregateReport::no_overlap(12, 57);
        assert_eq!(report.ingested, 57);
        assert_eq!(report.completed_cycles, 0);
        assert_eq!(report.presence_percent, 0.0);
        assert_eq!(report.missing_percent, 0.0);
        assert!(report.cycles.is_empty());
    }
}
