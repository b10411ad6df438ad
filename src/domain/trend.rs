//! Trend series and the positive-run scan.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One point of a company's trend series: the date and close minus open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub trend: Decimal,
}

/// A maximal contiguous run of strictly positive trend days.
///
/// `start` and `end` are calendar-ordered: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendRun {
    pub days: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Find the longest contiguous run of strictly positive trends.
///
/// `series` must be ordered descending by date (most recent first), which is
/// how the store produces it. On ties the first-encountered run wins, so the
/// most recent of equally long runs is reported. Returns `None` when the
/// series is empty or holds no positive trend at all.
#[must_use]
pub fn longest_positive_run(series: &[TrendPoint]) -> Option<TrendRun> {
    let mut best: Option<TrendRun> = None;
    let mut current: Option<TrendRun> = None;

    for point in series {
        if point.trend > Decimal::ZERO {
            current = Some(match current {
                // Scan is newest-to-oldest, so the run grows toward
                // earlier dates: the first point seen is `end`.
                None => TrendRun {
                    days: 1,
                    start: point.date,
                    end: point.date,
                },
                Some(run) => TrendRun {
                    days: run.days + 1,
                    start: point.date,
                    end: run.end,
                },
            });
        } else {
            close_run(&mut best, current.take());
        }
    }
    // A run touching the oldest record still counts.
    close_run(&mut best, current);

    best
}

fn close_run(best: &mut Option<TrendRun>, finished: Option<TrendRun>) {
    if let Some(run) = finished {
        // Strict comparison keeps the earlier-encountered (more recent) run
        // on ties.
        if best.map_or(true, |b| run.days > b.days) {
            *best = Some(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn series(points: &[(u32, Decimal)]) -> Vec<TrendPoint> {
        // Day numbers descending mirrors the store's ordering.
        points
            .iter()
            .map(|&(day, trend)| TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                trend,
            })
            .collect()
    }

    #[test]
    fn empty_series_has_no_run() {
        assert_eq!(longest_positive_run(&[]), None);
    }

    #[test]
    fn all_negative_series_has_no_run() {
        let s = series(&[(4, dec!(-1)), (3, dec!(-2)), (2, dec!(-0.5))]);
        assert_eq!(longest_positive_run(&s), None);
    }

    #[test]
    fn zero_trend_breaks_a_run() {
        let s = series(&[(4, dec!(1)), (3, dec!(0)), (2, dec!(1))]);
        let run = longest_positive_run(&s).unwrap();
        assert_eq!(run.days, 1);
        // Tie between the two single-day runs: most recent wins.
        assert_eq!(run.end, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn most_recent_run_wins_over_trailing_single() {
        // Most-recent first: +1, +2, -1, +3.
        let s = series(&[(7, dec!(1)), (6, dec!(2)), (5, dec!(-1)), (4, dec!(3))]);
        let run = longest_positive_run(&s).unwrap();
        assert_eq!(run.days, 2);
        assert_eq!(run.start, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(run.end, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn run_ending_at_oldest_record_is_counted() {
        // The longest run sits at the tail of the scan.
        let s = series(&[(7, dec!(-1)), (6, dec!(1)), (5, dec!(2)), (4, dec!(3))]);
        let run = longest_positive_run(&s).unwrap();
        assert_eq!(run.days, 3);
        assert_eq!(run.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(run.end, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn single_positive_point_is_a_one_day_run() {
        let s = series(&[(4, dec!(0.01))]);
        let run = longest_positive_run(&s).unwrap();
        assert_eq!(run.days, 1);
        assert_eq!(run.start, run.end);
    }

    #[test]
    fn longer_older_run_beats_shorter_recent_run() {
        let s = series(&[
            (8, dec!(1)),
            (7, dec!(-1)),
            (6, dec!(1)),
            (5, dec!(1)),
            (4, dec!(1)),
        ]);
        let run = longest_positive_run(&s).unwrap();
        assert_eq!(run.days, 3);
        assert_eq!(run.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(run.end, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }
}
