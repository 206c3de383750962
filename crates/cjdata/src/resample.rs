//! Daily to weekly resampling.

use crate::bar::{DailyBar, WeeklyBar};

/// Aggregate daily bars into ISO weeks (Monday to Sunday).
///
/// Input must be ordered by trade date ascending, which is how the store
/// returns it. Consecutive bars sharing an ISO week form one weekly bar:
/// first open, highest high, lowest low, last close, summed volume and
/// amount. Output is ordered by each week's last trade date.
pub fn resample_weekly(bars: &[DailyBar]) -> Vec<WeeklyBar> {
    bars.chunk_by(|a, b| a.trade_date.iso_week() == b.trade_date.iso_week())
        .filter_map(aggregate_week)
        .collect()
}

fn aggregate_week(week: &[DailyBar]) -> Option<WeeklyBar> {
    let first = week.first()?;
    let last = week.last()?;

    let high = week.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = week.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let volume: f64 = week.iter().map(|b| b.volume).sum();
    let amount = week
        .iter()
        .filter_map(|b| b.amount)
        .reduce(|acc, a| acc + a);

    Some(WeeklyBar {
        code: last.code.clone(),
        trade_date: last.trade_date,
        open: first.open,
        high,
        low,
        close: last.close,
        volume,
        amount,
        trading_days: week.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::TradeDate;
    use approx::assert_relative_eq;

    fn day(date: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> DailyBar {
        DailyBar {
            code: "600000.SH".to_string(),
            trade_date: TradeDate::parse(date).unwrap(),
            open,
            high,
            low,
            close,
            volume,
            amount: Some(volume * close),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_weekly(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_iso_week() {
        let bars = vec![
            // Week of 2024-01-01 (Mon) to 2024-01-05 (Fri)
            day("20240102", 10.0, 10.5, 9.8, 10.2, 100.0),
            day("20240103", 10.2, 11.0, 10.1, 10.9, 200.0),
            day("20240105", 10.9, 10.95, 9.5, 9.7, 300.0),
            // Week of 2024-01-08
            day("20240108", 9.7, 9.9, 9.6, 9.8, 50.0),
            day("20240112", 9.8, 10.1, 9.7, 10.0, 70.0),
        ];

        let weeks = resample_weekly(&bars);
        assert_eq!(weeks.len(), 2);

        let w1 = &weeks[0];
        assert_eq!(w1.trade_date.to_key(), "20240105");
        assert_relative_eq!(w1.open, 10.0);
        assert_relative_eq!(w1.high, 11.0);
        assert_relative_eq!(w1.low, 9.5);
        assert_relative_eq!(w1.close, 9.7);
        assert_relative_eq!(w1.volume, 600.0);
        assert_eq!(w1.trading_days, 3);

        let w2 = &weeks[1];
        assert_eq!(w2.trade_date.to_key(), "20240112");
        assert_relative_eq!(w2.open, 9.7);
        assert_relative_eq!(w2.close, 10.0);
        assert_relative_eq!(w2.volume, 120.0);
    }

    #[test]
    fn test_single_day_week_equals_day() {
        let only = day("20240110", 9.7, 9.9, 9.6, 9.8, 50.0);
        let weeks = resample_weekly(std::slice::from_ref(&only));
        assert_eq!(weeks.len(), 1);

        let week = &weeks[0];
        assert_eq!(week.trade_date, only.trade_date);
        assert_eq!(week.open, only.open);
        assert_eq!(week.high, only.high);
        assert_eq!(week.low, only.low);
        assert_eq!(week.close, only.close);
        assert_eq!(week.volume, only.volume);
        assert_eq!(week.amount, only.amount);
        assert_eq!(week.trading_days, 1);
    }

    #[test]
    fn test_week_spanning_new_year() {
        let bars = vec![
            day("20241230", 10.0, 10.2, 9.9, 10.1, 10.0),
            day("20241231", 10.1, 10.3, 10.0, 10.2, 10.0),
            day("20250102", 10.2, 10.4, 10.1, 10.3, 10.0),
            day("20250103", 10.3, 10.5, 10.2, 10.4, 10.0),
        ];
        let weeks = resample_weekly(&bars);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].trade_date.to_key(), "20250103");
        assert_eq!(weeks[0].trading_days, 4);
    }

    #[test]
    fn test_amount_absent_when_no_day_has_one() {
        let mut bars = vec![day("20240102", 1.0, 1.0, 1.0, 1.0, 1.0)];
        bars[0].amount = None;
        assert_eq!(resample_weekly(&bars)[0].amount, None);
    }
}
