// ABOUTME: Pure slot generation from a recurring weekly availability pattern
// ABOUTME: Walks a date range and emits fixed-length windows inside the daily operating hours
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Time-Slot Generator
//!
//! Turns a company's operating window, weekday mask and interval length into
//! concrete bookable slots over a bounded period. Generation is pure; the
//! caller persists the drafts.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::AvailableSlot;

/// Inputs for one generation run
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Owning company
    pub company_id: Uuid,
    /// Daily window start (inclusive)
    pub start_time_of_day: NaiveTime,
    /// Daily window end (exclusive for slot ends past it)
    pub end_time_of_day: NaiveTime,
    /// Slot length in minutes
    pub interval_minutes: i64,
    /// Weekday indices to generate for, 0 = Sunday through 6 = Saturday
    pub days_of_week: Vec<u8>,
    /// First calendar day of the period (inclusive)
    pub period_start: NaiveDate,
    /// Last calendar day of the period (inclusive)
    pub period_end: NaiveDate,
}

impl GenerationParams {
    fn validate(&self) -> AppResult<()> {
        if self.interval_minutes <= 0 {
            return Err(AppError::invalid_input(
                "intervalInMinutes must be positive",
            ));
        }
        if let Some(day) = self.days_of_week.iter().find(|&&d| d > 6) {
            return Err(AppError::invalid_input(format!(
                "days must be weekday indices between 0 and 6, got {day}"
            )));
        }
        if self.period_start > self.period_end {
            return Err(AppError::invalid_input(
                "periodStart must not be after periodEnd",
            ));
        }
        if self.start_time_of_day >= self.end_time_of_day {
            return Err(AppError::invalid_input(
                "startTime must be before endTime",
            ));
        }
        Ok(())
    }
}

/// Generate slot drafts for every matching day in the period.
///
/// Every emitted slot is exactly `interval_minutes` long and fully inside
/// the daily window; a trailing window that would cross `end_time_of_day`
/// is dropped, not truncated. Weekday indexing is 0 = Sunday.
///
/// # Errors
///
/// Returns a validation error before any slot is produced when the inputs
/// are malformed
pub fn generate_slots(params: &GenerationParams) -> AppResult<Vec<AvailableSlot>> {
    params.validate()?;

    let interval = Duration::minutes(params.interval_minutes);
    let mut slots = Vec::new();

    let mut date = params.period_start;
    while date <= params.period_end {
        let weekday = u8::try_from(date.weekday().num_days_from_sunday()).unwrap_or(u8::MAX);

        if params.days_of_week.contains(&weekday) {
            let day_end = date.and_time(params.end_time_of_day).and_utc();
            let mut cursor = date.and_time(params.start_time_of_day).and_utc();

            loop {
                let slot_end = cursor + interval;
                if slot_end > day_end {
                    break;
                }

                slots.push(AvailableSlot {
                    id: Uuid::new_v4(),
                    company_id: params.company_id,
                    date,
                    start_time: cursor,
                    end_time: slot_end,
                    is_booked: false,
                });

                cursor = slot_end;
            }
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        start: &str,
        end: &str,
        interval: i64,
        days: Vec<u8>,
        period_start: &str,
        period_end: &str,
    ) -> GenerationParams {
        GenerationParams {
            company_id: Uuid::new_v4(),
            start_time_of_day: start.parse().unwrap(),
            end_time_of_day: end.parse().unwrap(),
            interval_minutes: interval,
            days_of_week: days,
            period_start: period_start.parse().unwrap(),
            period_end: period_end.parse().unwrap(),
        }
    }

    #[test]
    fn test_monday_morning_example() {
        // 2025-01-06 is a Monday; one hour at 30-minute intervals
        let slots = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            30,
            vec![1],
            "2025-01-06",
            "2025-01-06",
        ))
        .unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_time.to_rfc3339(), "2025-01-06T09:00:00+00:00");
        assert_eq!(slots[0].end_time.to_rfc3339(), "2025-01-06T09:30:00+00:00");
        assert_eq!(slots[1].start_time.to_rfc3339(), "2025-01-06T09:30:00+00:00");
        assert_eq!(slots[1].end_time.to_rfc3339(), "2025-01-06T10:00:00+00:00");
        assert!(slots.iter().all(|s| !s.is_booked));
    }

    #[test]
    fn test_partial_trailing_slot_is_dropped() {
        // 50 minutes of window, 30-minute slots: only one fits
        let slots = generate_slots(&params(
            "09:00:00",
            "09:50:00",
            30,
            vec![1],
            "2025-01-06",
            "2025-01-06",
        ))
        .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end_time.to_rfc3339(), "2025-01-06T09:30:00+00:00");
    }

    #[test]
    fn test_weekday_mask_filters_dates() {
        // 2025-01-06 through 2025-01-12 is Monday..Sunday; keep Mon + Wed
        let slots = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            60,
            vec![1, 3],
            "2025-01-06",
            "2025-01-12",
        ))
        .unwrap();

        let dates: Vec<String> = slots.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-01-06", "2025-01-08"]);
    }

    #[test]
    fn test_sunday_is_index_zero() {
        // 2025-01-12 is a Sunday
        let slots = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            60,
            vec![0],
            "2025-01-06",
            "2025-01-12",
        ))
        .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].date.to_string(), "2025-01-12");
    }

    #[test]
    fn test_every_slot_has_interval_length_and_stays_inside_window() {
        let p = params(
            "08:15:00",
            "18:00:00",
            45,
            vec![1, 2, 3, 4, 5],
            "2025-03-01",
            "2025-03-31",
        );
        let slots = generate_slots(&p).unwrap();
        assert!(!slots.is_empty());

        for slot in &slots {
            assert_eq!(slot.duration_minutes(), 45);
            assert!(slot.start_time >= slot.date.and_time(p.start_time_of_day).and_utc());
            assert!(slot.end_time <= slot.date.and_time(p.end_time_of_day).and_utc());
            assert_eq!(slot.date, slot.start_time.date_naive());
        }
    }

    #[test]
    fn test_rejects_nonpositive_interval() {
        let result = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            0,
            vec![1],
            "2025-01-06",
            "2025-01-06",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_inverted_window() {
        let result = generate_slots(&params(
            "10:00:00",
            "09:00:00",
            30,
            vec![1],
            "2025-01-06",
            "2025-01-06",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_inverted_period() {
        let result = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            30,
            vec![1],
            "2025-01-07",
            "2025-01-06",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_out_of_range_weekday() {
        let result = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            30,
            vec![7],
            "2025-01-06",
            "2025-01-06",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_day_mask_generates_nothing() {
        let slots = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            30,
            vec![],
            "2025-01-06",
            "2025-01-12",
        ))
        .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_interval_longer_than_window_generates_nothing() {
        let slots = generate_slots(&params(
            "09:00:00",
            "10:00:00",
            90,
            vec![1],
            "2025-01-06",
            "2025-01-06",
        ))
        .unwrap();
        assert!(slots.is_empty());
    }
}
