use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimeEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub cost: Option<Decimal>,
}

impl TimeEntry {
    pub fn started(task_id: Uuid, user_id: Uuid, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            start_time,
            end_time: None,
            duration: None,
            cost: None,
        }
    }

    /// Manual entries carry whatever end/duration/cost the caller supplied;
    /// nothing is derived for them.
    pub fn manual(
        task_id: Uuid,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        duration: Option<i64>,
        cost: Option<Decimal>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            start_time,
            end_time,
            duration,
            cost,
        }
    }

    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// A running entry joined with the owning project's hourly rate, as loaded
/// when stopping.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveEntry {
    #[sqlx(flatten)]
    pub entry: TimeEntry,
    pub hourly_rate: Option<Decimal>,
}

/// Cost of `duration_secs` seconds of work at `hourly_rate`, rounded to two
/// decimal places with midpoints away from zero.
pub fn entry_cost(hourly_rate: Decimal, duration_secs: i64) -> Decimal {
    (hourly_rate * Decimal::from(duration_secs) / Decimal::from(3600))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::{TimeEntry, entry_cost};

    #[rstest]
    #[case(Decimal::new(1000, 2), 5400, Decimal::new(1500, 2))]
    #[case(Decimal::new(3333, 2), 3600, Decimal::new(3333, 2))]
    #[case(Decimal::new(2000, 2), 3661, Decimal::new(2034, 2))]
    #[case(Decimal::new(1, 2), 1800, Decimal::new(1, 2))]
    #[case(Decimal::new(1000, 2), 0, Decimal::ZERO)]
    fn cost_is_rounded_half_up(
        #[case] rate: Decimal,
        #[case] duration_secs: i64,
        #[case] expected: Decimal,
    ) {
        assert_eq!(entry_cost(rate, duration_secs), expected);
    }

    #[test]
    fn started_entry_is_running_with_no_derived_fields() {
        let entry = TimeEntry::started(Uuid::new_v4(), Uuid::new_v4(), chrono::Utc::now());

        assert!(entry.is_running());
        assert_eq!(entry.end_time, None);
        assert_eq!(entry.duration, None);
        assert_eq!(entry.cost, None);
    }
}
