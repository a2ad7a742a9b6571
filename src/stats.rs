//! Stats aggregator
//!
//! Dashboard counts for a single user. Each count is its own store query, all scoped to the
//! same user.

use chrono::DateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::mutations::Result;
use crate::notes::NoteFlag;
use crate::storage::CountNotesQuery;
use crate::storage::Database;

/// Days in the "this week" window
const WEEK_DAYS: i64 = 7;

/// Note counts of a user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// All notes
    pub total_notes: u64,

    /// Notes created since the start of the current day
    pub today_notes: u64,

    /// Notes created in the last seven days
    pub week_notes: u64,

    /// Pinned notes
    pub pinned_notes: u64,

    /// Archived notes
    pub archived_notes: u64,
}

/// Start of the calendar day of `now`, in the time zone of `now`
///
/// When midnight does not exist locally (a DST gap), the day starts as long ago as the local
/// wall clock says.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || now.with_timezone(&Utc) - (now.naive_local() - midnight),
            |start| start.with_timezone(&Utc),
        )
}

/// Seven times 24 hours before `now`
pub fn week_ago<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    now.with_timezone(&Utc) - TimeDelta::days(WEEK_DAYS)
}

/// Count the notes of `user_id`, relative to `now`
///
/// `now` carries the time zone that decides where "today" starts
///
/// # Errors
///
/// Will return `Err` when the storage fails
pub async fn compute_stats<Tz: TimeZone>(
    database: &Database,
    user_id: &Uuid,
    now: &DateTime<Tz>,
) -> Result<Stats> {
    let stats = Stats {
        total_notes: database
            .count_notes_by_user(user_id, &CountNotesQuery::default())
            .await?,
        today_notes: database
            .count_notes_by_user(
                user_id,
                &CountNotesQuery {
                    created_since: Some(start_of_day(now)),
                    ..CountNotesQuery::default()
                },
            )
            .await?,
        week_notes: database
            .count_notes_by_user(
                user_id,
                &CountNotesQuery {
                    created_since: Some(week_ago(now)),
                    ..CountNotesQuery::default()
                },
            )
            .await?,
        pinned_notes: database
            .count_notes_by_user(
                user_id,
                &CountNotesQuery {
                    flag: Some(NoteFlag::Pinned),
                    ..CountNotesQuery::default()
                },
            )
            .await?,
        archived_notes: database
            .count_notes_by_user(
                user_id,
                &CountNotesQuery {
                    flag: Some(NoteFlag::Archived),
                    ..CountNotesQuery::default()
                },
            )
            .await?,
    };

    tracing::debug!("Stats of user {user_id}: {stats:?}");

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_start_of_day_in_local_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2026, 10, 17, 1, 30, 0).unwrap();

        // 00:00 at +02:00 is 22:00 UTC the day before
        let expected = Utc.with_ymd_and_hms(2026, 10, 16, 22, 0, 0).unwrap();
        assert_eq!(expected, start_of_day(&now));
    }

    #[test]
    fn test_start_of_day_in_utc() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 23, 59, 59).unwrap();

        let expected = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        assert_eq!(expected, start_of_day(&now));
    }

    #[test]
    fn test_week_ago() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();

        let expected = Utc.with_ymd_and_hms(2026, 10, 10, 12, 0, 0).unwrap();
        assert_eq!(expected, week_ago(&now));
    }
}
