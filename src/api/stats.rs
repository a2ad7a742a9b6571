//! Stats API endpoint

use axum::Extension;
use chrono::Local;
use serde::Serialize;

use crate::stats::Stats;
use crate::stats::compute_stats;
use crate::storage::Database;

use super::CurrentUser;
use super::Error;
use super::Success;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    stats: Stats,
}

/// Dashboard counts of the current user
///
/// "Today" starts at midnight in the time zone of the server
///
/// Response:
/// ```json
/// {
///   "stats": {
///     "totalNotes": 3,
///     "todayNotes": 1,
///     "weekNotes": 2,
///     "pinnedNotes": 1,
///     "archivedNotes": 0
///   }
/// }
/// ```
pub async fn stats(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<StatsResponse>, Error> {
    let stats = compute_stats(&database, &current_user.id, &Local::now()).await?;

    Ok(Success::ok(StatsResponse { stats }))
}
