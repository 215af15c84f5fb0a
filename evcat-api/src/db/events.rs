//! Event and organizer reads

use sqlx::SqlitePool;

use super::rows::row_to_map;
use crate::models::{Event, Organizer, OrganizerDirectory};
use crate::search::query::EventFilter;

/// Fetch every event matching `filter`, in store order
pub async fn fetch_events(pool: &SqlitePool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
    let mut query = filter.to_query();
    let rows = query.build().fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(|row| Event::from_columns(row_to_map(row)))
        .collect())
}

/// Snapshot of the organizer table
///
/// Accessibility markers become booleans here: any non-null value is `true`.
pub async fn fetch_organizers(pool: &SqlitePool) -> Result<OrganizerDirectory, sqlx::Error> {
    let rows = sqlx::query_as::<_, Organizer>(
        r#"
        SELECT name,
               COALESCE(address, '') AS address,
               parking IS NOT NULL AS parking,
               disabled_access IS NOT NULL AS disabled_access,
               pets_allowed IS NOT NULL AS pets_allowed
        FROM organizers
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(OrganizerDirectory::from_rows(rows))
}
