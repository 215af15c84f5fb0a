//! Event query construction
//!
//! Builds the base read over `events` from up to four set-membership filters.
//! Values are always bound as parameters, never spliced into the SQL text.

use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

/// Base select; every filter narrows this
pub const BASE_QUERY: &str = "SELECT * FROM events";

/// Set-membership filters over the event table
///
/// Within a dimension the values are alternatives (`IN`); across dimensions
/// the clauses are conjoined (`AND`). An empty dimension does not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub categories: Vec<String>,
    pub event_types: Vec<String>,
    pub organizers: Vec<String>,
    /// Accepted but not applied: the events table carries no age group, so
    /// this dimension has nothing to bind to without a join.
    pub age_groups: Vec<String>,
}

impl EventFilter {
    /// Dimensions that produce a clause, in clause order
    fn clauses(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("category", self.categories.as_slice()),
            ("event_type", self.event_types.as_slice()),
            ("organizer", self.organizers.as_slice()),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
    }

    /// Build the parameterized query
    pub fn to_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(BASE_QUERY);

        for (i, (column, values)) in self.clauses().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(column);
            builder.push(" IN (");
            let mut separated = builder.separated(", ");
            for value in values {
                separated.push_bind(value.clone());
            }
            separated.push_unseparated(")");
        }

        if !self.age_groups.is_empty() {
            debug!(
                age_groups = ?self.age_groups,
                "Age group filter has no column on events, ignoring"
            );
        }

        builder
    }
}
