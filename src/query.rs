//! Query filter
//!
//! Turns the loose `filter` and `limit` request parameters into a store query. Unknown
//! filters and unusable limits are ignored rather than rejected.

use uuid::Uuid;

use crate::mutations::Result;
use crate::notes::Note;
use crate::notes::NoteFlag;
use crate::storage::Database;
use crate::storage::NotesQuery;

/// Raw list options, as found in the query string
#[derive(Debug, Default)]
pub struct ListOptions {
    /// `pinned` or `archived`
    pub filter: Option<String>,

    /// Positive number of notes
    pub limit: Option<String>,
}

impl ListOptions {
    /// Pick the options out of decoded query string pairs
    ///
    /// A repeated key keeps its first value, unknown keys are skipped
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut options = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "filter" if options.filter.is_none() => options.filter = Some(value),
                "limit" if options.limit.is_none() => options.limit = Some(value),
                _ => {}
            }
        }

        options
    }

    /// Translate into a store query
    pub fn to_query(&self) -> NotesQuery {
        NotesQuery {
            flag: self.filter.as_deref().and_then(parse_filter),
            limit: self.limit.as_deref().and_then(parse_limit),
        }
    }
}

/// `pinned` and `archived` restrict to the matching flag, anything else is no restriction
fn parse_filter(filter: &str) -> Option<NoteFlag> {
    match filter {
        "pinned" => Some(NoteFlag::Pinned),
        "archived" => Some(NoteFlag::Archived),
        _ => None,
    }
}

/// Only positive integers cap the result
fn parse_limit(limit: &str) -> Option<u32> {
    limit
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|limit| *limit > 0)
}

/// List the notes of `user_id`, most recently updated first
///
/// # Errors
///
/// Will return `Err` when the storage fails
pub async fn list_notes(
    database: &Database,
    user_id: &Uuid,
    options: &ListOptions,
) -> Result<Vec<Note>> {
    let query = options.to_query();

    tracing::debug!("Listing notes of user {user_id} with {query:?}");

    Ok(database.find_all_notes_by_user(user_id, &query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(filter: Option<&str>, limit: Option<&str>) -> ListOptions {
        ListOptions {
            filter: filter.map(ToString::to_string),
            limit: limit.map(ToString::to_string),
        }
    }

    #[test]
    fn test_filter() {
        assert_eq!(
            Some(NoteFlag::Pinned),
            options(Some("pinned"), None).to_query().flag
        );
        assert_eq!(
            Some(NoteFlag::Archived),
            options(Some("archived"), None).to_query().flag
        );
        assert_eq!(None, options(Some("PINNED"), None).to_query().flag);
        assert_eq!(None, options(Some("all"), None).to_query().flag);
        assert_eq!(None, options(None, None).to_query().flag);
    }

    #[test]
    fn test_limit() {
        assert_eq!(Some(5), options(None, Some("5")).to_query().limit);
        assert_eq!(Some(5), options(None, Some(" 5 ")).to_query().limit);
        assert_eq!(None, options(None, Some("0")).to_query().limit);
        assert_eq!(None, options(None, Some("-3")).to_query().limit);
        assert_eq!(None, options(None, Some("five")).to_query().limit);
        assert_eq!(None, options(None, Some("2.5")).to_query().limit);
        assert_eq!(None, options(None, Some("")).to_query().limit);
        assert_eq!(None, options(None, None).to_query().limit);
    }

    #[test]
    fn test_from_pairs() {
        let pairs = [
            ("limit", "1"),
            ("limit", "x"),
            ("filter", "pinned"),
            ("filter", "archived"),
            ("sort", "title"),
        ]
        .map(|(key, value)| (key.to_string(), value.to_string()));

        let options = ListOptions::from_pairs(pairs);
        assert_eq!(Some("1"), options.limit.as_deref());
        assert_eq!(Some("pinned"), options.filter.as_deref());

        let options = ListOptions::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(NotesQuery::default(), options.to_query());
    }
}
