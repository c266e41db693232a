use crate::traits::UnixMillis;

/// Sorts by timestamp, drops entries older than `since`, keeps the first `limit`
///
/// Entries without a timestamp are dropped whenever `since` is given.
pub fn filter_by_since_limit<T, F>(
    mut items: Vec<T>,
    since: Option<UnixMillis>,
    limit: Option<usize>,
    timestamp: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<UnixMillis>,
{
    items.sort_by_key(|item| timestamp(item));

    if let Some(since) = since {
        items.retain(|item| timestamp(item).map_or(false, |ts| ts >= since));
    }
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}
