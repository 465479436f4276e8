use std::future::Future;

use futures::{stream, Stream, TryStreamExt};

use crate::errors::{AppError, AppResult};

pub const PAGE_SIZE: i64 = 50;

/// Turns a paginated `(items, total)` fetch into a lazy stream of items.
/// Each call starts again from the first page.
pub fn paged<T, F, Fut>(fetch: F) -> impl Stream<Item = AppResult<T>>
where
    F: Fn(i64, i64) -> Fut,
    Fut: Future<Output = AppResult<(Vec<T>, i64)>>,
{
    stream::try_unfold((fetch, 0_i64, false), |(fetch, offset, done)| async move {
        if done {
            return Ok::<_, AppError>(None);
        }

        let (items, total) = fetch(offset, PAGE_SIZE).await?;
        let next_offset = offset + items.len() as i64;
        let done = items.is_empty() || next_offset >= total;

        Ok(Some((
            stream::iter(items.into_iter().map(Ok::<T, AppError>)),
            (fetch, next_offset, done),
        )))
    })
    .try_flatten()
}
