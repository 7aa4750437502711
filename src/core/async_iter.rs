//! Asynchronous iteration over plain iterables.
//!
//! [`AsyncIter`] turns any iterable into a [`Stream`] that yields to the runtime by sleeping
//! for `delay` every `steps` items, so long loops inside command handlers do not starve the
//! gateway. Combinators such as `filter`, `map` and `enumerate` come from [`StreamExt`].

use crate::errors::{Error, Result};
use futures::stream::{self, Stream, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

/// An iterable paired with a pacing policy.
#[derive(Debug, Clone)]
pub struct AsyncIter<I> {
    iter: I,
    delay: Duration,
    steps: usize,
}

impl<I> AsyncIter<I>
where
    I: Iterator + Send,
    I::Item: Send,
{
    /// Wraps `iterable` without any sleeping between items.
    pub fn new<T>(iterable: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: iterable.into_iter(),
            delay: Duration::ZERO,
            steps: 1,
        }
    }

    /// Wraps `iterable`, sleeping for `delay` after every `steps` items.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when `steps` is zero.
    pub fn with_pacing<T>(iterable: T, delay: Duration, steps: usize) -> Result<Self>
    where
        T: IntoIterator<IntoIter = I>,
    {
        if steps < 1 {
            return Err(Error::InvalidArgument {
                message: "Steps must be higher than or equal to 1".to_string(),
            });
        }
        Ok(Self {
            iter: iterable.into_iter(),
            delay,
            steps,
        })
    }

    /// Converts into a stream that applies the pacing policy.
    pub fn into_stream(self) -> impl Stream<Item = I::Item> + Send {
        let Self { iter, delay, steps } = self;
        stream::unfold((iter, 0_usize), move |(mut iter, mut yielded)| async move {
            let item = iter.next()?;
            if yielded == steps {
                yielded = 0;
                tokio::time::sleep(delay).await;
            }
            Some((item, (iter, yielded + 1)))
        })
    }

    /// Collects every item into a `Vec`.
    pub async fn collect_vec(self) -> Vec<I::Item> {
        self.into_stream().collect().await
    }

    /// Returns the first item, or `default` when there is none.
    pub async fn next_or(self, default: I::Item) -> I::Item {
        let stream = self.into_stream();
        futures::pin_mut!(stream);
        stream.next().await.unwrap_or(default)
    }

    /// Returns the first item for which the async `predicate` holds.
    pub async fn find<F, Fut>(self, mut predicate: F) -> Option<I::Item>
    where
        F: FnMut(&I::Item) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        let stream = self.into_stream();
        futures::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            if predicate(&item).await {
                return Some(item);
            }
        }
        None
    }

    /// Yields items in order, skipping any that were already seen.
    pub fn without_duplicates(self) -> impl Stream<Item = I::Item> + Send
    where
        I::Item: Eq + Hash + Clone,
    {
        let mut seen = HashSet::new();
        self.into_stream()
            .filter(move |item| futures::future::ready(seen.insert(item.clone())))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_collect_vec_preserves_order() {
        let items = AsyncIter::new(0..5).collect_vec().await;
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let result = AsyncIter::with_pacing(0..3, Duration::from_millis(10), 0);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_steps() {
        let started = Instant::now();
        let items = AsyncIter::with_pacing(0..5, Duration::from_secs(1), 2)
            .unwrap()
            .collect_vec()
            .await;

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        // Sleeps before items 2 and 4
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_next_or_default() {
        assert_eq!(AsyncIter::new(vec![7, 8]).next_or(0).await, 7);
        assert_eq!(AsyncIter::new(Vec::<i32>::new()).next_or(-1).await, -1);
    }

    #[tokio::test]
    async fn test_find_with_async_predicate() {
        let found = AsyncIter::new(vec![1, 10, 5, 100])
            .find(|value| {
                let value = *value;
                async move { value > 5 }
            })
            .await;
        assert_eq!(found, Some(10));

        let missing = AsyncIter::new(0..3)
            .find(|_| async { false })
            .await;
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_without_duplicates() {
        let unique: Vec<i32> = AsyncIter::new(vec![1, 2, 3, 3, 4, 4, 5])
            .without_duplicates()
            .collect()
            .await;
        assert_eq!(unique, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_stream_combinators() {
        let small: Vec<(usize, i32)> = AsyncIter::new(vec![1, 10, 5, 100])
            .into_stream()
            .filter(|value| futures::future::ready(*value <= 5))
            .enumerate()
            .collect()
            .await;
        assert_eq!(small, vec![(0, 1), (1, 5)]);
    }
}
