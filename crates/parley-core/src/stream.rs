//! Stream utilities for push-driven collaborator state.
//!
//! Converts tokio broadcast and watch channels into async streams so the
//! widget can `while let Some(..) = stream.next().await` over them.

use std::pin::Pin;

use futures::Stream;
use tokio::sync::{broadcast, watch};

/// Boxed, sendable stream.
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Convert a broadcast receiver into an async Stream.
///
/// `Lagged` is skipped: the next item is delivered instead of the lost ones.
pub fn broadcast_to_stream<T: Clone + Send + 'static>(
    mut rx: broadcast::Receiver<T>,
) -> BoxStream<T> {
    Box::pin(async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(item) => yield item,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Convert a watch receiver into a stream that yields the current value
/// first, then every subsequent change.
pub fn watch_to_stream<T: Clone + Send + Sync + 'static>(
    mut rx: watch::Receiver<T>,
) -> BoxStream<T> {
    Box::pin(async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        yield current;
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            yield next;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_broadcast_to_stream() {
        let (tx, rx) = broadcast::channel::<i32>(16);
        let stream = broadcast_to_stream(rx);

        tx.send(1).unwrap();
        tx.send(2).unwrap();
        drop(tx);

        let items: Vec<_> = stream.collect().await;
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_watch_to_stream_starts_with_current() {
        let (tx, rx) = watch::channel("loading");
        let mut stream = watch_to_stream(rx);

        assert_eq!(stream.next().await, Some("loading"));
        tx.send("ready").unwrap();
        assert_eq!(stream.next().await, Some("ready"));
        drop(tx);
        assert_eq!(stream.next().await, None);
    }
}
