//! Async convenience API built on top of the sync generator.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::generator::{generate_bulk, generate_uuid};
use crate::{UuidError, Version};

/// Number of values generated between cooperative yields.
pub const BULK_YIELD_EVERY: usize = 1_000;

/// Get one UUID in async contexts, drawn from the same thread-local
/// generator as [`generate_uuid`].
pub async fn async_generate_uuid(version: Version) -> Result<String, UuidError> {
    generate_uuid(version)
}

/// Generate `count` UUIDs, yielding to the executor every
/// [`BULK_YIELD_EVERY`] values so large batches do not monopolise it.
pub async fn async_generate_bulk(version: Version, count: usize) -> Result<Vec<String>, UuidError> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        if !out.is_empty() {
            YieldNow::default().await;
        }
        let chunk = (count - out.len()).min(BULK_YIELD_EVERY);
        out.extend(generate_bulk(version, chunk)?);
    }
    Ok(out)
}

/// Returns `Pending` once, waking itself, then completes.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
