use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};
use std::sync::Arc;

use crate::poster::compose::RenderedPoster;

/// Identifies one render request. Tickets are handed out in monotonically
/// increasing order; beginning a new render conceptually cancels every
/// older unfinished one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    poster: Option<Arc<RenderedPoster>>,
    download_ready: bool,
}

/// Current preview state.
#[derive(Clone, Debug, Default)]
pub struct PreviewSnapshot {
    pub generation: u64,
    pub poster: Option<Arc<RenderedPoster>>,
    pub download_ready: bool,
}

/// The single visible preview slot.
///
/// Each render produces an immutable buffer off to the side; only the
/// newest ticket may install its result, so overlapping renders can never
/// interleave writes to the visible preview. A superseded render's output
/// is simply dropped.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    next: AtomicU64,
    inner: Mutex<Published>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next render generation.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Install `poster` as the current preview. Returns false without side
    /// effects when the ticket has been superseded by a newer `begin` or an
    /// already newer publication.
    pub fn publish(&self, ticket: RenderTicket, poster: RenderedPoster, download_ready: bool) -> bool {
        if ticket.0 != self.next.load(Ordering::SeqCst) {
            return false;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if ticket.0 <= inner.generation {
            return false;
        }
        inner.generation = ticket.0;
        inner.poster = Some(Arc::new(poster));
        inner.download_ready = download_ready;
        true
    }

    /// Reset the preview (no image uploaded). Subject to the same
    /// supersession rule as `publish`.
    pub fn clear(&self, ticket: RenderTicket) -> bool {
        if ticket.0 != self.next.load(Ordering::SeqCst) {
            return false;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if ticket.0 <= inner.generation {
            return false;
        }
        inner.generation = ticket.0;
        inner.poster = None;
        inner.download_ready = false;
        true
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        PreviewSnapshot {
            generation: inner.generation,
            poster: inner.poster.clone(),
            download_ready: inner.download_ready,
        }
    }
}
