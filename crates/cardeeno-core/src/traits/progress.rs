//! Write-side collaborator: the persistence store for learning progress.

use async_trait::async_trait;

use crate::error::CardeenoResult;
use crate::types::{MemoryEntry, SessionSummary};

/// Write access for memory entries and session summaries.
///
/// The core calls this after in-memory state is already committed; a failed
/// write is reported to the caller but never rolls a round back. The
/// collaborator may suspend arbitrarily long.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Persist an updated memory entry.
    async fn save_memory_entry(&self, entry: MemoryEntry) -> CardeenoResult<()>;

    /// Persist a completed session's summary.
    async fn save_session_summary(&self, summary: SessionSummary) -> CardeenoResult<()>;
}
