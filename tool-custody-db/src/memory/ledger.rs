use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::memory::session::MemorySession;
use crate::models::{ActorModel, CheckoutEventModel, ToolModel};
use crate::repository::{CommitUnitOfWork, RepositoryError};

#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    /// Keyed by username
    pub(crate) actors: BTreeMap<String, ActorModel>,
    /// Keyed by tool_id
    pub(crate) tools: BTreeMap<String, ToolModel>,
    /// Append order
    pub(crate) events: Vec<CheckoutEventModel>,
}

#[derive(Debug, Default)]
struct Faults {
    fail_next_commit: AtomicBool,
    fail_reads: AtomicBool,
}

/// Process-local custody ledger.
///
/// Clones share the same state. Writes go through [`MemorySession`], which
/// stages them and applies them under a single write lock on commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
    faults: Arc<Faults>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_actor(&self, actor: ActorModel) {
        self.state
            .write()
            .actors
            .insert(actor.username.to_string(), actor);
    }

    pub fn insert_tool(&self, tool: ToolModel) {
        self.state.write().tools.insert(tool.tool_id.to_string(), tool);
    }

    /// Adds a historical event directly, bypassing the unit of work.
    pub fn import_event(&self, event: CheckoutEventModel) {
        self.state.write().events.push(event);
    }

    pub fn tool(&self, tool_id: &str) -> Option<ToolModel> {
        self.state.read().tools.get(tool_id).cloned()
    }

    /// All committed events in append order.
    pub fn events(&self) -> Vec<CheckoutEventModel> {
        self.state.read().events.clone()
    }

    /// Committed events of one tool, oldest first.
    pub fn events_for(&self, tool_id: &str) -> Vec<CheckoutEventModel> {
        self.state
            .read()
            .events
            .iter()
            .filter(|e| e.tool_id.as_str() == tool_id)
            .cloned()
            .collect()
    }

    /// The next commit fails as if the storage engine had rejected it.
    pub fn fail_next_commit(&self) {
        self.faults.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// While enabled every read-model query fails.
    pub fn fail_reads(&self, enabled: bool) {
        self.faults.fail_reads.store(enabled, Ordering::SeqCst);
    }

    pub(crate) fn read_state(
        &self,
    ) -> Result<parking_lot::RwLockReadGuard<'_, LedgerState>, RepositoryError> {
        if self.faults.fail_reads.load(Ordering::SeqCst) {
            return Err("Injected read failure".into());
        }
        Ok(self.state.read())
    }

    pub(crate) fn state(&self) -> &RwLock<LedgerState> {
        &self.state
    }

    pub(crate) fn take_commit_fault(&self) -> bool {
        self.faults.fail_next_commit.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl CommitUnitOfWork for InMemoryLedger {
    type Session = MemorySession;

    async fn begin_unit_of_work(&self) -> Result<MemorySession, RepositoryError> {
        Ok(MemorySession::new(self.clone()))
    }
}
