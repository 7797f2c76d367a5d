use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::memory::ledger::InMemoryLedger;
use crate::memory::read_model::latest_first;
use crate::models::{ActorModel, CheckoutEventModel, ToolModel};
use crate::repository::{
    AppendEvent, BulkFindCheckoutEventsByToolIds, CustodySession, FindActorByUsername,
    FindToolById, RepositoryError, UpdateToolCustody,
};

#[derive(Debug, Default)]
struct Staged {
    tools: BTreeMap<String, ToolModel>,
    events: Vec<CheckoutEventModel>,
}

/// One unit of work against an [`InMemoryLedger`].
///
/// Reads see committed state overlaid with this session's own staged writes.
pub struct MemorySession {
    ledger: InMemoryLedger,
    /// `None` once committed or rolled back
    staged: Mutex<Option<Staged>>,
}

impl MemorySession {
    pub(crate) fn new(ledger: InMemoryLedger) -> Self {
        Self {
            ledger,
            staged: Mutex::new(Some(Staged::default())),
        }
    }

    fn with_staged<T>(&self, f: impl FnOnce(&mut Staged) -> T) -> Result<T, RepositoryError> {
        let mut staged = self.staged.lock();
        let staged = staged.as_mut().ok_or("Transaction has been consumed")?;
        Ok(f(staged))
    }
}

#[async_trait]
impl FindActorByUsername for MemorySession {
    async fn find_actor_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorModel>, RepositoryError> {
        self.with_staged(|_| ())?;
        Ok(self.ledger.state().read().actors.get(username).cloned())
    }
}

#[async_trait]
impl FindToolById for MemorySession {
    async fn find_tool_by_id(&self, tool_id: &str) -> Result<Option<ToolModel>, RepositoryError> {
        if let Some(tool) = self.with_staged(|staged| staged.tools.get(tool_id).cloned())? {
            return Ok(Some(tool));
        }
        Ok(self.ledger.state().read().tools.get(tool_id).cloned())
    }
}

#[async_trait]
impl UpdateToolCustody for MemorySession {
    async fn update_tool_custody(&self, tool: &ToolModel) -> Result<(), RepositoryError> {
        let key = tool.tool_id.to_string();
        let current = {
            let state = self.ledger.state().read();
            state.tools.get(&key).cloned()
        };
        let Some(mut current) = current else {
            return Err(format!("Tool '{key}' does not exist").into());
        };
        current.held_by = tool.held_by.clone();
        current.checkout_time = tool.checkout_time;
        current.checkin_time = tool.checkin_time;
        self.with_staged(|staged| {
            staged.tools.insert(key, current);
        })
    }
}

#[async_trait]
impl AppendEvent for MemorySession {
    async fn append_event(
        &self,
        event: &CheckoutEventModel,
    ) -> Result<CheckoutEventModel, RepositoryError> {
        self.with_staged(|staged| staged.events.push(event.clone()))?;
        Ok(event.clone())
    }
}

#[async_trait]
impl BulkFindCheckoutEventsByToolIds for MemorySession {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        let staged = self.with_staged(|staged| staged.events.clone())?;
        let state = self.ledger.state().read();
        let events = state.events.iter().chain(staged.iter());
        Ok(latest_first(events.filter(|e| {
            e.is_checkout() && tool_ids.iter().any(|id| id == e.tool_id.as_str())
        })))
    }
}

#[async_trait]
impl CustodySession for MemorySession {
    async fn commit_unit_of_work(&self) -> Result<(), RepositoryError> {
        let staged = self
            .staged
            .lock()
            .take()
            .ok_or("Transaction has been consumed")?;
        if self.ledger.take_commit_fault() {
            return Err("Injected commit failure".into());
        }
        let mut state = self.ledger.state().write();
        for (tool_id, tool) in staged.tools {
            state.tools.insert(tool_id, tool);
        }
        state.events.extend(staged.events);
        Ok(())
    }

    async fn rollback_unit_of_work(&self) -> Result<(), RepositoryError> {
        self.staged
            .lock()
            .take()
            .map(|_| ())
            .ok_or_else(|| "Transaction has been consumed".into())
    }
}
