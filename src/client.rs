//! Headless state for the browser list view.
//!
//! The original client mutated its list in place before the server call and
//! swapped the old array back on failure, which loses updates when two
//! operations on the same item race. Here every entry carries an explicit
//! sync status and at most one in-flight operation: a second operation on a
//! non-synced entry is refused instead of clobbering the stash.

use crate::models::{TodoItem, TodoUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Matches the server as far as we know.
    Synced,
    /// Mutated locally, server call in flight.
    Pending,
    /// A failed operation was rolled back; awaiting acknowledgement.
    Reverting,
}

#[derive(Debug, Clone)]
enum PendingOp {
    /// Entry does not exist on the server yet; revert removes it.
    Create,
    /// Snapshot of the entry before the local mutation.
    Update(TodoItem),
    /// Entry still exists on the server; revert makes it visible again.
    Delete,
}

#[derive(Debug, Clone)]
pub struct LocalTodo {
    pub item: TodoItem,
    pub status: SyncStatus,
    pending: Option<PendingOp>,
}

impl LocalTodo {
    fn synced(item: TodoItem) -> Self {
        Self {
            item,
            status: SyncStatus::Synced,
            pending: None,
        }
    }
}

/// The in-memory list the UI renders from, newest first.
#[derive(Debug, Default)]
pub struct TodoListView {
    entries: Vec<LocalTodo>,
}

impl TodoListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all local state with a fresh server listing.
    pub fn load(&mut self, items: Vec<TodoItem>) {
        self.entries = items.into_iter().map(LocalTodo::synced).collect();
    }

    /// Entries the UI should render: everything except pending deletes.
    pub fn visible(&self) -> impl Iterator<Item = &LocalTodo> {
        self.entries
            .iter()
            .filter(|e| !matches!(e.pending, Some(PendingOp::Delete)))
    }

    pub fn entry(&self, todo_id: &str) -> Option<&LocalTodo> {
        self.entries.iter().find(|e| e.item.todo_id == todo_id)
    }

    fn entry_mut(&mut self, todo_id: &str) -> Option<&mut LocalTodo> {
        self.entries.iter_mut().find(|e| e.item.todo_id == todo_id)
    }

    /// Inserts a locally created item at the front of the list. Refused if
    /// the id is already present.
    pub fn begin_create(&mut self, item: TodoItem) -> bool {
        if self.entry(&item.todo_id).is_some() {
            return false;
        }
        self.entries.insert(
            0,
            LocalTodo {
                item,
                status: SyncStatus::Pending,
                pending: Some(PendingOp::Create),
            },
        );
        true
    }

    /// Applies the update locally and stashes the prior state. Refused if
    /// the entry is missing or already has an operation in flight.
    pub fn begin_update(&mut self, todo_id: &str, update: TodoUpdate) -> bool {
        let Some(entry) = self.entry_mut(todo_id) else {
            return false;
        };
        if entry.status != SyncStatus::Synced {
            return false;
        }

        entry.pending = Some(PendingOp::Update(entry.item.clone()));
        entry.status = SyncStatus::Pending;
        entry.item.name = update.name;
        entry.item.due_date = update.due_date;
        entry.item.done = update.done;
        true
    }

    /// Hides the entry from the visible list while the delete is in flight.
    pub fn begin_delete(&mut self, todo_id: &str) -> bool {
        let Some(entry) = self.entry_mut(todo_id) else {
            return false;
        };
        if entry.status != SyncStatus::Synced {
            return false;
        }

        entry.pending = Some(PendingOp::Delete);
        entry.status = SyncStatus::Pending;
        true
    }

    /// Marks the in-flight operation as accepted by the server. A confirmed
    /// delete removes the entry; a confirmed create may carry the
    /// server-assigned item to replace the optimistic one.
    pub fn confirm(&mut self, todo_id: &str, server_item: Option<TodoItem>) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.item.todo_id == todo_id) else {
            return false;
        };

        match self.entries[pos].pending.take() {
            Some(PendingOp::Delete) => {
                self.entries.remove(pos);
            }
            Some(PendingOp::Create) => {
                if let Some(item) = server_item {
                    self.entries[pos].item = item;
                }
                self.entries[pos].status = SyncStatus::Synced;
            }
            Some(PendingOp::Update(_)) => {
                self.entries[pos].status = SyncStatus::Synced;
            }
            None => return false,
        }
        true
    }

    /// Rolls back the in-flight operation. A failed create disappears; a
    /// failed update or delete is restored and parked in `Reverting` until
    /// the UI acknowledges it via [`TodoListView::settle`].
    pub fn revert(&mut self, todo_id: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.item.todo_id == todo_id) else {
            return false;
        };

        match self.entries[pos].pending.take() {
            Some(PendingOp::Create) => {
                self.entries.remove(pos);
            }
            Some(PendingOp::Update(prior)) => {
                self.entries[pos].item = prior;
                self.entries[pos].status = SyncStatus::Reverting;
            }
            Some(PendingOp::Delete) => {
                self.entries[pos].status = SyncStatus::Reverting;
            }
            None => return false,
        }
        true
    }

    /// Acknowledges a rolled-back entry, returning it to `Synced`.
    pub fn settle(&mut self, todo_id: &str) -> bool {
        match self.entry_mut(todo_id) {
            Some(entry) if entry.status == SyncStatus::Reverting => {
                entry.status = SyncStatus::Synced;
                true
            }
            _ => false,
        }
    }
}
