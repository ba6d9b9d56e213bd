//! The conversation core's outward face: one shared registry index, one
//! session store, events in and render instructions out.

use std::sync::Arc;

use tracing::instrument;

use crate::conversation::{self, RenderInstruction, Selection};
use crate::registry::RegistryIndex;
use crate::session::{SessionStore, UserId};

pub struct DirectoryBot {
    index: Arc<RegistryIndex>,
    sessions: SessionStore,
}

impl DirectoryBot {
    pub fn new(index: Arc<RegistryIndex>) -> Self {
        Self {
            index,
            sessions: SessionStore::new(),
        }
    }

    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    /// Handles a structured menu selection for one user.
    #[instrument(skip(self))]
    pub fn handle_selection(&self, user_id: UserId, selection: Selection) -> RenderInstruction {
        let instruction = self.sessions.with_session(user_id, |session| {
            conversation::handle_selection(&self.index, session, selection)
        });

        // An ended conversation leaves nothing behind; the next event from
        // this user starts over at the category menu.
        if instruction == RenderInstruction::ShowSessionEnded {
            self.sessions.remove(user_id);
        }
        instruction
    }

    /// Handles a free-text query for one user.
    #[instrument(skip(self, raw_text))]
    pub fn handle_text(&self, user_id: UserId, raw_text: &str) -> RenderInstruction {
        self.sessions.with_session(user_id, |session| {
            conversation::handle_text(&self.index, session, raw_text)
        })
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}
