//! In-process member repository for callers that should not need a database.

use crate::entities::Member;
use crate::repos::MemberRepository;
use crate::types::StorageResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct MemoryState {
    members: BTreeMap<i64, Member>,
    next_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Member repository kept in a shared map. Clones see the same members.
#[derive(Clone, Default)]
pub struct MemoryMemberStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every member and restart the id sequence at 1.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = MemoryState::default();
    }
}

#[async_trait]
impl MemberRepository for MemoryMemberStore {
    async fn save(&self, member: Member) -> StorageResult<Member> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let member = Member {
            id: Some(id),
            ..member
        };
        state.members.insert(id, member.clone());
        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Member>> {
        let state = self.state.read().await;
        Ok(state.members.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Option<Member>> {
        let state = self.state.read().await;
        Ok(state.members.values().find(|m| m.name == name).cloned())
    }

    async fn find_all(&self) -> StorageResult<Vec<Member>> {
        let state = self.state.read().await;
        Ok(state.members.values().cloned().collect())
    }
}
