//! Database repository implementations

pub mod member_repository;
pub mod memory_member_repository;

pub use member_repository::*;
pub use memory_member_repository::*;

use crate::entities::Member;
use crate::types::StorageResult;
use async_trait::async_trait;

/// Persistence contract for [`Member`] records.
///
/// Implementations never cache; every read reflects the backing store.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert `member`, overwriting any `id` it carries with the generated key.
    async fn save(&self, member: Member) -> StorageResult<Member>;

    /// Some member with this id, or `None`.
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Member>>;

    /// Some member with this name, or `None`. Names are not unique and no
    /// particular match is preferred.
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<Member>>;

    /// Every stored member, in whatever order the store yields them.
    async fn find_all(&self) -> StorageResult<Vec<Member>>;
}
