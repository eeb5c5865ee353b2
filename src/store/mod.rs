//! Persistence seams.
//!
//! Handlers reach storage only through [`UserStore`] and [`TaskStore`]. The
//! PostgreSQL implementation backs the server; [`memory::MemoryStore`] keeps
//! everything in-process and backs the test-suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Page, Role, Task, TaskInput, TaskUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store: user records keyed by id and by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::DuplicateEmail` when the email is taken,
    /// whichever request got there first.
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError>;

    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError>;

    /// Deletes the user and, by cascade, every task they own.
    async fn delete_user(&self, id: i32) -> Result<(), AppError>;
}

/// Task repository. Every lookup by id is scoped to an owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a task owned by `owner_id`.
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError>;

    /// Lists tasks in id order. `None` lists across all owners.
    async fn list_tasks(&self, owner_id: Option<i32>, page: Page) -> Result<Vec<Task>, AppError>;

    /// Returns the task only if it exists and belongs to `owner_id`.
    async fn get_task_for_owner(
        &self,
        owner_id: i32,
        task_id: i32,
    ) -> Result<Option<Task>, AppError>;

    /// Applies a partial update and re-stamps `updated_at`.
    async fn update_task(&self, task: &Task, patch: TaskUpdate) -> Result<Task, AppError>;

    async fn delete_task(&self, task: &Task) -> Result<(), AppError>;
}
