use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Page, Role, Task, TaskInput, TaskUpdate, User};

/// In-process store with the same observable behaviour as the PostgreSQL one:
/// unique emails, owner-scoped lookups, cascade on user deletion.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<'a, T: 'a>(items: impl Iterator<Item = &'a T>, page: Page) -> Vec<T>
where
    T: Clone,
{
    items
        .skip(usize::try_from(page.skip).unwrap_or(0))
        .take(usize::try_from(page.limit).unwrap_or(0))
        .cloned()
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|user| user.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        inner.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|user| user.email == email).cloned())
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(window(inner.users.values(), page))
    }

    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        if inner.users.remove(&id).is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }
        inner.tasks.retain(|_, task| task.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let mut inner = self.inner.lock().await;
        // Mirrors the foreign key on tasks.user_id.
        if !inner.users.contains_key(&owner_id) {
            return Err(AppError::Database(format!(
                "owner {} does not exist",
                owner_id
            )));
        }

        inner.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: inner.last_task_id,
            user_id: owner_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, owner_id: Option<i32>, page: Page) -> Result<Vec<Task>, AppError> {
        let inner = self.inner.lock().await;
        let visible = inner
            .tasks
            .values()
            .filter(|task| owner_id.map_or(true, |owner| task.user_id == owner));
        Ok(window(visible, page))
    }

    async fn get_task_for_owner(
        &self,
        owner_id: i32,
        task_id: i32,
    ) -> Result<Option<Task>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tasks
            .get(&task_id)
            .filter(|task| task.user_id == owner_id)
            .cloned())
    }

    async fn update_task(&self, task: &Task, patch: TaskUpdate) -> Result<Task, AppError> {
        let mut inner = self.inner.lock().await;
        let stored = inner
            .tasks
            .get_mut(&task.id)
            .filter(|stored| stored.user_id == task.user_id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        stored.apply(patch);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_task(&self, task: &Task) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        match inner.tasks.get(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                inner.tasks.remove(&task.id);
                Ok(())
            }
            _ => Err(AppError::NotFound("Task not found".into())),
        }
    }
}
