use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Page, Role, Task, TaskInput, TaskUpdate, User};

/// PostgreSQL-backed store.
///
/// Writes run inside a transaction that is committed on success; any early return
/// drops the transaction, which rolls it back and hands the connection back to the
/// pool. Reads borrow a pooled connection for the duration of a single query.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Removes every user whose email starts with `prefix`; their tasks go with them.
    pub async fn delete_users_with_email_prefix(&self, prefix: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE left(email, length($1)) = $1")
            .bind(prefix)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

fn map_unique_violation(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            AppError::DuplicateEmail
        }
        _ => error.into(),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, role, created_at, updated_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;
        tx.commit().await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at, updated_at FROM users
             ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2
             RETURNING id, email, password_hash, role, created_at, updated_at",
        )
        .bind(role)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        tx.commit().await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, description, due_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, title, description, due_date, status, created_at, updated_at",
        )
        .bind(owner_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.due_date)
        .bind(input.status)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(task)
    }

    async fn list_tasks(&self, owner_id: Option<i32>, page: Page) -> Result<Vec<Task>, AppError> {
        let mut sql = String::from(
            "SELECT id, user_id, title, description, due_date, status, created_at, updated_at \
             FROM tasks",
        );
        let mut param_count = 1;
        if owner_id.is_some() {
            sql.push_str(" WHERE user_id = $1");
            param_count += 1;
        }
        sql.push_str(&format!(
            " ORDER BY id OFFSET ${} LIMIT ${}",
            param_count,
            param_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Task>(&sql);
        if let Some(owner_id) = owner_id {
            query_builder = query_builder.bind(owner_id);
        }
        let tasks = query_builder
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get_task_for_owner(
        &self,
        owner_id: i32,
        task_id: i32,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, title, description, due_date, status, created_at, updated_at
             FROM tasks WHERE id = $1 AND user_id = $2",
        )
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(&self, task: &Task, patch: TaskUpdate) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;

        // Patch the row as it is now, not the caller's snapshot, so concurrent
        // partial updates of different fields both survive.
        let mut current = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, title, description, due_date, status, created_at, updated_at
             FROM tasks WHERE id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(task.id)
        .bind(task.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        current.apply(patch);

        let saved = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3, status = $4, updated_at = clock_timestamp()
             WHERE id = $5 AND user_id = $6
             RETURNING id, user_id, title, description, due_date, status, created_at, updated_at",
        )
        .bind(current.title)
        .bind(current.description)
        .bind(current.due_date)
        .bind(current.status)
        .bind(current.id)
        .bind(current.user_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_task(&self, task: &Task) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task.id)
            .bind(task.user_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        tx.commit().await?;
        Ok(())
    }
}
