pub mod task;
pub mod user;

pub use task::{Page, Task, TaskInput, TaskStatus, TaskUpdate};
pub use user::{Role, User, UserOut};
