pub mod categories;
pub mod clock;
pub mod config;
pub mod form;
pub mod model;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use categories::{default_categories, find_category};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use form::{Draft, FormController, FormState, SubmitOutcome};
pub use model::*;
pub use session::{EventOutcome, Session, SessionEvent, ViewSnapshot};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
pub use store::{StoreEvent, TaskStore};
pub use view::{filter_tasks, EmptyState, TaskStats, ViewQuery};
