// Auth log module: event types, storage backends and the recorder

pub mod recorder;
pub mod storage;
pub mod types;

pub use recorder::AuthLogRecorder;
pub use storage::{AuthLogStorage, MemoryAuthLogStorage};
pub use types::{
    AuthLogEntry, AuthLogPage, AuthLogQuery, LogAction, LogStatus, NewAuthLog,
    DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT,
};
