//! Task selection: fetch everything, keep what is due today or this week

mod classify;
mod fetcher;

pub use classify::{classify, Bucket, ClassifiedTasks, UPCOMING_WINDOW_DAYS};
pub use fetcher::{fetch_all_tasks, TaskFetcher};
