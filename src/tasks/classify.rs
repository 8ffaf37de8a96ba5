//! Sorting tasks into the today / upcoming windows

use chrono::{Days, NaiveDate};

use crate::todoist::Task;

/// Days after today that still count as upcoming.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    Upcoming,
    Ignored,
}

impl Bucket {
    pub fn for_due(due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return Bucket::Ignored;
        };
        let horizon = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);

        if due == today {
            Bucket::Today
        } else if due > today && due <= horizon {
            Bucket::Upcoming
        } else {
            Bucket::Ignored
        }
    }
}

/// Result of one classification pass. Both lists are ordered most urgent
/// first, keeping fetch order among equal priorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTasks {
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
}

impl ClassifiedTasks {
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.upcoming.is_empty()
    }

    pub fn len(&self) -> usize {
        self.today.len() + self.upcoming.len()
    }
}

pub fn classify<I>(tasks: I, today: NaiveDate) -> ClassifiedTasks
where
    I: IntoIterator<Item = Task>,
{
    let mut classified = ClassifiedTasks::default();

    for task in tasks {
        match Bucket::for_due(task.due_date(), today) {
            Bucket::Today => classified.today.push(task),
            Bucket::Upcoming => classified.upcoming.push(task),
            Bucket::Ignored => {}
        }
    }

    // sort_by_key is stable
    classified.today.sort_by_key(Task::effective_priority);
    classified.upcoming.sort_by_key(Task::effective_priority);
    classified
}
