use chrono::{DateTime, Utc};

use crate::contract::model::EmployeeId;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Created { id: EmployeeId, at: DateTime<Utc> },
    Updated { id: EmployeeId, at: DateTime<Utc> },
    Deleted { id: EmployeeId, at: DateTime<Utc> },
    Imported { count: usize, at: DateTime<Utc> },
    Cleared { at: DateTime<Utc> },
    Reset { count: usize, at: DateTime<Utc> },
    /// A snapshot write was rejected; memory stays authoritative.
    SaveFailed { at: DateTime<Utc> },
}
