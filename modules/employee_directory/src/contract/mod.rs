pub mod client;
pub mod error;
pub mod model;

pub use client::{EmployeeDirectoryApi, ListQuery};
pub use error::DirectoryError;
pub use model::{Employee, EmployeeId, EmployeePatch, NewEmployee, Snapshot, SortField};
