use paging_core::{Page, SortDir};

use crate::contract::error::DirectoryError;
use crate::contract::model::{Employee, EmployeeId, EmployeePatch, NewEmployee};

/// One listing request: the whole view configuration plus the page wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub departments: Vec<String>,
    pub roles: Vec<String>,
    /// Wire name of the sort field; `None` keeps canonical order.
    pub sort: Option<String>,
    pub dir: SortDir,
    pub page_size: Option<usize>,
    pub page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            departments: Vec::new(),
            roles: Vec::new(),
            sort: None,
            dir: SortDir::Asc,
            page_size: None,
            page: 1,
        }
    }
}

/// Public API trait for the employee_directory module
pub trait EmployeeDirectoryApi: Send + Sync {
    /// Get an employee by ID
    fn get_employee(&self, id: EmployeeId) -> Result<Employee, DirectoryError>;

    /// Run a listing query and return the requested page
    fn list_employees(&self, query: ListQuery) -> Result<Page<Employee>, DirectoryError>;

    fn create_employee(&self, new_employee: NewEmployee) -> Result<Employee, DirectoryError>;

    /// Update an employee with partial data
    fn update_employee(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> Result<Employee, DirectoryError>;

    fn delete_employee(&self, id: EmployeeId) -> Result<(), DirectoryError>;

    /// Distinct departments in use, sorted
    fn departments(&self) -> Vec<String>;

    /// Distinct roles in use, sorted
    fn roles(&self) -> Vec<String>;

    fn export_json(&self) -> Result<String, DirectoryError>;

    /// Replace the collection; returns how many records were imported
    fn import_json(&self, text: &str) -> Result<usize, DirectoryError>;
}
