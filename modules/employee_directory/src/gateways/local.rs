use std::sync::Arc;

use paging_core::{total_pages, Page};
use parking_lot::Mutex;

use crate::contract::{
    client::{EmployeeDirectoryApi, ListQuery},
    error::DirectoryError,
    model::{Employee, EmployeeId, EmployeePatch, NewEmployee},
};
use crate::domain::engine::EmployeeEngine;
use crate::domain::validation::EmailRegistry;
use crate::domain::view::Filters;

/// Local implementation of the EmployeeDirectoryApi trait that delegates to the engine
#[derive(Clone)]
pub struct LocalDirectoryClient {
    engine: Arc<Mutex<EmployeeEngine>>,
}

impl LocalDirectoryClient {
    pub fn new(engine: EmployeeEngine) -> Self {
        Self::from_shared(Arc::new(Mutex::new(engine)))
    }

    pub fn from_shared(engine: Arc<Mutex<EmployeeEngine>>) -> Self {
        Self { engine }
    }

    /// Shared handle for callers that need the full engine surface.
    pub fn engine(&self) -> Arc<Mutex<EmployeeEngine>> {
        self.engine.clone()
    }
}

impl EmployeeDirectoryApi for LocalDirectoryClient {
    fn get_employee(&self, id: EmployeeId) -> Result<Employee, DirectoryError> {
        self.engine
            .lock()
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found(id))
    }

    /// Applies the query to the shared view. An out-of-range page is rejected
    /// before anything changes.
    fn list_employees(&self, query: ListQuery) -> Result<Page<Employee>, DirectoryError> {
        let mut engine = self.engine.lock();

        let mut filters = Filters::default();
        filters.set_search(&query.search);
        filters.set_departments(query.departments.iter().cloned());
        filters.set_roles(query.roles.iter().cloned());
        let page_size = query
            .page_size
            .map_or(engine.page_size(), |size| engine.effective_page_size(size));
        let total = total_pages(engine.count_matching(&filters), page_size);
        if query.page == 0 || query.page > total {
            return Err(DirectoryError::validation(
                "page",
                format!("page {} is out of range (1..={total})", query.page),
            ));
        }

        engine.set_search(&query.search);
        engine.set_departments(query.departments);
        engine.set_roles(query.roles);
        engine.set_sort(query.sort.as_deref().unwrap_or(""), query.dir);
        if let Some(size) = query.page_size {
            engine.set_page_size(size);
        }
        engine.go_to_page(query.page);

        Ok(engine.page())
    }

    fn create_employee(&self, new_employee: NewEmployee) -> Result<Employee, DirectoryError> {
        Ok(self.engine.lock().add(new_employee)?)
    }

    fn update_employee(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> Result<Employee, DirectoryError> {
        Ok(self.engine.lock().update(id, patch)?)
    }

    fn delete_employee(&self, id: EmployeeId) -> Result<(), DirectoryError> {
        self.engine.lock().delete(id)?;
        Ok(())
    }

    fn departments(&self) -> Vec<String> {
        self.engine.lock().unique_departments()
    }

    fn roles(&self) -> Vec<String> {
        self.engine.lock().unique_roles()
    }

    fn export_json(&self) -> Result<String, DirectoryError> {
        Ok(self.engine.lock().export_json()?)
    }

    fn import_json(&self, text: &str) -> Result<usize, DirectoryError> {
        Ok(self.engine.lock().try_import_json(text)?)
    }
}

impl EmailRegistry for LocalDirectoryClient {
    fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool {
        self.engine.lock().is_email_unique(email, exclude)
    }
}
