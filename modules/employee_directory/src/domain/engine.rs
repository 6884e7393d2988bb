use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use paging_core::{clamp_page, total_pages, Page, PageInfo, SortDir};
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::config::DirectoryConfig;
use crate::contract::model::{Employee, EmployeeId, EmployeePatch, NewEmployee, Snapshot};
use crate::domain::error::DomainError;
use crate::domain::events::DirectoryEvent;
use crate::domain::ports::EventPublisher;
use crate::domain::repo::SnapshotRepository;
use crate::domain::sample;
use crate::domain::validation::{validate_form, EmailRegistry, EmployeeForm, FieldError};
use crate::domain::view::{self, Filters, SortSpec};

/// Engine tuning, derived from [`DirectoryConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Reject writes that fail the form rules or duplicate an email.
    pub strict: bool,
    pub seed_sample_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        (&DirectoryConfig::default()).into()
    }
}

impl From<&DirectoryConfig> for EngineConfig {
    fn from(c: &DirectoryConfig) -> Self {
        Self {
            default_page_size: c.default_page_size.max(1),
            max_page_size: c.max_page_size.max(1),
            strict: c.strict_mode,
            seed_sample_data: c.seed_sample_data,
        }
    }
}

/// Current wall-clock time at the millisecond precision the snapshot format uses.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Owns the canonical employee collection and the derived, paginated view.
///
/// Every state-changing call recomputes the view in full and pulls the
/// current page back inside the valid range. Mutations persist a snapshot;
/// a failed write is reported but the in-memory change stands.
pub struct EmployeeEngine {
    store: Arc<dyn SnapshotRepository>,
    events: Arc<dyn EventPublisher<DirectoryEvent>>,
    config: EngineConfig,

    employees: Vec<Employee>,
    filters: Filters,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
    view: Vec<Employee>,
    last_save_ok: bool,
}

impl EmployeeEngine {
    /// Load the persisted collection, or seed and persist one when the store
    /// has nothing readable.
    #[instrument(name = "employee_directory.engine.open", skip_all)]
    pub fn open<R: Rng>(
        store: Arc<dyn SnapshotRepository>,
        events: Arc<dyn EventPublisher<DirectoryEvent>>,
        config: EngineConfig,
        rng: &mut R,
    ) -> Self {
        let page_size = coerce_page_size(config.default_page_size, config.max_page_size);
        let mut engine = Self {
            store,
            events,
            config,
            employees: Vec::new(),
            filters: Filters::default(),
            sort: None,
            page: 1,
            page_size,
            view: Vec::new(),
            last_save_ok: true,
        };

        let loaded = engine.store.load().and_then(|snapshot| {
            match check_ids(&snapshot.employees) {
                Ok(()) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, "Stored snapshot has invalid ids, ignoring it");
                    None
                }
            }
        });

        match loaded {
            Some(snapshot) => {
                info!(count = snapshot.employees.len(), "Loaded employee snapshot");
                engine.employees = snapshot.employees;
            }
            None => {
                let seed = if engine.config.seed_sample_data {
                    sample::generate(rng, timestamp())
                } else {
                    Vec::new()
                };
                info!(count = seed.len(), "No snapshot found, seeding collection");
                engine.employees = seed;
                engine.persist();
            }
        }

        engine.refresh();
        engine
    }

    // --- view configuration ---

    pub fn set_search(&mut self, text: &str) {
        self.filters.set_search(text);
        self.reset_page();
    }

    pub fn set_departments<I, S>(&mut self, departments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_departments(departments);
        self.reset_page();
    }

    pub fn set_roles<I, S>(&mut self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_roles(roles);
        self.reset_page();
    }

    /// Order the view by the field named `key`. An empty key removes the
    /// ordering; an unknown key is kept but leaves canonical order intact.
    pub fn set_sort(&mut self, key: &str, dir: SortDir) {
        let key = key.trim();
        self.sort = if key.is_empty() {
            None
        } else {
            let spec = SortSpec::new(key, dir);
            if spec.field().is_none() {
                debug!(key, "Unknown sort key, view keeps canonical order");
            }
            Some(spec)
        };
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.reset_page();
    }

    /// Zero is raised to 1 and sizes above the configured maximum are capped.
    pub fn set_page_size(&mut self, size: usize) {
        let coerced = coerce_page_size(size, self.config.max_page_size);
        if coerced != size {
            warn!(
                requested = size,
                applied = coerced,
                "Page size out of range, coerced"
            );
        }
        self.page_size = coerced;
        self.reset_page();
    }

    // --- navigation ---

    pub fn total_pages(&self) -> usize {
        total_pages(self.view.len(), self.page_size)
    }

    /// Page size that `set_page_size(size)` would apply.
    pub fn effective_page_size(&self, size: usize) -> usize {
        coerce_page_size(size, self.config.max_page_size)
    }

    /// Move to page `n`. Out-of-range requests leave the page unchanged.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.page = n;
            true
        } else {
            debug!(requested = n, total = self.total_pages(), "Page out of range");
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    // --- reads ---

    /// Current page slice plus its summary.
    pub fn page(&self) -> Page<Employee> {
        let info = PageInfo::compute(self.view.len(), self.page_size, self.page);
        Page::from_slice(&self.view, info)
    }

    /// Canonical collection in insertion order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Filtered and sorted records, all pages.
    pub fn view(&self) -> &[Employee] {
        &self.view
    }

    pub fn total_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn total_filtered(&self) -> usize {
        self.view.len()
    }

    /// How many records `filters` would keep, without touching the view.
    pub fn count_matching(&self, filters: &Filters) -> usize {
        self.employees.iter().filter(|e| filters.matches(e)).count()
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_ref().map(|s| s.key.as_str())
    }

    pub fn sort_direction(&self) -> SortDir {
        self.sort.as_ref().map(|s| s.dir).unwrap_or_default()
    }

    /// Whether the most recent snapshot write succeeded.
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    pub fn find_by_id(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn unique_departments(&self) -> Vec<String> {
        distinct(self.employees.iter().map(|e| e.department.as_str()))
    }

    pub fn unique_roles(&self) -> Vec<String> {
        distinct(self.employees.iter().map(|e| e.role.as_str()))
    }

    pub fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool {
        self.employees.as_slice().is_email_unique(email, exclude)
    }

    // --- mutations ---

    /// Append a new record with the next id.
    ///
    /// The caller is expected to have run the form validator; outside strict
    /// mode the data is stored as given.
    #[instrument(
        name = "employee_directory.engine.add",
        skip(self, data),
        fields(email = %data.email)
    )]
    pub fn add(&mut self, data: NewEmployee) -> Result<Employee, DomainError> {
        self.strict_check(&EmployeeForm::from(&data), None)?;

        let id = self.next_id().inspect_err(|e| warn!(error = %e, "Add rejected"))?;
        let employee = Employee {
            id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            department: data.department,
            role: data.role,
            created_at: timestamp(),
            updated_at: None,
        };

        self.employees.push(employee.clone());
        self.persist();
        self.refresh();

        self.events.publish(&DirectoryEvent::Created {
            id,
            at: employee.created_at,
        });
        info!(employee_id = %id, "Added employee");
        Ok(employee)
    }

    /// Shallow-merge `patch` over the record and stamp `updated_at`.
    #[instrument(
        name = "employee_directory.engine.update",
        skip(self, patch),
        fields(employee_id = %id)
    )]
    pub fn update(&mut self, id: EmployeeId, patch: EmployeePatch) -> Result<Employee, DomainError> {
        let Some(index) = self.position(id) else {
            warn!("Employee not found");
            return Err(DomainError::employee_not_found(id));
        };

        let mut updated = self.employees[index].clone();
        patch.apply_to(&mut updated);
        self.strict_check(&EmployeeForm::from(&updated), Some(id))?;
        let now = timestamp();
        updated.updated_at = Some(now);

        self.employees[index] = updated.clone();
        self.persist();
        self.refresh();

        self.events.publish(&DirectoryEvent::Updated { id, at: now });
        info!("Updated employee");
        Ok(updated)
    }

    #[instrument(
        name = "employee_directory.engine.delete",
        skip(self),
        fields(employee_id = %id)
    )]
    pub fn delete(&mut self, id: EmployeeId) -> Result<Employee, DomainError> {
        let Some(index) = self.position(id) else {
            warn!("Employee not found");
            return Err(DomainError::employee_not_found(id));
        };

        let removed = self.employees.remove(index);
        self.persist();
        self.refresh();

        self.events.publish(&DirectoryEvent::Deleted {
            id,
            at: timestamp(),
        });
        info!("Deleted employee");
        Ok(removed)
    }

    /// Pretty-printed JSON array of the canonical collection.
    pub fn export_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&self.employees)
            .map_err(|e| DomainError::serialization(e.to_string()))
    }

    /// Replace the collection with the records in `text`.
    /// Returns `false`, leaving everything untouched, unless `text` is a JSON
    /// array of employee records.
    pub fn import_json(&mut self, text: &str) -> bool {
        self.try_import_json(text).is_ok()
    }

    #[instrument(name = "employee_directory.engine.import", skip_all)]
    pub fn try_import_json(&mut self, text: &str) -> Result<usize, DomainError> {
        let parsed = parse_import(text).inspect_err(|e| warn!(error = %e, "Import rejected"))?;
        let count = parsed.len();

        self.employees = parsed;
        self.persist();
        self.refresh();

        self.events.publish(&DirectoryEvent::Imported {
            count,
            at: timestamp(),
        });
        info!(count, "Imported employees");
        Ok(count)
    }

    /// Drop every record.
    #[instrument(name = "employee_directory.engine.clear_all", skip_all)]
    pub fn clear_all(&mut self) {
        self.employees.clear();
        self.persist();
        self.refresh();
        self.events.publish(&DirectoryEvent::Cleared { at: timestamp() });
        info!("Cleared all employees");
    }

    /// Replace the collection with freshly generated sample data.
    #[instrument(name = "employee_directory.engine.reset", skip_all)]
    pub fn reset_to_sample_data<R: Rng>(&mut self, rng: &mut R) {
        let now = timestamp();
        self.employees = sample::generate(rng, now);
        self.persist();
        self.refresh();
        self.events.publish(&DirectoryEvent::Reset {
            count: self.employees.len(),
            at: now,
        });
        info!(count = self.employees.len(), "Reset to sample data");
    }

    // --- internals ---

    fn position(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id == id)
    }

    /// One past the largest id present, 1 for an empty collection.
    fn next_id(&self) -> Result<EmployeeId, DomainError> {
        let last = self
            .employees
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(EmployeeId(0));
        last.checked_next().ok_or(DomainError::ids_exhausted(last))
    }

    fn reset_page(&mut self) {
        self.page = 1;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view = view::apply(&self.employees, &self.filters, self.sort.as_ref());

        let clamped = clamp_page(self.page, self.total_pages());
        if clamped != self.page {
            debug!(from = self.page, to = clamped, "Current page clamped");
            self.page = clamped;
        }
        debug!(
            total = self.employees.len(),
            filtered = self.view.len(),
            page = self.page,
            "View recomputed"
        );
    }

    fn persist(&mut self) -> bool {
        let snapshot = Snapshot {
            employees: self.employees.clone(),
            last_updated: timestamp(),
        };

        self.last_save_ok = self.store.save(&snapshot);
        if !self.last_save_ok {
            warn!("Snapshot save failed, keeping in-memory state");
            self.events.publish(&DirectoryEvent::SaveFailed {
                at: snapshot.last_updated,
            });
        }
        self.last_save_ok
    }

    fn strict_check(
        &self,
        form: &EmployeeForm,
        editing: Option<EmployeeId>,
    ) -> Result<(), DomainError> {
        if !self.config.strict {
            return Ok(());
        }

        validate_form(form, self.employees.as_slice(), editing)
            .map(|_| ())
            .map_err(|errors| {
                warn!(%errors, "Strict mode rejected write");
                match errors.iter().next() {
                    Some(FieldError::EmailTaken) => {
                        DomainError::email_already_exists(form.email.trim())
                    }
                    Some(first) => DomainError::validation(first.field().key(), first.to_string()),
                    None => DomainError::validation("form", errors.to_string()),
                }
            })
    }
}

impl EmailRegistry for EmployeeEngine {
    fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool {
        EmployeeEngine::is_email_unique(self, email, exclude)
    }
}

fn coerce_page_size(size: usize, max: usize) -> usize {
    size.min(max).max(1)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn parse_import(text: &str) -> Result<Vec<Employee>, DomainError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| DomainError::malformed_input(format!("invalid JSON: {e}")))?;
    if !value.is_array() {
        return Err(DomainError::malformed_input("expected a JSON array"));
    }
    let employees: Vec<Employee> = serde_json::from_value(value)
        .map_err(|e| DomainError::malformed_input(format!("invalid employee record: {e}")))?;
    check_ids(&employees)?;
    Ok(employees)
}

/// Ids must be positive and unique across the collection.
fn check_ids(employees: &[Employee]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(employees.len());
    for e in employees {
        if e.id == EmployeeId(0) {
            return Err(DomainError::malformed_input("employee id must be positive"));
        }
        if !seen.insert(e.id) {
            return Err(DomainError::malformed_input(format!(
                "duplicate employee id {}",
                e.id
            )));
        }
    }
    Ok(())
}
