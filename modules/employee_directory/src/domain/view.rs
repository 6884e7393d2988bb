//! The filter/sort pipeline that derives the view from the canonical collection.
//!
//! Stages run in a fixed order: search, department, role, sort. Sorting is
//! defined over the already-filtered set and is stable.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use paging_core::SortDir;

use crate::contract::model::{Employee, SortField};

/// Current filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Stored trimmed and lower-cased; empty means no search.
    search: String,
    departments: BTreeSet<String>,
    roles: BTreeSet<String>,
}

impl Filters {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn departments(&self) -> &BTreeSet<String> {
        &self.departments
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
    }

    pub fn set_departments<I, S>(&mut self, departments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = non_empty(departments);
    }

    pub fn set_roles<I, S>(&mut self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = non_empty(roles);
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.departments.is_empty() && self.roles.is_empty()
    }

    /// Case-insensitive substring match on first name, last name or email.
    pub fn matches_search(&self, e: &Employee) -> bool {
        self.search.is_empty()
            || e.first_name.to_lowercase().contains(&self.search)
            || e.last_name.to_lowercase().contains(&self.search)
            || e.email.to_lowercase().contains(&self.search)
    }

    pub fn matches_department(&self, e: &Employee) -> bool {
        self.departments.is_empty() || self.departments.contains(&e.department)
    }

    pub fn matches_role(&self, e: &Employee) -> bool {
        self.roles.is_empty() || self.roles.contains(&e.role)
    }

    pub fn matches(&self, e: &Employee) -> bool {
        self.matches_search(e) && self.matches_department(e) && self.matches_role(e)
    }
}

fn non_empty<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .filter(|v: &String| !v.is_empty())
        .collect()
}

/// Requested ordering. The key is kept verbatim so an unknown field name
/// round-trips; it simply orders nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, dir: SortDir) -> Self {
        Self {
            key: key.into(),
            dir,
        }
    }

    pub fn field(&self) -> Option<SortField> {
        SortField::from_key(&self.key)
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Ascending comparison of two records on `field`.
pub fn compare_by(field: SortField, a: &Employee, b: &Employee) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::FirstName => cmp_text(&a.first_name, &b.first_name),
        SortField::LastName => cmp_text(&a.last_name, &b.last_name),
        SortField::Email => cmp_text(&a.email, &b.email),
        SortField::Department => cmp_text(&a.department, &b.department),
        SortField::Role => cmp_text(&a.role, &b.role),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        // Never-edited records order before edited ones.
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Run the whole pipeline over `employees` in canonical order.
pub fn apply(employees: &[Employee], filters: &Filters, sort: Option<&SortSpec>) -> Vec<Employee> {
    let mut out: Vec<Employee> = employees
        .iter()
        .filter(|e| filters.matches_search(e))
        .filter(|e| filters.matches_department(e))
        .filter(|e| filters.matches_role(e))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        if let Some(field) = spec.field() {
            // `sort_by` is stable: equal keys keep their filtered order.
            out.sort_by(|a, b| spec.dir.apply(compare_by(field, a, b)));
        }
    }

    out
}
