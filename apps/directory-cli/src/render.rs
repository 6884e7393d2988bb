//! Plain-text output for the terminal.

use std::fmt::Write;

use employee_directory::model::Employee;
use paging_core::Page;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn page(page: &Page<Employee>) -> String {
    let info = &page.page_info;
    let mut out = String::new();

    if page.items.is_empty() {
        out.push_str("No employees found\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<3} {:<24} {:<32} {:<18} {}",
        "ID", "", "NAME", "EMAIL", "DEPARTMENT", "ROLE"
    );
    for e in &page.items {
        let _ = writeln!(
            out,
            "{:>4}  {:<3} {:<24} {:<32} {:<18} {}",
            e.id,
            e.initials(),
            e.full_name(),
            e.email,
            e.department,
            e.role
        );
    }
    let _ = writeln!(
        out,
        "Showing {}-{} of {} employees (page {} of {})",
        info.start_item, info.end_item, info.total_items, info.current_page, info.total_pages
    );
    out
}

pub fn detail(e: &Employee) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", e.full_name(), e.id);
    let _ = writeln!(out, "  Email:      {}", e.email);
    let _ = writeln!(out, "  Department: {}", e.department);
    let _ = writeln!(out, "  Role:       {}", e.role);
    let _ = writeln!(out, "  Created:    {}", e.created_at.format(DATE_FORMAT));
    if let Some(updated) = e.updated_at {
        let _ = writeln!(out, "  Updated:    {}", updated.format(DATE_FORMAT));
    }
    out
}
