//! Sample employees used to fill an empty store.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::contract::model::{Employee, EmployeeId};

pub const DEPARTMENTS: [&str; 10] = [
    "Engineering",
    "Marketing",
    "Sales",
    "Human Resources",
    "Finance",
    "Operations",
    "Product",
    "Design",
    "Customer Support",
    "Legal",
];

pub const ROLES: [&str; 10] = [
    "Manager",
    "Senior",
    "Mid-level",
    "Junior",
    "Intern",
    "Director",
    "VP",
    "C-Level",
    "Lead",
    "Specialist",
];

const IDENTITIES: [(&str, &str); 25] = [
    ("John", "Smith"),
    ("Sarah", "Johnson"),
    ("Michael", "Davis"),
    ("Emily", "Wilson"),
    ("David", "Brown"),
    ("Lisa", "Garcia"),
    ("James", "Miller"),
    ("Jennifer", "Taylor"),
    ("Robert", "Anderson"),
    ("Amanda", "Thomas"),
    ("Christopher", "Jackson"),
    ("Michelle", "White"),
    ("Daniel", "Harris"),
    ("Jessica", "Martin"),
    ("Matthew", "Thompson"),
    ("Olivia", "King"),
    ("William", "Scott"),
    ("Sophia", "Green"),
    ("Benjamin", "Hall"),
    ("Ava", "Young"),
    ("Elijah", "Wright"),
    ("Mia", "Lopez"),
    ("Logan", "Hill"),
    ("Charlotte", "Adams"),
    ("Lucas", "Baker"),
];

const EMAIL_DOMAIN: &str = "company.com";
const YEAR_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Build the sample collection.
///
/// Ids run from 1 in list order. Department, role and a creation time within
/// the year before `now` are drawn from `rng`, so a seeded generator gives a
/// reproducible dataset.
pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<Employee> {
    IDENTITIES
        .iter()
        .zip(1u64..)
        .map(|(&(first, last), id)| {
            let department = DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            let role = ROLES[rng.gen_range(0..ROLES.len())];
            let age = Duration::milliseconds(rng.gen_range(0..YEAR_MS));

            Employee {
                id: EmployeeId(id),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!(
                    "{}.{}@{EMAIL_DOMAIN}",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                department: department.to_string(),
                role: role.to_string(),
                created_at: now - age,
                updated_at: None,
            }
        })
        .collect()
}
