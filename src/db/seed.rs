use super::{Store, StoreResult};
use crate::domain::hierarchy::infer_user_type;
use crate::domain::models::{Employee, UserType};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

struct SeedEmployee<'a> {
    key: &'a str,
    name: &'a str,
    role: &'a str,
    email: &'a str,
    leader: Option<&'a str>,
    hr: bool,
    admin: bool,
}

const fn person<'a>(
    key: &'a str,
    name: &'a str,
    role: &'a str,
    email: &'a str,
    leader: Option<&'a str>,
) -> SeedEmployee<'a> {
    SeedEmployee {
        key,
        name,
        role,
        email,
        leader,
        hr: false,
        admin: false,
    }
}

const fn hr<'a>(
    key: &'a str,
    name: &'a str,
    role: &'a str,
    email: &'a str,
    leader: Option<&'a str>,
    admin: bool,
) -> SeedEmployee<'a> {
    SeedEmployee {
        key,
        name,
        role,
        email,
        leader,
        hr: true,
        admin,
    }
}

const ROSTER: [SeedEmployee<'static>; 16] = [
    hr("e01", "Morgan Hale", "CEO", "morgan.hale@example.com", None, false),
    hr("e02", "Dana Whitfield", "Head of People", "dana.whitfield@example.com", Some("e01"), true),
    person("e03", "Priya Raman", "Product Manager", "priya.raman@example.com", Some("e01")),
    person("e04", "Tomas Lind", "Design Lead", "tomas.lind@example.com", Some("e01")),
    person("e05", "Ines Duarte", "Sales Manager", "ines.duarte@example.com", Some("e01")),
    person("e06", "Kofi Mensah", "Business Analyst", "kofi.mensah@example.com", Some("e03")),
    person("e07", "Lena Vogel", "UX/UI Designer", "lena.vogel@example.com", Some("e04")),
    person("e08", "Ravi Patel", "UX/UI Designer", "ravi.patel@example.com", Some("e04")),
    person("e09", "Chloe Martin", "UX/UI Designer", "chloe.martin@example.com", Some("e07")),
    person("e10", "Jonas Berg", "Graphic Designer", "jonas.berg@example.com", Some("e04")),
    person("e11", "Amara Okafor", "Lead Generation Specialist", "amara.okafor@example.com", Some("e05")),
    person("e12", "Felix Novak", "Account Executive", "felix.novak@example.com", Some("e05")),
    person("e13", "Sofia Rossi", "Recruiter", "sofia.rossi@example.com", Some("e02")),
    person("e14", "Hugo Laurent", "Office Coordinator", "hugo.laurent@example.com", Some("e02")),
    person("e15", "Mei Tanaka", "Accountant", "mei.tanaka@example.com", Some("e01")),
    person("e16", "Oscar Reyes", "Business Analyst", "oscar.reyes@example.com", Some("e03")),
];

/// Builds the seed roster with fresh ids, manager links resolved and user
/// types inferred from the tree.
pub fn roster() -> Vec<Employee> {
    let now = Utc::now();
    let ids: HashMap<&str, Uuid> = ROSTER.iter().map(|e| (e.key, Uuid::new_v4())).collect();
    let leaders: HashSet<&str> = ROSTER.iter().filter_map(|e| e.leader).collect();

    ROSTER
        .iter()
        .filter_map(|seed| {
            let id = *ids.get(seed.key)?;
            let current = if seed.hr { UserType::Hr } else { UserType::Employee };
            Some(Employee {
                id,
                name: seed.name.to_string(),
                role: seed.role.to_string(),
                email: seed.email.to_string(),
                user_type: infer_user_type(current, seed.role, leaders.contains(seed.key)),
                manager_id: seed.leader.and_then(|key| ids.get(key).copied()),
                archived: false,
                is_admin: seed.admin,
                created_at: now,
            })
        })
        .collect()
}

/// Clears every table and loads the roster. Returns the number of employees.
pub async fn reset(store: &dyn Store) -> StoreResult<usize> {
    let employees = roster();
    store.replace_all(&employees).await?;
    tracing::info!("Seed data loaded: {} employees", employees.len());
    Ok(employees.len())
}

/// Startup seeding: only touches an empty store.
pub async fn seed_if_empty(store: &dyn Store) -> StoreResult<()> {
    if !store.list_employees().await?.is_empty() {
        tracing::info!("Store already has employees, skipping seed");
        return Ok(());
    }
    reset(store).await?;
    Ok(())
}
