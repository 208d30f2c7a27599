use crate::domain::models::{Employee, UserType};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("an employee cannot manage themself")]
    SelfManaged,
    #[error("manager {0} does not exist")]
    UnknownManager(Uuid),
    #[error("assigning manager {0} would create a reporting cycle")]
    Cycle(Uuid),
}

/// Validates `employee_id -> manager_id` against the current reporting tree.
///
/// Walks up from the proposed manager; reaching `employee_id` means the
/// assignment closes a loop. Existing loops elsewhere in the data terminate
/// the walk instead of spinning.
pub fn check_manager_assignment(
    employees: &[Employee],
    employee_id: Uuid,
    manager_id: Uuid,
) -> Result<(), HierarchyError> {
    if employee_id == manager_id {
        return Err(HierarchyError::SelfManaged);
    }

    let parents: HashMap<Uuid, Option<Uuid>> =
        employees.iter().map(|emp| (emp.id, emp.manager_id)).collect();
    if !parents.contains_key(&manager_id) {
        return Err(HierarchyError::UnknownManager(manager_id));
    }

    let mut seen = HashSet::new();
    let mut cursor = Some(manager_id);
    while let Some(current) = cursor {
        if current == employee_id {
            return Err(HierarchyError::Cycle(manager_id));
        }
        if !seen.insert(current) {
            break;
        }
        cursor = parents.get(&current).copied().flatten();
    }
    Ok(())
}

const LEAD_TITLE_MARKERS: [&str; 3] = ["Manager", "Director", "Head"];

/// User type implied by the reporting tree and job title. HR is an explicit
/// designation and is never inferred away.
pub fn infer_user_type(current: UserType, role: &str, has_reports: bool) -> UserType {
    if current == UserType::Hr {
        UserType::Hr
    } else if has_reports || LEAD_TITLE_MARKERS.iter().any(|marker| role.contains(marker)) {
        UserType::Lead
    } else {
        UserType::Employee
    }
}

/// Employees whose inferred user type differs from the stored one.
pub fn user_type_corrections(employees: &[Employee]) -> Vec<(Uuid, UserType)> {
    let managers: HashSet<Uuid> = employees.iter().filter_map(|emp| emp.manager_id).collect();
    employees
        .iter()
        .filter_map(|emp| {
            let inferred = infer_user_type(emp.user_type, &emp.role, managers.contains(&emp.id));
            (inferred != emp.user_type).then_some((emp.id, inferred))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn emp(role: &str, user_type: UserType, manager_id: Option<Uuid>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: role.to_string(),
            role: role.to_string(),
            email: format!("{}@co.com", Uuid::new_v4()),
            user_type,
            manager_id,
            archived: false,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rejects_cycles() {
        let ceo = emp("CEO", UserType::Hr, None);
        let lead = emp("Lead", UserType::Lead, Some(ceo.id));
        let dev = emp("Dev", UserType::Employee, Some(lead.id));
        let roster = vec![ceo.clone(), lead.clone(), dev.clone()];

        assert_eq!(
            check_manager_assignment(&roster, ceo.id, dev.id),
            Err(HierarchyError::Cycle(dev.id))
        );
        assert_eq!(
            check_manager_assignment(&roster, lead.id, lead.id),
            Err(HierarchyError::SelfManaged)
        );
        let ghost = Uuid::new_v4();
        assert_eq!(
            check_manager_assignment(&roster, dev.id, ghost),
            Err(HierarchyError::UnknownManager(ghost))
        );
        assert!(check_manager_assignment(&roster, dev.id, ceo.id).is_ok());
    }

    #[test]
    fn test_walk_survives_existing_loop() {
        let mut a = emp("A", UserType::Employee, None);
        let b = emp("B", UserType::Employee, Some(a.id));
        a.manager_id = Some(b.id);
        let outsider = emp("C", UserType::Employee, None);
        let roster = vec![a.clone(), b, outsider.clone()];

        assert!(check_manager_assignment(&roster, outsider.id, a.id).is_ok());
    }

    #[test]
    fn test_user_type_inference() {
        assert_eq!(infer_user_type(UserType::Hr, "Recruiter", false), UserType::Hr);
        assert_eq!(infer_user_type(UserType::Employee, "Designer", true), UserType::Lead);
        assert_eq!(infer_user_type(UserType::Employee, "Head of Sales", false), UserType::Lead);
        assert_eq!(infer_user_type(UserType::Lead, "Designer", false), UserType::Employee);
    }

    #[test]
    fn test_corrections_only_list_changes() {
        let boss = emp("Designer", UserType::Employee, None);
        let report = emp("Designer", UserType::Employee, Some(boss.id));
        let corrections = user_type_corrections(&[boss.clone(), report]);
        assert_eq!(corrections, vec![(boss.id, UserType::Lead)]);
    }
}
