use crate::domain::models::{EmployeeUpdate, NewEmployee};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

fn field_error(field: &'static str, reason: &'static str) -> FieldError {
    FieldError { field, reason }
}

pub fn required(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn email(value: &str) -> Result<String, FieldError> {
    let trimmed = required("email", value)?;
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(field_error("email", "must be an email address")),
    }
}

/// Trims and checks a new employee in place.
pub fn new_employee(mut input: NewEmployee) -> Result<NewEmployee, FieldError> {
    input.name = required("name", &input.name)?;
    input.email = email(&input.email)?;
    input.role = required("role", &input.role)?;
    Ok(input)
}

pub fn employee_update(mut input: EmployeeUpdate) -> Result<EmployeeUpdate, FieldError> {
    input.name = input.name.as_deref().map(|v| required("name", v)).transpose()?;
    input.email = input.email.as_deref().map(email).transpose()?;
    input.role = input.role.as_deref().map(|v| required("role", v)).transpose()?;
    Ok(input)
}
