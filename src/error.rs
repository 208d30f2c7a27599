use crate::db::StoreError;
use crate::domain::hierarchy::HierarchyError;
use crate::domain::validation::FieldError;
use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The verified email does not belong to any employee.
    #[error("caller is not a known employee")]
    Unauthenticated,
    #[error("caller may not perform this action")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CoreError::Forbidden => StatusCode::FORBIDDEN,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => {
                CoreError::Conflict(format!("email {email} is already registered"))
            }
            StoreError::MissingMeeting(_) => {
                CoreError::Validation("one_on_one_id: meeting does not exist".to_string())
            }
            other => CoreError::Store(other),
        }
    }
}

impl From<FieldError> for CoreError {
    fn from(err: FieldError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<HierarchyError> for CoreError {
    fn from(err: HierarchyError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<CoreError> for StatusCode {
    fn from(err: CoreError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, err);
        }
        status
    }
}
