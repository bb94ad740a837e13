use shared::{
    domain::AssignmentId,
    error::{ApiError, ErrorCode},
};
use storage::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("an upload is already in progress")]
    Busy,
    #[error("no file is staged for upload")]
    NoFileStaged,
    #[error("submissions for assignment {id} are closed or the quota is used up")]
    SubmissionClosed { id: AssignmentId },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Busy => ErrorCode::Busy,
            CoreError::NoFileStaged => ErrorCode::Validation,
            CoreError::SubmissionClosed { .. } => ErrorCode::SubmissionClosed,
            CoreError::Store(err) => err.code(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(value: CoreError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}
