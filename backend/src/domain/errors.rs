//! Error type shared by every domain service.
//!
//! Each variant falls into one of three caller-facing categories (see
//! [`RoscaError::kind`]): something referenced does not exist, a business
//! precondition does not hold, or storage failed underneath us.

use shared::ErrorKind;

use super::models::group::GroupValidationError;

#[derive(Debug, thiserror::Error)]
pub enum RoscaError {
    #[error("User '{0}' not found")]
    UserNotFound(String),
    #[error("Group '{0}' not found")]
    GroupNotFound(String),
    #[error("Notification '{0}' not found")]
    NotificationNotFound(String),

    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No user is logged in")]
    NotAuthenticated,
    #[error("Only administrators can do this")]
    AdminRequired,
    #[error("Email '{0}' is already registered")]
    EmailTaken(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("You are already a member of this group")]
    AlreadyJoined,
    #[error("Group is full")]
    GroupFull,
    #[error("Group is no longer accepting members")]
    GroupNotWaiting,
    #[error("Group is not active")]
    GroupNotActive,
    #[error("You are not a participant of this group")]
    NotParticipant,
    #[error("You have already contributed for round {round}")]
    AlreadyContributed { round: u32 },
    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: i64, required: i64 },
    #[error("Only {received} of {expected} contributions received for round {round}")]
    MissingContributions {
        round: u32,
        received: usize,
        expected: usize,
    },
    #[error("Payout order has no recipient for the current round")]
    PayoutOrderIncomplete,

    #[error(transparent)]
    Validation(#[from] GroupValidationError),

    #[error("Unexpected storage failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl RoscaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoscaError::UserNotFound(_)
            | RoscaError::GroupNotFound(_)
            | RoscaError::NotificationNotFound(_) => ErrorKind::NotFound,
            RoscaError::Unexpected(_) => ErrorKind::Unexpected,
            _ => ErrorKind::PreconditionViolated,
        }
    }
}

pub type RoscaResult<T> = Result<T, RoscaError>;
