use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used on the wire for the pooled group account
pub const SYSTEM_ACCOUNT: &str = "system";

/// Public view of a user. The password credential never leaves the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Signed balance in whole currency units
    pub balance: i64,
    pub role: UserRole,
    pub joined_groups: Vec<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub participants: Vec<String>,
    pub contribution_amount: i64,
    pub max_participants: u32,
    /// Empty until the roster fills, then a permutation of `participants`
    pub payout_order: Vec<String>,
    pub frequency: GroupFrequency,
    /// 1-based
    pub current_round: u32,
    pub status: GroupStatus,
    /// RFC 3339 timestamp
    pub start_date: String,
    /// RFC 3339 timestamp
    pub next_payout_date: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFrequency {
    Monthly,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Waiting,
    Active,
    Completed,
}

/// Ledger entry. `from_user_id`/`to_user_id` carry [`SYSTEM_ACCOUNT`] for the pool side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub group_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: i64,
    pub round: u32,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Contribution,
    Payout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub group_id: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ContributionReminder,
    GroupActivated,
    PayoutReceived,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// None when nobody is signed in
    pub user: Option<User>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub opening_balance: i64,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Raw form values; the backend parses and validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub max_participants: String,
    pub contribution_amount: String,
    /// "monthly" or "weekly"
    pub frequency: String,
    /// YYYY-MM-DD or RFC 3339
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub group: Group,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGroupResponse {
    pub group: Group,
    /// True when this join filled the roster and started the group
    pub activated: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub user_id: String,
    pub name: String,
    pub is_creator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutScheduleEntry {
    pub round: u32,
    pub user_id: String,
    pub user_name: String,
    pub amount: i64,
    pub state: PayoutState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDetailsResponse {
    pub group: Group,
    pub creator_name: String,
    pub payout_amount: i64,
    pub participants: Vec<ParticipantEntry>,
    pub schedule: Vec<PayoutScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundProgressResponse {
    pub group_id: String,
    pub round: u32,
    pub contributions_received: usize,
    pub contributions_expected: usize,
    pub missing_user_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Contributions and rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionResponse {
    pub transaction: Transaction,
    pub new_balance: i64,
    pub success_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceRoundRequest {
    /// Proceed even when some participants have not contributed this round
    #[serde(default)]
    pub allow_missing_contributions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceRoundResponse {
    pub group: Group,
    pub payout: Transaction,
    pub recipient_name: String,
    pub completed_round: u32,
    pub warning: Option<String>,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub balance: i64,
    pub total_groups: usize,
    pub total_contributions: i64,
    pub total_payouts: i64,
    /// RFC 3339 timestamp of the user's next scheduled payout, if any
    pub next_payout_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Incoming,
    Outgoing,
}

impl TransactionDirection {
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionDirection::Incoming => "+",
            TransactionDirection::Outgoing => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub transaction: Transaction,
    pub direction: TransactionDirection,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub reminders: Vec<Notification>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub balance: i64,
    pub joined_group_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOverviewResponse {
    pub total_users: usize,
    pub total_groups: usize,
    pub total_transactions: usize,
    pub users: Vec<AdminUserRow>,
    pub groups: Vec<Group>,
    /// Groups eligible for round advancement
    pub active_groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotImportResponse {
    pub users: usize,
    pub groups: usize,
    pub transactions: usize,
    pub notifications: usize,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Coarse error category shared by every failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PreconditionViolated,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::PreconditionViolated => write!(f, "precondition violated"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}
