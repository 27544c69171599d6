//! Domain-level command and query types.
//! The REST layer maps the public DTOs from the `shared` crate onto these and
//! maps the results back; services never see the wire types.

pub mod session {
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }
}

pub mod users {
    use crate::domain::models::user::Role;

    #[derive(Debug, Clone)]
    pub struct CreateUserCommand {
        pub name: String,
        pub email: String,
        pub password: String,
        pub opening_balance: i64,
        pub role: Role,
    }
}

pub mod groups {
    use crate::domain::models::group::Group;
    use crate::domain::schedule::RoundState;

    /// Raw form input; every field is validated by the service.
    #[derive(Debug, Clone)]
    pub struct CreateGroupCommand {
        pub name: String,
        pub max_participants: String,
        pub contribution_amount: String,
        pub frequency: String,
        pub start_date: String,
    }

    #[derive(Debug, Clone)]
    pub struct JoinGroupResult {
        pub group: Group,
        /// True when this join filled the roster and started round 1
        pub activated: bool,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct ParticipantSummary {
        pub user_id: String,
        pub name: String,
        pub is_creator: bool,
    }

    #[derive(Debug, Clone)]
    pub struct ScheduledPayout {
        pub round: u32,
        pub user_id: String,
        pub user_name: String,
        pub amount: i64,
        pub state: RoundState,
    }

    #[derive(Debug, Clone)]
    pub struct GroupDetails {
        pub group: Group,
        pub creator_name: String,
        pub payout_amount: i64,
        pub participants: Vec<ParticipantSummary>,
        pub schedule: Vec<ScheduledPayout>,
    }
}

pub mod contributions {
    use crate::domain::models::transaction::Transaction;

    #[derive(Debug, Clone)]
    pub struct ContributionResult {
        pub transaction: Transaction,
        pub new_balance: i64,
        pub success_message: String,
    }
}

pub mod rounds {
    use crate::domain::models::group::Group;
    use crate::domain::models::transaction::Transaction;

    #[derive(Debug, Clone)]
    pub struct AdvanceRoundCommand {
        pub group_id: String,
        /// Pay out even when some participants have not contributed yet
        pub allow_missing_contributions: bool,
    }

    #[derive(Debug, Clone)]
    pub struct AdvanceRoundResult {
        pub group: Group,
        pub payout: Transaction,
        pub recipient_name: String,
        pub completed_round: u32,
        pub warning: Option<String>,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct RoundProgress {
        pub group_id: String,
        pub round: u32,
        pub contributions_received: usize,
        pub contributions_expected: usize,
        pub missing_user_ids: Vec<String>,
    }
}

pub mod dashboard {
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq)]
    pub struct DashboardSummary {
        pub balance: i64,
        pub total_groups: usize,
        pub total_contributions: i64,
        pub total_payouts: i64,
        pub next_payout_date: Option<DateTime<Utc>>,
    }
}

pub mod transactions {
    use crate::domain::models::transaction::{Transaction, TransactionStatus, TransactionType};

    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub transaction_type: Option<TransactionType>,
        pub status: Option<TransactionStatus>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Direction {
        Incoming,
        Outgoing,
    }

    #[derive(Debug, Clone)]
    pub struct TransactionView {
        pub transaction: Transaction,
        pub direction: Direction,
        pub group_name: Option<String>,
    }
}

pub mod admin {
    use crate::domain::models::group::Group;
    use crate::domain::models::user::User;

    #[derive(Debug, Clone)]
    pub struct AdminUserSummary {
        pub user: User,
        pub joined_group_count: usize,
    }

    #[derive(Debug, Clone)]
    pub struct AdminOverview {
        pub total_users: usize,
        pub total_groups: usize,
        pub total_transactions: usize,
        pub users: Vec<AdminUserSummary>,
        pub groups: Vec<Group>,
        pub active_groups: Vec<Group>,
    }
}

pub mod snapshot {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ImportSummary {
        pub users: usize,
        pub groups: usize,
        pub transactions: usize,
        pub notifications: usize,
    }
}
