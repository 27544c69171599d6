use crate::domain::commands::transactions::{Direction, TransactionListQuery, TransactionView};
use crate::domain::models::transaction::{
    Transaction as DomainTransaction, TransactionStatus as DomainTransactionStatus,
    TransactionType as DomainTransactionType,
};
use shared::{
    Transaction as SharedTransaction, TransactionDirection, TransactionEntry,
    TransactionListRequest, TransactionStatus as SharedTransactionStatus,
    TransactionType as SharedTransactionType,
};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            group_id: domain.group_id,
            from_user_id: domain.from.to_string(),
            to_user_id: domain.to.to_string(),
            amount: domain.amount,
            round: domain.round,
            transaction_type: Self::to_dto_type(domain.transaction_type),
            status: Self::to_dto_status(domain.status),
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainTransaction>) -> Vec<SharedTransaction> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_query(request: TransactionListRequest) -> TransactionListQuery {
        TransactionListQuery {
            transaction_type: request.transaction_type.map(Self::to_domain_type),
            status: request.status.map(Self::to_domain_status),
        }
    }

    pub fn to_entry(view: TransactionView) -> TransactionEntry {
        TransactionEntry {
            transaction: Self::to_dto(view.transaction),
            direction: match view.direction {
                Direction::Incoming => TransactionDirection::Incoming,
                Direction::Outgoing => TransactionDirection::Outgoing,
            },
            group_name: view.group_name,
        }
    }

    fn to_domain_type(dto_type: SharedTransactionType) -> DomainTransactionType {
        match dto_type {
            SharedTransactionType::Contribution => DomainTransactionType::Contribution,
            SharedTransactionType::Payout => DomainTransactionType::Payout,
        }
    }

    fn to_dto_type(domain_type: DomainTransactionType) -> SharedTransactionType {
        match domain_type {
            DomainTransactionType::Contribution => SharedTransactionType::Contribution,
            DomainTransactionType::Payout => SharedTransactionType::Payout,
        }
    }

    fn to_domain_status(dto_status: SharedTransactionStatus) -> DomainTransactionStatus {
        match dto_status {
            SharedTransactionStatus::Completed => DomainTransactionStatus::Completed,
        }
    }

    fn to_dto_status(domain_status: DomainTransactionStatus) -> SharedTransactionStatus {
        match domain_status {
            DomainTransactionStatus::Completed => SharedTransactionStatus::Completed,
        }
    }
}
