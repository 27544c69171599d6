use crate::domain::models::user::{Role as DomainRole, User as DomainUser};
use shared::{User as SharedUser, UserRole as SharedUserRole};

pub struct UserMapper;

impl UserMapper {
    /// The password stays behind.
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            balance: domain.balance,
            role: Self::role_to_dto(domain.role),
            joined_groups: domain.joined_groups,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn role_to_domain(dto_role: SharedUserRole) -> DomainRole {
        match dto_role {
            SharedUserRole::Admin => DomainRole::Admin,
            SharedUserRole::User => DomainRole::User,
        }
    }

    pub fn role_to_dto(domain_role: DomainRole) -> SharedUserRole {
        match domain_role {
            DomainRole::Admin => SharedUserRole::Admin,
            DomainRole::User => SharedUserRole::User,
        }
    }
}
