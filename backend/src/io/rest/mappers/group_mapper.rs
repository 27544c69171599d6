use crate::domain::commands::groups::{CreateGroupCommand, GroupDetails};
use crate::domain::commands::rounds::RoundProgress;
use crate::domain::models::group::{
    Frequency as DomainFrequency, Group as DomainGroup, GroupStatus as DomainGroupStatus,
};
use crate::domain::schedule::RoundState;
use shared::{
    CreateGroupRequest, Group as SharedGroup, GroupDetailsResponse, GroupFrequency,
    GroupStatus as SharedGroupStatus, ParticipantEntry, PayoutScheduleEntry, PayoutState,
    RoundProgressResponse,
};

pub struct GroupMapper;

impl GroupMapper {
    pub fn to_create_command(request: CreateGroupRequest) -> CreateGroupCommand {
        CreateGroupCommand {
            name: request.name,
            max_participants: request.max_participants,
            contribution_amount: request.contribution_amount,
            frequency: request.frequency,
            start_date: request.start_date,
        }
    }

    pub fn to_dto(domain: DomainGroup) -> SharedGroup {
        SharedGroup {
            id: domain.id,
            name: domain.name,
            creator_id: domain.creator_id,
            participants: domain.participants,
            contribution_amount: domain.contribution_amount,
            max_participants: domain.max_participants,
            payout_order: domain.payout_order,
            frequency: Self::frequency_to_dto(domain.frequency),
            current_round: domain.current_round,
            status: Self::status_to_dto(domain.status),
            start_date: domain.start_date.to_rfc3339(),
            next_payout_date: domain.next_payout_date.to_rfc3339(),
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain_groups: Vec<DomainGroup>) -> Vec<SharedGroup> {
        domain_groups.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_details_response(details: GroupDetails) -> GroupDetailsResponse {
        GroupDetailsResponse {
            group: Self::to_dto(details.group),
            creator_name: details.creator_name,
            payout_amount: details.payout_amount,
            participants: details
                .participants
                .into_iter()
                .map(|p| ParticipantEntry {
                    user_id: p.user_id,
                    name: p.name,
                    is_creator: p.is_creator,
                })
                .collect(),
            schedule: details
                .schedule
                .into_iter()
                .map(|entry| PayoutScheduleEntry {
                    round: entry.round,
                    user_id: entry.user_id,
                    user_name: entry.user_name,
                    amount: entry.amount,
                    state: Self::round_state_to_dto(entry.state),
                })
                .collect(),
        }
    }

    pub fn to_progress_response(progress: RoundProgress) -> RoundProgressResponse {
        RoundProgressResponse {
            group_id: progress.group_id,
            round: progress.round,
            contributions_received: progress.contributions_received,
            contributions_expected: progress.contributions_expected,
            missing_user_ids: progress.missing_user_ids,
        }
    }

    fn frequency_to_dto(frequency: DomainFrequency) -> GroupFrequency {
        match frequency {
            DomainFrequency::Monthly => GroupFrequency::Monthly,
            DomainFrequency::Weekly => GroupFrequency::Weekly,
        }
    }

    fn status_to_dto(status: DomainGroupStatus) -> SharedGroupStatus {
        match status {
            DomainGroupStatus::Waiting => SharedGroupStatus::Waiting,
            DomainGroupStatus::Active => SharedGroupStatus::Active,
            DomainGroupStatus::Completed => SharedGroupStatus::Completed,
        }
    }

    fn round_state_to_dto(state: RoundState) -> PayoutState {
        match state {
            RoundState::Completed => PayoutState::Completed,
            RoundState::Current => PayoutState::Current,
            RoundState::Upcoming => PayoutState::Upcoming,
        }
    }
}
