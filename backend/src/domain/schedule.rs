//! Payout scheduling rules: who gets paid when, and how much.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::group::{Frequency, Group, GroupStatus};

/// Draw a payout order as a uniformly random permutation of the roster.
pub fn assign_payout_order<R: Rng + ?Sized>(participants: &[String], rng: &mut R) -> Vec<String> {
    let mut order = participants.to_vec();
    order.shuffle(rng);
    order
}

/// Date of the payout after the one due on `from`.
///
/// Monthly schedules move by one calendar month and clamp to the last day of
/// shorter months (Jan 31 -> Feb 28/29). Returns `None` only when the result
/// falls outside chrono's representable range.
pub fn next_payout_date(frequency: Frequency, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match frequency {
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Weekly => from.checked_add_signed(Duration::days(7)),
    }
}

pub fn payout_amount(contribution_amount: i64, max_participants: u32) -> Option<i64> {
    contribution_amount.checked_mul(i64::from(max_participants))
}

/// Accepts a bare `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Completed,
    Current,
    Upcoming,
}

/// One `(round, recipient, state)` row per slot of the payout order.
pub fn payout_schedule(group: &Group) -> Vec<(u32, String, RoundState)> {
    group
        .payout_order
        .iter()
        .enumerate()
        .map(|(index, user_id)| {
            let round = index as u32 + 1;
            let state = if group.status == GroupStatus::Completed || round < group.current_round {
                RoundState::Completed
            } else if round == group.current_round && group.status == GroupStatus::Active {
                RoundState::Current
            } else {
                RoundState::Upcoming
            };
            (round, user_id.clone(), state)
        })
        .collect()
}
