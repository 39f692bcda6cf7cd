use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::invite::Invite;
use crate::domain::roster::Email;

/// Per-email issuance failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InviteError {
    #[error("{0} is already a member of this team")]
    AlreadyMember(String),
}

/// Issues invites for an ad-hoc team, one per teammate email
///
/// Each invite is independent: a failure for one address never aborts
/// issuance for the others. The caller persists the successes and
/// surfaces the failures individually.
///
/// `existing_member_emails` carries addresses already holding membership
/// (relevant when invites are re-issued after a partial acceptance).
pub fn issue_invites(
    registration_id: Uuid,
    event_id: Uuid,
    team_name: &str,
    emails: &[Email],
    existing_member_emails: &[Email],
    now: DateTime<Utc>,
) -> Vec<Result<Invite, InviteError>> {
    emails
        .iter()
        .map(|email| {
            if existing_member_emails
                .iter()
                .any(|m| m.matches_ignore_case(email.as_str()))
            {
                return Err(InviteError::AlreadyMember(email.as_str().to_string()));
            }

            Ok(Invite::new(
                email.clone(),
                registration_id,
                event_id,
                team_name.to_string(),
                now,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invite::value_objects::InviteStatus;

    fn emails(addrs: &[&str]) -> Vec<Email> {
        addrs.iter().map(|a| Email::new(*a).unwrap()).collect()
    }

    #[test]
    fn issues_one_pending_invite_per_email() {
        let registration_id = Uuid::new_v4();
        let results = issue_invites(
            registration_id,
            Uuid::new_v4(),
            "Night Owls",
            &emails(&["a@example.com", "b@example.com", "c@example.com"]),
            &[],
            Utc::now(),
        );

        assert_eq!(results.len(), 3);
        for result in results {
            let invite = result.unwrap();
            assert_eq!(invite.status(), InviteStatus::Pending);
            assert_eq!(invite.registration_id(), registration_id);
        }
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let results = issue_invites(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Night Owls",
            &emails(&["a@example.com", "member@example.com", "c@example.com"]),
            &emails(&["Member@Example.com"]),
            Utc::now(),
        );

        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &InviteError::AlreadyMember("member@example.com".to_string())
        );
        assert!(results[2].is_ok());
    }
}
