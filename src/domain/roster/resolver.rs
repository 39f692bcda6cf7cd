use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::value_objects::{Captain, Email};
use crate::domain::event::GameMode;

/// Candidate party composition as submitted by the captain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RosterSubmission {
    /// Register an existing team, selecting which members play
    ExistingTeam {
        team_id: Uuid,
        selected_members: Vec<Uuid>,
    },
    /// Register a new, ad-hoc team; teammates join by accepting invites
    NewTeam {
        team_name: String,
        teammate_emails: Vec<String>,
    },
}

/// A validated roster satisfying the event's game-mode size requirement
///
/// For existing teams this is the exact set of playing members. For ad-hoc
/// teams it is the set of teammate addresses that still need to accept an
/// invite; the captain fills the first slot implicitly.
#[derive(Debug, Clone)]
pub enum Roster {
    Members(Vec<Uuid>),
    PendingInvites(Vec<Email>),
}

impl Roster {
    /// Effective player count, captain included
    pub fn player_count(&self) -> usize {
        match self {
            Roster::Members(members) => members.len(),
            Roster::PendingInvites(emails) => emails.len() + 1,
        }
    }
}

/// Validation failures for a submitted roster
///
/// All of these are recoverable by correcting the submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster has {actual} players but this mode requires exactly {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("duplicate teammate email: {0}")]
    DuplicateEmail(String),

    #[error("you cannot invite your own email address")]
    SelfInvite,

    #[error("this mode requires {required} teammates besides you")]
    MissingTeammates { required: usize },

    #[error("invalid teammate email: {0}")]
    InvalidEmail(String),

    #[error("duplicate member selected: {0}")]
    DuplicateMember(Uuid),

    #[error("selected player {0} is not a member of this team")]
    NotATeamMember(Uuid),
}

/// Validates a roster submission against the event's game mode
///
/// Pure validation, no side effects. `team_members` must carry the team's
/// current membership when the submission references an existing team.
///
/// # Business Rules
/// - Existing team: selected members must be distinct, all current members,
///   and exactly `required_players` of them.
/// - New team: teammate emails must be distinct (case-insensitive),
///   syntactically valid, exclude the captain's own address, and number
///   exactly `required_players - 1`.
pub fn resolve_roster(
    mode: GameMode,
    captain: &Captain,
    submission: &RosterSubmission,
    team_members: Option<&[Uuid]>,
) -> Result<Roster, RosterError> {
    let required = mode.required_players();

    match submission {
        RosterSubmission::ExistingTeam {
            selected_members, ..
        } => {
            let mut seen: Vec<Uuid> = Vec::with_capacity(selected_members.len());
            for member in selected_members {
                if seen.contains(member) {
                    return Err(RosterError::DuplicateMember(*member));
                }
                seen.push(*member);
            }

            if let Some(current) = team_members {
                if let Some(outsider) = selected_members.iter().find(|m| !current.contains(m)) {
                    return Err(RosterError::NotATeamMember(*outsider));
                }
            }

            if selected_members.len() != required {
                return Err(RosterError::WrongSize {
                    expected: required,
                    actual: selected_members.len(),
                });
            }

            Ok(Roster::Members(selected_members.clone()))
        }
        RosterSubmission::NewTeam {
            teammate_emails, ..
        } => {
            if teammate_emails.is_empty() && required > 1 {
                return Err(RosterError::MissingTeammates {
                    required: required - 1,
                });
            }

            let mut validated: Vec<Email> = Vec::with_capacity(teammate_emails.len());
            for raw in teammate_emails {
                let email = Email::new(raw.trim())
                    .map_err(|_| RosterError::InvalidEmail(raw.clone()))?;

                if captain.email.matches_ignore_case(email.as_str()) {
                    return Err(RosterError::SelfInvite);
                }
                if validated
                    .iter()
                    .any(|e| e.matches_ignore_case(email.as_str()))
                {
                    return Err(RosterError::DuplicateEmail(raw.clone()));
                }
                validated.push(email);
            }

            // Captain fills the first slot implicitly
            if validated.len() != required - 1 {
                return Err(RosterError::WrongSize {
                    expected: required,
                    actual: validated.len() + 1,
                });
            }

            Ok(Roster::PendingInvites(validated))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captain() -> Captain {
        Captain {
            user_id: Uuid::new_v4(),
            email: Email::new("captain@example.com").unwrap(),
        }
    }

    fn new_team(emails: &[&str]) -> RosterSubmission {
        RosterSubmission::NewTeam {
            team_name: "Night Owls".to_string(),
            teammate_emails: emails.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn squad_new_team_with_three_teammates_is_valid() {
        let submission = new_team(&["a@example.com", "b@example.com", "c@example.com"]);
        let roster = resolve_roster(GameMode::Squad, &captain(), &submission, None).unwrap();
        assert_eq!(roster.player_count(), 4);
    }

    #[test]
    fn solo_new_team_needs_no_teammates() {
        let submission = new_team(&[]);
        let roster = resolve_roster(GameMode::Solo, &captain(), &submission, None).unwrap();
        assert_eq!(roster.player_count(), 1);
    }

    #[test]
    fn duo_with_zero_teammates_is_missing_teammates() {
        let result = resolve_roster(GameMode::Duo, &captain(), &new_team(&[]), None);
        assert_eq!(result.unwrap_err(), RosterError::MissingTeammates { required: 1 });
    }

    #[test]
    fn squad_with_two_teammates_is_wrong_size() {
        let submission = new_team(&["a@example.com", "b@example.com"]);
        let result = resolve_roster(GameMode::Squad, &captain(), &submission, None);
        assert_eq!(
            result.unwrap_err(),
            RosterError::WrongSize {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn squad_with_four_teammates_is_wrong_size_not_truncated() {
        let submission = new_team(&[
            "a@example.com",
            "b@example.com",
            "c@example.com",
            "d@example.com",
        ]);
        let result = resolve_roster(GameMode::Squad, &captain(), &submission, None);
        assert_eq!(
            result.unwrap_err(),
            RosterError::WrongSize {
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn duplicate_email_case_insensitive() {
        let submission = new_team(&["a@example.com", "A@Example.COM", "b@example.com"]);
        let result = resolve_roster(GameMode::Squad, &captain(), &submission, None);
        assert!(matches!(result, Err(RosterError::DuplicateEmail(_))));
    }

    #[test]
    fn captain_cannot_invite_self() {
        let submission = new_team(&["Captain@Example.com"]);
        let result = resolve_roster(GameMode::Duo, &captain(), &submission, None);
        assert_eq!(result.unwrap_err(), RosterError::SelfInvite);
    }

    #[test]
    fn malformed_email_rejected() {
        let submission = new_team(&["not-an-email"]);
        let result = resolve_roster(GameMode::Duo, &captain(), &submission, None);
        assert!(matches!(result, Err(RosterError::InvalidEmail(_))));
    }

    #[test]
    fn existing_team_exact_selection_is_valid() {
        let members: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let selected = members[..2].to_vec();
        let submission = RosterSubmission::ExistingTeam {
            team_id: Uuid::new_v4(),
            selected_members: selected.clone(),
        };

        let roster =
            resolve_roster(GameMode::Duo, &captain(), &submission, Some(&members)).unwrap();
        match roster {
            Roster::Members(m) => assert_eq!(m, selected),
            _ => panic!("expected member roster"),
        }
    }

    #[test]
    fn existing_team_too_few_selected() {
        let members: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let submission = RosterSubmission::ExistingTeam {
            team_id: Uuid::new_v4(),
            selected_members: members[..3].to_vec(),
        };

        let result = resolve_roster(GameMode::Squad, &captain(), &submission, Some(&members));
        assert_eq!(
            result.unwrap_err(),
            RosterError::WrongSize {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn existing_team_outsider_rejected() {
        let members: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
        let outsider = Uuid::new_v4();
        let submission = RosterSubmission::ExistingTeam {
            team_id: Uuid::new_v4(),
            selected_members: vec![members[0], outsider],
        };

        let result = resolve_roster(GameMode::Duo, &captain(), &submission, Some(&members));
        assert_eq!(result.unwrap_err(), RosterError::NotATeamMember(outsider));
    }

    #[test]
    fn existing_team_duplicate_selection_rejected() {
        let member = Uuid::new_v4();
        let submission = RosterSubmission::ExistingTeam {
            team_id: Uuid::new_v4(),
            selected_members: vec![member, member],
        };

        let result = resolve_roster(GameMode::Duo, &captain(), &submission, Some(&[member]));
        assert_eq!(result.unwrap_err(), RosterError::DuplicateMember(member));
    }
}
