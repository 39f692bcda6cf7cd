use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::event::Event;
use crate::domain::invite::Invite;
use crate::domain::payment::PaymentIntent;
use crate::domain::registration::Registration;
use crate::domain::repositories::{
    EventRepository, InviteRepository, PaymentIntentRepository, RegistrationRepository,
    TeamDirectory, TeamMember, TeamSummary,
};

/// In-memory event store
///
/// Backs tests and local development. The single mutex makes the seat
/// claim atomic: check and increment happen under one lock.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<Uuid, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, event: Event) {
        self.events.lock().await.insert(event.id, event);
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, String> {
        Ok(self.events.lock().await.get(&id).cloned())
    }

    async fn try_claim_seat(&self, event_id: Uuid) -> Result<bool, String> {
        let mut events = self.events.lock().await;
        let event = events
            .get_mut(&event_id)
            .ok_or_else(|| format!("Event not found: {}", event_id))?;

        if event.current_participants >= event.max_participants {
            return Ok(false);
        }
        event.current_participants += 1;
        Ok(true)
    }

    async fn release_seat(&self, event_id: Uuid) -> Result<(), String> {
        let mut events = self.events.lock().await;
        let event = events
            .get_mut(&event_id)
            .ok_or_else(|| format!("Event not found: {}", event_id))?;

        if event.current_participants > 0 {
            event.current_participants -= 1;
        }
        Ok(())
    }
}

/// In-memory registration store
#[derive(Default)]
pub struct InMemoryRegistrationRepository {
    rows: Mutex<HashMap<Uuid, Registration>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn try_insert_active(&self, registration: &Registration) -> Result<bool, String> {
        // Check and insert under one lock hold
        let mut rows = self.rows.lock().await;
        let blocked = rows.values().any(|r| {
            r.event_id() == registration.event_id()
                && r.party_key() == registration.party_key()
                && r.status().blocks_resubmission()
        });
        if blocked {
            return Ok(false);
        }
        rows.insert(registration.id(), registration.clone());
        Ok(true)
    }

    async fn save(&self, registration: &Registration) -> Result<(), String> {
        self.rows
            .lock()
            .await
            .insert(registration.id(), registration.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, String> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }
}

/// In-memory payment intent store
#[derive(Default)]
pub struct InMemoryPaymentIntentRepository {
    rows: Mutex<HashMap<Uuid, PaymentIntent>>,
}

impl InMemoryPaymentIntentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentIntentRepository for InMemoryPaymentIntentRepository {
    async fn save(&self, intent: &PaymentIntent) -> Result<(), String> {
        self.rows.lock().await.insert(intent.id(), intent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentIntent>, String> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn find_by_merchant_order_id(
        &self,
        merchant_order_id: &str,
    ) -> Result<Option<PaymentIntent>, String> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|i| i.merchant_order_id() == merchant_order_id)
            .cloned())
    }

    async fn find_outstanding_for_registration(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<PaymentIntent>, String> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|i| i.registration_id() == registration_id && !i.status().is_terminal())
            .cloned())
    }
}

/// In-memory invite store
#[derive(Default)]
pub struct InMemoryInviteRepository {
    rows: Mutex<HashMap<Uuid, Invite>>,
}

impl InMemoryInviteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InviteRepository for InMemoryInviteRepository {
    async fn save(&self, invite: &Invite) -> Result<(), String> {
        self.rows.lock().await.insert(invite.id(), invite.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, String> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|i| i.token() == token)
            .cloned())
    }

    async fn find_by_registration(&self, registration_id: Uuid) -> Result<Vec<Invite>, String> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|i| i.registration_id() == registration_id)
            .cloned()
            .collect())
    }
}

/// In-memory team directory
///
/// Stands in for the external membership service in tests.
#[derive(Default)]
pub struct InMemoryTeamDirectory {
    teams: Mutex<HashMap<Uuid, (TeamSummary, Vec<TeamMember>)>>,
}

impl InMemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_team(&self, summary: TeamSummary, members: Vec<TeamMember>) {
        self.teams
            .lock()
            .await
            .insert(summary.id, (summary, members));
    }
}

#[async_trait]
impl TeamDirectory for InMemoryTeamDirectory {
    async fn list_teams(&self, user_id: Uuid) -> Result<Vec<TeamSummary>, String> {
        Ok(self
            .teams
            .lock()
            .await
            .values()
            .filter(|(summary, members)| {
                summary.owner_id == user_id || members.iter().any(|m| m.user_id == user_id)
            })
            .map(|(summary, _)| summary.clone())
            .collect())
    }

    async fn get_team_members(&self, team_id: Uuid) -> Result<Option<Vec<TeamMember>>, String> {
        Ok(self
            .teams
            .lock()
            .await
            .get(&team_id)
            .map(|(_, members)| members.clone()))
    }

    async fn search_usernames(&self, prefix: &str) -> Result<Vec<String>, String> {
        let prefix = prefix.to_lowercase();
        let mut names: Vec<String> = self
            .teams
            .lock()
            .await
            .values()
            .flat_map(|(_, members)| members.iter())
            .filter(|m| m.username.to_lowercase().starts_with(&prefix))
            .map(|m| m.username.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
