//! HTTP surface tests
//!
//! Drives the router exactly as a client would, with in-memory
//! repositories and the scripted gateway behind the ledger.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use arena_api::api::handlers::{events, invites, registrations, teams};
use arena_api::api::AppState;
use arena_api::domain::event::{Event, GameMode};
use arena_api::domain::payment::PaymentStatus;
use arena_api::domain::repositories::{InviteRepository, TeamMember, TeamSummary};
use arena_api::domain::roster::Email;
use arena_api::infrastructure::gateway::MockPaymentGateway;
use arena_api::infrastructure::repositories::{
    InMemoryEventRepository, InMemoryInviteRepository, InMemoryPaymentIntentRepository,
    InMemoryRegistrationRepository, InMemoryTeamDirectory,
};
use arena_api::orchestration::gateway::PaymentStatusResponse;
use arena_api::orchestration::{PollConfig, RegistrationLedger};

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(events::health_check))
        .route("/api/events/:id", get(events::get_event))
        .route("/api/users/:user_id/teams", get(teams::list_teams))
        .route("/api/users/search", get(teams::search_usernames))
        .route("/api/invites/:token", get(invites::get_invite))
        .route(
            "/api/events/:event_id/registrations",
            post(registrations::submit_registration),
        )
        .route(
            "/api/registrations/:id",
            get(registrations::get_registration_status),
        )
        .route(
            "/api/registrations/:id/checkout-signal",
            post(registrations::checkout_signal),
        )
        .route(
            "/api/registrations/:id/reconcile",
            post(registrations::reconcile_registration),
        )
        .route(
            "/api/registrations/:id/reconciliation",
            delete(registrations::cancel_reconciliation),
        )
        .with_state(state)
}

struct TestApp {
    app: Router,
    event_id: Uuid,
    gateway: Arc<MockPaymentGateway>,
    teams: Arc<InMemoryTeamDirectory>,
    invites: Arc<InMemoryInviteRepository>,
}

async fn setup_with(event: Event, gateway: MockPaymentGateway) -> TestApp {
    let events = Arc::new(InMemoryEventRepository::new());
    let teams = Arc::new(InMemoryTeamDirectory::new());
    let invites = Arc::new(InMemoryInviteRepository::new());
    let gateway = Arc::new(gateway);
    let event_id = event.id;
    events.insert(event).await;

    let ledger = Arc::new(RegistrationLedger::new(
        events.clone(),
        Arc::new(InMemoryRegistrationRepository::new()),
        Arc::new(InMemoryPaymentIntentRepository::new()),
        invites.clone(),
        teams.clone(),
        gateway.clone(),
        PollConfig::default(),
    ));

    let app = build_app(AppState {
        ledger,
        events,
        teams: teams.clone(),
        invites: invites.clone(),
    });

    TestApp {
        app,
        event_id,
        gateway,
        teams,
        invites,
    }
}

async fn setup(event: Event) -> (Router, Uuid) {
    let t = setup_with(event, MockPaymentGateway::embedded()).await;
    (t.app, t.event_id)
}

fn free_squad_event() -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::new_v4(),
        title: "Autumn Open".to_string(),
        game_mode: GameMode::Squad,
        entry_fee: Decimal::ZERO,
        registration_opens_at: now - Duration::hours(1),
        registration_closes_at: now + Duration::hours(1),
        max_participants: 16,
        current_participants: 0,
    }
}

fn paid_solo_event() -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::new_v4(),
        title: "Cup Qualifier".to_string(),
        game_mode: GameMode::Solo,
        entry_fee: Decimal::from(50),
        registration_opens_at: now - Duration::hours(1),
        registration_closes_at: now + Duration::hours(1),
        max_participants: 8,
        current_participants: 0,
    }
}

fn submit_body(emails: &[&str]) -> Value {
    json!({
        "captain_user_id": Uuid::new_v4(),
        "captain_email": "captain@example.com",
        "roster": {
            "mode": "new_team",
            "team_name": "Night Owls",
            "teammate_emails": emails,
        }
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let (app, _) = setup(free_squad_event()).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_event_exposes_required_players() {
    let event = free_squad_event();
    let (app, event_id) = setup(event).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/events/{}", event_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["game_mode"], "squad");
    assert_eq!(body["required_players"], 4);
    assert_eq!(body["max_participants"], 16);
}

#[tokio::test]
async fn get_unknown_event_returns_404() {
    let (app, _) = setup(free_squad_event()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/events/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_free_registration_confirms_immediately() {
    let (app, event_id) = setup(free_squad_event()).await;

    let body = submit_body(&["a@example.com", "b@example.com", "c@example.com"]);
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/events/{}/registrations", event_id),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["requires_payment"], false);
    assert!(body.get("checkout").is_none());

    // The status endpoint agrees
    let registration_id = body["registration_id"].as_str().unwrap().to_string();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/registrations/{}", registration_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "confirmed");
    assert!(body.get("reason").is_none());
}

#[tokio::test]
async fn undersized_roster_is_rejected_with_400() {
    let (app, event_id) = setup(free_squad_event()).await;

    // Squad needs captain plus three, only one invite given
    let body = submit_body(&["a@example.com"]);
    let response = app
        .oneshot(post_json(
            &format!("/api/events/{}/registrations", event_id),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_submission_is_rejected_with_409() {
    let (app, event_id) = setup(free_squad_event()).await;
    let uri = format!("/api/events/{}/registrations", event_id);
    let body = submit_body(&["a@example.com", "b@example.com", "c@example.com"]);

    let first = app.clone().oneshot(post_json(&uri, &body)).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same captain, same ad-hoc party
    let second = app.oneshot(post_json(&uri, &body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_registration_status_returns_404() {
    let (app, _) = setup(free_squad_event()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/registrations/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_cancel_signal_fails_a_pending_registration() {
    let (app, event_id) = setup(paid_solo_event()).await;

    let body = submit_body(&[]);
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/events/{}/registrations", event_id),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["checkout"]["kind"], "embedded");
    let registration_id = body["registration_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/registrations/{}/checkout-signal", registration_id),
            &json!({ "signal": "user_cancel" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["reason"], "user_cancelled");

    // A second cancel has nothing to act on
    let response = app
        .oneshot(post_json(
            &format!("/api/registrations/{}/checkout-signal", registration_id),
            &json!({ "signal": "user_cancel" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test(start_paused = true)]
async fn redirect_flow_completes_via_reconcile_endpoint() {
    let t = setup_with(paid_solo_event(), MockPaymentGateway::redirect()).await;

    let body = submit_body(&[]);
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/api/events/{}/registrations", t.event_id),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["checkout"]["kind"], "redirect");
    assert!(body["checkout"]["redirect_url"].as_str().is_some());
    let registration_id = body["registration_id"].as_str().unwrap().to_string();

    // No checkout signal arrives on the redirect flow; the user comes
    // back and reconciliation runs on demand
    let reg_uuid: Uuid = registration_id.parse().unwrap();
    t.gateway.queue_status(PaymentStatusResponse {
        status: PaymentStatus::Completed,
        registration_id: Some(reg_uuid),
    });

    let response = t
        .app
        .oneshot(post_json(
            &format!("/api/registrations/{}/reconcile", registration_id),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn listing_teams_returns_the_users_teams() {
    let t = setup_with(free_squad_event(), MockPaymentGateway::embedded()).await;

    let owner_id = Uuid::new_v4();
    t.teams
        .insert_team(
            TeamSummary {
                id: Uuid::new_v4(),
                name: "Harbor Rats".to_string(),
                owner_id,
            },
            vec![TeamMember {
                user_id: Uuid::new_v4(),
                username: "pyro".to_string(),
                email: Email::new("pyro@example.com").unwrap(),
            }],
        )
        .await;

    let response = t
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/users/{}/teams", owner_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Harbor Rats");
}

#[tokio::test]
async fn username_search_matches_prefix() {
    let t = setup_with(free_squad_event(), MockPaymentGateway::embedded()).await;

    t.teams
        .insert_team(
            TeamSummary {
                id: Uuid::new_v4(),
                name: "Harbor Rats".to_string(),
                owner_id: Uuid::new_v4(),
            },
            vec![
                TeamMember {
                    user_id: Uuid::new_v4(),
                    username: "pyro".to_string(),
                    email: Email::new("pyro@example.com").unwrap(),
                },
                TeamMember {
                    user_id: Uuid::new_v4(),
                    username: "zephyr".to_string(),
                    email: Email::new("zephyr@example.com").unwrap(),
                },
            ],
        )
        .await;

    let response = t
        .app
        .oneshot(
            Request::builder()
                .uri("/api/users/search?prefix=py")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body, json!(["pyro"]));
}

#[tokio::test]
async fn invite_lookup_by_token() {
    let t = setup_with(free_squad_event(), MockPaymentGateway::embedded()).await;

    let body = submit_body(&["a@example.com", "b@example.com", "c@example.com"]);
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/api/events/{}/registrations", t.event_id),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let registration_id: Uuid = body["registration_id"].as_str().unwrap().parse().unwrap();

    let issued = t.invites.find_by_registration(registration_id).await.unwrap();
    let token = issued[0].token().to_string();

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/invites/{}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["team_name"], "Night Owls");

    // Unknown tokens yield 404
    let response = t
        .app
        .oneshot(
            Request::builder()
                .uri("/api/invites/no-such-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_without_live_reconciliation_reports_false() {
    let (app, _) = setup(free_squad_event()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/registrations/{}/reconciliation", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["cancelled"], false);
}
