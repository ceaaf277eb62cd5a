use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gymtrack::Error;
use gymtrack::api::ApiClient;
use gymtrack::auth::{AuthState, Role};
use gymtrack::config::ClientConfig;
use gymtrack::db::LocalStore;
use gymtrack::models::{
    Exercise, NewDropset, NewExerciseConfiguration, NewHistoryPRExercise, NewSeries, NewUserGym,
    RegisterRequest, User,
};
use gymtrack::pagination::PageQuery;
use gymtrack::session::Session;

const EMAIL: &str = "ana@example.com";

fn token_for(email: &str, role: Role, exp: Option<i64>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = json!({"sub": email, "role": role.code(), "exp": exp});
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, payload)
}

fn user_json(role: Role) -> serde_json::Value {
    json!({
        "email": EMAIL,
        "name": "Ana",
        "last_name": "Diaz",
        "role": role.code(),
        "is_verified": true
    })
}

fn config(server: &MockServer, dir: &TempDir) -> ClientConfig {
    ClientConfig {
        api_url: server.uri(),
        db_path: dir.path().join("store.sqlite3"),
        timeout: Duration::from_secs(5),
    }
}

/// A session restored from credentials already on disk, as after an
/// earlier login.
async fn restored_session(server: &MockServer, dir: &TempDir, role: Role) -> (Session, String) {
    let config = config(server, dir);
    let token = token_for(EMAIL, role, Some(4_102_444_800));
    let user: User = serde_json::from_value(user_json(role)).unwrap();
    LocalStore::open(&config.db_path)
        .unwrap()
        .save_credentials(&token, &user)
        .await
        .unwrap();

    let session = Session::from_config(&config).unwrap();
    let state = session.restore().await.unwrap();
    assert!(state.is_authenticated());
    (session, token)
}

#[tokio::test]
async fn login_persists_the_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token = token_for(EMAIL, Role::Premium, Some(4_102_444_800));

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"email": EMAIL, "password": "correct-horse"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user_data"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(Role::Premium)))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::from_config(&config(&server, &dir)).unwrap();
    let user = session.login(EMAIL, "correct-horse").await.unwrap();
    assert_eq!(user.display_name(), "Ana Diaz");
    assert_eq!(session.role().await, Some(Role::Premium));

    // A second process over the same store comes back signed in.
    let again = Session::from_config(&config(&server, &dir)).unwrap();
    match again.restore().await.unwrap() {
        AuthState::Authenticated(u) => {
            assert_eq!(u.email, EMAIL);
            assert_eq!(u.role, Role::Premium);
            assert_eq!(u.token, token);
        }
        AuthState::Unauthenticated => panic!("session was not restored"),
    }
    assert_eq!(again.cached_user().await.unwrap(), Some(user));
}

#[tokio::test]
async fn invalid_login_form_never_reaches_the_backend() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let session = Session::from_config(&config(&server, &dir)).unwrap();

    match session.login("not-an-email", "").await {
        Err(Error::Validation(errors)) => {
            assert!(errors.get("email").is_some());
            assert!(errors.get("password").is_some());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn expired_token_is_dropped_on_restore() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);
    let store = LocalStore::open(&config.db_path).unwrap();
    let user: User = serde_json::from_value(user_json(Role::Logued)).unwrap();
    store
        .save_credentials(&token_for(EMAIL, Role::Logued, Some(1_000)), &user)
        .await
        .unwrap();

    let session = Session::from_config(&config).unwrap();
    assert_eq!(session.restore().await.unwrap(), AuthState::Unauthenticated);
    assert_eq!(store.token().await.unwrap(), None);
    assert_eq!(store.user().await.unwrap(), None);
}

#[tokio::test]
async fn unauthorized_response_clears_stored_credentials() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("GET"))
        .and(path("/user_data"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert!(matches!(session.verify().await, Err(Error::Unauthorized)));
    assert_eq!(session.state().await, AuthState::Unauthenticated);
    assert_eq!(session.api().token(), None);
    assert_eq!(session.store().token().await.unwrap(), None);
    assert_eq!(session.store().user().await.unwrap(), None);
}

#[tokio::test]
async fn list_all_follows_the_page_envelope() {
    let server = MockServer::start().await;
    let exercise = |id: i64, name: &str| json!({"id": id, "name": name, "description": ""});

    Mock::given(method("GET"))
        .and(path("/exercise"))
        .and(query_param("page", "1"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [exercise(1, "Bench press"), exercise(2, "Squat")],
            "total": 3, "page": 1, "size": 2, "pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/exercise"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [exercise(3, "Deadlift")],
            "total": 3, "page": 2, "size": 2, "pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&ClientConfig {
        api_url: server.uri(),
        ..ClientConfig::default()
    })
    .unwrap();
    let all: Vec<Exercise> = api.list_all(&PageQuery::new(1, 2)).await.unwrap();
    let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bench press", "Squat", "Deadlift"]);
}

#[tokio::test]
async fn error_detail_is_surfaced() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let session = Session::from_config(&config(&server, &dir)).unwrap();
    let form = RegisterRequest {
        email: EMAIL.into(),
        name: "Ana".into(),
        last_name: "Diaz".into(),
        password: "long enough".into(),
        password_confirmation: "long enough".into(),
        phone: None,
    };
    match session.register(&form).await {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Email already registered");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn exercise_configuration_is_sent_and_read_without_coercion() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("PUT"))
        .and(path("/exercise_configuration/9"))
        .and(body_json(json!({
            "exercise_id": 3,
            "workout_day_exercise_id": 5,
            "sets": 4,
            "reps_high": 12,
            "reps_low": 8,
            "rest": 75,
            "notes": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "exercise_id": 3,
            "workout_day_exercise_id": 5,
            "sets": 4,
            "repsHigh": 12,
            "repsLow": 8,
            "rest": 75
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = NewExerciseConfiguration {
        exercise_id: 3,
        workout_day_exercise_id: Some(5),
        sets: 4,
        reps_high: 12,
        reps_low: 8,
        rest: 75,
        notes: None,
    };
    let saved = session
        .update_exercise_configuration(9, &update)
        .await
        .unwrap();
    assert_eq!(
        (saved.sets, saved.reps_high, saved.reps_low, saved.rest),
        (4, 12, 8, 75)
    );
    assert_eq!(NewExerciseConfiguration::from(&saved), update);
}

#[tokio::test]
async fn logging_a_session_posts_the_tree_top_down() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("POST"))
        .and(path("/history_pr_exercise"))
        .and(body_partial_json(json!({
            "exercise_id": 3,
            "user_email": EMAIL,
            "date": "2025-06-01"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "exercise_id": 3, "user_email": EMAIL, "date": "2025-06-01"
        })))
        .expect(1)
        .mount(&server)
        .await;
    for (order, id, reps, weight) in [(1, 21, 5, 100.0), (2, 22, 5, 102.5)] {
        Mock::given(method("POST"))
            .and(path("/series_pr_exercise"))
            .and(body_partial_json(json!({"history_pr_exercise_id": 10, "order": order})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id, "history_pr_exercise_id": 10, "order": order,
                "reps": reps, "weight": weight
            })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/dropset_pr_exercise"))
        .and(body_partial_json(json!({"series_pr_exercise_id": 21, "order": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "series_pr_exercise_id": 21, "order": 1, "reps": 8, "weight": 80.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let new = NewHistoryPRExercise {
        exercise_id: 3,
        // Replaced by the signed-in user's email.
        user_email: "someone-else@example.com".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        notes: None,
        series: vec![
            NewSeries {
                reps: 5,
                weight: 100.0,
                rpe: None,
                dropsets: vec![NewDropset { reps: 8, weight: 80.0 }],
            },
            NewSeries {
                reps: 5,
                weight: 102.5,
                ..NewSeries::default()
            },
        ],
    };
    let logged = session.log_session(&new).await.unwrap();
    assert_eq!(logged.id, 10);
    let ids: Vec<i64> = logged.series.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![21, 22]);
    assert_eq!(logged.series[0].dropsets.len(), 1);
    assert_eq!(logged.series[0].dropsets[0].id, 31);
}

#[tokio::test]
async fn premium_membership_reports_a_failed_role_update() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Gym).await;
    let member = "bob@example.com";

    Mock::given(method("POST"))
        .and(path("/user_gym"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "user_email": member, "gym_id": 2,
            "start_date": "2025-06-01", "end_date": "2025-12-01",
            "is_premium": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/user/{}", member)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": member, "role": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/user/user_role/{}", member)))
        .and(body_json(json!({"role": 2})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let membership = NewUserGym {
        user_email: member.into(),
        gym_id: 2,
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        is_premium: true,
        can_edit_routines: false,
        can_manage_members: false,
    };
    match session.grant_membership(&membership).await {
        Err(Error::PartialFailure { completed, source }) => {
            assert_eq!(completed, "gym membership");
            assert!(matches!(*source, Error::Http { status: 500, .. }));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn role_gate_stops_requests_below_the_required_role() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Premium).await;

    match session.my_gyms().await {
        Err(Error::Forbidden { required, actual }) => {
            assert_eq!(required, Role::Gym);
            assert_eq!(actual, Role::Premium);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn logout_cancels_in_flight_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("GET"))
        .and(path("/history_pr_exercise"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(json!({"items": [], "total": 0, "page": 1, "size": 50, "pages": 0})),
        )
        .mount(&server)
        .await;

    let (history, logout) = tokio::join!(session.exercise_history(3), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.logout().await
    });
    logout.unwrap();
    assert!(matches!(history, Err(Error::Cancelled)));
    assert_eq!(session.state().await, AuthState::Unauthenticated);
}

#[tokio::test]
async fn expired_session_while_logging_sets_is_reported_as_unauthorized() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("POST"))
        .and(path("/history_pr_exercise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11, "exercise_id": 3, "user_email": EMAIL, "date": "2025-06-02"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/series_pr_exercise"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let new = NewHistoryPRExercise {
        exercise_id: 3,
        user_email: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        notes: None,
        series: vec![NewSeries {
            reps: 5,
            weight: 100.0,
            ..NewSeries::default()
        }],
    };
    let err = session.log_session(&new).await.unwrap_err();
    assert!(err.is_unauthorized(), "got {err:?}");
    assert_eq!(session.state().await, AuthState::Unauthenticated);
    assert_eq!(session.store().token().await.unwrap(), None);
}

#[tokio::test]
async fn history_sets_come_back_in_performed_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (session, _) = restored_session(&server, &dir, Role::Logued).await;

    Mock::given(method("GET"))
        .and(path("/history_pr_exercise"))
        .and(query_param("exercise_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 10, "exercise_id": 3, "user_email": EMAIL, "date": "2025-06-01",
                "series": [
                    {"id": 22, "order": 2, "reps": 5, "weight": 102.5},
                    {"id": 21, "order": 1, "reps": 5, "weight": 100.0, "dropsets": [
                        {"id": 32, "order": 2, "reps": 10, "weight": 60.0},
                        {"id": 31, "order": 1, "reps": 8, "weight": 80.0}
                    ]}
                ]
            }],
            "total": 1, "page": 1, "size": 50, "pages": 1
        })))
        .mount(&server)
        .await;

    let history = session.exercise_history(3).await.unwrap();
    let series: Vec<i64> = history[0].series.iter().map(|s| s.id).collect();
    assert_eq!(series, vec![21, 22]);
    let dropsets: Vec<i64> = history[0].series[0].dropsets.iter().map(|d| d.id).collect();
    assert_eq!(dropsets, vec![31, 32]);
}
