use rocket::http::{Cookie, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use pam_api::orm::testing::test_rocket;

async fn login(client: &Client, username: &str, password: &str) -> (Cookie<'static>, i64) {
    let response = client
        .post("/api/1/login")
        .json(&json!({ "username": username, "password": password }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let cookie = response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned();
    let body: Value = response.into_json().await.unwrap();
    (cookie, body["user_id"].as_i64().unwrap())
}

async fn changes(client: &Client, cookie: &Cookie<'static>, query: &str) -> Vec<Value> {
    let response = client
        .get(format!("/api/1/ChangeLogs{}", query))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok, "query {}", query);
    let body: Value = response.into_json().await.unwrap();
    body["value"].as_array().unwrap().clone()
}

/// Employee create, room create, employee update and workstation create.
async fn record_some_changes(client: &Client, admin: &Cookie<'static>) -> i64 {
    let response = client
        .post("/api/1/Employees")
        .cookie(admin.clone())
        .json(&json!({ "name": "Ana Lima" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let employee: Value = response.into_json().await.unwrap();
    let employee_id = employee["id"].as_i64().unwrap();

    let response = client
        .post("/api/1/Rooms")
        .cookie(admin.clone())
        .json(&json!({ "name": "101" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let response = client
        .put(format!("/api/1/Employees/{}", employee_id))
        .cookie(admin.clone())
        .json(&json!({ "sector": "SIAPE_LEO" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post("/api/1/Workstations")
        .cookie(admin.clone())
        .json(&json!({ "category": "SIAPE_LEO", "employee_id": employee_id }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    employee_id
}

#[rocket::async_test]
async fn test_change_logs_require_superuser() {
    let client = Client::untracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/ChangeLogs").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let (staff, _) = login(&client, "staff", "staffpass").await;
    let response = client
        .get("/api/1/ChangeLogs")
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn test_mutations_are_logged_newest_first() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let (admin, admin_id) = login(&client, "superuser", "superpass").await;
    let employee_id = record_some_changes(&client, &admin).await;

    let all = changes(&client, &admin, "").await;
    let kinds: Vec<(&str, &str)> = all
        .iter()
        .map(|c| {
            (
                c["entity_type"].as_str().unwrap(),
                c["action_type"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("WORKSTATION", "CREATE"),
            ("EMPLOYEE", "UPDATE"),
            ("ROOM", "CREATE"),
            ("EMPLOYEE", "CREATE"),
        ]
    );

    for change in &all {
        assert_eq!(change["username"], "superuser");
        assert_eq!(change["user_id"], admin_id);
    }
    assert_eq!(all[0]["entity_name"], "PA SIAPE_LEO-1 - Ana Lima");
    assert_eq!(all[1]["entity_id"], employee_id);
    assert_eq!(all[3]["entity_name"], "Ana Lima");
}

#[rocket::async_test]
async fn test_change_log_filters() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let (admin, admin_id) = login(&client, "superuser", "superpass").await;
    let employee_id = record_some_changes(&client, &admin).await;

    assert_eq!(changes(&client, &admin, "?entity_type=EMPLOYEE").await.len(), 2);
    assert_eq!(changes(&client, &admin, "?action=CREATE").await.len(), 3);
    assert_eq!(
        changes(&client, &admin, "?entity_type=ROOM&action=UPDATE")
            .await
            .len(),
        0
    );

    let by_entity = format!("?entity_type=EMPLOYEE&entity_id={}", employee_id);
    let history = changes(&client, &admin, &by_entity).await;
    assert_eq!(history[0]["action_type"], "UPDATE");
    assert_eq!(history[1]["action_type"], "CREATE");

    let by_user = format!("?user_id={}", admin_id);
    assert_eq!(changes(&client, &admin, &by_user).await.len(), 4);
    assert!(changes(&client, &admin, "?user_id=9999").await.is_empty());

    let latest = changes(&client, &admin, "?limit=1").await;
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0]["entity_type"], "WORKSTATION");
}

#[rocket::async_test]
async fn test_invalid_change_log_filters() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let (admin, _) = login(&client, "superuser", "superpass").await;

    for query in ["?entity_type=PRINTER", "?action=RENAME", "?limit=0", "?limit=-1"] {
        let response = client
            .get(format!("/api/1/ChangeLogs{}", query))
            .cookie(admin.clone())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "query {}", query);
        let body: Value = response.into_json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid"));
    }
}

#[rocket::async_test]
async fn test_failed_mutation_leaves_no_log() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let (admin, _) = login(&client, "superuser", "superpass").await;

    let response = client
        .post("/api/1/Workstations")
        .cookie(admin.clone())
        .json(&json!({ "employee_id": 9999 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    assert!(changes(&client, &admin, "").await.is_empty());
}
