use rocket::http::{Cookie, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use pam_api::orm::testing::test_rocket;

async fn login(client: &Client, username: &str, password: &str) -> Cookie<'static> {
    let response = client
        .post("/api/1/login")
        .json(&json!({ "username": username, "password": password }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned()
}

async fn create_employee(client: &Client, admin: &Cookie<'static>, name: &str) -> i64 {
    let response = client
        .post("/api/1/Employees")
        .cookie(admin.clone())
        .json(&json!({ "name": name }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: Value = response.into_json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_workstation(client: &Client, admin: &Cookie<'static>, body: Value) -> Value {
    let response = client
        .post("/api/1/Workstations")
        .cookie(admin.clone())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.unwrap()
}

async fn get_workstation(client: &Client, cookie: &Cookie<'static>, id: i64) -> Value {
    let response = client
        .get(format!("/api/1/Workstations/{}", id))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.unwrap()
}

async fn count_workstations(client: &Client, cookie: &Cookie<'static>, query: &str) -> usize {
    let response = client
        .get(format!("/api/1/Workstations{}", query))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok, "query {}", query);
    let body: Value = response.into_json().await.unwrap();
    body["value"].as_array().unwrap().len()
}

#[rocket::async_test]
async fn test_sequences_per_category() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;

    let a = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let b = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let c = create_workstation(&client, &admin, json!({})).await;

    assert_eq!(a["sequence"], 1);
    assert_eq!(b["sequence"], 2);
    assert_eq!(c["category"], "ESTAGIO");
    assert_eq!(c["sequence"], 1);
    assert_eq!(c["status"], "UNOCCUPIED");
    assert_eq!(c["monitor"], true);
    assert_eq!(c["headset"], true);
}

#[rocket::async_test]
async fn test_status_derivation_on_update() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let ana = create_employee(&client, &admin, "Ana").await;
    let ws = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let url = format!("/api/1/Workstations/{}", ws["id"]);

    let cases = [
        (json!({ "employee_id": ana }), "OCCUPIED"),
        (json!({ "headset": false, "mousepad": false }), "OCCUPIED"),
        (json!({ "mouse": false }), "MAINTENANCE"),
        // Manual maintenance survives once peripherals are back
        (json!({ "mouse": true }), "MAINTENANCE"),
        (json!({ "status": "OCCUPIED" }), "OCCUPIED"),
        (json!({ "employee_id": null }), "UNOCCUPIED"),
        (json!({ "monitor": false }), "UNOCCUPIED"),
    ];

    for (body, expected) in cases {
        let response = client
            .put(&url)
            .cookie(admin.clone())
            .json(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok, "body {}", body);
        let saved: Value = response.into_json().await.unwrap();
        assert_eq!(saved["status"], expected, "body {}", body);
    }
}

#[rocket::async_test]
async fn test_maintenance_override_keeps_employee() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let ana = create_employee(&client, &admin, "Ana").await;
    let ws = create_workstation(
        &client,
        &admin,
        json!({ "category": "INSS", "employee_id": ana }),
    )
    .await;

    let response = client
        .put(format!("/api/1/Workstations/{}", ws["id"]))
        .cookie(admin.clone())
        .json(&json!({ "status": "MAINTENANCE" }))
        .dispatch()
        .await;
    let saved: Value = response.into_json().await.unwrap();
    assert_eq!(saved["status"], "MAINTENANCE");
    assert_eq!(saved["employee_id"], ana);
}

#[rocket::async_test]
async fn test_maintenance_override_on_empty_workstation() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let ws = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let id = ws["id"].as_i64().unwrap();

    // An empty desk can be flagged for repair explicitly
    let response = client
        .put(format!("/api/1/Workstations/{}", id))
        .cookie(admin.clone())
        .json(&json!({ "status": "MAINTENANCE" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let stored = get_workstation(&client, &admin, id).await;
    assert_eq!(stored["status"], "MAINTENANCE");
    assert_eq!(stored["employee_id"], Value::Null);

    // The next ordinary save derives the status again
    let response = client
        .put(format!("/api/1/Workstations/{}", id))
        .cookie(admin.clone())
        .json(&json!({ "headset": false }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let stored = get_workstation(&client, &admin, id).await;
    assert_eq!(stored["status"], "UNOCCUPIED");
    assert_eq!(stored["employee_id"], Value::Null);
}

#[rocket::async_test]
async fn test_unknown_references_rejected() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;

    let response = client
        .post("/api/1/Workstations")
        .cookie(admin.clone())
        .json(&json!({ "employee_id": 9999 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let ws = create_workstation(&client, &admin, json!({})).await;
    let response = client
        .put(format!("/api/1/Workstations/{}", ws["id"]))
        .cookie(admin.clone())
        .json(&json!({ "island_id": 9999 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .put("/api/1/Workstations/9999")
        .cookie(admin)
        .json(&json!({ "monitor": false }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_category_change_collision() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let estagio = create_workstation(&client, &admin, json!({ "category": "ESTAGIO" })).await;

    let response = client
        .put(format!("/api/1/Workstations/{}", estagio["id"]))
        .cookie(admin)
        .json(&json!({ "category": "INSS" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}

#[rocket::async_test]
async fn test_toggle_peripheral() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let ana = create_employee(&client, &admin, "Ana").await;
    let ws = create_workstation(
        &client,
        &admin,
        json!({ "category": "INSS", "employee_id": ana }),
    )
    .await;

    let response = client
        .post(format!("/api/1/Workstations/{}/toggle/keyboard", ws["id"]))
        .cookie(staff.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let saved: Value = response.into_json().await.unwrap();
    assert_eq!(saved["keyboard"], false);
    assert_eq!(saved["status"], "MAINTENANCE");

    let response = client
        .post(format!("/api/1/Workstations/{}/toggle/headset", ws["id"]))
        .cookie(staff.clone())
        .dispatch()
        .await;
    let saved: Value = response.into_json().await.unwrap();
    assert_eq!(saved["headset"], false);
    assert_eq!(saved["keyboard"], false);

    let response = client
        .post(format!("/api/1/Workstations/{}/toggle/printer", ws["id"]))
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_batch_update_is_atomic() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let ana = create_employee(&client, &admin, "Ana").await;
    let bruno = create_employee(&client, &admin, "Bruno").await;
    let first = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    let second = create_workstation(&client, &admin, json!({ "category": "INSS" })).await;

    let response = client
        .put("/api/1/Workstations")
        .cookie(staff.clone())
        .json(&json!([
            { "id": first["id"], "employee_id": ana },
            { "id": second["id"], "employee_id": bruno, "mouse": false }
        ]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    let statuses: Vec<&str> = body["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ws| ws["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["OCCUPIED", "MAINTENANCE"]);

    // The second item fails, so the first is rolled back too
    let response = client
        .put("/api/1/Workstations")
        .cookie(staff.clone())
        .json(&json!([
            { "id": first["id"], "employee_id": null },
            { "id": 9999, "employee_id": ana }
        ]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let unchanged = get_workstation(&client, &staff, first["id"].as_i64().unwrap()).await;
    assert_eq!(unchanged["employee_id"], ana);
    assert_eq!(unchanged["status"], "OCCUPIED");
}

#[rocket::async_test]
async fn test_list_workstation_filters() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let carla = create_employee(&client, &admin, "Carla Dias").await;

    let response = client
        .post("/api/1/Rooms")
        .cookie(admin.clone())
        .json(&json!({ "name": "101" }))
        .dispatch()
        .await;
    let room: Value = response.into_json().await.unwrap();
    let response = client
        .post("/api/1/Islands")
        .cookie(admin.clone())
        .json(&json!({ "room_id": room["id"], "island_number": 1 }))
        .dispatch()
        .await;
    let island: Value = response.into_json().await.unwrap();

    create_workstation(
        &client,
        &admin,
        json!({ "category": "INSS", "employee_id": carla, "island_id": island["id"] }),
    )
    .await;
    create_workstation(&client, &admin, json!({ "category": "INSS" })).await;
    create_workstation(&client, &admin, json!({ "category": "SIAPE_LEO" })).await;

    assert_eq!(count_workstations(&client, &staff, "").await, 3);
    assert_eq!(count_workstations(&client, &staff, "?category=INSS").await, 2);
    assert_eq!(count_workstations(&client, &staff, "?status=OCCUPIED").await, 1);
    assert_eq!(
        count_workstations(&client, &staff, "?status=UNOCCUPIED&category=INSS").await,
        1
    );
    assert_eq!(count_workstations(&client, &staff, "?search=carla").await, 1);
    // A literal percent sign matches nobody instead of everybody
    assert_eq!(count_workstations(&client, &staff, "?search=%25").await, 0);
    let by_room = format!("?room={}", room["id"]);
    assert_eq!(count_workstations(&client, &staff, &by_room).await, 1);

    let response = client
        .get("/api/1/Workstations?status=BROKEN")
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_delete_workstation() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let ws = create_workstation(&client, &admin, json!({})).await;
    let url = format!("/api/1/Workstations/{}", ws["id"]);

    let response = client.delete(&url).cookie(staff).dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client.delete(&url).cookie(admin.clone()).dispatch().await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client.delete(&url).cookie(admin).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_workstation_position_history() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let ana = create_employee(&client, &admin, "Ana").await;
    let bruno = create_employee(&client, &admin, "Bruno").await;
    let ws = create_workstation(
        &client,
        &admin,
        json!({ "category": "INSS", "employee_id": ana }),
    )
    .await;

    let response = client
        .put(format!("/api/1/Workstations/{}", ws["id"]))
        .cookie(admin.clone())
        .json(&json!({ "employee_id": bruno }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get(format!("/api/1/Workstations/{}/PositionHistory", ws["id"]))
        .cookie(admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    let history = body["value"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["employee_id"], bruno);
    assert!(history[0]["end_time"].is_null());
    assert_eq!(history[1]["employee_id"], ana);
    assert!(history[1]["end_time"].is_string());
}
