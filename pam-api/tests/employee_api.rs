use rocket::http::{Cookie, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use pam_api::models::Employee;
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

async fn create_employee(client: &Client, admin: &Cookie<'static>, body: Value) -> Employee {
    let response = client
        .post("/api/1/Employees")
        .cookie(admin.clone())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid employee JSON")
}

async fn list_names(client: &Client, cookie: &Cookie<'static>, query: &str) -> Vec<String> {
    let response = client
        .get(format!("/api/1/Employees{}", query))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    body["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

#[rocket::async_test]
async fn test_employee_crud() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;

    let created = create_employee(&client, &admin, json!({ "name": "  Maria Souza " })).await;
    assert_eq!(created.name, "Maria Souza");
    assert_eq!(created.sector.as_str(), "INSS");

    let response = client
        .get(format!("/api/1/Employees/{}", created.id))
        .cookie(admin.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .put(format!("/api/1/Employees/{}", created.id))
        .cookie(admin.clone())
        .json(&json!({ "sector": "SIAPE_DION" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Employee = response.into_json().await.unwrap();
    assert_eq!(updated.name, "Maria Souza");
    assert_eq!(updated.sector.as_str(), "SIAPE_DION");

    let response = client
        .delete(format!("/api/1/Employees/{}", created.id))
        .cookie(admin.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/1/Employees/{}", created.id))
        .cookie(admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(
        body["error"],
        format!("Employee with ID {} not found", created.id)
    );
}

#[rocket::async_test]
async fn test_employee_name_validation() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;

    let too_long = "x".repeat(101);
    for name in ["", "   ", too_long.as_str()] {
        let response = client
            .post("/api/1/Employees")
            .cookie(admin.clone())
            .json(&json!({ "name": name }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "name {:?}", name);
    }

    let response = client
        .post("/api/1/Employees")
        .cookie(admin.clone())
        .json(&json!({ "name": "Ana", "sector": "RH" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[rocket::async_test]
async fn test_employee_list_filters() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;

    create_employee(&client, &admin, json!({ "name": "Carla Dias" })).await;
    create_employee(
        &client,
        &admin,
        json!({ "name": "Ana Lima", "sector": "ESTAGIO" }),
    )
    .await;
    create_employee(
        &client,
        &admin,
        json!({ "name": "Bruno Lima", "sector": "ESTAGIO" }),
    )
    .await;

    assert_eq!(
        list_names(&client, &staff, "").await,
        vec!["Ana Lima", "Bruno Lima", "Carla Dias"]
    );
    assert_eq!(
        list_names(&client, &staff, "?search=lima").await,
        vec!["Ana Lima", "Bruno Lima"]
    );
    assert_eq!(
        list_names(&client, &staff, "?sector=INSS").await,
        vec!["Carla Dias"]
    );
    assert_eq!(
        list_names(&client, &staff, "?search=ana&sector=ESTAGIO").await,
        vec!["Ana Lima"]
    );

    let response = client
        .get("/api/1/Employees?sector=RH")
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_staff_cannot_modify_employees() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let ana = create_employee(&client, &admin, json!({ "name": "Ana" })).await;

    let response = client
        .post("/api/1/Employees")
        .cookie(staff.clone())
        .json(&json!({ "name": "Bia" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .put(format!("/api/1/Employees/{}", ana.id))
        .cookie(staff.clone())
        .json(&json!({ "name": "Ana Maria" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .delete(format!("/api/1/Employees/{}", ana.id))
        .cookie(staff.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client.get("/api/1/Employees").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_delete_employee_releases_workstation() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let ana = create_employee(&client, &admin, json!({ "name": "Ana" })).await;

    let response = client
        .post("/api/1/Workstations")
        .cookie(admin.clone())
        .json(&json!({ "category": "INSS", "employee_id": ana.id }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let ws: Value = response.into_json().await.unwrap();
    assert_eq!(ws["status"], "OCCUPIED");

    let response = client
        .delete(format!("/api/1/Employees/{}", ana.id))
        .cookie(admin.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/1/Workstations/{}", ws["id"]))
        .cookie(admin)
        .dispatch()
        .await;
    let ws: Value = response.into_json().await.unwrap();
    assert_eq!(ws["status"], "UNOCCUPIED");
    assert!(ws["employee_id"].is_null());
}

#[rocket::async_test]
async fn test_employee_position_history() {
    let client = Client::untracked(test_rocket()).await.unwrap();
    let admin = login(&client, "superuser", "superpass").await;
    let staff = login(&client, "staff", "staffpass").await;
    let ana = create_employee(&client, &admin, json!({ "name": "Ana" })).await;

    let mut ws_ids = Vec::new();
    for _ in 0..2 {
        let response = client
            .post("/api/1/Workstations")
            .cookie(admin.clone())
            .json(&json!({ "category": "INSS" }))
            .dispatch()
            .await;
        let ws: Value = response.into_json().await.unwrap();
        ws_ids.push(ws["id"].as_i64().unwrap());
    }

    for ws_id in &ws_ids {
        let response = client
            .put(format!("/api/1/Workstations/{}", ws_id))
            .cookie(admin.clone())
            .json(&json!({ "employee_id": ana.id }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    let response = client
        .get(format!("/api/1/Employees/{}/PositionHistory", ana.id))
        .cookie(staff.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    let history = body["value"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["workstation_id"], ws_ids[1]);

    let response = client
        .get("/api/1/Employees/9999/PositionHistory")
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}
