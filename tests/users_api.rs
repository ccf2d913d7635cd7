use actix_web::{http::header, test, web, App};
use serde_json::json;
use store_server::{api, AppState, Settings};

fn test_state() -> AppState {
    AppState::in_memory(Settings::new_for_test().expect("Failed to load test config"))
}

#[actix_web::test]
async fn test_create_get_delete_round_trip() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(api::configure),
    )
    .await;

    let create = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": "grace" }))
        .send_request(&app)
        .await;
    assert_eq!(create.status(), 201);

    let location = create
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(location.starts_with("/api/users/"));

    let echoed: serde_json::Value = test::read_body_json(create).await;
    assert_eq!(echoed, json!({ "name": "grace" }));

    let get = test::TestRequest::get().uri(&location).send_request(&app).await;
    assert_eq!(get.status(), 200);
    let user: serde_json::Value = test::read_body_json(get).await;
    assert_eq!(user["userName"], "grace");
    assert_eq!(user["emailConfirmed"], false);
    assert!(user.get("passwordHash").is_none());

    let delete = test::TestRequest::delete().uri(&location).send_request(&app).await;
    assert_eq!(delete.status(), 204);

    let get = test::TestRequest::get().uri(&location).send_request(&app).await;
    assert_eq!(get.status(), 404);

    let delete = test::TestRequest::delete().uri(&location).send_request(&app).await;
    assert_eq!(delete.status(), 404);
}

#[actix_web::test]
async fn test_list_users_hides_password_hashes() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(api::configure),
    )
    .await;

    let register = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "userName": "heidi",
            "email": "heidi@example.com",
            "password": "Passw0rd!"
        }))
        .send_request(&app)
        .await;
    assert_eq!(register.status(), 200);

    let create = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": "ivan" }))
        .send_request(&app)
        .await;
    assert_eq!(create.status(), 201);

    let list = test::TestRequest::get().uri("/api/users").send_request(&app).await;
    assert_eq!(list.status(), 200);

    let users: Vec<serde_json::Value> = test::read_body_json(list).await;
    assert_eq!(users.len(), 2);
    for user in &users {
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("id").is_some());
    }
}

#[actix_web::test]
async fn test_duplicate_user_name_conflicts() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(api::configure),
    )
    .await;

    let first = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": "judy" }))
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 201);

    let second = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": "JUDY" }))
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 409);
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(api::configure),
    )
    .await;

    let unknown = format!("/api/users/{}", uuid::Uuid::new_v4());
    let resp = test::TestRequest::get().uri(&unknown).send_request(&app).await;
    assert_eq!(resp.status(), 404);

    let resp = test::TestRequest::get().uri("/api/users/42").send_request(&app).await;
    assert_eq!(resp.status(), 404);
}
