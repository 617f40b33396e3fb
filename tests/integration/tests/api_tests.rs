//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, create_account, create_member,
    fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

const STANDARD: i16 = 0;
const USER_MANAGER: i16 = 1;
const ADMIN: i16 = 2;

async fn own_meal(server: &TestServer, session: &Session, body: &serde_json::Value) -> MealResponse {
    let response = server
        .post_auth("/api/v1/meals", &session.token, body)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn set_target(server: &TestServer, session: &Session, target: i32) {
    let response = server
        .put_auth(
            "/api/v1/settings",
            &session.token,
            &json!({ "expected_daily_calories": target }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

async fn meals_on(server: &TestServer, session: &Session, date: &str) -> PageResponse<MealResponse> {
    let path = format!("/api/v1/meals?per_page=100&filter=date%20eq%20'{date}'");
    let response = server.get_auth(&path, &session.token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert!(response.headers().contains_key("x-request-id"));
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_signup_creates_owner() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let credentials = Credentials::unique("owner");

    let response = server.post("/api/v1/signup", &credentials).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(user.username, credentials.username);
    assert_eq!(user.role_id, 3);

    let response = server.post("/api/v1/signup", &credentials).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ACCOUNT_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let body = json!({ "username": format!("owner{}", unique_suffix()), "password": "lowercase" });
    let response = server.post("/api/v1/signup", &body).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_signin_issues_bearer_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let credentials = Credentials::unique("owner");
    let response = server.post("/api/v1/signup", &credentials).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post(
            &format!("/api/v1/accounts/{}/signin", user.account_id),
            &credentials,
        )
        .await
        .unwrap();
    let token: TokenResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert!(token.expires_in > 0);

    let response = server
        .get_auth(&format!("/api/v1/users/{}", user.id), &token.token)
        .await
        .unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, user.id);
}

#[tokio::test]
async fn test_signin_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();

    let wrong_password = Credentials {
        username: owner.user.username.clone(),
        password: "Wrong1234".to_string(),
    };
    let response = server
        .post(
            &format!("/api/v1/accounts/{}/signin", owner.account_id()),
            &wrong_password,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");

    let other_account = Credentials {
        username: owner.user.username.clone(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server
        .post(
            &format!("/api/v1/accounts/{}/signin", uuid::Uuid::new_v4()),
            &other_account,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_requests() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/meals").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/api/v1/meals", "not-a-token").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Meal Tests
// ============================================================================

#[tokio::test]
async fn test_daily_deficit_follows_target() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    set_target(&server, &owner, 200).await;

    own_meal(&server, &owner, &meal("breakfast", "2020-01-01", "08:00:00", Some(100))).await;
    let second = own_meal(&server, &owner, &meal("lunch", "2020-01-01", "12:30:00", Some(50))).await;
    assert_eq!(second.time, "12:30:00");
    assert!(second.calories_deficit);

    set_target(&server, &owner, 100).await;
    let page = meals_on(&server, &owner, "2020-01-01").await;
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|m| !m.calories_deficit));
}

#[tokio::test]
async fn test_meal_without_calories_is_stored_with_zero() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();

    let created = own_meal(&server, &owner, &meal("mystery", "2021-03-04", "19:00:00", None)).await;
    assert_eq!(created.calories, 0);
}

#[tokio::test]
async fn test_update_moves_meal_between_days() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    set_target(&server, &owner, 300).await;

    let big = own_meal(&server, &owner, &meal("feast", "2020-02-01", "20:00:00", Some(400))).await;
    own_meal(&server, &owner, &meal("snack", "2020-02-02", "10:00:00", Some(50))).await;
    assert!(!big.calories_deficit);

    let response = server
        .put_auth(
            &format!("/api/v1/meals/{}", big.id),
            &owner.token,
            &json!({ "date": "2020-02-02" }),
        )
        .await
        .unwrap();
    let moved: MealResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(moved.date, "2020-02-02");
    assert_eq!(moved.name, "feast");
    assert!(!moved.calories_deficit);

    let day_two = meals_on(&server, &owner, "2020-02-02").await;
    assert_eq!(day_two.total, 2);
    assert!(day_two.items.iter().all(|m| !m.calories_deficit));
    assert_eq!(meals_on(&server, &owner, "2020-02-01").await.total, 0);
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let created = own_meal(&server, &owner, &meal("toast", "2020-05-05", "07:00:00", Some(80))).await;

    let response = server
        .put_auth(&format!("/api/v1/meals/{}", created.id), &owner.token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_delete_meal() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    set_target(&server, &owner, 500).await;

    let keep = own_meal(&server, &owner, &meal("pasta", "2020-06-01", "13:00:00", Some(600))).await;
    let drop = own_meal(&server, &owner, &meal("salad", "2020-06-01", "19:00:00", Some(200))).await;

    let response = server
        .delete_auth(&format!("/api/v1/meals/{}", drop.id), &owner.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/meals/{}", drop.id), &owner.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "MEAL_NOT_FOUND");

    let response = server
        .get_auth(&format!("/api/v1/meals/{}", keep.id), &owner.token)
        .await
        .unwrap();
    let kept: MealResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!kept.calories_deficit);
}

#[tokio::test]
async fn test_meal_listing_pages_and_links() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    for (time, name) in [("08:00:00", "eggs"), ("12:00:00", "soup"), ("18:00:00", "rice")] {
        own_meal(&server, &owner, &meal(name, "2020-07-07", time, Some(100))).await;
    }

    let response = server
        .get_auth("/api/v1/meals?page=0&per_page=2", &owner.token)
        .await
        .unwrap();
    let page: PageResponse<MealResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "rice");
    assert!(page.link("prev").is_none());
    assert!(page.link("next").unwrap().contains("page=1"));
    assert!(page.link("last").unwrap().contains("page=1"));

    let response = server
        .get_auth("/api/v1/meals?page=1&per_page=2", &owner.token)
        .await
        .unwrap();
    let page: PageResponse<MealResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.link("next").is_none());
}

#[tokio::test]
async fn test_meal_filters() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    own_meal(&server, &owner, &meal("small", "2020-01-01", "08:00:00", Some(100))).await;
    own_meal(&server, &owner, &meal("large", "2020-01-01", "20:00:00", Some(900))).await;

    let response = server
        .get_auth(
            "/api/v1/meals?filter=(date%20eq%20'2020-01-01')%20AND%20(calories%20gt%20150)",
            &owner.token,
        )
        .await
        .unwrap();
    let page: PageResponse<MealResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "large");

    let response = server
        .get_auth("/api/v1/meals?filter=name%20eq%20'x'%3B", &owner.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_FILTER");

    let response = server
        .get_auth("/api/v1/meals?filter=password%20eq%20'x'", &owner.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY");
}

#[tokio::test]
async fn test_concurrent_meal_creation_keeps_total() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    set_target(&server, &owner, 1000).await;

    let bodies: Vec<_> = (0..10)
        .map(|i| meal(&format!("bite{i}"), "2020-08-08", "09:00:00", Some(100)))
        .collect();
    let responses = join_all(
        bodies
            .iter()
            .map(|body| server.post_auth("/api/v1/meals", &owner.token, body)),
    )
    .await;
    for response in responses {
        assert_status(response.unwrap(), StatusCode::CREATED).await.unwrap();
    }

    let page = meals_on(&server, &owner, "2020-08-08").await;
    assert_eq!(page.total, 10);
    assert!(page.items.iter().all(|m| !m.calories_deficit));

    let response = server
        .delete_auth(&format!("/api/v1/meals/{}", page.items[0].id), &owner.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let page = meals_on(&server, &owner, "2020-08-08").await;
    assert_eq!(page.total, 9);
    assert!(page.items.iter().all(|m| m.calories_deficit));
}

// ============================================================================
// User Directory Tests
// ============================================================================

#[tokio::test]
async fn test_user_manager_creates_only_standard_users() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let manager = create_member(&server, &owner, USER_MANAGER).await.unwrap();

    let response = server
        .post_auth("/api/v1/users", &manager.token, &CreateUserRequest::unique(ADMIN))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "INSUFFICIENT_PERMISSIONS");

    let response = server
        .post_auth("/api/v1/users", &manager.token, &CreateUserRequest::unique(STANDARD))
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(user.role_id, STANDARD);
    assert_eq!(user.account_id, owner.account_id());
}

#[tokio::test]
async fn test_owner_role_cannot_be_assigned() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();

    for role_id in [3, 7, -1] {
        let response = server
            .post_auth("/api/v1/users", &owner.token, &CreateUserRequest::unique(role_id))
            .await
            .unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "INVALID_ROLE_ID", "role_id {role_id}");
    }

    let member = create_member(&server, &owner, STANDARD).await.unwrap();
    let response = server
        .put_auth(
            &format!("/api/v1/users/{}", member.user.id),
            &owner.token,
            &json!({ "username": member.user.username, "role_id": 3 }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_ROLE_ID");
}

#[tokio::test]
async fn test_list_users_with_filter() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    create_member(&server, &owner, STANDARD).await.unwrap();
    create_member(&server, &owner, STANDARD).await.unwrap();
    create_member(&server, &owner, ADMIN).await.unwrap();

    let response = server
        .get_auth("/api/v1/users", &owner.token)
        .await
        .unwrap();
    let page: PageResponse<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 4);

    let response = server
        .get_auth("/api/v1/users?filter=role_id%20eq%200", &owner.token)
        .await
        .unwrap();
    let page: PageResponse<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|u| u.role_id == STANDARD));
}

#[tokio::test]
async fn test_standard_user_cannot_list_users() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let member = create_member(&server, &owner, STANDARD).await.unwrap();

    let response = server
        .get_auth("/api/v1/users", &member.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_update_and_delete_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let member = create_member(&server, &owner, STANDARD).await.unwrap();
    let path = format!("/api/v1/users/{}", member.user.id);

    let renamed = format!("renamed{}", unique_suffix());
    let response = server
        .put_auth(
            &path,
            &owner.token,
            &json!({ "username": renamed, "role_id": USER_MANAGER }),
        )
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, renamed);
    assert_eq!(user.role_id, USER_MANAGER);

    let response = server.delete_auth(&path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&path, &owner.token).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "USER_NOT_FOUND");

    // the deleted user's token no longer authenticates
    let response = server.get_auth("/api/v1/meals", &member.token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_users_of_other_accounts_are_invisible() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let first = create_account(&server).await.unwrap();
    let second = create_account(&server).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/users/{}", second.user.id), &first.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/users/{}/meals", second.user.id),
            &first.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_invalid_user_id_path() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();

    let response = server
        .get_auth("/api/v1/users/not-a-uuid", &owner.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Acting On Behalf Tests
// ============================================================================

#[tokio::test]
async fn test_admin_manages_member_ledger() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let admin = create_member(&server, &owner, ADMIN).await.unwrap();
    let member = create_member(&server, &owner, STANDARD).await.unwrap();
    let base = format!("/api/v1/users/{}", member.user.id);

    let response = server
        .put_auth(
            &format!("{base}/settings"),
            &admin.token,
            &json!({ "expected_daily_calories": 500 }),
        )
        .await
        .unwrap();
    let settings: SettingsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.user_id, member.user.id);
    assert_eq!(settings.expected_daily_calories, 500);

    let response = server
        .post_auth(
            &format!("{base}/meals"),
            &admin.token,
            &meal("porridge", "2020-09-09", "07:30:00", Some(300)),
        )
        .await
        .unwrap();
    let created: MealResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.user_id, member.user.id);
    assert!(created.calories_deficit);

    // the member sees the meal in their own ledger
    let response = server
        .get_auth(&format!("/api/v1/meals/{}", created.id), &member.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(&format!("{base}/meals/{}", created.id), &admin.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_user_manager_cannot_touch_member_ledger() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = create_account(&server).await.unwrap();
    let manager = create_member(&server, &owner, USER_MANAGER).await.unwrap();
    let member = create_member(&server, &owner, STANDARD).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/users/{}/meals", member.user.id),
            &manager.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/users/{}/settings", member.user.id),
            &manager.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}
