mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use petshop_backend::{models::auth::Role, routes};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use common::{Harness, client_json, petshop_json, token};

async fn json_body(res: Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn health_is_public() {
    let h = Harness::new();
    let res = routes::router(h.state.clone()).oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn petshop_signup_is_public_but_reading_it_is_not() {
    let h = Harness::new();
    let app = routes::router(h.state.clone());

    let res = app
        .clone()
        .oneshot(request("POST", "/api/v1/backend/petshop", None, Some(petshop_json("loja@petmail.com"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["clientList"][0]["user"]["name"], "Cliente Teste");
    assert!(body["user"].get("password").is_none());

    let res = app.clone().oneshot(request("GET", "/api/v1/backend/petshop", None, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["type"], "Unauthorized");

    let petshop_id: Uuid = serde_json::from_value(body["user"]["id"].clone()).unwrap();
    let bearer = token(petshop_id, Some(Role::Petshop), false);
    let res = app
        .clone()
        .oneshot(request("GET", "/api/v1/backend/petshop", Some(&bearer), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["id"], json!(petshop_id));
    assert!(body.get("petshopConfiguration").is_some());

    let res = app.oneshot(request("GET", "/api/v1/backend/petshop/list", None, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_payload_reports_the_field() {
    let h = Harness::new();
    let mut payload = petshop_json("loja@petmail.com");
    payload["user"]["email"] = json!("sem-arroba");

    let res = routes::router(h.state.clone())
        .oneshot(request("POST", "/api/v1/backend/petshop", None, Some(payload)))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["type"], "ValidationError");
    assert_eq!(body["data"], "user.email");
    assert!(h.store.snapshot().await.users.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let bearer = token(petshop.id, Some(Role::Petshop), false);

    let mut req = request("POST", "/api/v1/backend/client", Some(&bearer), None);
    req.headers_mut().insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    *req.body_mut() = Body::from("{\"user\":");

    let res = routes::router(h.state.clone()).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["type"], "ValidationError");
}

#[tokio::test]
async fn client_endpoints_respect_roles_and_tenants() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let app = routes::router(h.state.clone());
    let petshop_bearer = token(petshop.id, Some(Role::Petshop), false);

    let res = app
        .clone()
        .oneshot(request("POST", "/api/v1/backend/client", Some(&petshop_bearer), Some(client_json("maria@gmail.com"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let client_id = json_body(res).await["user"]["id"].clone();

    let res = app
        .clone()
        .oneshot(request("POST", "/api/v1/backend/client", Some(&petshop_bearer), Some(client_json("maria@gmail.com"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["type"], "Conflict");

    let client_bearer = token(Uuid::new_v4(), Some(Role::Client), false);
    let res = app
        .clone()
        .oneshot(request("POST", "/api/v1/backend/client", Some(&client_bearer), Some(client_json("jose@gmail.com"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = json_body(res).await;
    assert_eq!(body["type"], "Forbidden");
    assert!(body["displayMessage"].is_string());

    let service_bearer = token(Uuid::new_v4(), None, true);
    let uri = format!("/api/v1/backend/client/{}/petshop/{}/micro", client_id.as_str().unwrap(), petshop.id);
    let res = app.clone().oneshot(request("GET", &uri, Some(&service_bearer), None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["pets"].as_array().unwrap().len(), 2);

    let res = app
        .oneshot(request("GET", "/api/v1/backend/client/list", Some(&petshop_bearer), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn expired_tokens_are_reported_as_expired() {
    let h = Harness::new();
    let claims = json!({
        "sub": Uuid::new_v4(),
        "auth": 50,
        "exp": (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp(),
    });
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(common::JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = routes::router(h.state.clone())
        .oneshot(request("GET", "/api/v1/backend/worker/list", Some(&expired), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["type"], "TokenExpired");
}

#[tokio::test]
async fn email_block_query_endpoints() {
    let h = Harness::new();
    h.seed_user("maria@gmail.com", Role::Client).await;
    let app = routes::router(h.state.clone());
    let service_bearer = token(Uuid::new_v4(), None, true);

    let res = app
        .clone()
        .oneshot(request("GET", "/api/v1/backend/user/email/is-user-blocked", Some(&service_bearer), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["isUserBlockedFromReceivingEmail"], true);

    let res = app
        .clone()
        .oneshot(request("POST", "/api/v1/backend/user/email/block?email=maria@gmail.com", Some(&service_bearer), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["isBlockedFromReceivingEmail"], true);

    let res = app
        .oneshot(request("POST", "/api/v1/backend/user/email/release", Some(&service_bearer), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn worker_update_by_another_petshop_is_forbidden() {
    let h = Harness::new();
    let employer = h.seed_petshop("dona@petmail.com").await;
    let stranger = h.seed_petshop("estranha@petmail.com").await;
    let worker = h.seed_worker("joao@petmail.com", employer.id).await;

    let res = routes::router(h.state.clone())
        .oneshot(request(
            "PATCH",
            &format!("/api/v1/backend/worker/{}", worker.id),
            Some(&token(stranger.id, Some(Role::Petshop), false)),
            Some(json!({ "name": "Invasor" })),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let stored = h.store.snapshot().await.users.into_iter().find(|u| u.id == worker.id).unwrap();
    assert_eq!(stored.name, worker.name);
}
