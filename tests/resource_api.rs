mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn,
};
use common::*;
use rest_service_sdk::{handlers::not_found, middleware::method_override, validation::RuleValidator, Validator};
use serde_json::json;
use std::sync::Arc;
use tower::{Layer, ServiceExt};

#[tokio::test]
async fn list_returns_linked_collection() {
    let res = app(seeded()).oneshot(get("/widgets")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;

    assert_eq!(
        body["metadata"],
        json!({"count": 2, "paging": {"current": 1, "size": 20, "pages": 1}, "sort": {}, "filter": {}})
    );
    let rels: Vec<_> = body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(rels, vec!["self", "first", "last", "create"]);
    assert_eq!(body["links"][0]["href"], "http://api.test/widgets");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["widget"]["name"], "sprocket");
    assert_eq!(
        items[0]["links"][1],
        json!({"method": "GET", "rel": "self", "href": format!("http://api.test/widgets/{}", ID_1)})
    );
}

#[tokio::test]
async fn list_applies_filters_and_echoes_them() {
    let res = app(seeded())
        .oneshot(get("/widgets?showProduct=false&sort[name]=desc"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["metadata"]["count"], 1);
    assert_eq!(body["metadata"]["filter"], json!({"showProduct": false}));
    assert_eq!(body["metadata"]["sort"], json!({"name": "desc"}));
    assert_eq!(body["items"][0]["widget"]["name"], "gear");

    let body = body_json(app(seeded()).oneshot(get("/widgets?search[name]=rock")).await.unwrap()).await;
    assert_eq!(body["metadata"]["count"], 1);
    assert_eq!(body["items"][0]["widget"]["id"], ID_1);
}

#[tokio::test]
async fn bad_query_is_a_400_envelope() {
    let res = app(seeded()).oneshot(get("/widgets?sort[id]=asc")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({"error": {"code": 400, "message": "sort: cannot sort by id"}})
    );

    let res = app(seeded()).oneshot(get("/widgets?id=test")).await.unwrap();
    assert_eq!(body_json(res).await["error"]["message"], "id: Invalid UUID v4.");
}

#[tokio::test]
async fn page_out_of_range() {
    let res = app(seeded()).oneshot(get("/widgets?page=2")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["error"]["message"],
        "Requested page must be between 1 and 1"
    );
}

#[tokio::test]
async fn read_one() {
    let res = app(seeded()).oneshot(get(&format!("/widgets/{}", ID_2))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["widget"], json!({"id": ID_2, "name": "gear", "showProduct": false}));
    let rels: Vec<_> = body["links"].as_array().unwrap().iter().map(|l| l["rel"].clone()).collect();
    assert_eq!(rels, vec![json!("parent"), json!("self"), json!("update"), json!("delete")]);
}

#[tokio::test]
async fn read_missing_or_malformed_id_is_404() {
    let res = app(seeded())
        .oneshot(get("/widgets/00000000-0000-4000-8000-000000000000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["error"]["code"], 404);

    let res = app(seeded()).oneshot(get("/widgets/nope")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_assigns_uuid4() {
    let repo = seeded();
    let res = app(repo.clone())
        .oneshot(json_request("POST", "/widgets", json!({"name": "flange", "showProduct": true})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    let id = body["widget"]["id"].clone();
    assert!(RuleValidator::new().var(&id, "uuid4").is_ok());
    assert_eq!(repo.rows.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let res = app(seeded())
        .oneshot(json_request("POST", "/widgets", json!({"name": "x", "colour": "red", "id": ID_1})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let message = body_json(res).await["error"]["message"].as_str().unwrap().to_string();
    assert!(message.contains("colour: This property does not exist."));
    assert!(message.contains("id: This property is not allowed to be set."));
    assert!(message.contains(" || "));

    let res = app(seeded())
        .oneshot(json_request("POST", "/widgets", json!({"name": "x"})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["error"]["message"],
        "name: Failed validation for min with value x"
    );
}

#[tokio::test]
async fn update_patches_present_fields() {
    let repo = seeded();
    let res = app(repo.clone())
        .oneshot(json_request("PATCH", &format!("/widgets/{}", ID_1), json!({"name": "cog"})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["widget"], json!({"id": ID_1, "name": "cog", "showProduct": true}));
    assert_eq!(repo.rows.lock().unwrap()[0].name.as_deref(), Some("cog"));
}

#[tokio::test]
async fn method_override_reaches_update() {
    let repo = seeded();
    let svc = from_fn(method_override).layer(app(repo.clone()));
    let req = Request::post(format!("/widgets/{}", ID_2))
        .header("host", "api.test")
        .header("X-HTTP-Method-Override", "PATCH")
        .body(Body::from(json!({"showProduct": true}).to_string()))
        .unwrap();
    let res = svc.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(repo.rows.lock().unwrap()[1].show_product);
}

#[tokio::test]
async fn delete_then_gone() {
    let repo = seeded();
    let uri = format!("/widgets/{}", ID_1);
    let res = app(repo.clone())
        .oneshot(Request::delete(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = app(repo).oneshot(get(&uri)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_and_method() {
    let router = app(Arc::new(MemoryRepository::default())).fallback(not_found);
    let res = router.clone().oneshot(get("/gadgets?x=1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(res).await["error"]["message"],
        "No route found for \"GET /gadgets?x=1\""
    );

    let res = router
        .oneshot(Request::put("/widgets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(res).await["error"]["message"], "Method not allowed");
}
