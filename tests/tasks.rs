#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{logged_in, open_browser, status_and_json};

#[test_log::test(actix_rt::test)]
async fn test_task_crud_flow() {
    let app = init_app!();
    let browser = logged_in(&app, "crud@x.com").await;

    // Create
    let mut ids = Vec::new();
    for title in ["buy milk", "pay rent", "call mom"] {
        let req = browser.send(
            test::TestRequest::post()
                .uri("/tasks")
                .set_json(json!({ "title": title })),
        );
        let (status, task) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::CREATED, "create {}", title);
        assert_eq!(task["title"], title);
        assert_eq!(task["owner"], 1);
        ids.push(task["id"].as_i64().unwrap());
    }

    // List, oldest first
    let (status, list) = status_and_json(
        test::call_service(&app, browser.send(test::TestRequest::get().uri("/tasks"))).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["buy milk", "pay rent", "call mom"]);

    // Get one
    let (status, task) = status_and_json(
        test::call_service(
            &app,
            browser.send(test::TestRequest::get().uri(&format!("/tasks/{}", ids[1]))),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], "pay rent");

    // Update title
    let req = browser.send(
        test::TestRequest::put()
            .uri(&format!("/tasks/{}", ids[1]))
            .set_json(json!({ "title": "pay rent early" })),
    );
    let (status, task) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["id"], ids[1]);
    assert_eq!(task["title"], "pay rent early");

    // Delete
    let resp = test::call_service(
        &app,
        browser.send(test::TestRequest::delete().uri(&format!("/tasks/{}", ids[0]))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
        &app,
        browser.send(test::TestRequest::get().uri(&format!("/tasks/{}", ids[0]))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        browser.send(test::TestRequest::delete().uri(&format!("/tasks/{}", ids[0]))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "second delete");
}

#[test_log::test(actix_rt::test)]
async fn test_tasks_are_invisible_to_other_users() {
    let app = init_app!();
    let alice = logged_in(&app, "alice@x.com").await;
    let bob = logged_in(&app, "bob@x.com").await;

    let req = alice.send(
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "alice's secret" })),
    );
    let (_, task) = status_and_json(test::call_service(&app, req).await).await;
    let uri = format!("/tasks/{}", task["id"]);

    let (status, body) = status_and_json(
        test::call_service(&app, bob.send(test::TestRequest::get().uri(&uri))).await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let not_found_body = body;

    // Same answer as for an id that never existed.
    let (status, body) = status_and_json(
        test::call_service(&app, bob.send(test::TestRequest::get().uri("/tasks/9999"))).await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body);

    let req = bob.send(
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "bob was here" })),
    );
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = bob.send(test::TestRequest::delete().uri(&uri));
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let (_, list) = status_and_json(
        test::call_service(&app, bob.send(test::TestRequest::get().uri("/tasks"))).await,
    )
    .await;
    assert_eq!(list, json!([]));

    // Alice's task is untouched.
    let (status, task) = status_and_json(
        test::call_service(&app, alice.send(test::TestRequest::get().uri(&uri))).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], "alice's secret");
}

#[test_log::test(actix_rt::test)]
async fn test_task_mutations_require_csrf_even_with_session() {
    let app = init_app!();
    let browser = logged_in(&app, "csrf@x.com").await;

    let req = browser.send_without_csrf_header(
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "forged" })),
    );
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = browser.send(
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "real" })),
    );
    let (_, task) = status_and_json(test::call_service(&app, req).await).await;
    let uri = format!("/tasks/{}", task["id"]);

    let req = browser.send_without_csrf_header(
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "forged" })),
    );
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = browser.send_without_csrf_header(test::TestRequest::delete().uri(&uri));
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Reads are safe requests and skip the CSRF check.
    let req = browser.send_without_csrf_header(test::TestRequest::get().uri(&uri));
    let (status, task) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], "real");
}

#[test_log::test(actix_rt::test)]
async fn test_task_routes_require_session() {
    let app = init_app!();
    let browser = open_browser(&app).await;

    let requests = vec![
        test::TestRequest::get().uri("/tasks"),
        test::TestRequest::get().uri("/tasks/1"),
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "x" })),
        test::TestRequest::put()
            .uri("/tasks/1")
            .set_json(json!({ "title": "x" })),
        test::TestRequest::delete().uri("/tasks/1"),
    ];

    for req in requests {
        let resp = test::call_service(&app, browser.send(req)).await;
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], Value::from("missing session token"));
    }
}

#[test_log::test(actix_rt::test)]
async fn test_empty_title_is_rejected() {
    let app = init_app!();
    let browser = logged_in(&app, "empty@x.com").await;

    let req = browser.send(
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "" })),
    );
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = browser.send(
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "ok" })),
    );
    let (_, task) = status_and_json(test::call_service(&app, req).await).await;

    let req = browser.send(
        test::TestRequest::put()
            .uri(&format!("/tasks/{}", task["id"]))
            .set_json(json!({ "title": "" })),
    );
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
