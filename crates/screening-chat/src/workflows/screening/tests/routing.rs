use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::screening::catalog::ids;
use crate::workflows::screening::router::answer_handler;
use crate::workflows::screening::{screening_router, ScreeningService};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn questions_route_lists_the_catalog_in_order() {
    let (service, _) = build_service();
    let response = screening_router(service)
        .oneshot(get("/api/questions"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let questions = body.as_array().expect("array");
    assert_eq!(questions.len(), 11);
    assert_eq!(questions[0]["id"], ids::INTRO);
    assert_eq!(questions[0]["type"], "text");
    assert_eq!(questions[1]["type"], "select_scored");
    assert_eq!(questions[1]["options"][4]["label"], "6–8 uker");
    assert_eq!(questions[1]["options"][4]["score"], 5);
    assert_eq!(questions[3]["type"], "scale");
    assert_eq!(questions[3]["reverse"], true);
}

#[tokio::test]
async fn question_route_returns_fallback_text() {
    let (service, _) = build_service();
    let response = screening_router(service)
        .oneshot(post_json(
            "/api/question",
            json!({ "questionId": "custom", "label": "Hvordan går det?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["text"], "Hvordan går det?");
}

#[tokio::test]
async fn turn_and_ack_routes_return_text() {
    let (service, _) = build_service();
    let router = screening_router(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/turn",
            json!({
                "userAnswer": "7",
                "nextQuestionId": ids::STRESS,
                "nextQuestionLabel": "Hvor stresset?"
            }),
        ))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert!(body["ack"].as_str().is_some_and(|ack| !ack.contains('?')));
    assert!(body["question"].as_str().is_some_and(|q| !q.is_empty()));

    let response = router
        .oneshot(post_json(
            "/api/ack",
            json!({ "userAnswer": "7", "nextQuestionLabel": "Hvor stresset?" }),
        ))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert!(body["text"].as_str().is_some_and(|text| !text.is_empty()));
}

#[tokio::test]
async fn conversation_routes_drive_a_full_screening() {
    let (service, repository) = build_service();
    let router = screening_router(service);

    let response = router
        .clone()
        .oneshot(post_json("/api/conversations", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    let id = body["conversationId"].as_str().expect("id").to_string();
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));

    let answers = [
        json!({ "value": "Vondt i korsryggen etter løft" }),
        json!({ "value": "6–8 uker" }),
        json!({ "value": 8, "comment": "Verst om morgenen" }),
        json!({ "value": 2 }),
        json!({ "value": "9" }),
        json!({ "value": 2 }),
        json!({ "value": 2 }),
        json!({ "value": 0 }),
        json!({ "value": 8 }),
        json!({ "value": 2 }),
    ];
    for answer in answers {
        let response = router
            .clone()
            .oneshot(post_json(&format!("/api/conversations/{id}/answers"), answer))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["completed"], false);
    }

    let response = router
        .clone()
        .oneshot(get(&format!("/api/conversations/{id}")))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body["phase"]["state"], "awaiting_answer");
    assert_eq!(body["phase"]["index"], 10);

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/conversations/{id}/answers"),
            json!({ "value": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["completed"], true);
    assert_eq!(body["submission"]["status"], "stored");
    assert_eq!(body["totalScore"], 32.0);
    assert_eq!(repository.len(), 1);

    let response = router
        .oneshot(get("/api/list"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body[0]["totalScore"], 32.0);
    assert_eq!(body[0]["summary"]["extraComments"][0]["id"], ids::PAIN);
    assert_eq!(
        body[0]["interpretation"]["riskText"],
        "Score ≤ 50: lavere estimert risiko (screening)."
    );
}

#[tokio::test]
async fn invalid_answer_is_unprocessable() {
    let (service, _) = build_service();
    let router = screening_router(service.clone());
    let started = service.start_conversation().await.expect("starts");

    let response = router
        .oneshot(post_json(
            &format!("/api/conversations/{}/answers", started.conversation_id),
            json!({ "value": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_conversation_is_not_found() {
    let (service, _) = build_service();
    let response = screening_router(service)
        .oneshot(post_json(
            "/api/conversations/nope/answers",
            json!({ "value": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn answer_handler_reports_store_failure_after_completion() {
    let service = Arc::new(ScreeningService::new(
        catalog(),
        offline_gateway(),
        Arc::new(UnavailableRepository),
    ));
    let started = service.start_conversation().await.expect("starts");
    let id = started.conversation_id.0.clone();

    let mut turns = scenario_a_turns();
    let last = turns.pop().expect("final turn");
    for turn in turns {
        service
            .answer(&started.conversation_id, turn)
            .await
            .expect("accepted");
    }

    let response =
        answer_handler::<UnavailableRepository>(State(service), Path(id), axum::Json(last)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["completed"], true);
    assert_eq!(body["submission"]["status"], "not_persisted");
}

#[tokio::test]
async fn submit_rejects_unknown_fields_and_accepts_scored_drafts() {
    let (service, repository) = build_service();
    let router = screening_router(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/score",
            json!({ "rawAnswers": { "q2_pain": 8, "q4_sleep": 9 } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut draft = read_json_body(response).await;
    assert_eq!(draft["totalScore"], 9.0);

    let response = router
        .clone()
        .oneshot(post_json("/api/submit", draft.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["id"].as_str().is_some());

    draft["role"] = json!("admin");
    let response = router
        .clone()
        .oneshot(post_json("/api/submit", draft))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_rejects_drafts_that_contradict_the_rubric() {
    let (service, repository) = build_service();
    let draft = serde_json::to_value(service.preview(scenario_a())).expect("draft json");
    let router = screening_router(service);

    let mut scored_intro = draft.clone();
    scored_intro["scored"][ids::INTRO] = json!(80);
    scored_intro["totalScore"] = json!(80.0);
    let response = router
        .clone()
        .oneshot(post_json("/api/submit", scored_intro))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|error| error.contains(ids::INTRO)));

    let mut wrong_risk = draft;
    wrong_risk["interpretation"]["riskText"] =
        json!("Score > 50: høyere estimert risiko (screening).");
    let response = router
        .oneshot(post_json("/api/submit", wrong_risk))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn clear_then_list_is_empty() {
    let (service, _) = build_service();
    service
        .submit(service.preview(scenario_a()))
        .expect("stored");
    let router = screening_router(service);

    let response = router
        .clone()
        .oneshot(post_json("/api/clear", json!({})))
        .await
        .unwrap();
    assert_eq!(read_json_body(response).await, json!({ "ok": true }));

    let response = router.oneshot(get("/api/list")).await.unwrap();
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn clinician_route_renders_labelled_views() {
    let (service, _) = build_service();
    service
        .submit(service.preview(scenario_a()))
        .expect("stored");

    let response = screening_router(service)
        .oneshot(get("/api/clinician"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body[0]["totalDisplay"], "32 / 100");
    assert_eq!(body[0]["flags"][0]["raised"], true);
}
