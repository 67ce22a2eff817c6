//! HTTP surface: status codes and error bodies.

use actix_web::test;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_endpoints() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/v1/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/v1/ready")).await;
    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_create_and_fetch_case() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, created) = send(
        &app,
        test::TestRequest::post().uri("/api/v1/cases").set_json(json!({
            "organisation_name": "Example Council",
            "home_page_url": "https://www.Example.gov.uk/home",
        })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["domain"], "www.example.gov.uk");
    assert_eq!(created["status"], "new-case");
    assert_eq!(created["version"], 0);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/cases/{}", id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(fetched["id"], created["id"]);

    let (status, listed) = send(&app, test::TestRequest::get().uri("/api/v1/cases")).await;
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn test_malformed_input_is_a_validation_error() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/cases")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"organisation_name\": "),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/cases/not-a-uuid"),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/api/v1/cases").set_json(json!({
            "organisation_name": "Example Council",
            "home_page_url": "ftp://example.gov.uk",
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_unknown_ids_are_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for uri in [
        format!("/api/v1/cases/{}", Uuid::now_v7()),
        format!("/api/v1/audits/{}", Uuid::now_v7()),
        format!("/api/v1/retests/{}", Uuid::now_v7()),
        format!("/api/v1/audits/{}/summary", Uuid::now_v7()),
    ] {
        let (status, body) = send(&app, test::TestRequest::get().uri(&uri)).await;
        assert_eq!(status, 404, "{}", uri);
        assert_eq!(body["error"], "NOT_FOUND");
    }
}

#[actix_rt::test]
async fn test_stale_version_is_a_conflict() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, _, home) = audit_with_home_page(&pool).await;
    let result = results_on(&pool, &home).await.remove(0);
    let app = create_test_app(&pool).await;
    let uri = format!("/api/v1/check-results/{}", result.id);

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({
            "version": result.version,
            "failed": true,
            "notes": "Missing labels",
        })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["version"], result.version + 1);
    assert_eq!(body["propagated"].as_array().map(Vec::len), Some(0));

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({
            "version": result.version,
            "failed": false,
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONCURRENT_MODIFICATION");
}

#[actix_rt::test]
async fn test_audit_and_retest_flow() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let case = create_case(&pool).await;
    let app = create_test_app(&pool).await;

    let (status, audit) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/cases/{}/audit", case.id))
            .set_json(json!({ "screen_size": "13in" })),
    )
    .await;
    assert_eq!(status, 201, "{}", audit);
    assert_eq!(audit["pages"].as_array().map(Vec::len), Some(6));
    let audit_id = audit["audit"]["id"].as_str().unwrap().to_string();
    let home_id = audit["pages"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(audit["audit"]["next_page_id"], audit["pages"][0]["id"]);

    let (status, form) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/pages/{}/checks", home_id)),
    )
    .await;
    assert_eq!(status, 200);
    let questions = form["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    let edits: Vec<_> = questions
        .iter()
        .map(|q| {
            json!({
                "id": q["result"]["id"],
                "version": q["result"]["version"],
                "failed": true,
            })
        })
        .collect();

    let (status, outcome) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/pages/{}/checks", home_id))
            .set_json(json!({
                "page_version": form["page"]["version"],
                "complete": true,
                "results": edits,
                "save_action": "save_continue",
            })),
    )
    .await;
    assert_eq!(status, 200, "{}", outcome);
    assert_eq!(outcome["next"]["step"], "page_checks");
    assert_eq!(outcome["next"]["page_id"], audit["pages"][1]["id"]);

    let (status, _) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/cases/{}/retests", case.id)),
    )
    .await;
    assert_eq!(status, 422);

    let (_, current) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/audits/{}", audit_id)),
    )
    .await;
    let (status, _) = send(
        &app,
        test::TestRequest::post().uri(&format!(
            "/api/v1/audits/{}/complete?version={}",
            audit_id, current["audit"]["version"]
        )),
    )
    .await;
    assert_eq!(status, 200);

    let (status, retest) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/cases/{}/retests", case.id)),
    )
    .await;
    assert_eq!(status, 201, "{}", retest);
    assert_eq!(retest["retest"]["sequence"], 1);
    assert_eq!(retest["check_results"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/cases/{}/retests", case.id)),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "PRECONDITION_FAILED");

    let copy = &retest["check_results"][0];
    let (status, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!(
                "/api/v1/retest-check-results/{}",
                copy["id"].as_str().unwrap()
            ))
            .set_json(json!({ "version": copy["version"], "outcome": "fixed" })),
    )
    .await;
    assert_eq!(status, 200);

    let (status, summary) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/audits/{}/summary", audit_id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(summary["failed_check_results"], 2);
    assert_eq!(summary["percentage_fixed"], 50);

    let (status, issues) = send(
        &app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/audits/{}/outstanding-issues?group_by=wcag",
            audit_id
        )),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(issues["group_by"], "wcag");
    assert_eq!(issues["total"], 1);
}

#[actix_rt::test]
async fn test_protected_delete_is_unprocessable() {
    let pool = create_test_pool().await;
    let (_, audit, _) = audit_with_home_page(&pool).await;
    let app = create_test_app(&pool).await;

    let (status, body) = send(
        &app,
        test::TestRequest::delete().uri(&format!(
            "/api/v1/audits/{}?version={}",
            audit.id, audit.version
        )),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "PRECONDITION_FAILED");

    let (status, body) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/audits/{}", audit.id)),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_audit_decision_and_statement_sync() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let case = create_case(&pool).await;
    let audit = create_bare_audit(&pool, case.id).await;

    let uri = format!("/api/v1/audits/{}/decision", audit.id);
    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({
            "version": 0,
            "disproportionate_burden": "no-claim",
            "statement_compliance": "compliant",
        })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["disproportionate_burden"], "no-claim");
    assert_eq!(body["statement_compliance"], "compliant");
    assert_eq!(body["version"], 1);

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({
            "version": 0,
            "statement_compliance": "not-compliant",
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONCURRENT_MODIFICATION");

    let (status, check) = send(
        &app,
        test::TestRequest::post().uri("/api/v1/statement-checks").set_json(json!({
            "check_type": "overview",
            "label": "Is there an accessibility statement?",
        })),
    )
    .await;
    assert_eq!(status, 201);

    let (status, edited) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/statement-checks/{}", check["id"].as_str().unwrap()))
            .set_json(json!({
                "label": "Is there an accessibility statement on the website?",
                "position": 1,
            })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(edited["check_type"], "overview");
    assert_eq!(edited["position"], 1);

    let sync = format!("/api/v1/audits/{}/statement-check-results/sync", audit.id);
    let (status, created) = send(&app, test::TestRequest::post().uri(&sync)).await;
    assert_eq!(status, 200);
    assert_eq!(created.as_array().map(Vec::len), Some(1));
    assert_eq!(created[0]["state"], "not-tested");

    let (status, created) = send(&app, test::TestRequest::post().uri(&sync)).await;
    assert_eq!(status, 200);
    assert_eq!(created.as_array().map(Vec::len), Some(0));
}
