use crate::*;

use reqwest::StatusCode;

/// A short message is accepted and reaches the gateway without a header.
#[tokio::test]
async fn test_single_segment_submission() -> Result<()> {
    let mut gate = TestGate::start(Options::default()).await?;

    let resp = gate
        .submit(&request("MessageBird", 380660000000, "get it done"))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["segments"], 1);
    assert_eq!(
        body["submission_id"].as_str().map(str::len),
        Some(64),
        "submission id should be a blake3 hex digest: {body}"
    );

    gate.wait_for_sends(1).await?;
    let sent = gate.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].originator, "MessageBird");
    assert_eq!(sent[0].recipients, vec!["380660000000".to_string()]);
    assert_eq!(sent[0].body, "get it done");
    assert_eq!(sent[0].udh, None);
    Ok(())
}

/// Every validation failure is a 400 and nothing is queued.
#[tokio::test]
async fn test_invalid_requests_are_rejected() -> Result<()> {
    let gate = TestGate::start(Options {
        dispatch: false,
        ..Options::default()
    })
    .await?;

    let cases = [
        (request("", 380660000000, "hi"), "originator can not be blank"),
        (
            request("Bad Sender", 380660000000, "hi"),
            "originator is not an MSISDN or it is too long",
        ),
        (request("Valid", 380660000000, ""), "message can not be blank"),
        (request("Valid", 380, "hi"), "recipient MSISDN is wrong"),
        (
            request("Valid", 380660000000, &"|".repeat(700)),
            "message is longer than 1377 septets",
        ),
    ];

    for (body, reason) in cases {
        let resp = gate.submit(&body).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(resp.text().await?, reason);
    }

    let status = gate.status().await?;
    assert_eq!(status["queue_depth"], 0, "nothing should be queued: {status}");
    Ok(())
}

/// Bodies that are not a submission never reach validation.
#[tokio::test]
async fn test_malformed_body_is_rejected() -> Result<()> {
    let gate = TestGate::start(Options::default()).await?;

    let not_json = gate
        .client
        .post(gate.url("/messages"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    assert_eq!(not_json.text().await?, "request body is not valid");

    let wrong_type = gate
        .submit(&serde_json::json!({
            "Originator": "Valid",
            "Recipient": "380660000000",
            "Message": "hi",
        }))
        .await?;
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);

    let missing_field = gate
        .submit(&serde_json::json!({ "Originator": "Valid", "Message": "hi" }))
        .await?;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);

    assert!(gate.sent().is_empty());
    Ok(())
}

/// Only POST is routed on /messages.
#[tokio::test]
async fn test_wrong_method_is_rejected() -> Result<()> {
    let gate = TestGate::start(Options::default()).await?;

    let resp = gate.client.get(gate.url("/messages")).send().await?;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = gate.client.post(gate.url("/status")).send().await?;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
