use crate::*;

use reqwest::StatusCode;

/// A long message is split, queued as one batch and delivered in order.
#[tokio::test]
async fn test_multipart_delivery_in_order() -> Result<()> {
    let mut gate = TestGate::start(Options::default()).await?;

    let message = format!("{} ~ [GREAT], {{curly}}", "long text ".repeat(40));
    let resp = gate.submit(&request("Karl", 380730220022, &message)).await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["segments"], 3);

    gate.wait_for_sends(3).await?;
    let sent = gate.sent();
    let udhs: Vec<_> = sent.iter().map(|m| m.udh.clone()).collect();
    assert_eq!(
        udhs,
        vec![
            Some("050003000301".to_string()),
            Some("050003000302".to_string()),
            Some("050003000303".to_string()),
        ]
    );
    let rejoined: String = sent.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(rejoined, message);
    assert!(sent.iter().all(|m| m.originator == "Karl"));
    Ok(())
}

/// Batches from separate submissions never interleave.
#[tokio::test]
async fn test_submissions_stay_contiguous() -> Result<()> {
    let mut gate = TestGate::start(Options::default()).await?;

    let first = request("First", 380660000001, &"a".repeat(400));
    let second = request("Second", 380660000002, &"b".repeat(400));
    let (r1, r2) = tokio::join!(gate.submit(&first), gate.submit(&second));
    assert_eq!(r1?.status(), StatusCode::ACCEPTED);
    assert_eq!(r2?.status(), StatusCode::ACCEPTED);

    gate.wait_for_sends(6).await?;
    let originators: Vec<_> = gate.sent().into_iter().map(|m| m.originator).collect();
    assert!(
        originators[..3].iter().all(|o| o == &originators[0])
            && originators[3..].iter().all(|o| o == &originators[3]),
        "segments interleaved: {originators:?}"
    );
    Ok(())
}

/// With no room left the submitter waits, then gets 429.
#[tokio::test]
async fn test_full_queue_times_out() -> Result<()> {
    let gate = TestGate::start(Options {
        capacity: 3,
        enqueue_timeout: Duration::from_millis(100),
        dispatch: false,
        ..Options::default()
    })
    .await?;

    let resp = gate
        .submit(&request("Karl", 380730220022, &"x".repeat(400)))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = gate.submit(&request("Karl", 380730220022, "one more")).await?;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let status = gate.status().await?;
    assert_eq!(status["queue_depth"], 3);
    Ok(())
}

/// A message with more segments than the queue can ever hold is refused
/// outright instead of waiting.
#[tokio::test]
async fn test_batch_larger_than_queue() -> Result<()> {
    let gate = TestGate::start(Options {
        capacity: 2,
        dispatch: false,
        ..Options::default()
    })
    .await?;

    let resp = gate
        .submit(&request("Karl", 380730220022, &"x".repeat(400)))
        .await?;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let status = gate.status().await?;
    assert_eq!(status["queue_depth"], 0);
    Ok(())
}

/// /status reports configuration and delivery counters.
#[tokio::test]
async fn test_status_counts_deliveries() -> Result<()> {
    let mut gate = TestGate::start(Options {
        capacity: 7,
        send_interval: Duration::from_millis(5),
        ..Options::default()
    })
    .await?;

    let status = gate.status().await?;
    assert_eq!(status["queue_capacity"], 7);
    assert_eq!(status["queue_depth"], 0);
    assert_eq!(status["sent"], 0);
    assert_eq!(status["failed"], 0);
    assert_eq!(status["send_interval_ms"], 5);

    gate.submit(&request("Karl", 380730220022, &"x".repeat(200)))
        .await?;
    gate.wait_for_sends(2).await?;

    // The counter is bumped after the gateway call returns.
    for _ in 0..50 {
        if gate.status().await?["sent"] == 2 {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    bail!("sent counter never reached 2: {}", gate.status().await?)
}
