//! Integration tests for the NLU client and classifier using wiremock.

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfa_core::SentimentLabel;
use cfa_nlu::{NluClient, NluError, SentimentClassifier};

fn test_client(base_url: &str) -> NluClient {
    NluClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

fn sentiment_body(label: &str, score: f64) -> serde_json::Value {
    serde_json::json!({
        "usage": { "text_units": 1, "text_characters": 42, "features": 1 },
        "sentiment": {
            "document": { "label": label, "score": score }
        },
        "language": "en"
    })
}

#[tokio::test]
async fn analyze_sentiment_returns_parsed_classification() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .and(query_param("version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "text": "Excellent service! Will rent again",
            "features": { "sentiment": { "document": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("positive", 0.92)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let classification = client
        .analyze_sentiment("Excellent service! Will rent again")
        .await
        .expect("should parse sentiment");

    assert_eq!(classification.label, SentimentLabel::Positive);
    assert!((classification.score - 0.92).abs() < f64::EPSILON);
}

#[tokio::test]
async fn uppercase_label_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("Negative", -0.7)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let classification = client.analyze_sentiment("Staff was rude").await.unwrap();
    assert_eq!(classification.label, SentimentLabel::Negative);
}

#[tokio::test]
async fn unrecognized_label_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("mixed", 0.1)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_sentiment("hmm").await.unwrap_err();
    assert!(matches!(err, NluError::UnrecognizedLabel(ref label) if label == "mixed"));
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"unauthorized\"}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_sentiment("hello").await.unwrap_err();
    match err {
        NluError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("unauthorized"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sentiment": {} })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_sentiment("hello").await.unwrap_err();
    assert!(matches!(err, NluError::Deserialize { .. }));
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("neutral", 0.0)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let classification = client.analyze_sentiment("okay I guess").await.unwrap();
    assert_eq!(classification.label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn classify_hits_the_service_once_per_distinct_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("positive", 0.8)))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = SentimentClassifier::new(test_client(&server.uri()));
    let first = classifier.classify("Great experience overall").await.unwrap();
    let second = classifier.classify("Great experience overall").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(classifier.cache_size(), 1);
    // The mock's expect(1) verifies on drop that only one request was made.
}

#[tokio::test]
async fn cache_keys_are_case_sensitive() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("positive", 0.8)))
        .expect(2)
        .mount(&server)
        .await;

    let classifier = SentimentClassifier::new(test_client(&server.uri()));
    classifier.classify("Great car").await.unwrap();
    classifier.classify("great car").await.unwrap();

    assert_eq!(classifier.cache_size(), 2);
}

#[tokio::test]
async fn concurrent_requests_for_same_text_coalesce() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sentiment_body("positive", 0.8))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let classifier = SentimentClassifier::new(test_client(&server.uri()));
    let (a, b) = tokio::join!(
        classifier.classify("Great experience overall"),
        classifier.classify("Great experience overall"),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(classifier.cache_size(), 1);
}

#[tokio::test]
async fn failed_classification_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("negative", -0.4)))
        .mount(&server)
        .await;

    let classifier = SentimentClassifier::new(test_client(&server.uri()));

    let err = classifier.classify("Vehicle had maintenance issues").await;
    assert!(err.is_err(), "first call should surface the 500");

    let retried = classifier
        .classify("Vehicle had maintenance issues")
        .await
        .expect("second call should succeed and populate the cache");
    assert_eq!(retried.label, SentimentLabel::Negative);
}
