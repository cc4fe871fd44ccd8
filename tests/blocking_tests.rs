//! Blocking client tests. Each test drives its mock server from a
//! multi-threaded runtime and calls the blocking client from inside it.

use http::{Method, StatusCode};
use restline::blocking::BlockingClient;
use restline::sync::run_blocking_all;
use restline::{args, Client, Error, Json, RawResponse, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Shipment {
    id: u32,
    carrier: String,
}

fn shipment(id: u32) -> Shipment {
    Shipment {
        id,
        carrier: "north".to_string(),
    }
}

fn blocking_client(server: &MockServer) -> BlockingClient {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .retry_policy(RetryPolicy::fixed(Duration::from_millis(10), 2))
        .build()
        .unwrap()
        .into()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_get_and_post() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shipment(3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/shipments"))
        .and(body_json(shipment(0)))
        .respond_with(ResponseTemplate::new(201).set_body_json(shipment(4)))
        .expect(1)
        .mount(&server)
        .await;

    let client = blocking_client(&server);

    let fetched = client.get::<Shipment>("shipments/{0}", args![3]).unwrap();
    assert_eq!(fetched.data, Some(shipment(3)));
    assert_eq!(fetched.attempts, 1);

    let created = client
        .post::<_, Shipment>("shipments", &shipment(0), args![])
        .unwrap();
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data, Some(shipment(4)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_put_patch_delete() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/shipments/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shipment(5)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/shipments/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/shipments/5"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = blocking_client(&server);

    let put = client
        .put::<_, Shipment>("shipments/{0}", &shipment(5), args![5])
        .unwrap();
    assert_eq!(put.data, Some(shipment(5)));

    let patch = client
        .patch::<_, Shipment>("shipments/{0}", &serde_json::json!({"carrier": "south"}), args![5])
        .unwrap();
    assert_eq!(patch.status, StatusCode::NO_CONTENT);
    assert!(patch.data.is_none());

    assert_eq!(
        client.delete("shipments/{0}", args![5]).unwrap(),
        StatusCode::ACCEPTED
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_text_and_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/labels/1"))
        .and(header("accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("LABEL-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/labels/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![137u8, 80, 78, 71]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/labels"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = blocking_client(&server);

    assert_eq!(client.get_string("labels/{0}", args![1]).unwrap(), "LABEL-1");
    assert_eq!(
        client.get_bytes("labels/1.png", args![]).unwrap().as_ref(),
        &[137u8, 80, 78, 71]
    );
    assert_eq!(
        client
            .send_bytes(
                Method::POST,
                "labels",
                vec![1u8, 2, 3],
                "application/octet-stream",
                args![]
            )
            .unwrap(),
        StatusCode::CREATED
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_send_with_any_method() {
    let server = MockServer::start().await;

    Mock::given(method("OPTIONS"))
        .and(path("/shipments"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/shipments/6"))
        .and(body_json(shipment(6)))
        .respond_with(ResponseTemplate::new(200).set_body_json(shipment(6)))
        .expect(1)
        .mount(&server)
        .await;

    let client = blocking_client(&server);

    let options = client
        .send::<(), StatusCode>(Method::OPTIONS, "shipments", None, args![])
        .unwrap();
    assert_eq!(options.status, StatusCode::NO_CONTENT);

    let stored = client
        .send::<_, Json<Shipment>>(Method::PUT, "shipments/{0}", Some(&shipment(6)), args![6])
        .unwrap();
    assert_eq!(stored.data, Some(Json(shipment(6))));
    assert_eq!(stored.attempts, 1);

    match client.send::<(), RawResponse>(Method::GET, "shipments", None, args![]) {
        Err(Error::ConfigurationError(_)) => {}
        other => panic!("Expected ConfigurationError, got {:?}", other.map(|r| r.status)),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_error_keeps_its_variant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/9"))
        .respond_with(ResponseTemplate::new(409).set_body_string("locked"))
        .expect(3)
        .mount(&server)
        .await;

    let client = blocking_client(&server);

    match client.get::<Shipment>("shipments/{0}", args![9]) {
        Err(Error::Remote {
            status,
            raw_response,
            ..
        }) => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(raw_response, "locked");
        }
        other => panic!("Expected Remote, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_retry_then_success() {
    let server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/shipments/1"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(504)
            } else {
                ResponseTemplate::new(200).set_body_json(shipment(1))
            }
        })
        .mount(&server)
        .await;

    let response = blocking_client(&server)
        .get::<Shipment>("shipments/{0}", args![1])
        .unwrap();

    assert_eq!(response.attempts, 2);
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_blocking_all_reports_every_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shipment(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipments/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipments/3"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = Client::builder()
        .base_url(server.uri())
        .unwrap()
        .build()
        .unwrap();

    let ops: Vec<_> = [1u32, 2, 3]
        .into_iter()
        .map(|id| {
            let client = client.clone();
            move || async move {
                client
                    .get::<Shipment>("shipments/{0}", args![id])
                    .await
                    .map(|r| r.status)
            }
        })
        .collect();

    match run_blocking_all(ops) {
        Err(Error::Composite(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].status(), Some(StatusCode::NOT_FOUND));
            assert!(errors[1].is_validation());
        }
        other => panic!("Expected Composite, got {:?}", other),
    }

    let ops: Vec<_> = [1u32]
        .into_iter()
        .map(|id| {
            let client = client.clone();
            move || async move {
                client
                    .get::<Shipment>("shipments/{0}", args![id])
                    .await
                    .map(|r| r.status)
            }
        })
        .collect();
    assert_eq!(run_blocking_all(ops).unwrap(), vec![StatusCode::OK]);
}
