use assert_matches::assert_matches;
use netservice::{
    Bytes, Failure, HttpHeader, HttpMethod, JsonCodec, NetworkService, NetworkServiceClient,
    Request, TransportErrorKind, Url,
};
use netservice_test_helper::{init_tracing, setup, Delay, MockNetworkService, MockOutput};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tokio_test::{assert_pending, assert_ready_eq, task};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Lyric {
    content: Vec<String>,
}

fn lyric() -> Lyric {
    Lyric {
        content: vec![
            "Never gonna give you up".to_string(),
            "Never gonna let you down".to_string(),
            "Never gonna run around and desert you".to_string(),
        ],
    }
}

fn url() -> Url {
    Url::parse("http://rick.astley.com/never/gonna/give/you/up").unwrap()
}

fn request() -> Request {
    Request::build(url(), None, vec![], HttpMethod::Get)
}

fn body(s: &'static str) -> Result<Bytes, Failure> {
    Ok(Bytes::from_static(s.as_bytes()))
}

fn no_output() -> Failure {
    Failure::Unknown("no output queued".to_string())
}

#[test]
fn test_no_delay_resolves_on_first_poll() {
    let mock = MockNetworkService::with_outputs([MockOutput::ok("first"), MockOutput::ok("second")]);

    let mut call = task::spawn(mock.start(request()));
    assert_ready_eq!(call.poll(), body("first"));
    drop(call);

    assert_eq!(mock.outputs(), vec![MockOutput::ok("second")]);
}

#[test_case(Delay::None ; "no delay")]
#[test_case(Delay::seconds(5.0) ; "finite delay")]
#[test_case(Delay::Infinite ; "infinite delay")]
fn test_empty_queue_fails_without_waiting(delay: Delay) {
    let mock = MockNetworkService::default();
    mock.set_delay(delay);

    let mut call = task::spawn(mock.start(request()));
    assert_ready_eq!(call.poll(), Err(no_output()));
}

#[tokio::test]
async fn test_repeat_serves_count_times_then_next() {
    let mock = MockNetworkService::with_outputs([
        MockOutput::repeat(body("again"), 3).unwrap(),
        MockOutput::ok("after"),
    ]);

    for _ in 0..3 {
        assert_eq!(mock.start(request()).await, body("again"));
    }
    assert_eq!(mock.start(request()).await, body("after"));
    assert_eq!(mock.start(request()).await, Err(no_output()));
    assert_eq!(mock.request_count(), 5);
}

#[tokio::test]
async fn test_repeat_with_nothing_behind_it_runs_dry() {
    let mock = MockNetworkService::with_outputs([MockOutput::repeat(body("x"), 2).unwrap()]);

    assert_eq!(mock.start(request()).await, body("x"));
    assert_eq!(mock.start(request()).await, body("x"));
    assert!(mock.is_empty());
    assert_eq!(mock.start(request()).await, Err(no_output()));
}

#[tokio::test]
async fn test_repeat_infinite_keeps_queue_length() {
    let failure = Failure::transport(TransportErrorKind::Connect, "offline");
    let mock = MockNetworkService::with_outputs([
        MockOutput::repeat_infinite(Err(failure.clone())),
        MockOutput::ok("unreachable"),
    ]);

    for _ in 0..25 {
        assert_eq!(mock.start(request()).await, Err(failure.clone()));
        assert_eq!(mock.len(), 2);
    }
}

#[tokio::test(start_paused = true)]
async fn test_interval_resolves_only_after_virtual_time() {
    let mock = MockNetworkService::new([MockOutput::ok("late")], Delay::seconds(2.0));

    let mut call = task::spawn(mock.start(request()));
    assert_pending!(call.poll());

    tokio::time::advance(Duration::from_millis(1999)).await;
    assert_pending!(call.poll());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(call.is_woken());
    assert_ready_eq!(call.poll(), body("late"));
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_still_resolves() {
    let mock = MockNetworkService::new([MockOutput::ok("now")], Delay::seconds(0.0));
    assert_eq!(mock.start(request()).await, body("now"));
}

#[tokio::test(start_paused = true)]
async fn test_infinite_delay_never_resolves_and_cancels() {
    let mock = Arc::new(MockNetworkService::new(
        [MockOutput::ok("never seen")],
        Delay::Infinite,
    ));

    let handle = tokio::spawn({
        let mock = Arc::clone(&mock);
        async move { mock.start(request()).await }
    });

    // A year of virtual time goes by without a result.
    tokio::time::sleep(Duration::from_secs(365 * 24 * 60 * 60)).await;
    assert!(!handle.is_finished());

    handle.abort();
    let err = handle.await.unwrap_err();
    assert!(err.is_cancelled());

    // The output was taken before the call suspended.
    assert!(mock.is_empty());
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_infinite_delay_under_timeout() {
    let mock = MockNetworkService::new([MockOutput::ok("never seen")], Delay::Infinite);

    let result = tokio::time::timeout(Duration::from_secs(60), mock.start(request())).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_interval_call_cancels_it() {
    let mock = MockNetworkService::new([MockOutput::ok("late")], Delay::seconds(10.0));

    let result = tokio::time::timeout(Duration::from_secs(5), mock.start(request())).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delay_and_queue_can_change_between_calls() {
    let mock = MockNetworkService::default();
    mock.push_output(MockOutput::ok("pushed"));
    assert_eq!(mock.start(request()).await, body("pushed"));

    mock.set_outputs([MockOutput::ok("replaced")]);
    mock.set_delay(Delay::seconds(0.0));
    assert_eq!(mock.delay(), Delay::Seconds(Duration::ZERO));
    assert_eq!(mock.start(request()).await, body("replaced"));
}

#[tokio::test]
async fn test_typed_get_post_put_through_service() {
    setup::async_test_case("typed verbs over mock", || async {
        let mock = Arc::new(MockNetworkService::with_outputs([
            MockOutput::json(&lyric()),
            MockOutput::json(&lyric()),
            MockOutput::json(&lyric()),
        ]));
        let service = NetworkService::with_transport(Arc::clone(&mock));
        let codec = JsonCodec::new();

        let got: Lyric = service.get_decoded(&url(), &[], &codec).await.unwrap();
        assert_eq!(got, lyric());

        let posted: Lyric = service
            .post_encoded(&lyric(), &url(), &[HttpHeader::content_type_json()], &codec, &codec)
            .await
            .unwrap();
        assert_eq!(posted, lyric());

        let put: Lyric = service
            .put_encoded(&lyric(), &url(), &[], &codec, &codec)
            .await
            .unwrap();
        assert_eq!(put, lyric());

        let requests = mock.requests();
        let methods: Vec<_> = requests.iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put]);

        let sent: Lyric = serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent, lyric());
        assert_eq!(requests[1].header("content-type"), Some("application/json"));
        assert!(mock.is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_scripted_client_error_reaches_caller() {
    init_tracing();
    let mock = MockNetworkService::with_outputs([MockOutput::failure(Failure::HttpResponse {
        status: 400,
        headers: vec![HttpHeader::content_type_json()],
        body: Bytes::from(serde_json::to_vec(&lyric()).unwrap()),
    })]);
    let service = NetworkService::with_transport(mock);

    let result: Result<Lyric, Failure> = service.get_decoded(&url(), &[], &JsonCodec::new()).await;

    let failure = result.unwrap_err();
    assert!(failure.is_client_error());
    assert_matches!(failure, Failure::HttpResponse { status: 400, .. });
}

#[tokio::test]
async fn test_scripted_server_error_and_raw_delete() {
    let mock = MockNetworkService::with_outputs([
        MockOutput::failure(Failure::HttpResponse {
            status: 502,
            headers: vec![],
            body: Bytes::new(),
        }),
        MockOutput::ok(Bytes::new()),
    ]);
    let service = NetworkService::with_transport(mock);

    let failure = service.delete(&url(), &[]).await.unwrap_err();
    assert!(failure.is_server_error());

    let body = service.delete(&url(), &[]).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_empty_queue_through_service_is_a_failure_value() {
    let service = NetworkService::with_transport(MockNetworkService::default());
    let result: Result<Lyric, Failure> = service.get_decoded(&url(), &[], &JsonCodec::new()).await;
    assert_eq!(result, Err(no_output()));
}

#[tokio::test]
async fn test_session_passes_through_service() {
    let service = NetworkService::with_transport(MockNetworkService::default());
    assert!(service.session().user_agent.starts_with("netservice/"));
}

#[tokio::test]
async fn test_sequential_calls_share_one_mock() {
    let mock = Arc::new(MockNetworkService::with_outputs([
        MockOutput::ok("one"),
        MockOutput::ok("two"),
    ]));
    let first = NetworkService::with_transport(Arc::clone(&mock));
    let second = NetworkService::with_transport(Arc::clone(&mock));

    assert_eq!(first.get(&url(), &[]).await, body("one"));
    assert_eq!(second.get(&url(), &[]).await, body("two"));
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_concurrent_callers_each_get_one_output() {
    let mock = Arc::new(MockNetworkService::with_outputs(
        (0..8).map(|i| MockOutput::ok(format!("{}", i))),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mock = Arc::clone(&mock);
            tokio::spawn(async move { mock.start(request()).await.unwrap() })
        })
        .collect();

    let mut served = Vec::new();
    for handle in handles {
        served.push(String::from_utf8(handle.await.unwrap().to_vec()).unwrap());
    }
    served.sort();

    // Which caller got which entry is unspecified; the set is not.
    assert_eq!(served, (0..8).map(|i| i.to_string()).collect::<Vec<_>>());
    assert!(mock.is_empty());
}
