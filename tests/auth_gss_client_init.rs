//! End-to-end tests for the `auth_gss_client_init` call surface, using a
//! stub GSS library in place of the native one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kerberos::{
  AUTH_GSS_ERROR, BridgeError, GssApi, GssClientContext, GssDispatcher, InitClientReply, Kerberos,
  KerberosError, NativeFailure, StateHandle,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Stub collaborator. Succeeds with a handle tagging the requested uri, or
/// fails with a fixed status; optionally sleeps to simulate a slow native
/// call.
struct StubGss {
  fail_with: Option<i32>,
  delay: Option<Duration>,
}

impl StubGss {
  fn ok() -> Arc<Self> {
    Arc::new(Self {
      fail_with: None,
      delay: None,
    })
  }

  fn failing(status: i32) -> Arc<Self> {
    Arc::new(Self {
      fail_with: Some(status),
      delay: None,
    })
  }

  fn slow(delay: Duration) -> Arc<Self> {
    Arc::new(Self {
      fail_with: None,
      delay: Some(delay),
    })
  }
}

impl GssApi for StubGss {
  fn init_client(&self, uri: &str, _flags: u32) -> InitClientReply {
    if let Some(delay) = self.delay {
      std::thread::sleep(delay);
    }
    match self.fail_with {
      Some(status) => InitClientReply::Failed { status },
      None => InitClientReply::Complete {
        state: StateHandle::new(format!("state:{uri}")),
      },
    }
  }
}

/// Spin up a dispatcher on the host context and a call surface over `gss`.
fn spawn_host(gss: Arc<dyn GssApi>) -> (Kerberos, tokio::task::JoinHandle<()>) {
  let dispatcher = GssDispatcher::new();
  let executor = dispatcher.executor();
  let host = tokio::spawn(dispatcher.run(CancellationToken::new()));
  (Kerberos::new(gss, executor), host)
}

#[tokio::test]
async fn successful_init_delivers_the_wrapped_state() {
  let (kerberos, host) = spawn_host(StubGss::ok());

  let (tx, rx) = oneshot::channel();
  kerberos
    .auth_gss_client_init("service@host", 0, move |result| {
      let _ = tx.send(result);
    })
    .expect("valid call");

  let context = rx.await.expect("handler invoked").expect("success");
  assert_eq!(
    context.state().downcast_ref::<String>().map(String::as_str),
    Some("state:service@host"),
    "wrapper owns exactly the handle the native call produced"
  );

  drop(kerberos);
  host.await.expect("host context");
}

#[tokio::test]
async fn native_failure_reaches_the_handler_with_the_fixed_message() {
  let (kerberos, host) = spawn_host(StubGss::failing(1));

  let (tx, rx) = oneshot::channel();
  kerberos
    .auth_gss_client_init("bad", 0, move |result| {
      let _ = tx.send(result);
    })
    .expect("valid call");

  let failure = rx
    .await
    .expect("handler invoked")
    .expect_err("failure outcome");
  assert_eq!(failure.code, 1);
  assert_eq!(failure.message, "Failed to initialize GSS client");

  drop(kerberos);
  host.await.expect("host context");
}

#[tokio::test]
async fn gss_error_status_is_carried_through() {
  let (kerberos, host) = spawn_host(StubGss::failing(AUTH_GSS_ERROR));

  let (tx, rx) = oneshot::channel();
  kerberos
    .auth_gss_client_init("service@host", 0, move |result| {
      let _ = tx.send(result);
    })
    .expect("valid call");

  let failure = rx
    .await
    .expect("handler invoked")
    .expect_err("failure outcome");
  assert_eq!(failure.code, AUTH_GSS_ERROR);

  drop(kerberos);
  host.await.expect("host context");
}

#[tokio::test]
async fn malformed_uri_fails_synchronously_without_touching_the_handler() {
  let (kerberos, host) = spawn_host(StubGss::ok());

  let invoked = Arc::new(AtomicBool::new(false));
  for uri in ["", "service\0host"] {
    let flag = invoked.clone();
    let err = kerberos
      .auth_gss_client_init(uri, 0, move |_result| {
        flag.store(true, Ordering::SeqCst);
      })
      .expect_err("malformed uri");
    assert!(matches!(err, KerberosError::InvalidArgument));
  }

  tokio::time::sleep(Duration::from_millis(30)).await;
  assert!(
    !invoked.load(Ordering::SeqCst),
    "handler never invoked for a validation failure"
  );

  drop(kerberos);
  host.await.expect("host context");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_slow_inits_each_complete_once() {
  let (kerberos, host) = spawn_host(StubGss::slow(Duration::from_millis(5)));

  let (done_tx, mut done_rx) = mpsc::unbounded_channel();
  for i in 0..8_u32 {
    let done = done_tx.clone();
    kerberos
      .auth_gss_client_init(&format!("service@host-{i}"), 0, move |result| {
        let _ = done.send((i, result));
      })
      .expect("valid call");
  }
  drop(done_tx);

  let mut seen = Vec::new();
  while let Some((i, result)) = done_rx.recv().await {
    let context = result.expect("success");
    assert_eq!(
      context.state().downcast_ref::<String>().map(String::as_str),
      Some(format!("state:service@host-{i}").as_str())
    );
    seen.push(i);
  }
  seen.sort_unstable();
  assert_eq!(seen, (0..8).collect::<Vec<_>>());

  drop(kerberos);
  host.await.expect("host context");
}

#[tokio::test]
async fn submission_after_host_shutdown_is_rejected() {
  let gss: Arc<dyn GssApi> = StubGss::ok();
  let dispatcher = GssDispatcher::new();
  let executor = dispatcher.executor();
  let cancel = CancellationToken::new();
  let host = tokio::spawn(dispatcher.run(cancel.clone()));
  cancel.cancel();
  host.await.expect("host context");

  let kerberos = Kerberos::new(gss, executor);
  let err = kerberos
    .auth_gss_client_init("service@host", 0, |_result| {})
    .expect_err("dispatcher is gone");
  assert!(matches!(
    err,
    KerberosError::Bridge(BridgeError::HostContextClosed)
  ));
}

#[tokio::test]
async fn a_panicking_handler_does_not_break_later_calls() {
  let gss: Arc<dyn GssApi> = StubGss::ok();
  let faults = Arc::new(AtomicBool::new(false));
  let hook_fired = faults.clone();
  let dispatcher = GssDispatcher::new().with_fault_hook(Arc::new(move |_fault| {
    hook_fired.store(true, Ordering::SeqCst);
  }));
  let executor = dispatcher.executor();
  let host = tokio::spawn(dispatcher.run(CancellationToken::new()));
  let kerberos = Kerberos::new(gss, executor);

  kerberos
    .auth_gss_client_init("service@host", 0, |_result| panic!("handler bug"))
    .expect("valid call");

  tokio::time::sleep(Duration::from_millis(50)).await;

  let (tx, rx) = oneshot::channel::<Result<GssClientContext, NativeFailure>>();
  kerberos
    .auth_gss_client_init("service@other", 0, move |result| {
      let _ = tx.send(result);
    })
    .expect("valid call after fault");

  assert!(rx.await.expect("handler invoked").is_ok());
  assert!(faults.load(Ordering::SeqCst), "fault hook fired");

  drop(kerberos);
  host.await.expect("host context");
}
