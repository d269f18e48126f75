//! Script-port connect retry behaviour

use mf3270_transport::{connect_with_retry, pick_script_port, RetryPolicy, TransportError};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn refused_connections_give_up_after_the_configured_attempts() {
    let port = pick_script_port().expect("free port");
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let policy = RetryPolicy {
        attempts: 3,
        delay: Duration::from_millis(10),
    };

    let err = connect_with_retry(addr, policy).await.unwrap_err();

    match err {
        TransportError::ConnectionFailed(msg) => assert!(msg.contains("3 connection attempts")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn connects_once_the_listener_comes_up() {
    let port = pick_script_port().expect("free port");
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let policy = RetryPolicy {
        attempts: 50,
        delay: Duration::from_millis(20),
    };

    let listener = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        let listener = TcpListener::bind(addr).await.unwrap();
        let _ = listener.accept().await.unwrap();
    });

    let stream = connect_with_retry(addr, policy).await.expect("should connect");
    assert_eq!(stream.peer_addr().unwrap(), addr);

    listener.await.unwrap();
}

#[test]
fn default_policy_is_fifteen_attempts_one_second_apart() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.attempts, 15);
    assert_eq!(policy.delay, Duration::from_secs(1));
}
