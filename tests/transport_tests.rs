//! Wire-protocol tests against a stub model server on an ephemeral port.

use sbom_license_audit::session::{ModelSession, RpcModelSession, Role};
use sbom_license_audit::transport::{
    RpcRequest, SocketTransport, Transport, TransportConfig, TransportError, PROMPT_MODEL,
};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Stub server handling `connections` connections, one request line each.
///
/// The handler maps the decoded request to the raw reply written back; `None`
/// closes the connection without answering.
fn spawn_server<F>(connections: usize, handler: F) -> (u16, JoinHandle<Vec<Value>>)
where
    F: Fn(&Value) -> Option<String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let mut seen = Vec::new();
        for stream in listener.incoming().take(connections) {
            let mut stream = stream.unwrap();
            let mut line = String::new();
            BufReader::new(&stream).read_line(&mut line).unwrap();
            let request: Value = serde_json::from_str(&line).unwrap();
            if let Some(reply) = handler(&request) {
                stream.write_all(reply.as_bytes()).unwrap();
            }
            seen.push(request);
        }
        seen
    });
    (port, handle)
}

fn transport(port: u16) -> SocketTransport {
    SocketTransport::new(TransportConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(2_000),
    })
}

fn prompt_request(prompt: &str) -> RpcRequest {
    RpcRequest::new(
        PROMPT_MODEL,
        vec![json!("localhost"), json!("gpt-4o"), json!(prompt), json!([])],
    )
}

#[test]
fn exchange_sends_one_json_line_and_reads_reply() {
    let (port, server) = spawn_server(1, |_| Some("{\"result\":\"pong\"}\n".to_string()));
    let reply = transport(port).exchange(&prompt_request("ping")).unwrap();
    assert_eq!(reply.result_str().as_deref(), Some("pong"));

    let seen = server.join().unwrap();
    assert_eq!(
        seen[0],
        json!({"function": "promptModel", "args": ["localhost", "gpt-4o", "ping", []]})
    );
}

#[test]
fn closed_port_degrades_to_empty_reply_quickly() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let started = Instant::now();
    let reply = transport(port).call(PROMPT_MODEL, vec![json!("x")]);
    assert!(reply.is_empty());
    assert!(started.elapsed() < Duration::from_millis(1_000));
}

#[test]
fn server_closing_without_reply_is_end_of_stream() {
    let (port, server) = spawn_server(1, |_| None);
    let result = transport(port).exchange(&prompt_request("ping"));
    assert!(matches!(result, Err(TransportError::EndOfStream)));
    server.join().unwrap();
}

#[test]
fn non_object_reply_is_malformed() {
    let (port, server) = spawn_server(1, |_| Some("[1, 2, 3]\n".to_string()));
    let result = transport(port).exchange(&prompt_request("ping"));
    assert!(matches!(result, Err(TransportError::MalformedReply(_))));
    server.join().unwrap();
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_millis(800));
        drop(stream);
    });

    let transport = SocketTransport::new(TransportConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(200),
    });
    let result = transport.exchange(&prompt_request("ping"));
    assert!(matches!(result, Err(TransportError::Timeout { .. })));
    server.join().unwrap();
}

#[test]
fn session_carries_history_across_calls() {
    let (port, server) = spawn_server(2, |request| {
        let prompt = request["args"][2].as_str().unwrap_or_default();
        Some(format!("{{\"result\":\"echo {prompt}\"}}\n"))
    });
    let mut session = RpcModelSession::with_system_prompt(
        Arc::new(transport(port)),
        "localhost",
        "gpt-4o",
        "You are helpful.",
    );

    assert_eq!(session.submit_prompt("first").unwrap(), "echo first");
    assert_eq!(session.submit_prompt("second").unwrap(), "echo second");
    assert_eq!(session.history().len(), 5);
    assert_eq!(session.history().messages()[1].role, Role::User);

    let seen = server.join().unwrap();
    assert_eq!(seen[0]["args"][3].as_array().unwrap().len(), 1);
    let history = seen[1]["args"][3].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["role"], "system");
    assert_eq!(history[2]["content"], "echo first");
}

#[test]
fn failed_call_leaves_history_unchanged() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut session = RpcModelSession::new(Arc::new(transport(port)), "localhost", "gpt-4o");
    assert!(session.submit_prompt("hello").is_err());
    assert_eq!(session.submit_prompt_or_empty("hello"), "");
    assert!(session.history().is_empty());
}
