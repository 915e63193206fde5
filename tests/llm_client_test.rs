//! LLM client and proposer tests against a local stub of the generate endpoint.

use std::time::Duration;
use strictly_duel::{
    DecisionSource, GomokuAgent, LlmClient, LlmConfig, LlmErrorKind, LlmProposer, MoveProposer,
    ProposalError,
};
use strictly_gomoku::{Board, Player, Position};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// How the stub answers one request.
enum Reply {
    /// 200 with the given newline-delimited JSON body.
    Stream(&'static str),
    /// Non-success status with a plain body.
    Status(u16, &'static str),
    /// Accept and never answer.
    Stall,
}

/// Reads one HTTP request and returns its body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + length {
            return String::from_utf8_lossy(&buf[header_end + 4..header_end + 4 + length]).into_owned();
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serves a single request and reports the request body it received.
async fn stub_server(reply: Reply) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (body_tx, body_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let _ = body_tx.send(request);

        let response = match reply {
            Reply::Stream(body) => format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/x-ndjson\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            ),
            Reply::Status(code, body) => format!(
                "HTTP/1.1 {} Error\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                code,
                body.len(),
                body
            ),
            Reply::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                return;
            }
        };
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{}/api/generate", addr), body_rx)
}

fn client(endpoint: String, timeout: Duration) -> LlmClient {
    LlmClient::new(LlmConfig::new(endpoint, "test-model".to_string(), timeout)).unwrap()
}

const THINKING_STREAM: &str = concat!(
    "{\"thinking\":\"Center is \",\"response\":\"\",\"done\":false}\n",
    "{\"thinking\":\"strong.\",\"response\":\"\",\"done\":false}\n",
    "{\"response\":\"3,\",\"done\":false}\n",
    "not json at all\n",
    "{\"response\":\"2\",\"done\":false}\n",
    "{\"response\":\"\",\"done\":true,\"done_reason\":\"stop\"}\n",
);

#[tokio::test]
async fn test_generate_collects_stream() {
    let (endpoint, request) = stub_server(Reply::Stream(THINKING_STREAM)).await;
    let completion = client(endpoint, Duration::from_secs(5))
        .generate("pick a move")
        .await
        .unwrap();

    assert_eq!(completion.answer(), "3,2");
    assert_eq!(completion.thinking(), "Center is strong.");
    assert!(completion.done());
    assert_eq!(completion.done_reason(), Some("stop"));
    assert_eq!(completion.skipped_lines(), 1);

    let request: serde_json::Value = serde_json::from_str(&request.await.unwrap()).unwrap();
    assert_eq!(request["model"], "test-model");
    assert_eq!(request["prompt"], "pick a move");
    assert_eq!(request["stream"], true);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (endpoint, _request) = stub_server(Reply::Status(500, "model not loaded")).await;
    let err = client(endpoint, Duration::from_secs(5))
        .generate("pick a move")
        .await
        .unwrap_err();

    assert_eq!(err.kind, LlmErrorKind::Status);
    assert!(err.message.contains("model not loaded"), "{err}");
}

#[tokio::test]
async fn test_stalled_server_times_out() {
    let (endpoint, _request) = stub_server(Reply::Stall).await;
    let err = client(endpoint, Duration::from_secs(1))
        .generate("pick a move")
        .await
        .unwrap_err();

    assert_eq!(err.kind, LlmErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}/api/generate", addr), Duration::from_secs(5))
        .generate("pick a move")
        .await
        .unwrap_err();
    assert_eq!(err.kind, LlmErrorKind::Transport);
}

#[tokio::test]
async fn test_proposer_parses_answer_lane() {
    let (endpoint, request) = stub_server(Reply::Stream(THINKING_STREAM)).await;
    let proposer = LlmProposer::new(client(endpoint, Duration::from_secs(5)));
    let board = Board::new(6).unwrap();

    let pos = proposer
        .propose(&board, Player::X, &board.empty_positions())
        .await
        .unwrap();
    assert_eq!(pos, Position::new(3, 2));

    let request: serde_json::Value = serde_json::from_str(&request.await.unwrap()).unwrap();
    let prompt = request["prompt"].as_str().unwrap();
    assert!(prompt.contains("You play as 'X'"));
    assert!(prompt.contains("Board size: 6x6"));
}

#[tokio::test]
async fn test_proposer_ignores_coordinates_in_thinking() {
    let body = concat!(
        "{\"thinking\":\"maybe 1,1\",\"response\":\"\",\"done\":false}\n",
        "{\"response\":\"I am not sure.\",\"done\":true,\"done_reason\":\"stop\"}\n",
    );
    let (endpoint, _request) = stub_server(Reply::Stream(body)).await;
    let proposer = LlmProposer::new(client(endpoint, Duration::from_secs(5)));
    let board = Board::new(6).unwrap();

    let err = proposer
        .propose(&board, Player::X, &board.empty_positions())
        .await
        .unwrap_err();
    assert!(matches!(err, ProposalError::Unusable { .. }), "{err}");
}

#[tokio::test]
async fn test_agent_falls_back_when_reply_names_occupied_cell() {
    let body = "{\"response\":\"2,2\",\"done\":true,\"done_reason\":\"stop\"}\n";
    let (endpoint, _request) = stub_server(Reply::Stream(body)).await;
    let proposer = LlmProposer::new(client(endpoint, Duration::from_secs(5)));
    let agent = GomokuAgent::new("o", Player::O, Box::new(proposer));

    let mut board = Board::new(5).unwrap();
    board.make_move(Position::new(2, 2), Player::X).unwrap();

    let decision = agent.decide(&mut board).await.unwrap();
    assert_eq!(decision.source, DecisionSource::Fallback);
    assert_eq!(decision.position, Position::new(1, 2));
}

#[tokio::test]
async fn test_agent_falls_back_when_server_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let proposer = LlmProposer::new(client(
        format!("http://{}/api/generate", addr),
        Duration::from_secs(5),
    ));
    let agent = GomokuAgent::new("x", Player::X, Box::new(proposer));
    let mut board = Board::new(6).unwrap();

    let decision = agent.decide(&mut board).await.unwrap();
    assert_eq!(decision.source, DecisionSource::Fallback);
    assert_eq!(decision.position, Position::new(3, 3));
}
