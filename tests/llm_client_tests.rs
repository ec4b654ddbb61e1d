use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use kinetic_table::director::{
    ChatMessage, CreativeDirector, CycleOutcome, DirectorConfig, InferenceBackend, InferenceError,
    LinkState, Prompt,
};
use kinetic_table::services::llm::{LlmSettings, OllamaClient};

/// Reads one HTTP request: headers, then `Content-Length` bytes of body.
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            return;
        }
    }
}

/// Serves the same canned response to every connection. Returns the base URL.
async fn serve(status: &'static str, content_type: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{}/", addr)
}

fn client(base_url: String) -> OllamaClient {
    OllamaClient::new(LlmSettings { base_url, ..LlmSettings::default() })
}

fn conversation() -> Vec<ChatMessage> {
    vec![ChatMessage::system("rules"), ChatMessage::user("hello")]
}

#[tokio::test]
async fn test_chat_returns_message_content() {
    let url = serve(
        "200 OK",
        "application/json",
        r#"{"model":"llama3.2:3b","message":{"role":"assistant","content":"{\"pattern\":\"rain\"}"},"done":true}"#,
    )
    .await;

    let reply = client(url).chat(&conversation()).await.unwrap();
    assert_eq!(reply, r#"{"pattern":"rain"}"#);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let url = serve("503 Service Unavailable", "text/plain", "model loading").await;

    let err = client(url).chat(&conversation()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Status(503)), "got {:?}", err);
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let url = serve("200 OK", "text/html", "<html>proxy says hi</html>").await;

    let err = client(url).chat(&conversation()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Malformed(_)), "got {:?}", err);
    assert!(!err.is_unreachable());
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}", addr)).chat(&conversation()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_director_does_not_fall_back_on_garbled_reply() {
    let url = serve("200 OK", "text/html", "<html>proxy says hi</html>").await;
    let mut director = CreativeDirector::new(DirectorConfig::default(), client(url));
    let before = director.current();

    let outcome = director.think(Prompt::User("hello".to_string())).await;

    assert_eq!(outcome, CycleOutcome::Unparsable);
    assert_eq!(director.state(), LinkState::Disconnected { fallback_index: 0 });
    assert_eq!(director.fallback_index(), 0);
    assert_eq!(*director.current(), *before);
    assert!(director.history().is_empty());
}
