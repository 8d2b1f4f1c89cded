use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tomate_protocol::{Request, Response, MAX_FRAME_SIZE};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("the daemon is not running")]
    DaemonNotRunning,
    #[error("timed out while talking to the daemon")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("input/output error: {0}")]
    InputOutput(String),
}

pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new() -> Self {
        Self {
            socket_path: default_socket_path(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let stream = self.connect().await?;
        self.send_request(stream, request).await
    }

    pub async fn is_running(&self) -> bool {
        matches!(self.send(Request::Ping).await, Ok(Response::Pong))
    }

    async fn connect(&self) -> Result<Stream, ClientError> {
        let connect_future = Stream::connect(
            self.socket_path
                .as_os_str()
                .to_fs_name::<GenericFilePath>()
                .map_err(|error| ClientError::Connection(error.to_string()))?,
        );

        match timeout(self.timeout, connect_future).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(_)) => Err(ClientError::DaemonNotRunning),
            Err(_) => Err(ClientError::Timeout),
        }
    }

    async fn send_request(
        &self,
        mut stream: Stream,
        request: Request,
    ) -> Result<Response, ClientError> {
        let request_bytes = bincode::serialize(&request)
            .map_err(|error| ClientError::Serialization(error.to_string()))?;

        let request_length = (request_bytes.len() as u32).to_le_bytes();

        let write_future = async {
            stream.write_all(&request_length).await?;
            stream.write_all(&request_bytes).await?;
            stream.flush().await?;
            Ok::<_, std::io::Error>(())
        };

        timeout(self.timeout, write_future)
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|error| ClientError::InputOutput(error.to_string()))?;

        let read_future = async {
            let mut length_buffer = [0u8; 4];
            stream.read_exact(&mut length_buffer).await?;
            let length = u32::from_le_bytes(length_buffer) as usize;

            if length > MAX_FRAME_SIZE {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("response frame of {} bytes exceeds limit", length),
                ));
            }

            let mut payload = vec![0u8; length];
            stream.read_exact(&mut payload).await?;
            Ok::<_, std::io::Error>(payload)
        };

        let response_bytes = timeout(self.timeout, read_future)
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|error| ClientError::InputOutput(error.to_string()))?;

        bincode::deserialize(&response_bytes)
            .map_err(|error| ClientError::Serialization(error.to_string()))
    }
}

impl Default for DaemonClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
pub fn default_socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}/tomate.sock", uid))
}

#[cfg(not(unix))]
pub fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join("tomate.sock")
}


#[cfg(test)]
mod tests {
    use super::testing::{cleanup_socket, client_for, serve, test_socket_path};
    use super::*;
    use tomate_protocol::{TimerMode, TimerSnapshot, TimerState};

    #[test]
    fn client_creates_with_default_timeout() {
        let client = DaemonClient::new();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert!(client.socket_path.ends_with("tomate.sock"));
    }

    #[tokio::test]
    async fn send_returns_error_when_daemon_not_running() {
        let client = client_for(&PathBuf::from("/tmp/tomate-nonexistent-socket-12345.sock"));

        let result = client.send(Request::Ping).await;

        assert!(
            matches!(result, Err(ClientError::DaemonNotRunning)),
            "expected DaemonNotRunning, got {:?}",
            result
        );
        assert!(!client.is_running().await);
    }

    #[tokio::test]
    async fn send_ping_receives_pong() {
        let socket_path = test_socket_path("ping");
        cleanup_socket(&socket_path);
        let server = serve(socket_path.clone(), vec![Response::Pong]);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = client_for(&socket_path).send(Request::Ping).await;

        assert!(matches!(result, Ok(Response::Pong)));
        assert_eq!(server.await.unwrap(), vec![Request::Ping]);
        cleanup_socket(&socket_path);
    }

    #[tokio::test]
    async fn send_switch_mode_receives_status() {
        let socket_path = test_socket_path("status");
        cleanup_socket(&socket_path);
        let mut state = TimerState::initial(900);
        state.mode = TimerMode::LongBreak;
        let snapshot = TimerSnapshot {
            state,
            total_seconds: 900,
        };
        let server = serve(socket_path.clone(), vec![Response::Status(snapshot.clone())]);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let request = Request::SwitchMode {
            mode: TimerMode::LongBreak,
        };
        let result = client_for(&socket_path).send(request.clone()).await;

        match result {
            Ok(Response::Status(received)) => assert_eq!(received, snapshot),
            other => panic!("expected Status response, got {:?}", other),
        }
        assert_eq!(server.await.unwrap(), vec![request]);
        cleanup_socket(&socket_path);
    }
}
