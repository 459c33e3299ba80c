use crate::error::ClientError;
use crate::upload::client::ShortsClient;
use crate::upload::types::{TaskId, TaskSnapshot};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum PollUpdate {
    Snapshot(TaskSnapshot),
    Failed(ClientError),
}

/// A running status poller. Dropping the handle aborts the task, including
/// any request still in flight.
pub struct PollHandle {
    task_id: TaskId,
    handle: JoinHandle<()>,
}

impl PollHandle {
    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(task_id = %self.task_id, "Stopping status polling");
            self.handle.abort();
        }
    }
}

/// Polls `GET /api/task/{id}` every `interval` until the task reaches a
/// terminal status or a request fails.
///
/// `on_update` returns `false` when nobody is listening anymore, which also
/// ends the loop.
pub fn spawn_poller<F>(
    runtime: &Handle,
    client: ShortsClient,
    task_id: TaskId,
    interval: Duration,
    mut on_update: F,
) -> PollHandle
where
    F: FnMut(PollUpdate) -> bool + Send + 'static,
{
    info!(task_id = %task_id, ?interval, "Starting status polling");

    let id = task_id.clone();
    let handle = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match client.task_status(&id).await {
                Ok(snapshot) => {
                    debug!(
                        task_id = %id,
                        status = ?snapshot.status,
                        progress = snapshot.progress,
                        "Task status"
                    );
                    let terminal = snapshot.status.is_terminal();
                    if !on_update(PollUpdate::Snapshot(snapshot)) || terminal {
                        break;
                    }
                }
                Err(e) => {
                    warn!(task_id = %id, "Status check failed: {}", e);
                    on_update(PollUpdate::Failed(e));
                    break;
                }
            }
        }
    });

    PollHandle { task_id, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::upload::types::TaskStatus;
    use serde_json::json;
    use std::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TICK: Duration = Duration::from_millis(40);

    fn client_for(server: &MockServer) -> ShortsClient {
        let config = ClientConfig {
            server_url: server.uri(),
            ..ClientConfig::default()
        };
        ShortsClient::new(&config).unwrap()
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_stops_after_completion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t-1", "status": "processing", "progress": 20, "message": "Analyse vidéo en cours..."
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/task/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t-1", "status": "completed", "progress": 100, "message": "1 shorts générés avec succès",
                "shorts": [{"filename": "short_1.mp4", "score": 0.5, "duration": 20.0, "start_time": 0.0, "end_time": 20.0}]
            })))
            .mount(&server)
            .await;

        let (tx, rx) = mpsc::channel();
        let poller = spawn_poller(
            &Handle::current(),
            client_for(&server),
            TaskId::new("t-1"),
            TICK,
            move |update| tx.send(update).is_ok(),
        );

        tokio::time::sleep(TICK * 8).await;
        assert!(poller.is_finished());

        let statuses: Vec<TaskStatus> = rx
            .try_iter()
            .map(|u| match u {
                PollUpdate::Snapshot(s) => s.status,
                PollUpdate::Failed(e) => panic!("unexpected failure: {e}"),
            })
            .collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Processing, TaskStatus::Processing, TaskStatus::Completed]
        );
        assert_eq!(request_count(&server).await, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/t-2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (tx, rx) = mpsc::channel();
        let _poller = spawn_poller(
            &Handle::current(),
            client_for(&server),
            TaskId::new("t-2"),
            TICK,
            move |update| tx.send(update).is_ok(),
        );

        tokio::time::sleep(TICK * 5).await;

        let updates: Vec<PollUpdate> = rx.try_iter().collect();
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], PollUpdate::Failed(ClientError::Status { .. })));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/t-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t-3", "status": "processing", "progress": 5, "message": "..."
            })))
            .mount(&server)
            .await;

        let poller = spawn_poller(
            &Handle::current(),
            client_for(&server),
            TaskId::new("t-3"),
            TICK,
            |_| true,
        );

        tokio::time::sleep(TICK * 3).await;
        drop(poller);
        // let an aborted in-flight request settle
        tokio::time::sleep(TICK).await;
        let after_cancel = request_count(&server).await;
        assert!(after_cancel >= 1);

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(request_count(&server).await, after_cancel);
    }
}
