mod notification;
mod results;
mod state;
mod ui;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::upload::{spawn_poller, PollHandle, PollUpdate, SelectedFile, ShortsClient, TaskId};
use eframe::{egui, App};
use rfd::FileDialog;
use std::path::Path;
use std::sync::mpsc as std_mpsc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use notification::NotificationKind;
use results::ResultCard;
use state::{ClientEvent, ClientState, Phase, Transition};

pub struct ShortsUploader {
    config: ClientConfig,
    client: ShortsClient,
    runtime: Runtime,
    state: ClientState,
    event_sender: std_mpsc::Sender<ClientEvent>,
    event_receiver: std_mpsc::Receiver<ClientEvent>,
    poller: Option<PollHandle>,
    upload_task: Option<JoinHandle<()>>,
}

impl ShortsUploader {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        info!(server = %config.server_url, "Initializing DShorts uploader");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("dshorts-net")
            .enable_all()
            .build()?;
        let client = ShortsClient::new(&config)?;
        let (event_sender, event_receiver) = std_mpsc::channel();

        Ok(Self {
            state: ClientState::new(config.notification_ttl),
            config,
            client,
            runtime,
            event_sender,
            event_receiver,
            poller: None,
            upload_task: None,
        })
    }

    pub fn select_path(&mut self, path: &Path) {
        let candidate = SelectedFile::from_path(path);
        self.state.select_file(candidate, Instant::now());
    }

    pub fn pick_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Video", &crate::upload::VIDEO_EXTENSIONS)
            .pick_file()
        {
            self.select_path(&path);
        }
    }

    pub fn start_upload(&mut self, ctx: &egui::Context) {
        let Some((submission, file, options)) = self.state.begin_submission() else {
            return;
        };

        let client = self.client.clone();
        let sender = self.event_sender.clone();
        let ctx = ctx.clone();

        self.upload_task = Some(self.runtime.spawn(async move {
            let result = client.upload(&file, &options).await;
            let _ = sender.send(ClientEvent::UploadFinished { submission, result });
            ctx.request_repaint();
        }));
    }

    pub fn cancel(&mut self) {
        if self.state.cancel(Instant::now()) {
            self.stop_background_work();
        }
    }

    pub fn start_over(&mut self) {
        self.state.start_over();
    }

    pub fn play_short(&mut self, card: &ResultCard) {
        info!("Opening {}", card.video_url);
        let result = open::that(&card.video_url);
        self.state.report_open(&card.filename, result, Instant::now());
    }

    pub fn open_server(&mut self) {
        let result = open::that(&self.config.server_url);
        self.state
            .report_open(&self.config.server_url, result, Instant::now());
    }

    pub fn download_short(&mut self, ctx: &egui::Context, task_id: &TaskId, card: &ResultCard) {
        let Some(destination) = FileDialog::new().set_file_name(&card.filename).save_file() else {
            return;
        };

        let client = self.client.clone();
        let sender = self.event_sender.clone();
        let ctx = ctx.clone();
        let task_id = task_id.clone();
        let filename = card.filename.clone();

        self.runtime.spawn(async move {
            let result = client
                .download_short(&task_id, &filename, &destination)
                .await
                .map(|_| destination);
            let _ = sender.send(ClientEvent::DownloadFinished { filename, result });
            ctx.request_repaint();
        });
    }

    fn start_polling(&mut self, task_id: TaskId, ctx: &egui::Context) {
        let sender = self.event_sender.clone();
        let ctx = ctx.clone();
        let id = task_id.clone();

        // replacing the handle aborts any previous poller
        self.poller = Some(spawn_poller(
            self.runtime.handle(),
            self.client.clone(),
            task_id,
            self.config.poll_interval,
            move |update| {
                let event = match update {
                    PollUpdate::Snapshot(snapshot) => ClientEvent::TaskUpdated {
                        task_id: id.clone(),
                        snapshot,
                    },
                    PollUpdate::Failed(error) => ClientEvent::PollFailed {
                        task_id: id.clone(),
                        error,
                    },
                };
                let delivered = sender.send(event).is_ok();
                ctx.request_repaint();
                delivered
            },
        ));
    }

    fn stop_background_work(&mut self) {
        self.poller = None;
        if let Some(task) = self.upload_task.take() {
            task.abort();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        if dropped.len() > 1 {
            warn!("{} files dropped, keeping the first one", dropped.len());
        }
        match dropped.into_iter().find_map(|f| f.path) {
            Some(path) => self.select_path(&path),
            None => self.state.notify(
                NotificationKind::Error,
                "Dropped item is not a file on disk",
                Instant::now(),
            ),
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        while let Ok(event) = self.event_receiver.try_recv() {
            match self.state.apply(event, now) {
                Transition::StartPolling(task_id) => self.start_polling(task_id, ctx),
                Transition::StopPolling => self.poller = None,
                Transition::Unchanged | Transition::Stale => {}
            }
        }

        if matches!(self.state.phase, Phase::Polling { .. } | Phase::Completed { .. }) {
            self.upload_task = None;
        }

        self.state.expire_notification(now);
        if let Some(notification) = &self.state.notification {
            ctx.request_repaint_after(notification.remaining(now));
        }
    }
}

impl App for ShortsUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.update_state(ctx);
        self.render(ctx);
    }
}

impl Drop for ShortsUploader {
    fn drop(&mut self) {
        self.stop_background_work();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TICK: Duration = Duration::from_millis(30);

    /// Runs the mock server on its own runtime so the uploader can own
    /// and drop its runtime outside of any async context.
    struct Backend {
        server: MockServer,
        runtime: Runtime,
    }

    impl Backend {
        fn start(task_body: serde_json::Value) -> Self {
            let runtime = Runtime::new().unwrap();
            let server = runtime.block_on(async {
                let server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/api/upload"))
                    .respond_with(
                        ResponseTemplate::new(200).set_body_json(json!({"task_id": "t-1"})),
                    )
                    .mount(&server)
                    .await;
                Mock::given(method("GET"))
                    .and(path("/api/task/t-1"))
                    .respond_with(ResponseTemplate::new(200).set_body_json(task_body))
                    .mount(&server)
                    .await;
                server
            });
            Self { server, runtime }
        }

        fn status_requests(&self) -> usize {
            self.runtime.block_on(async {
                self.server
                    .received_requests()
                    .await
                    .unwrap_or_default()
                    .iter()
                    .filter(|r| r.url.path() == "/api/task/t-1")
                    .count()
            })
        }

        fn uploader(&self, dir: &tempfile::TempDir) -> ShortsUploader {
            let config = ClientConfig {
                server_url: self.server.uri(),
                poll_interval: TICK,
                ..ClientConfig::default()
            };
            let mut uploader = ShortsUploader::new(config).unwrap();

            let video = dir.path().join("talk.mp4");
            std::fs::File::create(&video)
                .unwrap()
                .write_all(b"not really a video")
                .unwrap();
            uploader.select_path(&video);
            assert!(uploader.state.can_submit());
            uploader
        }
    }

    fn pump_until(
        uploader: &mut ShortsUploader,
        ctx: &egui::Context,
        done: impl Fn(&ShortsUploader) -> bool,
    ) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(uploader) {
            assert!(Instant::now() < deadline, "timed out in {:?}", uploader.state.phase);
            std::thread::sleep(Duration::from_millis(5));
            uploader.update_state(ctx);
        }
    }

    #[test]
    fn test_cancel_while_polling_stops_requests() {
        let backend = Backend::start(json!({
            "id": "t-1",
            "status": "processing",
            "progress": 30,
            "message": "Transcription en cours..."
        }));
        let dir = tempfile::tempdir().unwrap();
        let mut uploader = backend.uploader(&dir);
        let ctx = egui::Context::default();

        uploader.start_upload(&ctx);
        pump_until(&mut uploader, &ctx, |u| {
            matches!(u.state.phase, Phase::Polling { snapshot: Some(_), .. })
        });
        assert!(uploader.poller.is_some());

        uploader.cancel();
        assert!(uploader.state.is_idle());
        assert!(uploader.poller.is_none());
        assert!(uploader.upload_task.is_none());

        std::thread::sleep(TICK * 2);
        let after_cancel = backend.status_requests();
        std::thread::sleep(TICK * 8);
        uploader.update_state(&ctx);

        assert_eq!(backend.status_requests(), after_cancel);
        assert!(uploader.state.is_idle());
        assert!(uploader.state.active_task_id().is_none());
    }

    #[test]
    fn test_completed_task_releases_poller() {
        let backend = Backend::start(json!({
            "id": "t-1",
            "status": "completed",
            "progress": 100,
            "message": "2 shorts générés avec succès",
            "shorts": [
                {"filename": "short_1.mp4", "start_time": 0.0, "end_time": 20.0,
                 "score": 0.9, "duration": 20.0},
                {"filename": "short_2.mp4", "start_time": 40.0, "end_time": 70.0,
                 "score": 0.7, "duration": 30.0}
            ]
        }));
        let dir = tempfile::tempdir().unwrap();
        let mut uploader = backend.uploader(&dir);
        let ctx = egui::Context::default();

        uploader.start_upload(&ctx);
        pump_until(&mut uploader, &ctx, |u| {
            matches!(u.state.phase, Phase::Completed { .. })
        });

        assert!(uploader.poller.is_none());
        assert!(uploader.upload_task.is_none());
        match &uploader.state.phase {
            Phase::Completed { snapshot, .. } => assert_eq!(snapshot.shorts().len(), 2),
            other => panic!("unexpected phase {other:?}"),
        }

        std::thread::sleep(TICK * 4);
        assert_eq!(backend.status_requests(), 1);
    }
}
