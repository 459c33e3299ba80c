use super::notification::{Notification, NotificationKind};
use crate::error::{ClientError, ClientResult, FileRejection};
use crate::upload::{SelectedFile, TaskId, TaskSnapshot, TaskStatus, UploadOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Where the client is in the upload → poll → results flow.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading {
        submission: u64,
        file_name: String,
    },
    Polling {
        task_id: TaskId,
        snapshot: Option<TaskSnapshot>,
    },
    Completed {
        task_id: TaskId,
        snapshot: TaskSnapshot,
    },
}

/// Results of background work, delivered to the UI thread.
#[derive(Debug)]
pub enum ClientEvent {
    UploadFinished {
        submission: u64,
        result: ClientResult<TaskId>,
    },
    TaskUpdated {
        task_id: TaskId,
        snapshot: TaskSnapshot,
    },
    PollFailed {
        task_id: TaskId,
        error: ClientError,
    },
    DownloadFinished {
        filename: String,
        result: ClientResult<PathBuf>,
    },
}

/// What the controller must do with the poller after an event.
#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    StartPolling(TaskId),
    StopPolling,
    /// The event belonged to a task or submission that is no longer active.
    Stale,
}

pub struct ClientState {
    pub selected_file: Option<SelectedFile>,
    pub options: UploadOptions,
    pub phase: Phase,
    pub notification: Option<Notification>,
    notification_ttl: Duration,
    next_submission: u64,
}

impl ClientState {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            selected_file: None,
            options: UploadOptions::default(),
            phase: Phase::Idle,
            notification: None,
            notification_ttl,
            next_submission: 0,
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            NotificationKind::Error => warn!("{}", message),
            _ => info!("{}", message),
        }
        self.notification = Some(Notification::new(kind, message, now, self.notification_ttl));
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn can_submit(&self) -> bool {
        self.is_idle() && self.selected_file.is_some()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Uploading { .. } | Phase::Polling { .. })
    }

    pub fn active_task_id(&self) -> Option<&TaskId> {
        match &self.phase {
            Phase::Polling { task_id, .. } | Phase::Completed { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Applies a picked or dropped file. A rejected file leaves the current
    /// selection untouched.
    pub fn select_file(
        &mut self,
        candidate: Result<SelectedFile, FileRejection>,
        now: Instant,
    ) -> bool {
        if !self.is_idle() {
            let message = if matches!(self.phase, Phase::Completed { .. }) {
                "Click \"New video\" before choosing another file"
            } else {
                "A video is already being processed"
            };
            self.notify(NotificationKind::Warning, message, now);
            return false;
        }

        match candidate {
            Ok(file) => {
                info!(name = %file.name, size = file.size, "Video selected");
                self.selected_file = Some(file);
                true
            }
            Err(rejection) => {
                self.notify(NotificationKind::Error, rejection.to_string(), now);
                false
            }
        }
    }

    /// Moves to `Uploading`, consuming the selection. Returns what the upload
    /// needs, or `None` when nothing can be submitted.
    pub fn begin_submission(&mut self) -> Option<(u64, SelectedFile, UploadOptions)> {
        if !self.is_idle() {
            return None;
        }
        let file = self.selected_file.take()?;

        self.next_submission += 1;
        let submission = self.next_submission;
        self.phase = Phase::Uploading {
            submission,
            file_name: file.name.clone(),
        };
        info!(submission, file = %file.name, "Submitting video");

        Some((submission, file, self.options.clone()))
    }

    pub fn apply(&mut self, event: ClientEvent, now: Instant) -> Transition {
        match event {
            ClientEvent::UploadFinished { submission, result } => {
                if !matches!(self.phase, Phase::Uploading { submission: s, .. } if s == submission) {
                    info!(submission, "Dropping result of an abandoned upload");
                    return Transition::Stale;
                }
                match result {
                    Ok(task_id) => {
                        info!(task_id = %task_id, "Processing started");
                        self.phase = Phase::Polling {
                            task_id: task_id.clone(),
                            snapshot: None,
                        };
                        Transition::StartPolling(task_id)
                    }
                    Err(e) => {
                        self.phase = Phase::Idle;
                        self.notify(NotificationKind::Error, format!("Upload failed: {}", e), now);
                        Transition::Unchanged
                    }
                }
            }
            ClientEvent::TaskUpdated { task_id, snapshot } => {
                if !self.is_polling(&task_id) {
                    return Transition::Stale;
                }
                match snapshot.status {
                    TaskStatus::Completed => {
                        let count = snapshot.shorts().len();
                        self.phase = Phase::Completed { task_id, snapshot };
                        self.notify(
                            NotificationKind::Success,
                            format!("Processing finished: {} short(s) generated", count),
                            now,
                        );
                        Transition::StopPolling
                    }
                    TaskStatus::Failed => {
                        let message = if snapshot.message.is_empty() {
                            "Processing failed".to_string()
                        } else {
                            snapshot.message
                        };
                        self.phase = Phase::Idle;
                        self.notify(NotificationKind::Error, message, now);
                        Transition::StopPolling
                    }
                    TaskStatus::Pending | TaskStatus::Processing => {
                        self.phase = Phase::Polling {
                            task_id,
                            snapshot: Some(snapshot),
                        };
                        Transition::Unchanged
                    }
                }
            }
            ClientEvent::PollFailed { task_id, error } => {
                if !self.is_polling(&task_id) {
                    return Transition::Stale;
                }
                self.phase = Phase::Idle;
                self.notify(
                    NotificationKind::Error,
                    format!("Could not check task status: {}", error),
                    now,
                );
                Transition::StopPolling
            }
            ClientEvent::DownloadFinished { filename, result } => {
                match result {
                    Ok(path) => self.notify(
                        NotificationKind::Success,
                        format!("{} saved to {}", filename, path.display()),
                        now,
                    ),
                    Err(e) => self.notify(
                        NotificationKind::Error,
                        format!("Download of {} failed: {}", filename, e),
                        now,
                    ),
                }
                Transition::Unchanged
            }
        }
    }

    /// User-initiated stop. Returns whether there was anything to cancel.
    pub fn cancel(&mut self, now: Instant) -> bool {
        if !self.is_busy() {
            return false;
        }
        info!(task_id = ?self.active_task_id(), "Processing cancelled by user");
        self.phase = Phase::Idle;
        self.notify(NotificationKind::Warning, "Processing cancelled", now);
        true
    }

    /// Reports a URL or file that the system handler refused to open.
    pub fn report_open(&mut self, target: &str, result: std::io::Result<()>, now: Instant) {
        if let Err(e) = result {
            self.notify(
                NotificationKind::Error,
                format!("Could not open {}: {}", target, e),
                now,
            );
        }
    }

    /// Leaves the results view for a fresh upload form.
    pub fn start_over(&mut self) {
        if matches!(self.phase, Phase::Completed { .. }) {
            self.phase = Phase::Idle;
            self.selected_file = None;
        }
    }

    pub fn progress_fraction(&self) -> f32 {
        match &self.phase {
            Phase::Polling {
                snapshot: Some(snapshot),
                ..
            } => snapshot.progress_fraction(),
            Phase::Completed { .. } => 1.0,
            _ => 0.0,
        }
    }

    pub fn progress_message(&self) -> String {
        match &self.phase {
            Phase::Idle => String::new(),
            Phase::Uploading { file_name, .. } => format!("Uploading {}...", file_name),
            Phase::Polling { snapshot: None, .. } => "Waiting for the server...".to_string(),
            Phase::Polling {
                snapshot: Some(snapshot),
                ..
            } => snapshot.message.clone(),
            Phase::Completed { snapshot, .. } => snapshot.message.clone(),
        }
    }

    fn is_polling(&self, id: &TaskId) -> bool {
        matches!(&self.phase, Phase::Polling { task_id, .. } if task_id == id)
    }
}
