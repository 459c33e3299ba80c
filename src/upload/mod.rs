mod client;
mod intake;
mod options;
mod poller;
mod types;

pub use client::ShortsClient;
pub use intake::VIDEO_EXTENSIONS;
pub use options::{
    Bounds, Language, UploadOptions, WhisperModel, MAX_DURATION_BOUNDS, MIN_DURATION_BOUNDS,
    NUM_SHORTS_BOUNDS,
};
pub use poller::{spawn_poller, PollHandle, PollUpdate};
pub use types::{SelectedFile, ShortResult, TaskId, TaskSnapshot, TaskStatus};
