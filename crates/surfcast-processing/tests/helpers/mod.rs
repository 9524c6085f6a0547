//! In-memory collaborators for orchestrator tests
//!
//! Every fake appends to one shared call log so tests can assert on the order
//! of file, storage and record operations.

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use surfcast_core::models::{NewUploadRecord, UploadRecord};
use surfcast_core::{AppError, SessionContext, SessionUser, StorageBackend};
use surfcast_db::RecordStore;
use surfcast_processing::{
    AcquireError, MediaFiles, MediaHandle, MediaSource, Notification, Notifier,
    ProgressReporter, ThumbnailGenerator, UploadDeps, UploadStage,
};
use surfcast_storage::{Storage, StorageError, StorageResult};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const VIDEO_PATH: &str = "/device/DCIM/session.mp4";
pub const THUMB_PATH: &str = "/device/cache/session_thumb.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Size(PathBuf),
    Read(PathBuf),
    List(String),
    Put(String),
    Insert(Uuid),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Object storage that behaves like a filesystem: unknown prefixes are `NotFound`
#[derive(Clone)]
pub struct MemoryStorage {
    pub objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    pub log: CallLog,
    fail_puts_ending_with: Arc<Mutex<Option<String>>>,
    stall_puts_ending_with: Arc<Mutex<Option<(String, CancellationToken)>>>,
    fail_lists: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    pub fn new(log: CallLog) -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            log,
            fail_puts_ending_with: Arc::new(Mutex::new(None)),
            stall_puts_ending_with: Arc::new(Mutex::new(None)),
            fail_lists: Arc::new(Mutex::new(false)),
        }
    }

    pub fn fail_puts_ending_with(&self, suffix: &str) {
        *self.fail_puts_ending_with.lock().unwrap() = Some(suffix.to_string());
    }

    /// Matching puts cancel `token` and then never complete
    pub fn cancel_and_stall_puts_ending_with(&self, suffix: &str, token: CancellationToken) {
        *self.stall_puts_ending_with.lock().unwrap() = Some((suffix.to_string(), token));
    }

    pub fn fail_lists(&self) {
        *self.fail_lists.lock().unwrap() = true;
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn storage_calls(&self) -> usize {
        calls(&self.log)
            .iter()
            .filter(|c| matches!(c, Call::List(_) | Call::Put(_)))
            .count()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.log.lock().unwrap().push(Call::List(prefix.to_string()));
        if *self.fail_lists.lock().unwrap() {
            return Err(StorageError::ListFailed("permission denied".to_string()));
        }

        let dir = format!("{}/", prefix.trim_end_matches('/'));
        let objects = self.objects.lock().unwrap();
        let mut entries: Vec<String> = objects
            .keys()
            .filter_map(|k| k.strip_prefix(&dir))
            .map(|rest| rest.split('/').next().unwrap_or(rest).to_string())
            .collect();
        entries.sort();
        entries.dedup();

        if entries.is_empty() {
            return Err(StorageError::NotFound(prefix.to_string()));
        }
        Ok(entries)
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.log.lock().unwrap().push(Call::Put(storage_key.to_string()));
        if let Some(suffix) = self.fail_puts_ending_with.lock().unwrap().as_deref() {
            if storage_key.ends_with(suffix) {
                return Err(StorageError::UploadFailed("connection reset".to_string()));
            }
        }

        let stall = self
            .stall_puts_ending_with
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(suffix, _)| storage_key.ends_with(suffix.as_str()))
            .map(|(_, token)| token.clone());
        if let Some(token) = stall {
            token.cancel();
            std::future::pending::<()>().await;
        }

        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://cdn.test/videos/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Clone)]
pub struct MemoryRecords {
    pub records: Arc<Mutex<Vec<UploadRecord>>>,
    pub log: CallLog,
    fail: Arc<Mutex<bool>>,
}

impl MemoryRecords {
    pub fn new(log: CallLog) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            log,
            fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn fail_inserts(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn all(&self) -> Vec<UploadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn insert_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        self.log.lock().unwrap().push(Call::Insert(record.id));
        if *self.fail.lock().unwrap() {
            return Err(AppError::NotFound("beach beach-1".to_string()));
        }
        let row = UploadRecord::from_new(record, Utc::now());
        self.records.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_upload(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

/// Files with a declared size and small placeholder contents
#[derive(Clone)]
pub struct FakeFiles {
    sizes: Arc<Mutex<HashMap<PathBuf, u64>>>,
    contents: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    pub log: CallLog,
}

impl FakeFiles {
    pub fn new(log: CallLog) -> Self {
        Self {
            sizes: Arc::new(Mutex::new(HashMap::new())),
            contents: Arc::new(Mutex::new(HashMap::new())),
            log,
        }
    }

    pub fn add(&self, path: &str, size: u64, contents: &[u8]) {
        self.sizes.lock().unwrap().insert(PathBuf::from(path), size);
        self.contents
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), contents.to_vec());
    }

    pub fn file_calls(&self) -> usize {
        calls(&self.log)
            .iter()
            .filter(|c| matches!(c, Call::Size(_) | Call::Read(_)))
            .count()
    }
}

#[async_trait]
impl MediaFiles for FakeFiles {
    async fn size(&self, path: &Path) -> io::Result<u64> {
        self.log.lock().unwrap().push(Call::Size(path.to_path_buf()));
        self.sizes
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.log.lock().unwrap().push(Call::Read(path.to_path_buf()));
        self.contents
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

pub enum PickOutcome {
    Video(MediaHandle),
    Cancelled,
}

pub struct FakeSource {
    outcome: Mutex<PickOutcome>,
    camera_allowed: bool,
}

impl FakeSource {
    pub fn video(path: &str) -> Self {
        Self {
            outcome: Mutex::new(PickOutcome::Video(MediaHandle::new(path).with_duration(20))),
            camera_allowed: true,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            outcome: Mutex::new(PickOutcome::Cancelled),
            camera_allowed: true,
        }
    }

    pub fn without_camera(mut self) -> Self {
        self.camera_allowed = false;
        self
    }
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn pick_from_library(&self) -> Result<MediaHandle, AcquireError> {
        match &*self.outcome.lock().unwrap() {
            PickOutcome::Video(handle) => Ok(handle.clone()),
            PickOutcome::Cancelled => Err(AcquireError::UserCancelled),
        }
    }

    async fn request_camera_permission(&self) -> bool {
        self.camera_allowed
    }

    async fn record(&self) -> Result<MediaHandle, AcquireError> {
        self.pick_from_library().await
    }
}

pub struct FakeThumbnails {
    fail: bool,
}

#[async_trait]
impl ThumbnailGenerator for FakeThumbnails {
    async fn generate(&self, _video: &Path, _timestamp_ms: u64) -> anyhow::Result<PathBuf> {
        if self.fail {
            return Err(anyhow!("ffmpeg exited with status 1"));
        }
        Ok(PathBuf::from(THUMB_PATH))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

#[derive(Clone, Default)]
pub struct RecordingProgress {
    pub stages: Arc<Mutex<Vec<UploadStage>>>,
    cancel_on: Arc<Mutex<Option<(UploadStage, CancellationToken)>>>,
}

impl RecordingProgress {
    /// Cancel `token` as soon as `stage` is reported
    pub fn cancel_on(&self, stage: UploadStage, token: CancellationToken) {
        *self.cancel_on.lock().unwrap() = Some((stage, token));
    }

    pub fn percents(&self) -> Vec<u8> {
        self.stages
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.percent())
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, stage: UploadStage) {
        self.stages.lock().unwrap().push(stage);
        if let Some((at, token)) = self.cancel_on.lock().unwrap().as_ref() {
            if *at == stage {
                token.cancel();
            }
        }
    }
}

/// Everything a test needs to drive and inspect one orchestrator
pub struct Harness {
    pub log: CallLog,
    pub storage: MemoryStorage,
    pub records: MemoryRecords,
    pub files: FakeFiles,
    pub notifier: RecordingNotifier,
    pub progress: RecordingProgress,
    pub deps: UploadDeps,
}

pub struct HarnessBuilder {
    source: FakeSource,
    thumbnail_fails: bool,
}

impl HarnessBuilder {
    pub fn source(mut self, source: FakeSource) -> Self {
        self.source = source;
        self
    }

    pub fn failing_thumbnails(mut self) -> Self {
        self.thumbnail_fails = true;
        self
    }

    pub fn build(self) -> Harness {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let storage = MemoryStorage::new(log.clone());
        let records = MemoryRecords::new(log.clone());
        let files = FakeFiles::new(log.clone());
        let notifier = RecordingNotifier::default();
        let progress = RecordingProgress::default();

        let deps = UploadDeps {
            storage: Arc::new(storage.clone()),
            records: Arc::new(records.clone()),
            files: Arc::new(files.clone()),
            source: Arc::new(self.source),
            thumbnails: Arc::new(FakeThumbnails {
                fail: self.thumbnail_fails,
            }),
            notifier: Arc::new(notifier.clone()),
            progress: Arc::new(progress.clone()),
        };

        Harness {
            log,
            storage,
            records,
            files,
            notifier,
            progress,
            deps,
        }
    }
}

pub fn harness() -> HarnessBuilder {
    HarnessBuilder {
        source: FakeSource::video(VIDEO_PATH),
        thumbnail_fails: false,
    }
}

pub fn signed_in(user_id: &str) -> SessionContext {
    SessionContext::authenticated(SessionUser::new(user_id).with_email("surfer@example.com"))
}
