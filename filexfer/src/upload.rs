//! Sized-receive upload sink, §4.6/§5: chunks arrive on the reliable
//! transport thread, are copied into a rented buffer and queued per
//! player, and a dedicated worker thread owns all file I/O.

use corelib::pool::BufferPool;
use corelib::workqueue::{WorkQueue, WorkQueueSender};
use rand::Rng;
use slog::Logger;
use std::collections::{HashMap, VecDeque};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type PlayerId = u32;

/// One reported chunk from the transport layer. `offset == -1` signals
/// cancellation; `offset >= total_length` signals the final chunk.
#[derive(Debug, Clone)]
pub struct UploadChunk {
    pub data: Vec<u8>,
    pub offset: i64,
    pub total_length: i64,
}

/// Resolves an in-flight upload's promise: `Some(path)` on success, `None`
/// on cancellation or I/O failure.
pub type UploadCompletion = Sender<Option<PathBuf>>;

struct PlayerQueue {
    pending: Mutex<VecDeque<UploadChunk>>,
}

type QueueMap = Arc<Mutex<HashMap<PlayerId, Arc<PlayerQueue>>>>;

/// Shared handle the reliable-transport thread uses to post chunks. Cheap
/// to clone; all state lives behind the inner `Arc`.
#[derive(Clone)]
pub struct UploadIngress {
    queues: QueueMap,
    work: WorkQueueSender<PlayerId>,
    pool: Arc<BufferPool>,
}

impl UploadIngress {
    /// Called on the reliable-transport thread for every inbound chunk.
    pub fn push_chunk(&self, player: PlayerId, data: &[u8], offset: i64, total_length: i64) {
        let rented = self.pool.rent(data);
        let queue = {
            let mut queues = self.queues.lock().expect("upload queue map poisoned");
            queues
                .entry(player)
                .or_insert_with(|| Arc::new(PlayerQueue { pending: Mutex::new(VecDeque::new()) }))
                .clone()
        };
        queue
            .pending
            .lock()
            .expect("upload queue poisoned")
            .push_back(UploadChunk { data: rented, offset, total_length });
        self.work.post(player);
    }

    /// Player disconnected: drop any pending chunks. The worker's
    /// `fail_player` call, made by the arena runtime's disconnect hook,
    /// still resolves any in-flight completion with `None`.
    pub fn drop_player(&self, player: PlayerId) {
        self.queues.lock().expect("upload queue map poisoned").remove(&player);
    }
}

struct InProgress {
    file: File,
    path: PathBuf,
    completion: UploadCompletion,
}

/// The dedicated upload worker: owns all file-stream state and drains the
/// work queue posted to by `UploadIngress`.
pub struct UploadWorker {
    queues: QueueMap,
    work: WorkQueue<PlayerId>,
    in_progress: HashMap<PlayerId, InProgress>,
    pending_completions: HashMap<PlayerId, UploadCompletion>,
    tmp_dir: PathBuf,
    log: Logger,
}

impl UploadWorker {
    /// Build a worker plus the ingress handle the transport thread clones
    /// and uses to post chunks; they share the same queue map.
    pub fn new(tmp_dir: PathBuf, log: Logger) -> (UploadWorker, UploadIngress) {
        let work = WorkQueue::new();
        let queues: QueueMap = Arc::new(Mutex::new(HashMap::new()));
        let ingress = UploadIngress {
            queues: queues.clone(),
            work: work.sender(),
            pool: Arc::new(BufferPool::new(4096)),
        };
        let worker = UploadWorker {
            queues,
            work,
            in_progress: HashMap::new(),
            pending_completions: HashMap::new(),
            tmp_dir,
            log,
        };
        (worker, ingress)
    }

    /// Register the completion channel for a player's next upload. Must be
    /// called (by the admin-command handler issuing `RequestFile`) before
    /// the client's first chunk arrives.
    pub fn expect_upload(&mut self, player: PlayerId, completion: UploadCompletion) {
        self.pending_completions.insert(player, completion);
    }

    /// Player disconnected before finishing: clean up state and resolve any
    /// pending completion with `None`.
    pub fn fail_player(&mut self, player: PlayerId) {
        self.fail(player);
        self.pending_completions.remove(&player);
    }

    /// Run forever, draining posted player ids and processing their queued
    /// chunks. Intended to be the body of a dedicated `std::thread::spawn`.
    pub fn run(mut self) {
        loop {
            let players = self.work.recv_batch(Duration::from_millis(500));
            for player in players {
                self.drain_player(player);
            }
        }
    }

    fn drain_player(&mut self, player: PlayerId) {
        let queue = {
            let map = self.queues.lock().expect("upload queue map poisoned");
            match map.get(&player) {
                Some(q) => q.clone(),
                None => return,
            }
        };
        loop {
            let chunk = {
                let mut pending = queue.pending.lock().expect("upload queue poisoned");
                match pending.pop_front() {
                    Some(c) => c,
                    None => break,
                }
            };
            self.process_chunk(player, chunk);
        }
    }

    fn process_chunk(&mut self, player: PlayerId, chunk: UploadChunk) {
        if chunk.offset < 0 {
            self.fail(player);
            return;
        }

        let offset = chunk.offset as u64;
        let total_length = chunk.total_length.max(0) as u64;

        if total_length > 0 && offset > total_length {
            slog::warn!(self.log, "upload chunk past total length ignored"; "player" => player, "offset" => offset, "total_length" => total_length);
            return;
        }

        if offset == 0 && !self.in_progress.contains_key(&player) {
            if let Err(err) = self.start(player, &chunk.data) {
                slog::warn!(self.log, "upload start failed"; "player" => player, "error" => %err);
                self.fail(player);
                return;
            }
        } else if let Some(entry) = self.in_progress.get_mut(&player) {
            if let Err(err) = entry.file.write_all(&chunk.data) {
                slog::warn!(self.log, "upload write failed"; "player" => player, "error" => %err);
                self.fail(player);
                return;
            }
        }

        if total_length > 0 && offset + chunk.data.len() as u64 >= total_length {
            self.finalize(player);
        }
    }

    fn start(&mut self, player: PlayerId, first_chunk: &[u8]) -> std::io::Result<()> {
        const UPLOAD_HEADER_SIZE: usize = 17;
        let body = if first_chunk.len() > UPLOAD_HEADER_SIZE {
            &first_chunk[UPLOAD_HEADER_SIZE..]
        } else {
            &[]
        };
        let token: u64 = rand::thread_rng().gen();
        let path = self.tmp_dir.join(format!("FileTransfer-{:016x}", token));
        let mut file = File::create(&path)?;
        file.write_all(body)?;
        if let Some(completion) = self.pending_completions.remove(&player) {
            self.in_progress.insert(player, InProgress { file, path, completion });
        } else {
            drop(file);
            let _ = fs::remove_file(&path);
        }
        Ok(())
    }

    fn finalize(&mut self, player: PlayerId) {
        if let Some(entry) = self.in_progress.remove(&player) {
            let _ = entry.completion.send(Some(entry.path));
        }
    }

    fn fail(&mut self, player: PlayerId) {
        if let Some(entry) = self.in_progress.remove(&player) {
            let _ = fs::remove_file(&entry.path);
            let _ = entry.completion.send(None);
        }
    }
}
