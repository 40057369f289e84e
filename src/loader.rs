use crate::filter::apply_ignore_patterns;
use crate::status::{StatusRecord, parse};
use crate::svn::Svn;
use std::io::Read;
use std::process::Child;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// how a background status query ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded(Vec<StatusRecord>),
    Failed(String),
}

struct Running {
    child: Arc<Mutex<Child>>,
    cancelled: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

/// runs `svn status` off the foreground thread
///
/// at most one query is in flight: starting a new one kills the previous
/// child process first, and events from superseded runs are discarded
pub struct StatusLoader {
    svn: Svn,
    ignore_patterns: Vec<String>,
    sender: Sender<(u64, LoadEvent)>,
    receiver: Receiver<(u64, LoadEvent)>,
    generation: u64,
    running: Option<Running>,
}

impl StatusLoader {
    pub fn new(svn: Svn, ignore_patterns: Vec<String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            svn,
            ignore_patterns,
            sender,
            receiver,
            generation: 0,
            running: None,
        }
    }

    pub fn set_ignore_patterns(&mut self, patterns: Vec<String>) {
        self.ignore_patterns = patterns;
    }

    pub fn start(&mut self) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let mut child = match self.svn.spawn_status() {
            Ok(child) => child,
            Err(e) => {
                let _ = self
                    .sender
                    .send((generation, LoadEvent::Failed(format!("{e:#}"))));
                return;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let child = Arc::new(Mutex::new(child));
        let cancelled = Arc::new(AtomicBool::new(false));

        let worker = {
            let child = Arc::clone(&child);
            let cancelled = Arc::clone(&cancelled);
            let sender = self.sender.clone();
            let patterns = self.ignore_patterns.clone();
            thread::spawn(move || {
                // both pipes drain at once so a chatty stderr cannot stall svn
                let stderr = thread::spawn(move || read_all(stderr));
                let stdout = read_all(stdout);
                let stderr = stderr.join().unwrap_or_default();
                // pipes only close once the child exits or is killed
                let status = match child.lock() {
                    Ok(mut child) => child.wait().map_err(|e| e.to_string()),
                    Err(_) => Err("status process lock poisoned".to_string()),
                };
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                let event = match status {
                    Ok(status) if status.success() => {
                        LoadEvent::Loaded(apply_ignore_patterns(parse(&stdout), &patterns))
                    }
                    Ok(status) => {
                        let detail = stderr.trim();
                        if detail.is_empty() {
                            LoadEvent::Failed(format!("svn status exited with {status}"))
                        } else {
                            LoadEvent::Failed(format!("svn status failed: {detail}"))
                        }
                    }
                    Err(e) => LoadEvent::Failed(format!("failed to wait for svn status: {e}")),
                };
                let _ = sender.send((generation, event));
            })
        };

        self.running = Some(Running {
            child,
            cancelled,
            worker,
        });
    }

    /// kill the in-flight query, if any; it will not report
    pub fn cancel(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancelled.store(true, Ordering::SeqCst);
            if let Ok(mut child) = running.child.lock() {
                let _ = child.kill();
            }
            let _ = running.worker.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.worker.is_finished())
    }

    /// the current run's event, if it has finished
    pub fn try_next(&mut self) -> Option<LoadEvent> {
        while let Ok((generation, event)) = self.receiver.try_recv() {
            if generation == self.generation {
                return Some(event);
            }
        }
        None
    }

    /// block until the current run reports or `timeout` passes
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok((generation, event)) if generation == self.generation => return Some(event),
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

impl Drop for StatusLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn read_all(pipe: Option<impl Read>) -> String {
    let mut data = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut data);
    }
    String::from_utf8_lossy(&data).into_owned()
}
