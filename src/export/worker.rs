//! Background export: render and save off the event-loop thread.
//!
//! The worker owns an [`ExportSnapshot`] and reports over an mpsc channel;
//! after every send it calls the caller's wake function so a sleeping event
//! loop notices.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::writer::{save_png, ExportSummary};
use super::{render_export, ExportError, ExportOptions, ExportProgress, ExportSnapshot, Result};
use crate::ui::text_rasterizing::TextRenderer;

#[derive(Debug)]
pub enum ExportEvent {
    Progress(ExportProgress),
    Finished(Result<ExportSummary>),
}

/// Shared cancellation flag, checked between messages
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a worker needs, moved onto its thread
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub snapshot: ExportSnapshot,
    pub options: ExportOptions,
    pub output: PathBuf,
    /// Extra font file for the worker's own text renderer
    pub font_path: Option<PathBuf>,
}

impl ExportJob {
    fn run(self, tx: &Sender<ExportEvent>, wake: &(dyn Fn() + Send), cancel: &CancelToken) -> Result<ExportSummary> {
        let mut text = TextRenderer::with_font_file(self.font_path.as_deref());
        if !text.has_fonts() {
            return Err(ExportError::BackendUnavailable);
        }

        let mut report = |progress: ExportProgress| {
            log::debug!("Export progress {}%", progress.percent());
            let _ = tx.send(ExportEvent::Progress(progress));
            wake();
        };
        let image = render_export(
            &self.snapshot.messages,
            &self.snapshot.chat_name,
            &self.options,
            &mut text,
            &mut report,
            cancel,
        )?;

        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        save_png(&image, &self.output)
    }
}

/// A running export, owned by whoever started it
pub struct ExportHandle {
    rx: Receiver<ExportEvent>,
    cancel: CancelToken,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl ExportHandle {
    /// Next pending event, if any, without blocking
    pub fn try_event(&mut self) -> Option<ExportEvent> {
        match self.rx.try_recv() {
            Ok(event) => {
                if matches!(event, ExportEvent::Finished(_)) {
                    self.finished = true;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker gone without a result: it panicked
                if !self.finished {
                    self.finished = true;
                    log::error!("Export worker exited without a result");
                }
                None
            }
        }
    }

    /// Block until the next event; `None` once the worker is gone
    pub fn wait_event(&mut self) -> Option<ExportEvent> {
        let event = self.rx.recv().ok();
        if matches!(event, Some(ExportEvent::Finished(_)) | None) {
            self.finished = true;
        }
        event
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Wait for the worker thread to exit
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Export worker panicked");
            }
        }
    }
}

/// Start `job` on a low-priority background thread.
///
/// `wake` is called after every event is sent; the GUI passes a closure over
/// its `EventLoopProxy`.
pub fn spawn_export<W>(job: ExportJob, wake: W) -> Result<ExportHandle>
where
    W: Fn() + Send + 'static,
{
    if job.snapshot.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    log::info!(
        "Exporting {} messages of {:?} to {}",
        job.snapshot.len(),
        job.snapshot.chat_name,
        job.output.display()
    );

    let thread_body = move || {
        let result = job.run(&tx, &wake, &worker_cancel);
        match &result {
            Ok(summary) => log::info!("Export finished: {}", summary.path.display()),
            Err(e) => log::warn!("Export failed: {}", e),
        }
        let _ = tx.send(ExportEvent::Finished(result));
        wake();
    };

    #[cfg(not(target_os = "redox"))]
    let thread = {
        use thread_priority::{ThreadBuilderExt, ThreadPriority};
        std::thread::Builder::new()
            .name("transcript-export".to_string())
            .spawn_with_priority(ThreadPriority::Min, move |_| thread_body())
    };
    #[cfg(target_os = "redox")]
    let thread = std::thread::Builder::new()
        .name("transcript-export".to_string())
        .spawn(thread_body);

    let thread = thread.map_err(ExportError::Worker)?;

    Ok(ExportHandle {
        rx,
        cancel,
        thread: Some(thread),
        finished: false,
    })
}
