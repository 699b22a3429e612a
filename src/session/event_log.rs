//! Undo/redo by replay
//!
//! The log stores every applied action plus a cursor. The buffer, once all
//! queued jobs have settled, always equals the pristine image with
//! `actions[..cursor]` applied in order.
//!
//! Buffer jobs run on a single serial lane: a job starts only after the one
//! queued before it has finished, and an undo's replay awaits each action
//! before the next. Blur finishes asynchronously, so without the lane a
//! replayed blur could land after a later action.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use image::RgbaImage;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::buffer::{self, Filter, PixelBuffer, SharedBuffer};
use crate::domain::{Action, Rectangle};
use crate::error::{RedactError, Result};
use crate::redaction::{Job, RedactionLibrary};

/// Restores the buffer to the pristine base image
pub trait ResetHook<B>: Send + Sync + 'static {
    fn reset(&self, buffer: &mut B) -> Result<()>;

    /// Fail now if `reset` is bound to fail on `buffer`. `undo()` calls this
    /// before it moves the cursor.
    fn check(&self, _buffer: &B) -> Result<()> {
        Ok(())
    }
}

impl<B, F> ResetHook<B> for F
where
    F: Fn(&mut B) -> Result<()> + Send + Sync + 'static,
{
    fn reset(&self, buffer: &mut B) -> Result<()> {
        self(buffer)
    }
}

/// Reset hook holding a copy of the whole raster as it was when captured
#[derive(Clone, Debug)]
pub struct PristineImage {
    image: Arc<RgbaImage>,
}

impl PristineImage {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Copy the buffer's current pixels
    pub fn capture<B: PixelBuffer>(buffer: &B) -> Result<Self> {
        let image = buffer
            .read_region(&Rectangle::full(buffer.width(), buffer.height()))
            .ok_or(RedactError::EmptyBuffer {
                width: buffer.width(),
                height: buffer.height(),
            })?;
        Ok(Self::new(image))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl<B: PixelBuffer> ResetHook<B> for PristineImage {
    fn reset(&self, buffer: &mut B) -> Result<()> {
        self.check(buffer)?;
        buffer.set_filter(Filter::None);
        buffer.write_region(0, 0, &self.image);
        Ok(())
    }

    fn check(&self, buffer: &B) -> Result<()> {
        if (buffer.width(), buffer.height()) != self.image.dimensions() {
            return Err(RedactError::SizeMismatch {
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        Ok(())
    }
}

/// Serial job queue on the current runtime
struct Lane {
    runtime: Handle,
    tail: Option<JoinHandle<()>>,
    failures: Arc<Mutex<Vec<RedactError>>>,
}

impl Lane {
    fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| RedactError::NoRuntime)?;
        Ok(Self {
            runtime,
            tail: None,
            failures: Arc::default(),
        })
    }

    /// Queue `job` behind everything already queued
    fn enqueue(&mut self, label: &'static str, job: Job) {
        let previous = self.tail.take();
        let failures = self.failures.clone();
        self.tail = Some(self.runtime.spawn(async move {
            if let Some(previous) = previous
                && let Err(err) = previous.await
            {
                log::error!("previous redaction job aborted: {err}");
            }
            if let Err(err) = job.await {
                log::error!("{label} failed: {err}");
                failures
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(err);
            }
        }));
    }

    /// Wait for the queue to drain; report the first failure since the last call
    async fn settle(&mut self) -> Result<()> {
        if let Some(tail) = self.tail.take() {
            tail.await?;
        }
        let first = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
            .next();
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Cursor-tracked record of applied actions
pub struct EventLog<B: PixelBuffer> {
    events: Vec<Action>,
    cursor: usize,
    buffer: SharedBuffer<B>,
    library: RedactionLibrary<B>,
    reset: Option<Arc<dyn ResetHook<B>>>,
    lane: Lane,
}

impl<B: PixelBuffer> EventLog<B> {
    /// Log with its pristine-state provider. Must be called inside a Tokio runtime.
    pub fn new(
        buffer: SharedBuffer<B>,
        library: RedactionLibrary<B>,
        reset: impl ResetHook<B>,
    ) -> Result<Self> {
        let mut log = Self::unbound(buffer, library)?;
        log.bind_reset(reset);
        Ok(log)
    }

    /// Log with no reset hook yet; `undo()` fails until one is bound
    pub fn unbound(buffer: SharedBuffer<B>, library: RedactionLibrary<B>) -> Result<Self> {
        Ok(Self {
            events: Vec::new(),
            cursor: 0,
            buffer,
            library,
            reset: None,
            lane: Lane::new()?,
        })
    }

    /// Replace the pristine-state provider, e.g. after a new image was loaded
    pub fn bind_reset(&mut self, reset: impl ResetHook<B>) {
        self.reset = Some(Arc::new(reset));
    }

    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    /// Record `action` at the cursor and apply it to the buffer.
    ///
    /// Entries past the cursor (undone actions) are discarded first.
    pub fn append(&mut self, action: Action) -> Result<()> {
        let job = self.library.job(&action, &self.buffer)?;
        self.events.truncate(self.cursor);
        self.events.push(action);
        self.cursor += 1;
        log::debug!(
            "append {} at {} (cursor {})",
            action.kind(),
            self.cursor - 1,
            self.cursor
        );
        self.lane.enqueue("append", job);
        Ok(())
    }

    /// Remove the most recent action from the buffer by replaying all the others.
    ///
    /// No-op at the start of the log. Fails without moving the cursor when
    /// the reset hook is missing or rejects the buffer.
    pub fn undo(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Ok(());
        }
        let reset = self.reset.clone().ok_or(RedactError::ResetNotConfigured)?;
        reset.check(&*buffer::lock(&self.buffer)?)?;
        let replay = self.events[..self.cursor - 1]
            .iter()
            .map(|action| self.library.job(action, &self.buffer))
            .collect::<Result<Vec<_>>>()?;

        let shared = self.buffer.clone();
        let job = async move {
            {
                let mut buffer = buffer::lock(&shared)?;
                reset.reset(&mut *buffer)?;
            }
            for step in replay {
                step.await?;
            }
            Ok::<_, RedactError>(())
        }
        .boxed();

        self.cursor -= 1;
        log::debug!("undo: replaying {} action(s)", self.cursor);
        self.lane.enqueue("undo", job);
        Ok(())
    }

    /// Reapply the action just past the cursor. No-op if there is none.
    pub fn redo(&mut self) -> Result<()> {
        let Some(action) = self.events.get(self.cursor).copied() else {
            return Ok(());
        };
        let job = self.library.job(&action, &self.buffer)?;
        self.cursor += 1;
        log::debug!("redo {} (cursor {})", action.kind(), self.cursor);
        self.lane.enqueue("redo", job);
        Ok(())
    }

    /// Drop every entry without touching the buffer
    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }

    /// Resolves once every queued job has finished
    pub async fn settle(&mut self) -> Result<()> {
        self.lane.settle().await
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every stored action, including undone ones past the cursor
    pub fn actions(&self) -> &[Action] {
        &self.events
    }

    /// Actions currently reflected in the buffer
    pub fn applied(&self) -> &[Action] {
        &self.events[..self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.events.len()
    }

    pub fn buffer(&self) -> &SharedBuffer<B> {
        &self.buffer
    }

    pub fn library(&self) -> &RedactionLibrary<B> {
        &self.library
    }

}
