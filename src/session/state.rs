//! A complete redaction session over an in-memory raster
//!
//! Owns the canvas, the event log and the selection controller, and adds the
//! outer affordances: loading an image and exporting the result as PNG.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

use super::event_log::{EventLog, PristineImage};
use super::messages::SessionMsg;
use super::selection::{OutlineStyle, SelectionController};
use crate::buffer::{self, PixelBuffer};
use crate::config::RedactorConfig;
use crate::domain::{Action, Point, RedactionKind, Rectangle};
use crate::redaction::RedactionLibrary;
use crate::render::{OverlaySurface, Raster};

pub struct RedactionSession {
    log: EventLog<Raster>,
    selection: SelectionController<OverlaySurface>,
}

impl RedactionSession {
    /// Empty canvas sized from the config. Must be called inside a Tokio runtime.
    pub fn new(config: &RedactorConfig) -> Result<Self> {
        let (width, height) = (config.canvas_width, config.canvas_height);
        let canvas = buffer::share(Raster::new(width, height));
        let log = EventLog::unbound(canvas, RedactionLibrary::standard(config.style()))
            .context("Failed to create event log")?;
        let outline = OutlineStyle {
            color: config.outline_color.to_rgba_u8(),
            width: config.outline_width,
        };
        let selection = SelectionController::new(OverlaySurface::new(width, height), config.default_mode)
            .with_outline(outline);
        Ok(Self { log, selection })
    }

    /// Decode an image file and make it the new base image
    pub async fn load_image(&mut self, path: &Path) -> Result<()> {
        let path_buf = path.to_path_buf();
        let image = tokio::task::spawn_blocking(move || -> Result<RgbaImage> {
            let image = image::open(&path_buf)
                .with_context(|| format!("Failed to decode image: {}", path_buf.display()))?;
            Ok(image.into_rgba8())
        })
        .await??;
        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.load_decoded(image).await
    }

    /// Draw `image` at the canvas origin, capture it as the pristine state and
    /// start a fresh history
    pub async fn load_decoded(&mut self, image: RgbaImage) -> Result<()> {
        // Pending jobs belong to the old image
        if let Err(err) = self.log.settle().await {
            log::warn!("discarding failed redaction from previous image: {err}");
        }

        let pristine = {
            let mut canvas = buffer::lock(self.log.buffer())?;
            let blank = RgbaImage::new(canvas.width(), canvas.height());
            canvas.write_region(0, 0, &blank);
            canvas.draw_image(
                &image,
                None,
                &Rectangle::full(image.width(), image.height()),
            );
            PristineImage::capture(&*canvas)?
        };

        self.log.clear();
        self.log.bind_reset(pristine);
        Ok(())
    }

    pub fn handle(&mut self, msg: SessionMsg) -> Result<Option<Action>> {
        match msg {
            SessionMsg::Down { x, y } => self.selection.pointer_down(Point::new(x, y)),
            SessionMsg::Move { x, y } => self.selection.pointer_move(Point::new(x, y)),
            SessionMsg::Up { x, y } => {
                return Ok(self.selection.pointer_up(Point::new(x, y), &mut self.log)?);
            }
            SessionMsg::Mode { mode } => self.selection.set_mode(mode),
            SessionMsg::Undo => self.log.undo()?,
            SessionMsg::Redo => self.log.redo()?,
            // Handled by `run`, which can await
            SessionMsg::Settle => {}
        }
        Ok(None)
    }

    /// Feed a sequence of messages, settling where the script asks to
    pub async fn run(&mut self, script: &[SessionMsg]) -> Result<()> {
        for (index, msg) in script.iter().enumerate() {
            if *msg == SessionMsg::Settle {
                self.settle().await?;
                continue;
            }
            self.handle(*msg)
                .with_context(|| format!("Script step {index} ({msg:?}) failed"))?;
        }
        Ok(())
    }

    pub fn mode(&self) -> RedactionKind {
        self.selection.mode()
    }

    pub fn set_mode(&mut self, mode: RedactionKind) {
        self.selection.set_mode(mode);
    }

    pub fn undo(&mut self) -> Result<()> {
        Ok(self.log.undo()?)
    }

    pub fn redo(&mut self) -> Result<()> {
        Ok(self.log.redo()?)
    }

    pub async fn settle(&mut self) -> Result<()> {
        Ok(self.log.settle().await?)
    }

    /// Copy of the canvas once every pending redaction has landed
    pub async fn snapshot(&mut self) -> Result<RgbaImage> {
        self.settle().await?;
        let canvas = buffer::lock(self.log.buffer())?;
        Ok(canvas.image().clone())
    }

    /// PNG bytes of the settled canvas
    pub async fn export_png(&mut self) -> Result<Vec<u8>> {
        self.settle().await?;
        let snapshot = buffer::lock(self.log.buffer())?.encode_snapshot()?;
        Ok(snapshot.into_bytes())
    }

    /// Write the settled canvas to `path` as PNG, replacing it atomically
    pub async fn save_png(&mut self, path: &Path) -> Result<PathBuf> {
        let png = self.export_png().await?;
        let path = path.to_path_buf();
        let saved = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let mut file = tempfile::Builder::new()
                .prefix(".redactor-")
                .suffix(".png")
                .tempfile_in(&dir)?;
            file.write_all(&png)?;
            file.persist(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .await??;
        log::info!("saved {}", saved.display());
        Ok(saved)
    }

    pub fn log(&self) -> &EventLog<Raster> {
        &self.log
    }

    pub fn selection(&self) -> &SelectionController<OverlaySurface> {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn photo(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
        })
    }

    async fn session_with_photo() -> RedactionSession {
        let mut session = RedactionSession::new(&RedactorConfig::default()).unwrap();
        session.load_decoded(photo(500, 500)).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_scripted_black_out_undo_redo() {
        let mut session = session_with_photo().await;
        let original = photo(500, 500);

        for msg in SessionMsg::drag(Point::new(10.0, 10.0), Point::new(60.0, 60.0)) {
            session.handle(msg).unwrap();
        }
        let image = session.snapshot().await.unwrap();
        assert_eq!(*image.get_pixel(30, 30), Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(5, 5), original.get_pixel(5, 5));

        session.undo().unwrap();
        let image = session.snapshot().await.unwrap();
        assert_eq!(image.get_pixel(30, 30), original.get_pixel(30, 30));

        session.redo().unwrap();
        let image = session.snapshot().await.unwrap();
        assert_eq!(*image.get_pixel(30, 30), Rgba([0, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_undo_before_load_fails() {
        let mut session = RedactionSession::new(&RedactorConfig::default()).unwrap();
        for msg in SessionMsg::drag(Point::new(0.0, 0.0), Point::new(5.0, 5.0)) {
            session.handle(msg).unwrap();
        }
        let err = session.undo().unwrap_err();
        assert!(err.to_string().contains("reset hook not configured"));
    }

    #[tokio::test]
    async fn test_loading_a_new_image_starts_fresh() {
        let mut session = session_with_photo().await;
        session
            .run(&SessionMsg::drag(Point::new(0.0, 0.0), Point::new(100.0, 100.0)))
            .await
            .unwrap();
        assert_eq!(session.log().len(), 1);

        let second = RgbaImage::from_pixel(200, 100, Rgba([9, 99, 199, 255]));
        session.load_decoded(second).await.unwrap();
        assert!(session.log().is_empty());

        let image = session.snapshot().await.unwrap();
        // Smaller image: old content outside it is cleared
        assert_eq!(*image.get_pixel(50, 50), Rgba([9, 99, 199, 255]));
        assert_eq!(image.get_pixel(300, 300).0[3], 0);

        // Undo targets the new pristine image
        session.run(&SessionMsg::drag(Point::new(0.0, 0.0), Point::new(20.0, 20.0))).await.unwrap();
        session.undo().unwrap();
        let image = session.snapshot().await.unwrap();
        assert_eq!(*image.get_pixel(10, 10), Rgba([9, 99, 199, 255]));
    }

    #[tokio::test]
    async fn test_run_script_with_mode_switch() {
        let mut session = session_with_photo().await;
        let script = [
            SessionMsg::Mode {
                mode: RedactionKind::Blur,
            },
            SessionMsg::Down { x: 100.0, y: 100.0 },
            SessionMsg::Up { x: 200.0, y: 200.0 },
            SessionMsg::Settle,
            SessionMsg::Mode {
                mode: RedactionKind::BlackOut,
            },
            SessionMsg::Down { x: 300.0, y: 300.0 },
            SessionMsg::Up { x: 350.0, y: 350.0 },
        ];
        session.run(&script).await.unwrap();

        let kinds: Vec<_> = session.log().actions().iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, [RedactionKind::Blur, RedactionKind::BlackOut]);
        assert_eq!(session.mode(), RedactionKind::BlackOut);
    }

    #[tokio::test]
    async fn test_save_png_round_trip() {
        let mut session = session_with_photo().await;
        session
            .run(&SessionMsg::drag(Point::new(40.0, 40.0), Point::new(80.0, 80.0)))
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let saved = session.save_png(&path).await.unwrap();
        assert_eq!(saved, path);

        let written = image::open(&path).unwrap().into_rgba8();
        assert_eq!(written, session.snapshot().await.unwrap());
        assert_eq!(*written.get_pixel(60, 60), Rgba([0, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_load_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        photo(120, 80).save(&path).unwrap();

        let mut session = RedactionSession::new(&RedactorConfig::default()).unwrap();
        session.load_image(&path).await.unwrap();
        let image = session.snapshot().await.unwrap();
        assert_eq!(image.get_pixel(100, 70), photo(120, 80).get_pixel(100, 70));

        let missing = session.load_image(&dir.path().join("missing.png")).await;
        assert!(missing.is_err());
    }
}
