//! Interactive edit session.
//!
//! A [`Session`] owns a worker thread running the pipeline state machine.
//! Slider edits update a pending parameter snapshot and arm a debounce
//! window; a burst of edits coalesces into a single render once the window
//! closes, keeping a dragged slider from queueing a render per event.
//! Finished frames (or failures) are delivered to the subscriber channel
//! handed in at spawn time.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::develop::common::{DevelopError, Result};
use crate::develop::params::Parameters;
use crate::develop::pipeline::{DevelopPipeline, PipelineState};
use crate::develop::raw::{RawDecoder, RawInput, RgbImage8};

/// How long a slider has to stay still before a render is kicked off.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

enum Command {
    LoadPath(PathBuf),
    Load(Arc<RawInput>),
    Edit(Parameters),
    Shutdown,
}

pub struct Session {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
    params: Parameters,
}

impl Session {
    /// Spawn the worker. Rendered frames arrive on `frames`; a decode or
    /// preprocess failure is delivered as an `Err` so the subscriber can
    /// keep showing the previous image.
    pub fn spawn(pipeline: DevelopPipeline, frames: Sender<Result<RgbImage8>>) -> Result<Self> {
        Self::spawn_worker(pipeline, None, frames)
    }

    /// Spawn the worker with a decoder attached, enabling [`Session::load_path`].
    pub fn spawn_with_decoder<D>(
        pipeline: DevelopPipeline,
        decoder: D,
        frames: Sender<Result<RgbImage8>>,
    ) -> Result<Self>
    where
        D: RawDecoder + Send + 'static,
    {
        Self::spawn_worker(pipeline, Some(Box::new(decoder)), frames)
    }

    fn spawn_worker(
        pipeline: DevelopPipeline,
        decoder: Option<Box<dyn RawDecoder + Send>>,
        frames: Sender<Result<RgbImage8>>,
    ) -> Result<Self> {
        let (commands, receiver) = channel();
        let worker = thread::Builder::new()
            .name("develop-session".to_string())
            .spawn(move || worker_loop(pipeline, decoder, receiver, frames))?;

        Ok(Self {
            commands,
            worker: Some(worker),
            params: Parameters::default(),
        })
    }

    /// Read and decode a camera file on the worker, then preprocess and
    /// render it with the current parameters. Requires a decoder attached at
    /// spawn time.
    pub fn load_path(&self, path: impl Into<PathBuf>) {
        self.send(Command::LoadPath(path.into()));
    }

    /// Hand an already decoded image to the worker; preprocesses and renders
    /// with the current parameters.
    pub fn load(&self, raw: RawInput) {
        self.send(Command::Load(Arc::new(raw)));
    }

    pub fn set_exposure_tick(&mut self, tick: i32) {
        self.params.exposure = Parameters::exposure_from_tick(tick);
        self.send(Command::Edit(self.params));
    }

    pub fn set_contrast_tick(&mut self, tick: i32) {
        self.params.contrast = Parameters::contrast_from_tick(tick);
        self.send(Command::Edit(self.params));
    }

    pub fn set_saturation_tick(&mut self, tick: i32) {
        self.params.saturation = Parameters::saturation_from_tick(tick);
        self.send(Command::Edit(self.params));
    }

    /// The parameter snapshot the next render will use.
    pub fn parameters(&self) -> Parameters {
        self.params
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("Develop worker is gone, dropping command");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    pipeline: DevelopPipeline,
    decoder: Option<Box<dyn RawDecoder + Send>>,
    commands: Receiver<Command>,
    frames: Sender<Result<RgbImage8>>,
) {
    let mut state = PipelineState::new();
    let mut current = Parameters::default();
    let mut pending: Option<Parameters> = None;

    loop {
        let command = if pending.is_some() {
            match commands.recv_timeout(DEBOUNCE_DELAY) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        };

        match command {
            Some(Command::LoadPath(path)) => {
                pending = None;
                match decode_and_load(&pipeline, decoder.as_deref(), &mut state, &path) {
                    Ok(()) => deliver(&pipeline, &mut state, current, &frames),
                    Err(e) => {
                        let _ = frames.send(Err(e));
                    }
                }
            }
            Some(Command::Load(raw)) => {
                pending = None;
                match state.load(&pipeline, &raw) {
                    // Render right away so the new image appears without a
                    // slider nudge
                    Ok(()) => deliver(&pipeline, &mut state, current, &frames),
                    Err(e) => {
                        let _ = frames.send(Err(e));
                    }
                }
            }
            Some(Command::Edit(params)) => {
                // Restart the debounce window; only the latest snapshot
                // survives the burst
                current = params;
                pending = Some(params);
            }
            Some(Command::Shutdown) => break,
            None => {
                // Debounce window closed with no further edits
                if let Some(params) = pending.take() {
                    deliver(&pipeline, &mut state, params, &frames);
                }
            }
        }
    }
    debug!("Develop worker shutting down");
}

fn decode_and_load(
    pipeline: &DevelopPipeline,
    decoder: Option<&(dyn RawDecoder + Send)>,
    state: &mut PipelineState,
    path: &std::path::Path,
) -> Result<()> {
    let decoder = decoder.ok_or_else(|| {
        DevelopError::Decode("no decoder attached to this session".to_string())
    })?;
    let data = std::fs::read(path)?;
    let raw = decoder.decode(&data)?;
    state.load(pipeline, &raw)
}

fn deliver(
    pipeline: &DevelopPipeline,
    state: &mut PipelineState,
    params: Parameters,
    frames: &Sender<Result<RgbImage8>>,
) {
    if state.is_empty() {
        // Edits before the first load have nothing to render against
        return;
    }
    let result = state.render(pipeline, params).map(RgbImage8::clone);
    if frames.send(result).is_err() {
        warn!("Frame subscriber is gone, dropping render");
    }
}
