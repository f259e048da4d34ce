//! Cry playback on a dedicated audio thread

use std::io::{self, Cursor};
use std::sync::mpsc;
use std::sync::OnceLock;
use std::thread;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("no audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("playback failed: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("could not decode cry: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("audio thread unavailable: {0}")]
    Spawn(#[from] io::Error),
    #[error("audio thread stopped")]
    Closed,
}

struct PlayRequest {
    bytes: Vec<u8>,
    reply: mpsc::Sender<Result<(), AudioError>>,
}

/// Owns the output stream; the stream handle is not `Send`, so it lives on
/// its own thread and is opened on the first request.
pub struct CryPlayer {
    requests: mpsc::Sender<PlayRequest>,
}

impl CryPlayer {
    pub fn spawn() -> Result<Self, AudioError> {
        let (requests, inbox) = mpsc::channel::<PlayRequest>();
        thread::Builder::new()
            .name("cry-player".into())
            .spawn(move || run_player(inbox))?;
        Ok(Self { requests })
    }

    /// Stops whatever is playing and starts `bytes`. Returns once playback
    /// has started.
    pub fn play(&self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let (reply, response) = mpsc::channel();
        self.requests
            .send(PlayRequest { bytes, reply })
            .map_err(|_| AudioError::Closed)?;
        response.recv().map_err(|_| AudioError::Closed)?
    }
}

fn run_player(inbox: mpsc::Receiver<PlayRequest>) {
    let mut output: Option<(rodio::OutputStream, rodio::OutputStreamHandle)> = None;
    let mut current: Option<rodio::Sink> = None;

    while let Ok(request) = inbox.recv() {
        if let Some(sink) = current.take() {
            sink.stop();
        }
        let result = start(&mut output, request.bytes).map(|sink| {
            current = Some(sink);
        });
        if let Err(error) = &result {
            tracing::warn!(%error, "cry playback failed");
        }
        let _ = request.reply.send(result);
    }
    tracing::debug!("cry player shutting down");
}

fn start(
    output: &mut Option<(rodio::OutputStream, rodio::OutputStreamHandle)>,
    bytes: Vec<u8>,
) -> Result<rodio::Sink, AudioError> {
    let stream = match output.take() {
        Some(stream) => stream,
        None => rodio::OutputStream::try_default()?,
    };
    let (_, handle) = output.insert(stream);
    let source = rodio::Decoder::new(Cursor::new(bytes))?;
    let sink = rodio::Sink::try_new(handle)?;
    sink.append(source);
    Ok(sink)
}

static PLAYER: OnceLock<CryPlayer> = OnceLock::new();

/// Play a cry on the shared player. Blocking; call from `spawn_blocking`.
pub fn play_cry(bytes: Vec<u8>) -> Result<(), AudioError> {
    let player = match PLAYER.get() {
        Some(player) => player,
        None => {
            let spawned = CryPlayer::spawn()?;
            PLAYER.get_or_init(|| spawned)
        }
    };
    player.play(bytes)
}
