//! Bridge from the external hand tracker into the ECS.
//!
//! A [`HandSource`] runs on its own thread and pushes [`TrackerEvent`]s into a channel.
//! The game only ever looks at the newest event per frame ([`HandFeed::drain_latest`]),
//! so a slow consumer never builds up a backlog of stale hand positions.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use bevy::prelude::*;

use super::landmarks::HandFrame;

/// What a tracker reports per camera frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Frame(HandFrame),
    /// No hand visible (or the frame could not be read).
    Lost,
    /// The tracker cannot continue.
    Failed(String),
}

/// Anything that can deliver [`TrackerEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn name(&self) -> &str;
    fn run(self: Box<Self>, tx: Sender<TrackerEvent>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> HandFeed {
    let (tx, rx) = mpsc::channel();
    let name = source.name().to_string();
    let spawned = thread::Builder::new()
        .name(format!("hand-source-{name}"))
        .spawn(move || Box::new(source).run(tx));
    if let Err(e) = spawned {
        // The receiver sees a disconnected channel; report the cause explicitly.
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(TrackerEvent::Failed(format!("spawn tracker thread: {e}")));
        return HandFeed::from_receiver(rx);
    }
    info!(target: "tracker", "hand source '{name}' started");
    HandFeed::from_receiver(rx)
}

/// Newline-delimited JSON frames (see [`HandFrame::parse_line`]).
pub struct JsonLinesSource<R> {
    name: String,
    reader: R,
    pacing: Option<Duration>,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            pacing: None,
        }
    }

    /// Sleep between frames (replaying a recording at camera rate).
    pub fn with_pacing(mut self, interval: Duration) -> Self {
        self.pacing = Some(interval);
        self
    }
}

impl JsonLinesSource<BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new("stdin", BufReader::new(io::stdin()))
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Replays a recorded session at roughly 30 frames per second.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file))
            .with_pacing(Duration::from_millis(33)))
    }
}

impl<R: BufRead + Send + 'static> HandSource for JsonLinesSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(self: Box<Self>, tx: Sender<TrackerEvent>) {
        let JsonLinesSource {
            name,
            reader,
            pacing,
        } = *self;
        for (line_no, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    let _ = tx.send(TrackerEvent::Failed(format!("{name}: read error: {e}")));
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = match HandFrame::parse_line(&line) {
                Ok(Some(frame)) => TrackerEvent::Frame(frame),
                Ok(None) => TrackerEvent::Lost,
                Err(e) => {
                    warn!(target: "tracker", "{name}:{}: malformed frame ignored: {e}", line_no + 1);
                    TrackerEvent::Lost
                }
            };
            if tx.send(event).is_err() {
                // Feed stopped on the game side.
                return;
            }
            if let Some(dt) = pacing {
                thread::sleep(dt);
            }
        }
        debug!(target: "tracker", "{name}: end of input");
    }
}

/// Result of polling the feed once.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPoll {
    /// Nothing new since the last poll.
    Idle,
    /// Newest state: a frame, or `None` when the hand was lost.
    Latest(Option<HandFrame>),
    Failed(String),
    /// The source finished or went away.
    Disconnected,
}

/// Receiving end of a running hand source. Default is detached (no source).
#[derive(Resource, Default)]
pub struct HandFeed {
    rx: Option<Mutex<Receiver<TrackerEvent>>>,
}

impl HandFeed {
    pub fn from_receiver(rx: Receiver<TrackerEvent>) -> Self {
        Self {
            rx: Some(Mutex::new(rx)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.rx.is_some()
    }

    /// Drops the receiver; the source thread exits on its next send.
    /// Returns whether a source was attached. Safe to call repeatedly.
    pub fn stop(&mut self) -> bool {
        self.rx.take().is_some()
    }

    /// Consume everything queued and keep only the newest state.
    pub fn drain_latest(&mut self) -> FeedPoll {
        let Some(rx) = self.rx.as_mut() else {
            return FeedPoll::Idle;
        };
        let rx = rx.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut latest: Option<Option<HandFrame>> = None;
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(TrackerEvent::Frame(frame)) => latest = Some(Some(frame)),
                Ok(TrackerEvent::Lost) => latest = Some(None),
                Ok(TrackerEvent::Failed(msg)) => {
                    self.rx = None;
                    return FeedPoll::Failed(msg);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        match latest {
            Some(state) => FeedPoll::Latest(state),
            None if disconnected => {
                self.rx = None;
                FeedPoll::Disconnected
            }
            None => FeedPoll::Idle,
        }
    }
}

/// The tracker reported an unrecoverable failure.
#[derive(Event, Debug, Clone)]
pub struct TrackerFault(pub String);

/// Moves the newest tracker state into [`LatestHandFrame`](super::landmarks::LatestHandFrame).
pub fn poll_hand_feed(
    mut feed: ResMut<HandFeed>,
    mut latest: ResMut<super::landmarks::LatestHandFrame>,
    mut faults: EventWriter<TrackerFault>,
) {
    match feed.drain_latest() {
        FeedPoll::Idle => {}
        FeedPoll::Latest(frame) => latest.0 = frame,
        FeedPoll::Disconnected => {
            info!(target: "tracker", "hand source finished; treating as no hand");
            latest.0 = None;
        }
        FeedPoll::Failed(msg) => {
            error!(target: "tracker", "hand tracker failed: {msg}");
            latest.0 = None;
            faults.write(TrackerFault(msg));
        }
    }
}
