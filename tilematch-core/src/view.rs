//! Hand-off points between game logic and a view
//!
//! Rendering usually runs on another thread. Snapshots go out through a
//! bounded queue and input events come back through unbounded ones; neither
//! side ever blocks the game loop.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};

use crate::state::GameSnapshot;
use crate::tile::Position;

/// Receives state snapshots from a game loop
pub trait GameView {
    /// Non-blocking hand-off of the latest state
    fn update_game_state(&mut self, snapshot: GameSnapshot);
}

/// View that forwards snapshots over a bounded channel
///
/// When the renderer falls behind and the queue is full, the new snapshot
/// is dropped rather than blocking the loop.
pub struct ChannelView {
    tx: SyncSender<GameSnapshot>,
    dropped: u64,
}

impl ChannelView {
    /// View plus the receiving end for the render thread
    pub fn bounded(capacity: usize) -> (Self, Receiver<GameSnapshot>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (Self { tx, dropped: 0 }, rx)
    }

    /// Snapshots discarded because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl GameView for ChannelView {
    fn update_game_state(&mut self, snapshot: GameSnapshot) {
        match self.tx.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::debug!(dropped = self.dropped, "view queue full, dropping snapshot");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                tracing::warn!("view receiver closed, dropping snapshot");
            }
        }
    }
}

/// Input produced by a view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(char),
    /// Click on a board cell
    Mouse(Position),
}

/// Producer side of the input queues; cloneable across threads
#[derive(Clone)]
pub struct InputSender {
    keys: Sender<char>,
    mouse: Sender<Position>,
}

impl InputSender {
    /// Queue an event; returns false if the game side has gone away
    pub fn send(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.keys.send(key).is_ok(),
            InputEvent::Mouse(pos) => self.mouse.send(pos).is_ok(),
        }
    }
}

/// Consumer side of the input queues, polled by `handle_input`
pub struct InputQueue {
    keys: Receiver<char>,
    mouse: Receiver<Position>,
}

impl InputQueue {
    pub fn channel() -> (InputSender, InputQueue) {
        let (key_tx, key_rx) = mpsc::channel();
        let (mouse_tx, mouse_rx) = mpsc::channel();
        (
            InputSender {
                keys: key_tx,
                mouse: mouse_tx,
            },
            InputQueue {
                keys: key_rx,
                mouse: mouse_rx,
            },
        )
    }

    /// Next pending key press, if any
    pub fn key_event(&self) -> Option<char> {
        poll(&self.keys)
    }

    /// Next pending click, if any
    pub fn mouse_event(&self) -> Option<Position> {
        poll(&self.mouse)
    }
}

fn poll<T>(rx: &Receiver<T>) -> Option<T> {
    match rx.try_recv() {
        Ok(value) => Some(value),
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
}
