//! Input collaborators and remote control via Unix socket
//!
//! Every input source turns whatever it listens to into [`Command`]s and
//! applies them to the [`ControlState`] the frame loop reads each tick.

use log::{debug, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::game::ControlState;

const SOCKET_PATH: &str = "/tmp/invaders.sock";
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Commands an input source can issue to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    Pause,
    Resume,
    /// Advance one tick while paused
    Step,
}

impl Command {
    /// Parse a command word. Case and surrounding whitespace are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "q" | "quit" | "exit" => Some(Self::Quit),
            "p" | "toggle" => Some(Self::TogglePause),
            "pause" => Some(Self::Pause),
            "resume" | "continue" => Some(Self::Resume),
            "step" | "." => Some(Self::Step),
            _ => None,
        }
    }
}

/// Something the frame loop polls once per tick for commands
pub trait InputSource {
    /// Drain pending input and apply it to `control`. Must not block.
    fn poll(&mut self, control: &mut ControlState);
}

/// Controller that listens for commands on a Unix socket
pub struct Controller {
    receiver: Receiver<Command>,
    path: PathBuf,
    shutdown: Arc<AtomicBool>,
    listener_thread: Option<thread::JoinHandle<()>>,
}

impl Controller {
    /// Create a new controller listening on the Unix socket
    pub fn new() -> Result<Self> {
        Self::bind(SOCKET_PATH)
    }

    /// Listen on `path`, replacing a stale socket file left there
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path).map_err(|e| {
            Error::Control(format!("failed to bind {}: {}", path.display(), e))
        })?;

        // Non-blocking so the accept loop can check for shutdown
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::Control(format!("failed to set non-blocking: {}", e)))?;

        let (sender, receiver) = mpsc::channel();
        let shutdown = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            Self::listener_loop(listener, sender, &flag);
        });

        Ok(Self {
            receiver,
            path,
            shutdown,
            listener_thread: Some(handle),
        })
    }

    fn listener_loop(listener: UnixListener, sender: Sender<Command>, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || {
                        Self::handle_client(stream, sender);
                    });
                },
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                },
                Err(e) => {
                    debug!("control socket closed: {}", e);
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: Sender<Command>) {
        // Accepted sockets inherit non-blocking mode on some platforms
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("control client: {}", e);
            return;
        }
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(std::result::Result::ok) {
            match Command::parse(&line) {
                Some(cmd) => {
                    if sender.send(cmd).is_err() {
                        break;
                    }
                },
                None => warn!("control: unknown command {:?}", line.trim()),
            }
        }
    }

    /// Get any pending commands (non-blocking)
    pub fn drain(&self) -> Vec<Command> {
        self.receiver.try_iter().collect()
    }

    /// Default socket path used by [`Controller::new`]
    pub fn socket_path() -> &'static str {
        SOCKET_PATH
    }
}

impl InputSource for Controller {
    fn poll(&mut self, control: &mut ControlState) {
        for cmd in self.drain() {
            control.apply(cmd);
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.listener_thread.take() {
            let _ = handle.join();
        }
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Input source fed from a channel, for scripted runs and tests
pub struct ChannelInput {
    receiver: Receiver<Command>,
}

impl ChannelInput {
    pub fn new() -> (Sender<Command>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self { receiver })
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, control: &mut ControlState) {
        for cmd in self.receiver.try_iter() {
            control.apply(cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_words() {
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("  EXIT \n"), Some(Command::Quit));
        assert_eq!(Command::parse("p"), Some(Command::TogglePause));
        assert_eq!(Command::parse("pause"), Some(Command::Pause));
        assert_eq!(Command::parse("Resume"), Some(Command::Resume));
        assert_eq!(Command::parse("step"), Some(Command::Step));
        assert_eq!(Command::parse("fire"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_channel_input_applies_commands() {
        let (sender, mut input) = ChannelInput::new();
        let mut control = ControlState::default();
        input.poll(&mut control);
        assert!(!control.quit_requested());

        sender.send(Command::Pause).unwrap();
        sender.send(Command::Quit).unwrap();
        input.poll(&mut control);
        assert!(control.is_paused());
        assert!(control.quit_requested());
    }

    #[test]
    fn test_socket_round_trip_and_shutdown() {
        use std::io::Write;
        use std::time::Instant;

        let path = std::env::temp_dir()
            .join(format!("invaders-control-{}.sock", std::process::id()));
        let mut controller = Controller::bind(&path).unwrap();

        let mut client = UnixStream::connect(&path).unwrap();
        client.write_all(b"pause\nbogus\nquit\n").unwrap();
        drop(client);

        let mut control = ControlState::default();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !control.quit_requested() && Instant::now() < deadline {
            controller.poll(&mut control);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(control.is_paused());
        assert!(control.quit_requested());

        // Drop stops the accept thread before removing the socket file
        drop(controller);
        assert!(!path.exists());
    }
}
