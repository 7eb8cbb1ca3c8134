//! MQTT remote control
//!
//! Connects to an MQTT broker and subscribes to a topic. Each message is a
//! command word (`quit`, `pause`, ...) or JSON `{"command": "..."}` and is
//! forwarded to the frame loop.

use log::{info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::control::{Command, InputSource};
use crate::error::{Error, Result};
use crate::game::ControlState;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 1883;
const DEFAULT_TOPIC: &str = "invaders";

/// JSON format for incoming messages (optional)
#[derive(Deserialize)]
struct JsonMessage {
    command: String,
}

/// Decode a payload as JSON first, falling back to a bare command word
fn parse_payload(payload: &[u8]) -> Option<Command> {
    let text = std::str::from_utf8(payload).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<JsonMessage>(text) {
        Ok(json) => Command::parse(&json.command),
        Err(_) => Command::parse(text),
    }
}

/// Split `HOST[:TOPIC]` as given on the command line
pub fn parse_target(target: &str) -> (&str, &str) {
    match target.split_once(':') {
        Some((host, topic)) => (host, topic),
        None => (target, ""),
    }
}

/// MQTT client that receives commands in a background thread
pub struct MqttClient {
    receiver: Receiver<Command>,
    // Dropping the client would close the connection's request channel
    _client: Client,
    _thread: thread::JoinHandle<()>,
}

impl MqttClient {
    /// Create a new MQTT client and connect to the broker.
    /// Fails immediately if connection cannot be established.
    pub fn new(host: &str, topic: &str) -> Result<Self> {
        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };

        let mut options = MqttOptions::new("invaders", host, DEFAULT_PORT);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);

        client.subscribe(topic, QoS::AtMostOnce).map_err(|e| {
            Error::Control(format!("failed to subscribe to topic '{}': {}", topic, e))
        })?;

        // Poll once so an unreachable broker fails setup instead of the loop
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => {
                return Err(Error::Control(format!(
                    "failed to connect to MQTT broker at {}:{} - {}",
                    host, DEFAULT_PORT, e
                )));
            },
            None => {
                return Err(Error::Control(format!(
                    "failed to connect to MQTT broker at {}:{} - connection closed",
                    host, DEFAULT_PORT
                )));
            },
        }

        let (sender, receiver) = mpsc::channel();
        let topic_owned = topic.to_string();

        let handle = thread::spawn(move || {
            Self::message_loop(connection, sender, &topic_owned);
        });

        info!("MQTT: connected to {}:{}, subscribed to '{}'", host, DEFAULT_PORT, topic);

        Ok(Self {
            receiver,
            _client: client,
            _thread: handle,
        })
    }

    fn message_loop(mut connection: rumqttc::Connection, sender: Sender<Command>, topic: &str) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topic => {
                    match parse_payload(&publish.payload) {
                        Some(cmd) => {
                            if sender.send(cmd).is_err() {
                                // Frame loop gone
                                break;
                            }
                        },
                        None => warn!("MQTT: ignoring payload on '{}'", topic),
                    }
                },
                Ok(_) => {},
                Err(e) => {
                    // rumqttc reconnects on the next iteration
                    warn!("MQTT error: {}", e);
                },
            }
        }
    }
}

impl InputSource for MqttClient {
    fn poll(&mut self, control: &mut ControlState) {
        for cmd in self.receiver.try_iter() {
            control.apply(cmd);
        }
    }
}
