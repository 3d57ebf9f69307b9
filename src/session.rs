//! One poll of a monitor: send the command, listen until a reading arrives.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame_codec::FrameCodec;
use crate::message::{self, poll_message, FrameOutcome};
use crate::reading::Reading;
use crate::transport::{Connection, Notifications, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    CommandSent,
    AwaitingNotification,
    Complete,
    Failed,
}

pub struct ReadingSession<'a, C: Connection> {
    connection: &'a C,
    codec: FrameCodec,
    state: SessionState,
    reading: Reading,
}

impl<'a, C: Connection> ReadingSession<'a, C> {
    pub fn new(connection: &'a C) -> Self {
        Self::with_codec(connection, FrameCodec::default())
    }

    pub fn with_codec(connection: &'a C, codec: FrameCodec) -> Self {
        Self { connection, codec, state: SessionState::Idle, reading: Reading::default() }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// What has been received so far
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    /// Poll the monitor and wait up to `deadline` for a complete reading.
    ///
    /// The notification subscription is dropped before this returns, whatever
    /// the outcome. Closing the connection is left to the owner of it.
    pub async fn run(&mut self, deadline: Duration) -> Result<Reading> {
        let result = self.poll(deadline).await;
        self.state = match result {
            Ok(_) => SessionState::Complete,
            Err(_) => SessionState::Failed,
        };
        tracing::debug!(state = ?self.state, "session finished");
        result
    }

    async fn poll(&mut self, deadline: Duration) -> Result<Reading> {
        self.send_command().await?;

        let connection = self.connection;
        let mut notifications = connection.subscribe().await.map_err(Error::TransportConnection)?;
        self.transition(SessionState::AwaitingNotification);

        let reading = timeout(deadline, self.await_reading(&mut notifications))
            .await
            .map_err(|_| Error::Timeout(deadline))?;

        drop(notifications);
        tracing::debug!("unsubscribed from notifications");
        reading
    }

    async fn send_command(&mut self) -> Result<()> {
        let frame = self.codec.encrypt(&poll_message::REQUEST)?;

        let h = hex::encode(&frame);
        tracing::debug!("TX: {h}");

        self.connection.write_command(&frame).await.map_err(Error::TransportWrite)?;
        self.transition(SessionState::CommandSent);
        Ok(())
    }

    async fn await_reading(&mut self, notifications: &mut Notifications<'_>) -> Result<Reading> {
        loop {
            match notifications.next().await {
                Some(Ok(data)) => {
                    if self.handle_notification(&data) {
                        return Ok(self.reading);
                    }
                }
                Some(Err(err)) => {
                    tracing::warn!("Notification error: {err}");
                    return Err(Error::TransportConnection(err));
                }
                None => {
                    tracing::debug!("End of notification stream");
                    return Err(Error::NotificationsClosed);
                }
            }
        }
    }

    /// Fold one raw notification into the reading. Returns whether the reading is now complete.
    fn handle_notification(&mut self, data: &[u8]) -> bool {
        let h_notification = hex::encode(data);
        tracing::debug!("RX notification: 0x{h_notification}");

        let outcome = self
            .codec
            .decrypt(data)
            .and_then(|decrypted| message::parse(&decrypted));

        match outcome {
            Ok(FrameOutcome::Reading(msg)) => {
                if self.reading.merge(&msg) {
                    tracing::debug!(?msg, "reading updated");
                }
            }
            Ok(FrameOutcome::Ignored) => tracing::trace!("ignoring frame"),
            Err(err) => tracing::debug!("dropping frame: {err}"),
        }

        self.reading.is_complete()
    }

    fn transition(&mut self, state: SessionState) {
        tracing::debug!(from = ?self.state, to = ?state, "session state");
        self.state = state;
    }
}

/// Connect to the monitor at `address`, poll it once and disconnect.
///
/// The connection is closed on every path. A failure to close after a
/// successful reading is logged and the reading still returned.
pub async fn read_device<T: Transport>(transport: &T, address: &str, config: &Config) -> Result<Reading> {
    let connection = transport
        .connect(address, config.connect_timeout)
        .await
        .map_err(Error::TransportConnection)?;

    let result = ReadingSession::new(&connection).run(config.read_timeout).await;

    match (result, connection.close().await) {
        (Ok(reading), Ok(())) => Ok(reading),
        (Ok(reading), Err(err)) => {
            tracing::warn!("Failed to disconnect: {err}");
            Ok(reading)
        }
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!("Failed to disconnect: {close_err}");
            }
            Err(err)
        }
    }
}
