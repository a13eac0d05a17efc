//! The websocket connection to the other peer.
//!
//! The socket is non-blocking and registered with a mio `Poll`, which the
//! tick loop uses as its clock: each call to `poll_inbound` waits at most
//! one tick and returns every complete message that arrived meanwhile.

use std::io::{self, ErrorKind};
use std::net::{self, SocketAddr};
use std::time::{Duration, Instant};

use engine::Transport;
use mio::net::TcpStream;
use mio::{Events, Interest, Poll, Token};
use thiserror::Error;
use tungstenite::error::ProtocolError;
use tungstenite::util::NonBlockingError;
use tungstenite::HandshakeError::Interrupted;
use tungstenite::{accept, client, Message, WebSocket};

const PEER: Token = Token(0);

/// How long `close` waits for the other side to acknowledge.
const CLOSE_LINGER: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("network error: {0}")]
    Io(#[from] io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("websocket handshake failed: {0}")]
    Handshake(String),
    #[error("the other player closed the connection")]
    Closed,
}

pub struct Link {
    poll: Poll,
    events: Events,
    websocket: WebSocket<TcpStream>,
    closed: bool,
    // a read error held back so the messages drained before it get delivered
    failure: Option<tungstenite::Error>,
}

fn non_blocking(stream: net::TcpStream) -> io::Result<TcpStream> {
    stream.set_nonblocking(true)?;
    Ok(TcpStream::from_std(stream))
}

/// Errors that mean the other side is gone, with or without a close frame.
fn is_disconnect(error: &tungstenite::Error) -> bool {
    match error {
        tungstenite::Error::ConnectionClosed
        | tungstenite::Error::AlreadyClosed
        | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        tungstenite::Error::Io(e) => match e.kind() {
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => true,
            _ => false,
        },
        _ => false,
    }
}

impl Link {
    /// Waits for the other player to connect on `address`.
    pub fn host(address: SocketAddr) -> Result<Link, LinkError> {
        let listener = net::TcpListener::bind(address)?;
        info!("Listening on {}", address);
        Link::serve(listener)
    }

    /// Accepts a single player on an already bound listener.
    pub fn serve(listener: net::TcpListener) -> Result<Link, LinkError> {
        let (stream, peer) = listener.accept()?;
        info!("Connection established: {}", peer);

        let mut websocket = accept(non_blocking(stream)?);
        while let Err(Interrupted(in_progress)) = websocket {
            websocket = in_progress.handshake();
        }
        let websocket = websocket.map_err(|e| LinkError::Handshake(e.to_string()))?;
        Link::new(websocket)
    }

    /// Connects to a player hosting on `address`.
    pub fn join(address: SocketAddr) -> Result<Link, LinkError> {
        let stream = net::TcpStream::connect(address)?;
        info!("Connected to {}", address);

        let mut websocket = client(format!("ws://{}/", address), non_blocking(stream)?);
        while let Err(Interrupted(in_progress)) = websocket {
            websocket = in_progress.handshake();
        }
        let (websocket, _) = websocket.map_err(|e| LinkError::Handshake(e.to_string()))?;
        Link::new(websocket)
    }

    fn new(mut websocket: WebSocket<TcpStream>) -> Result<Link, LinkError> {
        let poll = Poll::new()?;
        poll.registry().register(
            websocket.get_mut(),
            PEER,
            Interest::READABLE | Interest::WRITABLE,
        )?;
        Ok(Link {
            poll,
            events: Events::with_capacity(16),
            websocket,
            closed: false,
            failure: None,
        })
    }

    fn wait(&mut self, timeout: Duration) -> Result<(), LinkError> {
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Err(ref e) if e.kind() == ErrorKind::Interrupted => (),
            result => result?,
        }
        for event in self.events.iter() {
            debug!("Link event {:?}", event);
        }
        Ok(())
    }

    fn flush(&mut self) {
        if let Err(e) = self.websocket.flush() {
            if let Some(e) = e.into_non_blocking() {
                if !is_disconnect(&e) {
                    warn!("Error sending to websocket: {}", e);
                }
            }
        }
    }

    /// Waits up to `timeout` for traffic, then drains every complete text
    /// message. Messages that arrived before a close or a read error are
    /// still returned; the following call reports the close or the error.
    pub fn poll_inbound(&mut self, timeout: Duration) -> Result<Vec<String>, LinkError> {
        if let Some(e) = self.failure.take() {
            self.closed = true;
            return Err(e.into());
        }
        if self.closed {
            return Err(LinkError::Closed);
        }

        self.wait(timeout)?;
        self.flush();

        // tungstenite may already hold buffered frames, so always read
        // until the socket would block.
        let mut inbound = Vec::new();
        loop {
            match self.websocket.read() {
                Ok(Message::Text(text)) => {
                    debug!("Received from peer: {:?}", text);
                    inbound.push(text);
                }
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => inbound.push(text),
                    Err(e) => warn!("Badly formatted binary received from peer: {}", e),
                },
                Ok(Message::Close(frame)) => {
                    info!("Peer closed the connection: {:?}", frame);
                    // sends the queued acknowledgement
                    self.flush();
                    self.closed = true;
                    break;
                }
                Ok(_) => (),
                Err(e) => match e.into_non_blocking() {
                    None => break,
                    Some(ref e) if is_disconnect(e) => {
                        info!("Peer dropped the connection: {}", e);
                        self.closed = true;
                        break;
                    }
                    Some(e) => {
                        self.failure = Some(e);
                        break;
                    }
                },
            }
        }

        Ok(inbound)
    }

    /// Starts the closing handshake and waits briefly for the other side
    /// to acknowledge it. Anything still arriving is discarded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        info!("Closing the connection");

        if let Err(e) = self.websocket.close(None) {
            if let Some(e) = e.into_non_blocking() {
                if !is_disconnect(&e) {
                    warn!("Error closing websocket: {}", e);
                }
                return;
            }
        }
        self.flush();

        let deadline = Instant::now() + CLOSE_LINGER;
        loop {
            match self.websocket.read() {
                Ok(Message::Close(_)) => break,
                Ok(message) => debug!("Discarding {:?} after close", message),
                Err(e) => match e.into_non_blocking() {
                    None => {
                        let now = Instant::now();
                        if now >= deadline {
                            debug!("No close acknowledgement from peer");
                            break;
                        }
                        if self.wait(deadline - now).is_err() {
                            break;
                        }
                        self.flush();
                    }
                    Some(_) => break,
                },
            }
        }
    }
}

impl Transport for Link {
    fn send_text(&mut self, text: &str) {
        debug!("Sending to peer: {:?}", text);
        if let Err(e) = self.websocket.send(Message::text(text)) {
            match e.into_non_blocking() {
                None => debug!("Socket busy, message queued"),
                Some(e) => warn!("Error sending to websocket: {}", e),
            }
        }
    }
}
