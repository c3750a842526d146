// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The game server WebSocket.
//!
//! One text command per message in both directions. Inbound frames are handed
//! to a callback as they arrive; outbound [`ClientCommand`]s are written with
//! their wire form. A closed connection is only marked closed; nothing
//! reconnects.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::{Cell, RefCell};

use fellestrekk_core::protocol::ClientCommand;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

/// Errors from [`Connection`].
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The browser refused to create the socket (bad URL, blocked port).
    #[error("could not open WebSocket to {url}: {reason}")]
    Open {
        /// The URL that was tried.
        url: String,
        /// The browser's exception, stringified.
        reason: String,
    },
    /// `send` was called before the socket opened or after it closed.
    #[error("WebSocket is {0}")]
    NotOpen(ConnectionState),
    /// The browser rejected the write.
    #[error("send failed: {0}")]
    Send(String),
}

/// Lifecycle of a [`Connection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, handshake pending.
    Connecting,
    /// Ready to send.
    Open,
    /// Closed by either side, or failed.
    Closed,
}

impl core::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Connecting => "still connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// Builds the socket URL for the page at `protocol//hostname:port`: `wss:`
/// under `https:`, `ws:` otherwise, path `/ws`.
#[must_use]
pub fn socket_url(page_protocol: &str, hostname: &str, port: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss:" } else { "ws:" };
    if port.is_empty() {
        format!("{scheme}//{hostname}/ws")
    } else {
        format!("{scheme}//{hostname}:{port}/ws")
    }
}

/// A replaceable callback, shared between a [`Connection`] and the browser
/// closure installed once when the socket is created.
struct Handler<A>(Rc<RefCell<Option<Box<dyn FnMut(A)>>>>);

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<A> Handler<A> {
    fn empty() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    fn replace(&self, handler: Box<dyn FnMut(A)>) {
        *self.0.borrow_mut() = Some(handler);
    }

    /// Runs the current handler, if any. A handler may install its own
    /// replacement while running.
    fn call(&self, arg: A) {
        let current = self.0.borrow_mut().take();
        if let Some(mut handler) = current {
            handler(arg);
            let mut slot = self.0.borrow_mut();
            if slot.is_none() {
                *slot = Some(handler);
            }
        }
    }
}

/// A WebSocket to the game server.
///
/// Cloning yields another handle to the same socket, so callbacks can capture
/// one to reply.
#[derive(Clone)]
pub struct Connection {
    ws: WebSocket,
    state: Rc<Cell<ConnectionState>>,
    last_error: Rc<RefCell<Option<String>>>,
    on_open: Handler<()>,
    on_message: Handler<String>,
}

impl core::fmt::Debug for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.ws.url())
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Starts connecting to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Open`] if the browser refuses the URL.
    pub fn open(url: &str) -> Result<Self, ConnectionError> {
        let ws = WebSocket::new(url).map_err(|e| ConnectionError::Open {
            url: url.to_string(),
            reason: format!("{e:?}"),
        })?;
        let state = Rc::new(Cell::new(ConnectionState::Connecting));
        let last_error = Rc::new(RefCell::new(None));

        {
            let state = Rc::clone(&state);
            let onclose = Closure::wrap(Box::new(move |_: CloseEvent| {
                state.set(ConnectionState::Closed);
            }) as Box<dyn FnMut(CloseEvent)>);
            ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
            onclose.forget();
        }

        {
            let last_error = Rc::clone(&last_error);
            let onerror = Closure::wrap(Box::new(move |e: ErrorEvent| {
                *last_error.borrow_mut() = Some(e.message());
            }) as Box<dyn FnMut(ErrorEvent)>);
            ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        let on_open = Handler::empty();
        {
            let state = Rc::clone(&state);
            let on_open = on_open.clone();
            let onopen = Closure::wrap(Box::new(move |_: JsValue| {
                state.set(ConnectionState::Open);
                on_open.call(());
            }) as Box<dyn FnMut(JsValue)>);
            ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
            onopen.forget();
        }

        let on_message = Handler::empty();
        {
            let on_message = on_message.clone();
            let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
                if let Some(text) = e.data().as_string() {
                    on_message.call(text);
                }
            }) as Box<dyn FnMut(MessageEvent)>);
            ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
            onmessage.forget();
        }

        Ok(Self {
            ws,
            state,
            last_error,
            on_open,
            on_message,
        })
    }

    /// Calls `handler` once the handshake completes. Replaces any previous
    /// handler.
    pub fn set_on_open(&self, mut handler: impl FnMut() + 'static) {
        self.on_open.replace(Box::new(move |()| handler()));
    }

    /// Calls `handler` with each inbound text frame. Binary frames are
    /// dropped. Replaces any previous handler.
    pub fn set_on_message(&self, handler: impl FnMut(String) + 'static) {
        self.on_message.replace(Box::new(handler));
    }

    /// Writes one command.
    ///
    /// # Errors
    ///
    /// Fails if the socket is not open or the browser rejects the write.
    pub fn send(&self, command: &ClientCommand) -> Result<(), ConnectionError> {
        match self.state.get() {
            ConnectionState::Open => self
                .ws
                .send_with_str(&command.to_string())
                .map_err(|e| ConnectionError::Send(format!("{e:?}"))),
            other => Err(ConnectionError::NotOpen(other)),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// The message of the most recent error event, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Closes the socket.
    pub fn close(&self) {
        let _ = self.ws.close();
        self.state.set(ConnectionState::Closed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn url_follows_page_security() {
        assert_eq!(
            socket_url("https:", "cards.example", "8443"),
            "wss://cards.example:8443/ws"
        );
        assert_eq!(socket_url("http:", "localhost", "8080"), "ws://localhost:8080/ws");
        assert_eq!(
            socket_url("https:", "cards.example", ""),
            "wss://cards.example/ws",
            "default port omitted"
        );
    }

    #[test]
    fn replacing_a_handler_drops_the_old_one() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let handler: Handler<u32> = Handler::empty();
        handler.call(0);

        let log = Rc::clone(&calls);
        handler.replace(Box::new(move |n| log.borrow_mut().push(("first", n))));
        handler.call(1);
        let log = Rc::clone(&calls);
        handler.replace(Box::new(move |n| log.borrow_mut().push(("second", n))));
        handler.call(2);
        handler.call(3);

        assert_eq!(*calls.borrow(), [("first", 1), ("second", 2), ("second", 3)]);
        assert_eq!(Rc::strong_count(&calls), 2, "first handler was released");
    }

    #[test]
    fn handler_can_replace_itself_while_running() {
        let calls = Rc::new(Cell::new(0));
        let handler: Handler<()> = Handler::empty();
        let slot = handler.clone();
        let count = Rc::clone(&calls);
        handler.replace(Box::new(move |()| {
            count.set(count.get() + 1);
            let count = Rc::clone(&count);
            slot.replace(Box::new(move |()| count.set(count.get() + 10)));
        }));
        handler.call(());
        handler.call(());
        assert_eq!(calls.get(), 11);
    }

    #[test]
    fn not_open_error_names_the_state() {
        let error = ConnectionError::NotOpen(ConnectionState::Connecting);
        assert_eq!(error.to_string(), "WebSocket is still connecting");
    }
}
