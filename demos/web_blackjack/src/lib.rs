// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser blackjack table.
//!
//! Wires a [`Table`] to the page: server frames from the WebSocket go into
//! [`Table::handle_server_message`], key presses on the table into
//! [`Table::key_down`], the chat form into [`Table::chat_command`], and each
//! animation frame runs the frame clock and hands the result to a
//! [`DomPresenter`].
//!
//! Build with: `wasm-pack build --target web demos/web_blackjack`
//!
//! Then serve `demos/web_blackjack/` next to the game server and open
//! `index.html`. Append `?code=<hex>` to join an existing game.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, KeyboardEvent, UrlSearchParams};

use fellestrekk_backend_web::{
    Connection, ConsoleSink, DomPresenter, load_strings, socket_url, timebase,
};
use fellestrekk_core::config::TableConfig;
use fellestrekk_core::protocol::ClientCommand;
use fellestrekk_core::strings::Strings;
use fellestrekk_core::table::Table;
use fellestrekk_core::timing::{DeltaTracker, FrameTick};
use fellestrekk_core::trace::Tracer;

const TABLE_W: f64 = 800.0;
const TABLE_H: f64 = 600.0;
const SHEET_URL: &str = "static/cards.png";

struct App {
    table: Table,
    presenter: DomPresenter,
    console: ConsoleSink,
    delta: DeltaTracker,
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let container = create_table(&document)?;
    match document.get_element_by_id("game") {
        Some(game) => game.append_child(&container)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&container)?,
    };

    let mut presenter = DomPresenter::new(container.clone(), SHEET_URL)?;
    if let Some(panel) = document.get_element_by_id("boxMessages") {
        presenter.set_chat_panel(panel);
    }

    let app = Rc::new(RefCell::new(App {
        table: Table::new(TableConfig::web(), Strings::default()),
        presenter,
        console: ConsoleSink::quiet(),
        delta: DeltaTracker::new(timebase()),
    }));

    // -- socket ------------------------------------------------------------
    let location = document
        .location()
        .ok_or_else(|| JsValue::from_str("no location"))?;
    let url = socket_url(&location.protocol()?, &location.hostname()?, &location.port()?);
    let join_code = code_from_search(&location.search()?)?;
    let connection =
        Connection::open(&url).map_err(|e| JsValue::from_str(&e.to_string()))?;

    {
        let app = Rc::clone(&app);
        let conn = connection.clone();
        connection.set_on_open(move || {
            let commands = app.borrow_mut().table.open_commands(join_code.as_deref());
            send_all(&conn, &commands);
        });
    }
    {
        let app = Rc::clone(&app);
        let conn = connection.clone();
        connection.set_on_message(move |text| {
            let replies = {
                let mut app = app.borrow_mut();
                let App { table, console, .. } = &mut *app;
                table.handle_server_message_traced(&text, &mut Tracer::new(console))
            };
            send_all(&conn, &replies);
        });
    }

    // -- keyboard ----------------------------------------------------------
    {
        let app = Rc::clone(&app);
        let conn = connection.clone();
        let onkeydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let commands = {
                let mut app = app.borrow_mut();
                let App { table, console, .. } = &mut *app;
                table.key_down_traced(&event.code(), &mut Tracer::new(console))
            };
            send_all(&conn, &commands);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        container
            .add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    // -- chat --------------------------------------------------------------
    if let Some(form) = document.get_element_by_id("formChat") {
        let conn = connection.clone();
        let onsubmit = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .and_then(|form| form.first_element_child())
                .and_then(|child| child.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let text = input.value();
            input.set_value("");
            send_all(&conn, &[Table::chat_command(&text)]);
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
        onsubmit.forget();
    }

    // -- strings -----------------------------------------------------------
    {
        let app = Rc::clone(&app);
        let lang = document
            .document_element()
            .and_then(|root| root.get_attribute("lang"))
            .unwrap_or_else(|| String::from("en"));
        wasm_bindgen_futures::spawn_local(async move {
            let strings = load_strings(&lang).await;
            app.borrow_mut().table.set_strings(strings);
        });
    }

    // -- frame loop --------------------------------------------------------
    let raf = fellestrekk_backend_web::RafLoop::new(move |tick| on_tick(&app, tick));
    raf.start();
    // Keep the RafLoop alive; there is no graceful shutdown on the web.
    core::mem::forget(raf);

    Ok(())
}

fn on_tick(app: &Rc<RefCell<App>>, tick: FrameTick) {
    let mut app = app.borrow_mut();
    let App {
        table,
        presenter,
        console,
        delta,
    } = &mut *app;
    let dt = delta.delta(&tick);
    table.on_render_frame_traced(dt, &mut Tracer::new(console));
    table.present(presenter);
}

fn send_all(conn: &Connection, commands: &[ClientCommand]) {
    for command in commands {
        if let Err(error) = conn.send(command) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("{command}: {error}")));
        }
    }
}

/// Creates the focusable 800×600 table surface.
fn create_table(document: &Document) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.unchecked_into();
    el.set_tab_index(1);
    let s = el.style();
    s.set_property("position", "relative")?;
    s.set_property("overflow", "hidden")?;
    s.set_property("width", &format!("{TABLE_W}px"))?;
    s.set_property("height", &format!("{TABLE_H}px"))?;
    s.set_property("background", "#0b6623")?;
    s.set_property("color", "#fff")?;
    s.set_property("font", "20px Arial, sans-serif")?;
    s.set_property("outline", "none")?;
    Ok(el)
}

/// Extracts the `code` query parameter from `location.search`.
///
/// An empty code means host a new game.
fn code_from_search(search: &str) -> Result<Option<String>, JsValue> {
    let params = UrlSearchParams::new_with_str(search)?;
    Ok(params.get("code").filter(|code| !code.is_empty()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn join_code_comes_from_the_query_string() {
        assert_eq!(code_from_search("?code=2A").unwrap(), Some("2A".into()));
        assert_eq!(code_from_search("?lang=no&code=ff").unwrap(), Some("ff".into()));
        assert_eq!(code_from_search("").unwrap(), None);
        assert_eq!(code_from_search("?code=").unwrap(), None, "empty code hosts instead");
    }

    #[wasm_bindgen_test]
    fn join_code_is_percent_decoded() {
        assert_eq!(code_from_search("?code=a%2Bb").unwrap(), Some("a+b".into()));
        assert_eq!(code_from_search("?code=x+y").unwrap(), Some("x y".into()));
    }
}
