// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presentation of the table.
//!
//! Translates [`SpriteStore`] state into positioned `<div>` elements by
//! applying the incremental updates in [`FrameChanges`], and mirrors the
//! [`Hud`](fellestrekk_core::hud::Hud) texts and chat lines.
//!
//! Each card is a `72×95` `<div>` whose background is the card sheet, offset
//! to the face's cell. Horizontal squash during a flip is a CSS `scale` on
//! the x axis around the left edge; the core already shifts the position to
//! keep the card centered.
//!
//! [`SpriteStore`]: fellestrekk_core::sprite::SpriteStore
//! [`FrameChanges`]: fellestrekk_core::sprite::FrameChanges

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use fellestrekk_core::atlas::Atlas;
use fellestrekk_core::backend::{Frame, Presenter};
use fellestrekk_core::card::Face;
use fellestrekk_core::hud::ChatLine;
use kurbo::Point;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// Where the four HUD texts sit inside the table container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudLayout {
    /// The player's hand value.
    pub player_value: Point,
    /// The dealer's hand value.
    pub dealer_value: Point,
    /// Balance and auto-bet.
    pub balance: Point,
    /// The action bar.
    pub status: Point,
}

impl HudLayout {
    /// Placement for the 800×600 table.
    pub const STANDARD: Self = Self {
        player_value: Point::new(4.0, 495.0),
        dealer_value: Point::new(4.0, 295.0),
        balance: Point::new(570.0, 0.0),
        status: Point::new(4.0, 572.0),
    };
}

impl Default for HudLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Styles the presenter puts on the table container.
///
/// Card `z-index` values go negative after a restack; the container must
/// form its own stacking context so such cards still paint above its
/// background.
const CONTAINER_STYLE: [(&str, &str); 2] =
    [("position", "relative"), ("isolation", "isolate")];

struct HudElements {
    player_value: HtmlElement,
    dealer_value: HtmlElement,
    balance: HtmlElement,
    status: HtmlElement,
}

/// Maps the sprite store to live DOM elements, applying incremental updates
/// from [`FrameChanges`](fellestrekk_core::sprite::FrameChanges).
///
/// The presenter owns a container element to which card `<div>`s and the HUD
/// texts are added. Chat lines go to a separate panel, if one is attached
/// with [`set_chat_panel`](Self::set_chat_panel).
pub struct DomPresenter {
    document: Document,
    container: HtmlElement,
    sheet_url: String,
    atlas: Atlas,
    elements: Vec<Option<HtmlElement>>,
    hud: HudElements,
    chat_panel: Option<Element>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("sheet_url", &self.sheet_url)
            .field("elements_len", &self.elements.len())
            .field("has_chat_panel", &self.chat_panel.is_some())
            .finish_non_exhaustive()
    }
}

impl DomPresenter {
    /// Creates a presenter that draws into `container`, with card faces cut
    /// from the sheet at `sheet_url`.
    ///
    /// # Errors
    ///
    /// Fails if `container` is detached or the HUD elements cannot be
    /// created.
    pub fn new(container: HtmlElement, sheet_url: &str) -> Result<Self, JsValue> {
        Self::with_layout(container, sheet_url, Atlas::CARDS, HudLayout::STANDARD)
    }

    /// Like [`new`](Self::new), with an explicit atlas and HUD placement.
    ///
    /// # Errors
    ///
    /// Fails if `container` is detached or the HUD elements cannot be
    /// created.
    pub fn with_layout(
        container: HtmlElement,
        sheet_url: &str,
        atlas: Atlas,
        layout: HudLayout,
    ) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("table container has no owner document"))?;
        for (property, value) in CONTAINER_STYLE {
            container.style().set_property(property, value)?;
        }
        let text = |at: Point| -> Result<HtmlElement, JsValue> {
            let el: HtmlElement = document.create_element("div")?.unchecked_into();
            let s = el.style();
            s.set_property("position", "absolute")?;
            s.set_property("left", &format!("{}px", at.x))?;
            s.set_property("top", &format!("{}px", at.y))?;
            s.set_property("white-space", "pre")?;
            s.set_property("z-index", "1000")?;
            container.append_child(&el)?;
            Ok(el)
        };
        let hud = HudElements {
            player_value: text(layout.player_value)?,
            dealer_value: text(layout.dealer_value)?,
            balance: text(layout.balance)?,
            status: text(layout.status)?,
        };
        Ok(Self {
            container,
            sheet_url: String::from(sheet_url),
            atlas,
            elements: Vec::new(),
            hud,
            chat_panel: None,
            document,
        })
    }

    /// Attaches the chat panel (`#boxMessages` on the game page).
    pub fn set_chat_panel(&mut self, panel: Element) {
        self.chat_panel = Some(panel);
    }

    /// Returns a reference to the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns the DOM element for the given sprite slot, if it exists.
    #[must_use]
    pub fn get_element(&self, idx: u32) -> Option<&HtmlElement> {
        self.elements
            .get(idx as usize)
            .and_then(|slot| slot.as_ref())
    }

    fn take_element(&mut self, idx: u32) -> Option<HtmlElement> {
        self.elements.get_mut(idx as usize)?.take()
    }

    fn put_element(&mut self, idx: u32, el: HtmlElement) {
        let slot = idx as usize;
        if self.elements.len() <= slot {
            self.elements.resize_with(slot + 1, || None);
        }
        self.elements[slot] = Some(el);
    }

    fn create_card(&self, frame: &Frame<'_>, idx: u32) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.unchecked_into();
        let s = el.style();
        s.set_property("position", "absolute")?;
        s.set_property("left", "0")?;
        s.set_property("top", "0")?;
        s.set_property("transform-origin", "0 0")?;
        s.set_property("width", &format!("{}px", frame.sprites.natural_width_at(idx)))?;
        s.set_property("height", &format!("{}px", frame.sprites.height_at(idx)))?;
        s.set_property("background-image", &format!("url({})", self.sheet_url))?;
        self.container.append_child(&el)?;
        Ok(el)
    }

    fn append_chat_line(&self, panel: &Element, line: &ChatLine) -> Result<(), JsValue> {
        let follow = is_scrolled_to_bottom(
            panel.scroll_top(),
            panel.client_height(),
            panel.scroll_height(),
        );

        let p = self.document.create_element("p")?;
        if let Some(sender) = &line.sender {
            let b = self.document.create_element("b")?;
            b.set_text_content(Some(&format!("{sender}: ")));
            p.append_child(&b)?;
        }
        let span = self.document.create_element("span")?;
        if let Some(class) = line.class {
            span.set_class_name(class);
        }
        span.set_text_content(Some(&line.body));
        p.append_child(&span)?;
        panel.append_child(&p)?;

        if follow {
            panel.set_scroll_top(panel.scroll_height());
        }
        Ok(())
    }
}

impl Presenter for DomPresenter {
    /// Applies one frame's sprite changes, then the HUD.
    fn apply(&mut self, frame: &Frame<'_>) {
        let changes = frame.changes;
        let sprites = frame.sprites;

        // 1. Removals
        for &idx in &changes.removed {
            if let Some(el) = self.take_element(idx) {
                el.remove();
            }
        }

        // 2. Additions. New sprites are absent from the other lists, so
        //    every property is written here.
        for &idx in &changes.added {
            let Ok(el) = self.create_card(frame, idx) else {
                continue;
            };
            apply_css_geometry(
                &el,
                sprites.position_at(idx),
                sprites.width_at(idx),
                sprites.natural_width_at(idx),
            );
            apply_css_face(&el, &self.atlas, sprites.face_at(idx));
            apply_css_z_index(&el, sprites.z_index_at(idx));
            self.put_element(idx, el);
        }

        // 3. Geometry
        for &idx in &changes.moved {
            if let Some(el) = self.get_element(idx) {
                apply_css_geometry(
                    el,
                    sprites.position_at(idx),
                    sprites.width_at(idx),
                    sprites.natural_width_at(idx),
                );
            }
        }

        // 4. Faces
        for &idx in &changes.faces {
            if let Some(el) = self.get_element(idx) {
                apply_css_face(el, &self.atlas, sprites.face_at(idx));
            }
        }

        // 5. Stacking
        for &idx in &changes.restacked {
            if let Some(el) = self.get_element(idx) {
                apply_css_z_index(el, sprites.z_index_at(idx));
            }
        }

        // 6. HUD
        let hud = frame.hud;
        if hud.is_dirty() {
            self.hud.player_value.set_text_content(Some(hud.player_value()));
            self.hud.dealer_value.set_text_content(Some(hud.dealer_value()));
            self.hud.balance.set_text_content(Some(&hud.balance_text()));
            self.hud.status.set_text_content(Some(hud.status()));
        }

        // 7. Chat
        if let Some(panel) = &self.chat_panel {
            for line in hud.pending_chat() {
                let _ = self.append_chat_line(panel, line);
            }
        }
    }
}

fn apply_css_geometry(el: &HtmlElement, position: Point, width: f64, natural_width: f64) {
    let _ = el
        .style()
        .set_property("transform", &css_transform(position, width, natural_width));
}

fn apply_css_face(el: &HtmlElement, atlas: &Atlas, face: Face) {
    let _ = el
        .style()
        .set_property("background-position", &css_background_position(atlas, face));
}

fn apply_css_z_index(el: &HtmlElement, z_index: i32) {
    let _ = el.style().set_property("z-index", &format!("{z_index}"));
}

/// The `transform` for a card at `position`, squashed to `width`.
fn css_transform(position: Point, width: f64, natural_width: f64) -> String {
    let scale_x = if natural_width > 0.0 {
        (width / natural_width).max(0.0)
    } else {
        1.0
    };
    format!(
        "translate({}px, {}px) scale({scale_x}, 1)",
        position.x, position.y
    )
}

/// The `background-position` that shows `face` from the card sheet.
fn css_background_position(atlas: &Atlas, face: Face) -> String {
    let rect = atlas.source_rect(face);
    format!("{}px {}px", 0.0 - rect.x0, 0.0 - rect.y0)
}

/// Whether a panel is showing its last line (within one pixel).
fn is_scrolled_to_bottom(scroll_top: i32, client_height: i32, scroll_height: i32) -> bool {
    scroll_top.saturating_add(client_height) >= scroll_height.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fellestrekk_core::card::{Card, Rank, Suit};

    #[test]
    fn transform_translates_then_squashes() {
        assert_eq!(
            css_transform(Point::new(15.0, 400.0), 72.0, 72.0),
            "translate(15px, 400px) scale(1, 1)"
        );
        assert_eq!(
            css_transform(Point::new(33.0, 200.0), 36.0, 72.0),
            "translate(33px, 200px) scale(0.5, 1)"
        );
        assert_eq!(
            css_transform(Point::ORIGIN, -3.0, 72.0),
            "translate(0px, 0px) scale(0, 1)",
            "overshoot past zero width is clamped"
        );
    }

    #[test]
    fn background_position_is_negated_cell_origin() {
        let seven = Face::Card(Card::new(Suit::Spades, Rank::Seven));
        assert_eq!(css_background_position(&Atlas::CARDS, seven), "-432px -192px");
        assert_eq!(css_background_position(&Atlas::CARDS, Face::BACK), "-936px 0px");
    }

    #[test]
    fn chat_follows_only_when_already_at_bottom() {
        assert!(is_scrolled_to_bottom(300, 200, 500));
        assert!(is_scrolled_to_bottom(0, 200, 100), "content shorter than panel");
        assert!(!is_scrolled_to_bottom(100, 200, 500), "user scrolled up");
    }

    #[test]
    fn container_isolates_negative_z_index_cards() {
        assert!(CONTAINER_STYLE.contains(&("isolation", "isolate")));
        assert!(
            CONTAINER_STYLE.contains(&("position", "relative")),
            "cards are positioned against the container"
        );
    }

    #[test]
    fn standard_hud_layout() {
        let layout = HudLayout::default();
        assert_eq!(layout.balance, Point::new(570.0, 0.0));
        assert_eq!(layout.status, Point::new(4.0, 572.0));
    }
}
