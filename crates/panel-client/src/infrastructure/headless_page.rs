//! In-memory host page for the on-screen keyboard.
//!
//! # Why a headless page?
//!
//! A real page (a kiosk browser) needs a display, an input device, and a
//! rendering engine before any of the keyboard's behaviour can be observed.
//! `HeadlessPage` implements the same [`HostPage`], [`KeySurface`] and
//! [`InputField`] contracts with plain Rust state:
//!
//! - key targets are a `Vec<RenderedKey>` in rendering order;
//! - "display" is an `AtomicBool`, and the rendered height is a fixed number
//!   of pixels set with [`HeadlessSurface::set_layout_height`], reported only
//!   while visible;
//! - the page has one focus slot, so focusing a field blurs the previous one;
//! - clicks and focus changes are driven by calling methods such as
//!   [`HeadlessSurface::click`] and [`HeadlessField::tap`].
//!
//! Event delivery mirrors the browser: a click first reaches the listeners
//! bound to the key itself, then bubbles to the container's delegated
//! listeners.  [`HeadlessSurface::click_intercepted`] models an upstream
//! handler that stops propagation, so only key-bound listeners run.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use panel_client::application::keyboard::{HostPage, OnScreenKeyboard, Scheduler};
//! use panel_client::domain::KeyboardConfig;
//! use panel_client::infrastructure::{HeadlessPage, ManualScheduler};
//!
//! let config = KeyboardConfig::default();
//! let page = Arc::new(HeadlessPage::new());
//! let surface = page.add_container(&config.container_id);
//! let field = page.add_field(&config.field_marker);
//! let scheduler = Arc::new(ManualScheduler::new());
//!
//! let _keyboard = OnScreenKeyboard::attach(
//!     page.clone() as Arc<dyn HostPage>,
//!     scheduler.clone() as Arc<dyn Scheduler>,
//!     &config,
//! );
//!
//! field.tap();
//! surface.click("h");
//! surface.click("i");
//! assert_eq!(field.text(), "hi");
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use panel_core::keyboard::layout::KeyFace;

use crate::application::keyboard::{
    ActivationHandler, FocusHandler, HostPage, InputField, KeyHandler, KeySurface, RenderedKey,
};

type SharedActivation = Arc<dyn Fn(Option<&str>) + Send + Sync>;
type SharedCallback = Arc<dyn Fn() + Send + Sync>;

/// The page's single focus holder.
type FocusSlot = Mutex<Option<Weak<HeadlessField>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Page ──────────────────────────────────────────────────────────────────────

/// A page holding mount containers and text fields in memory.
#[derive(Default)]
pub struct HeadlessPage {
    containers: Mutex<HashMap<String, Arc<HeadlessSurface>>>,
    /// Fields in creation order, each with its optional marker.
    fields: Mutex<Vec<(Option<String>, Arc<HeadlessField>)>>,
    /// At most one field on the page holds focus.
    focus: Arc<FocusSlot>,
    bottom_padding: AtomicU32,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mount container with the given identifier.
    pub fn add_container(&self, id: &str) -> Arc<HeadlessSurface> {
        let surface = Arc::new(HeadlessSurface::default());
        lock(&self.containers).insert(id.to_string(), Arc::clone(&surface));
        surface
    }

    /// Adds a text field opted into the keyboard through `marker`.
    pub fn add_field(&self, marker: &str) -> Arc<HeadlessField> {
        self.push_field(Some(marker.to_string()))
    }

    /// Adds a text field that carries no marker.
    pub fn add_plain_field(&self) -> Arc<HeadlessField> {
        self.push_field(None)
    }

    /// Current bottom padding of the page, in pixels.
    pub fn bottom_padding(&self) -> u32 {
        self.bottom_padding.load(Ordering::SeqCst)
    }

    fn push_field(&self, marker: Option<String>) -> Arc<HeadlessField> {
        let field = HeadlessField::on_page(Arc::clone(&self.focus));
        lock(&self.fields).push((marker, Arc::clone(&field)));
        field
    }
}

impl HostPage for HeadlessPage {
    fn find_container(&self, id: &str) -> Option<Arc<dyn KeySurface>> {
        lock(&self.containers)
            .get(id)
            .map(|surface| Arc::clone(surface) as Arc<dyn KeySurface>)
    }

    fn eligible_fields(&self, marker: &str) -> Vec<Arc<dyn InputField>> {
        lock(&self.fields)
            .iter()
            .filter(|(field_marker, _)| field_marker.as_deref() == Some(marker))
            .map(|(_, field)| Arc::clone(field) as Arc<dyn InputField>)
            .collect()
    }

    fn set_bottom_padding(&self, px: u32) {
        self.bottom_padding.store(px, Ordering::SeqCst);
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// A mount container that records rendered keys and dispatches clicks.
#[derive(Default)]
pub struct HeadlessSurface {
    keys: Mutex<Vec<RenderedKey>>,
    visible: AtomicBool,
    layout_height: AtomicU32,
    delegated: Mutex<Vec<SharedActivation>>,
    bound: Mutex<Vec<(String, SharedCallback)>>,
}

impl HeadlessSurface {
    /// Height, in pixels, the surface occupies once displayed.
    pub fn set_layout_height(&self, px: u32) {
        self.layout_height.store(px, Ordering::SeqCst);
    }

    /// Snapshot of the rendered keys, in rendering order.
    pub fn keys(&self) -> Vec<RenderedKey> {
        lock(&self.keys).clone()
    }

    /// Current face of the key tagged `id`.
    pub fn face(&self, id: &str) -> Option<KeyFace> {
        lock(&self.keys)
            .iter()
            .find(|key| key.id == id)
            .map(|key| key.face.clone())
    }

    /// Clicks the key tagged `id`: key-bound listeners first, then delegated ones.
    pub fn click(&self, id: &str) {
        self.fire_bound(id);
        self.fire_delegated(Some(id));
    }

    /// Clicks the key tagged `id` while an upstream handler stops propagation.
    pub fn click_intercepted(&self, id: &str) {
        self.fire_bound(id);
    }

    /// Clicks the container somewhere between keys.
    pub fn click_background(&self) {
        self.fire_delegated(None);
    }

    fn fire_bound(&self, id: &str) {
        // Clone out first: a listener may re-enter the surface.
        let handlers: Vec<SharedCallback> = lock(&self.bound)
            .iter()
            .filter(|(key_id, _)| key_id == id)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler();
        }
    }

    fn fire_delegated(&self, id: Option<&str>) {
        let handlers: Vec<SharedActivation> = lock(&self.delegated).iter().cloned().collect();
        for handler in handlers {
            handler(id);
        }
    }
}

impl KeySurface for HeadlessSurface {
    fn append_key(&self, key: RenderedKey) {
        lock(&self.keys).push(key);
    }

    fn set_key_face(&self, id: &str, face: KeyFace) {
        if let Some(key) = lock(&self.keys).iter_mut().find(|key| key.id == id) {
            key.face = face;
        }
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn rendered_height(&self) -> u32 {
        if self.is_visible() {
            self.layout_height.load(Ordering::SeqCst)
        } else {
            0
        }
    }

    fn on_activation(&self, handler: ActivationHandler) {
        lock(&self.delegated).push(Arc::from(handler));
    }

    fn on_key_activation(&self, id: &str, handler: KeyHandler) -> bool {
        let rendered = lock(&self.keys).iter().any(|key| key.id == id);
        if rendered {
            lock(&self.bound).push((id.to_string(), Arc::from(handler)));
        }
        rendered
    }
}

// ── Field ─────────────────────────────────────────────────────────────────────

/// A text field with focus state and a scroll counter.
///
/// Focus lives on the page: focusing one field takes it from whichever
/// field held it before.
pub struct HeadlessField {
    me: Weak<HeadlessField>,
    focus: Arc<FocusSlot>,
    text: Mutex<String>,
    scrolls: AtomicUsize,
    focus_handlers: Mutex<Vec<SharedCallback>>,
}

impl HeadlessField {
    fn on_page(focus: Arc<FocusSlot>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            focus,
            text: Mutex::new(String::new()),
            scrolls: AtomicUsize::new(0),
            focus_handlers: Mutex::new(Vec::new()),
        })
    }

    fn holds(&self, slot: &Option<Weak<HeadlessField>>) -> bool {
        slot.as_ref()
            .is_some_and(|holder| std::ptr::eq(holder.as_ptr(), self))
    }

    /// Simulates the user tapping the field.
    pub fn tap(&self) {
        self.focus();
    }

    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }

    /// Replaces the text without any focus side effect.
    pub fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }

    pub fn is_focused(&self) -> bool {
        self.holds(&lock(&self.focus))
    }

    /// Number of centred scroll requests received.
    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }
}

impl InputField for HeadlessField {
    fn value(&self) -> String {
        self.text()
    }

    fn set_value(&self, value: &str) {
        self.set_text(value);
    }

    /// Focus notifications fire only on the unfocused → focused transition.
    fn focus(&self) {
        {
            let mut slot = lock(&self.focus);
            if self.holds(&slot) {
                return;
            }
            // The previous holder, if any, is blurred by losing the slot.
            *slot = Some(self.me.clone());
        }
        let handlers: Vec<SharedCallback> = lock(&self.focus_handlers).iter().cloned().collect();
        for handler in handlers {
            handler();
        }
    }

    fn blur(&self) {
        let mut slot = lock(&self.focus);
        if self.holds(&slot) {
            *slot = None;
        }
    }

    fn scroll_into_view_centered(&self) {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
    }

    fn on_focus(&self, handler: FocusHandler) {
        lock(&self.focus_handlers).push(Arc::from(handler));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use panel_core::keyboard::layout::{KeyTone, KeyWidth};

    fn key(id: &'static str) -> RenderedKey {
        RenderedKey {
            id,
            face: KeyFace::Text(id.to_string()),
            tone: KeyTone::Outline,
            width: KeyWidth::Standard,
        }
    }

    #[test]
    fn test_find_container_by_id() {
        let page = HeadlessPage::new();
        page.add_container("kb");
        assert!(page.find_container("kb").is_some());
        assert!(page.find_container("other").is_none());
    }

    #[test]
    fn test_eligible_fields_filters_by_marker() {
        let page = HeadlessPage::new();
        page.add_field("kb-input");
        page.add_plain_field();
        page.add_field("other-marker");
        assert_eq!(page.eligible_fields("kb-input").len(), 1);
    }

    #[test]
    fn test_rendered_height_is_zero_while_hidden() {
        let surface = HeadlessSurface::default();
        surface.set_layout_height(280);
        assert_eq!(surface.rendered_height(), 0);
        surface.set_visible(true);
        assert_eq!(surface.rendered_height(), 280);
    }

    #[test]
    fn test_bound_listener_requires_rendered_key() {
        let surface = HeadlessSurface::default();
        assert!(!surface.on_key_activation("dismiss", Box::new(|| {})));
        surface.append_key(key("dismiss"));
        assert!(surface.on_key_activation("dismiss", Box::new(|| {})));
    }

    #[test]
    fn test_click_runs_bound_then_delegated() {
        // Arrange
        let surface = HeadlessSurface::default();
        surface.append_key(key("x"));
        let order = Arc::new(Mutex::new(Vec::new()));
        let o = Arc::clone(&order);
        surface.on_activation(Box::new(move |id: Option<&str>| {
            o.lock().unwrap().push(format!("delegated:{}", id.unwrap_or("-")));
        }));
        let o = Arc::clone(&order);
        surface.on_key_activation("x", Box::new(move || o.lock().unwrap().push("bound".to_string())));

        // Act
        surface.click("x");
        surface.click_intercepted("x");

        // Assert
        assert_eq!(
            *order.lock().unwrap(),
            vec!["bound".to_string(), "delegated:x".to_string(), "bound".to_string()]
        );
    }

    #[test]
    fn test_focus_notifies_only_on_transition() {
        let page = HeadlessPage::new();
        let field = page.add_plain_field();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        field.on_focus(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        field.tap();
        field.focus();
        field.blur();
        field.tap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_focusing_a_field_blurs_the_previous_one() {
        // Arrange
        let page = HeadlessPage::new();
        let first = page.add_plain_field();
        let second = page.add_plain_field();
        let first_focus_events = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&first_focus_events);
        first.on_focus(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        // Act
        first.tap();
        second.tap();

        // Assert
        assert!(!first.is_focused());
        assert!(second.is_focused());

        // Blurring a field that lost focus leaves the holder alone.
        first.blur();
        assert!(second.is_focused());

        first.tap();
        assert!(first.is_focused());
        assert!(!second.is_focused());
        assert_eq!(first_focus_events.load(Ordering::SeqCst), 2);
    }
}
