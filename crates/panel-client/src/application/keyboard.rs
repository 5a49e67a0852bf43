//! OnScreenKeyboard: the touchscreen keyboard widget.
//!
//! The widget renders the fixed [`KEY_LAYOUT`] into a mount container on the
//! host page, follows whichever eligible text field gains focus, and turns key
//! activations into edits of that field.
//!
//! # Lifecycle
//!
//! ```text
//! field gains focus ──► show(field) ──► keys edit field ──► Dismiss / Enter ──► hide()
//!                          │
//!                          └─ after `compensation_delay`: measure surface,
//!                             pad page bottom, scroll field to centre
//! ```
//!
//! The page is reached only through the [`HostPage`], [`KeySurface`] and
//! [`InputField`] traits, and the deferred step only through [`Scheduler`],
//! so the widget runs unchanged against a browser bridge, the in-memory
//! [`crate::infrastructure::headless_page::HeadlessPage`], or test doubles.
//!
//! # Listeners
//!
//! `attach` registers three kinds of listener:
//!
//! 1. one delegated activation listener on the container, covering every key;
//! 2. one dedicated listener on the Dismiss key, so dismissal still works when
//!    the delegated path is intercepted upstream (the delegated path ignores
//!    Dismiss);
//! 3. one focus listener per eligible field present at attach time.
//!
//! Listeners hold only weak references to the widget and the fields.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use panel_core::keyboard::layout::{
    KeyDescriptor, KeyFace, KeyRole, KeyTone, KeyWidth, DISMISS_KEY, KEY_LAYOUT,
};
use tracing::{debug, error, info, warn};

use crate::domain::config::KeyboardConfig;

/// Delegated listener: receives the identity of the key target the
/// activation landed on, or `None` if it hit no key.
pub type ActivationHandler = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Listener bound to one specific key target.
pub type KeyHandler = Box<dyn Fn() + Send + Sync>;

/// Listener for a field's "gained focus" notification.
pub type FocusHandler = Box<dyn Fn() + Send + Sync>;

/// One-shot deferred work.
pub type DeferredTask = Box<dyn FnOnce() + Send>;

// ── Host page boundary ────────────────────────────────────────────────────────

/// An external text field the keyboard can type into.
///
/// The widget never creates or destroys fields; it only holds weak handles.
#[cfg_attr(test, mockall::automock)]
pub trait InputField: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn focus(&self);
    fn blur(&self);
    /// Smoothly scrolls the field to the vertical centre of the viewport.
    fn scroll_into_view_centered(&self);
    fn on_focus(&self, handler: FocusHandler);
}

/// The mount container the keys are rendered into.
pub trait KeySurface: Send + Sync {
    fn append_key(&self, key: RenderedKey);
    /// Replaces the face of an already rendered key.
    fn set_key_face(&self, id: &str, face: KeyFace);
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;
    /// Current rendered height in pixels (0 while hidden or before layout).
    fn rendered_height(&self) -> u32;
    fn on_activation(&self, handler: ActivationHandler);
    /// Attaches `handler` to the key tagged `id`.
    ///
    /// Returns `false` if no such key has been rendered.
    fn on_key_activation(&self, id: &str, handler: KeyHandler) -> bool;
}

/// The page hosting the keyboard and its fields.
pub trait HostPage: Send + Sync {
    fn find_container(&self, id: &str) -> Option<Arc<dyn KeySurface>>;
    /// Every field currently carrying `marker`.
    fn eligible_fields(&self, marker: &str) -> Vec<Arc<dyn InputField>>;
    /// Bottom padding of the page's root scroll area, in pixels.
    fn set_bottom_padding(&self, px: u32);
}

/// Runs a task once after a delay.  No cancellation.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, task: DeferredTask);
}

/// A key as handed to the surface for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedKey {
    /// Logical identity the surface tags the target with.
    pub id: &'static str,
    pub face: KeyFace,
    pub tone: KeyTone,
    pub width: KeyWidth,
}

impl RenderedKey {
    pub fn from_descriptor(key: &KeyDescriptor, caps_lock: bool) -> Self {
        Self {
            id: key.id(),
            face: key.face(caps_lock),
            tone: key.tone(),
            width: key.width(),
        }
    }
}

// ── Widget ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct WidgetState {
    /// Set iff the surface is visible.
    active_field: Option<Weak<dyn InputField>>,
    caps_lock: bool,
    /// Last measured surface height; meaningful only while visible.
    measured_height: u32,
}

struct Inner {
    page: Arc<dyn HostPage>,
    /// `None` when the container was missing: the widget is inert.
    surface: Option<Arc<dyn KeySurface>>,
    scheduler: Arc<dyn Scheduler>,
    compensation_delay: Duration,
    state: Mutex<WidgetState>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The deferred half of `show`: measure, pad, scroll.
    fn compensate_layout(&self, target: &Weak<dyn InputField>) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let height = surface.rendered_height();
        self.lock_state().measured_height = height;
        self.page.set_bottom_padding(height);
        debug!(height, "keyboard layout compensation applied");

        if let Some(field) = target.upgrade() {
            field.scroll_into_view_centered();
        }
    }
}

/// The on-screen keyboard.
///
/// Cloning yields another handle to the same widget.
#[derive(Clone)]
pub struct OnScreenKeyboard {
    inner: Arc<Inner>,
}

impl OnScreenKeyboard {
    /// Builds the keyboard into the page and wires its listeners.
    ///
    /// If the container named by `config.container_id` does not exist the
    /// error is logged and an inert widget is returned: nothing is rendered,
    /// no listener is attached, and every operation is a no-op.
    pub fn attach(
        page: Arc<dyn HostPage>,
        scheduler: Arc<dyn Scheduler>,
        config: &KeyboardConfig,
    ) -> Self {
        let surface = page.find_container(&config.container_id);
        if surface.is_none() {
            error!(
                container_id = %config.container_id,
                "on-screen keyboard container not found; keyboard disabled"
            );
        }

        let keyboard = Self {
            inner: Arc::new(Inner {
                page,
                surface,
                scheduler,
                compensation_delay: config.compensation_delay(),
                state: Mutex::new(WidgetState::default()),
            }),
        };

        if let Some(surface) = keyboard.inner.surface.clone() {
            keyboard.render(surface.as_ref());
            keyboard.wire(surface.as_ref(), &config.field_marker);
        }
        keyboard
    }

    /// `true` when the mount container was missing at attach time.
    pub fn is_inert(&self) -> bool {
        self.inner.surface.is_none()
    }

    /// Visibility as reported by the surface.
    pub fn is_visible(&self) -> bool {
        self.inner
            .surface
            .as_ref()
            .is_some_and(|surface| surface.is_visible())
    }

    pub fn caps_lock_engaged(&self) -> bool {
        self.inner.lock_state().caps_lock
    }

    /// Surface height recorded by the last compensation pass.
    pub fn measured_height(&self) -> u32 {
        self.inner.lock_state().measured_height
    }

    /// The field keys are currently typed into, if it is still alive.
    pub fn active_field(&self) -> Option<Arc<dyn InputField>> {
        self.inner
            .lock_state()
            .active_field
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// `true` if `field` is the active field.
    pub fn is_active(&self, field: &Arc<dyn InputField>) -> bool {
        self.active_field()
            .is_some_and(|active| same_field(&active, field))
    }

    /// Opens the keyboard for `field`.
    ///
    /// Layout compensation runs after the configured delay.  Calling `show`
    /// again before it fires schedules a second, independent pass.
    pub fn show(&self, field: &Arc<dyn InputField>) {
        let Some(surface) = self.inner.surface.as_ref() else {
            return;
        };
        self.inner.lock_state().active_field = Some(Arc::downgrade(field));
        surface.set_visible(true);
        debug!("on-screen keyboard shown");

        let widget = Arc::downgrade(&self.inner);
        let target = Arc::downgrade(field);
        self.inner.scheduler.schedule_once(
            self.inner.compensation_delay,
            Box::new(move || {
                if let Some(inner) = widget.upgrade() {
                    inner.compensate_layout(&target);
                }
            }),
        );
    }

    /// Closes the keyboard, removes the page padding and releases the field.
    ///
    /// Safe to call when already hidden.
    pub fn hide(&self) {
        let Some(surface) = self.inner.surface.as_ref() else {
            return;
        };
        surface.set_visible(false);
        self.inner.page.set_bottom_padding(0);

        let previous = self.inner.lock_state().active_field.take();
        if let Some(field) = previous.and_then(|weak| weak.upgrade()) {
            field.blur();
        }
        debug!("on-screen keyboard hidden");
    }

    /// Delegated key dispatch.
    ///
    /// Ignored when no field is active or `key_id` does not name a key.
    pub fn activate(&self, key_id: Option<&str>) {
        if self.is_inert() {
            return;
        }
        let Some(field) = self.active_field() else {
            if self.is_visible() {
                // The active field was dropped while the keyboard was open.
                debug!(?key_id, "active field is gone; closing keyboard");
                self.hide();
            } else {
                debug!(?key_id, "key activation ignored: no active field");
            }
            return;
        };
        let Some(key) = key_id.and_then(KeyDescriptor::find) else {
            debug!(?key_id, "key activation ignored: unknown key");
            return;
        };

        match key.role {
            // Owned by the dedicated dismiss listener.
            KeyRole::Dismiss => return,
            // hide() releases the field; refocusing it would reopen the keyboard.
            KeyRole::Enter => {
                self.hide();
                return;
            }
            KeyRole::Backspace => {
                let mut text = field.value();
                text.pop();
                field.set_value(&text);
            }
            KeyRole::CapsToggle => self.toggle_caps_lock(),
            KeyRole::Space => append(field.as_ref(), " "),
            KeyRole::ShiftToggle => {}
            KeyRole::Character => {
                if let Some(text) = key.typed_text(self.caps_lock_engaged()) {
                    append(field.as_ref(), &text);
                }
            }
        }

        field.focus();
    }

    fn toggle_caps_lock(&self) {
        let caps_lock = {
            let mut state = self.inner.lock_state();
            state.caps_lock = !state.caps_lock;
            state.caps_lock
        };
        if let Some(surface) = self.inner.surface.as_ref() {
            for key in KEY_LAYOUT.iter().filter(|key| key.is_single_char()) {
                surface.set_key_face(key.id(), key.face(caps_lock));
            }
        }
        debug!(caps_lock, "caps lock toggled");
    }

    fn render(&self, surface: &dyn KeySurface) {
        // Start hidden: no field is active yet.
        surface.set_visible(false);
        let caps_lock = self.caps_lock_engaged();
        for key in KEY_LAYOUT.iter() {
            surface.append_key(RenderedKey::from_descriptor(key, caps_lock));
        }
    }

    fn wire(&self, surface: &dyn KeySurface, field_marker: &str) {
        let widget = Arc::downgrade(&self.inner);
        surface.on_activation(Box::new(move |key_id: Option<&str>| {
            if let Some(inner) = widget.upgrade() {
                OnScreenKeyboard { inner }.activate(key_id);
            }
        }));

        let widget = Arc::downgrade(&self.inner);
        let dismiss_wired = surface.on_key_activation(
            DISMISS_KEY,
            Box::new(move || {
                if let Some(inner) = widget.upgrade() {
                    OnScreenKeyboard { inner }.hide();
                }
            }),
        );
        if !dismiss_wired {
            warn!("dismiss key target not found; dismiss will not close the keyboard");
        }

        let fields = self.inner.page.eligible_fields(field_marker);
        for field in &fields {
            let widget = Arc::downgrade(&self.inner);
            let target = Arc::downgrade(field);
            field.on_focus(Box::new(move || {
                if let (Some(inner), Some(field)) = (widget.upgrade(), target.upgrade()) {
                    OnScreenKeyboard { inner }.show(&field);
                }
            }));
        }

        info!(
            keys = KEY_LAYOUT.len(),
            fields = fields.len(),
            marker = field_marker,
            "on-screen keyboard attached"
        );
    }
}

fn append(field: &dyn InputField, text: &str) {
    let mut value = field.value();
    value.push_str(text);
    field.set_value(&value);
}

/// Identity comparison on the data pointer only.
fn same_field(a: &Arc<dyn InputField>, b: &Arc<dyn InputField>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
