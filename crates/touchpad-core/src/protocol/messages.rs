//! Message types for the phone-facing WebSocket protocol.
//!
//! The protocol is unidirectional: the phone sends one JSON object per
//! WebSocket frame and the server never answers on the socket.
//!
//! # Message flow
//!
//! ```text
//! Phone → Server:  JSON frame  →  WireMessage  →  InboundEvent
//! ```
//!
//! # JSON discriminant
//!
//! Every message carries a `"type"` field.  The remaining fields depend on the
//! type and are simply omitted when irrelevant:
//!
//! ```json
//! {"type":"move","dx":3.5,"dy":-1.25}
//! {"type":"click","button":"right"}
//! {"type":"deviceinfo","touchpadWidth":500,"touchpadHeight":800,"screenWidth":1080,"screenHeight":2340}
//! ```
//!
//! # Why not `#[serde(tag = "type")]`?
//!
//! The phone client sends the tag in whatever case it likes (`"ThreeSwipe"`,
//! `"threeswipe"`), and an unknown tag must not be a decode error.  So the
//! frame is first read into the flat [`WireMessage`] and only then converted
//! into the closed [`InboundEvent`] enum, with an explicit
//! [`InboundEvent::Unrecognized`] arm for everything else.

use serde::Deserialize;

use crate::domain::calibration::DeviceInfo;

// ── Wire representation ───────────────────────────────────────────────────────

/// The flat, loosely-typed view of one inbound frame.
///
/// Every field except `type` is optional.  A missing or `null` number reads
/// as `0.0` once converted to an [`InboundEvent`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Event type tag, matched case-insensitively.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Horizontal delta (move, scroll, threeswipe).
    #[serde(default)]
    pub dx: Option<f64>,

    /// Vertical delta (move, scroll, threeswipe).
    #[serde(default)]
    pub dy: Option<f64>,

    /// Button name for `click`.
    #[serde(default)]
    pub button: Option<String>,

    /// Pinch delta for `zoom`.
    #[serde(default)]
    pub delta: Option<f64>,

    /// Width of the phone's touch surface (`deviceinfo`).
    #[serde(default)]
    pub touchpad_width: Option<f64>,

    /// Height of the phone's touch surface (`deviceinfo`).
    #[serde(default)]
    pub touchpad_height: Option<f64>,

    /// Width of the phone's screen (`deviceinfo`).
    #[serde(default)]
    pub screen_width: Option<f64>,

    /// Height of the phone's screen (`deviceinfo`).
    #[serde(default)]
    pub screen_height: Option<f64>,
}

// ── Event kinds ───────────────────────────────────────────────────────────────

/// The closed set of event types the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `deviceinfo`: touchpad and screen dimensions used for calibration.
    DeviceInfo,
    /// `move`: relative pointer motion.
    Move,
    /// `click`: single button click.
    Click,
    /// `scroll`: two-finger scroll.
    Scroll,
    /// `zoom`: pinch gesture.
    Zoom,
    /// `threeswipe`: three-finger swipe sample.
    ThreeSwipe,
}

impl EventKind {
    /// Every kind, in wire-tag order.
    pub const ALL: [EventKind; 6] = [
        EventKind::DeviceInfo,
        EventKind::Move,
        EventKind::Click,
        EventKind::Scroll,
        EventKind::Zoom,
        EventKind::ThreeSwipe,
    ];

    /// The lower-case wire tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::DeviceInfo => "deviceinfo",
            EventKind::Move => "move",
            EventKind::Click => "click",
            EventKind::Scroll => "scroll",
            EventKind::Zoom => "zoom",
            EventKind::ThreeSwipe => "threeswipe",
        }
    }

    /// Looks up a kind by its wire tag, ignoring ASCII case.
    ///
    /// Returns `None` for any tag outside the known set, including the empty
    /// string.
    pub fn from_tag(tag: &str) -> Option<EventKind> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

// ── Typed events ──────────────────────────────────────────────────────────────

/// One decoded inbound event.
///
/// Each variant carries only the fields that matter for its kind.  Values are
/// transient: built per frame, dropped after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Phone reports its dimensions so motion can be scaled to the host.
    Calibration(DeviceInfo),
    /// Relative pointer motion in touchpad units.
    Move { dx: f64, dy: f64 },
    /// Button click.  `button` is exactly what the phone sent (possibly empty).
    Click { button: String },
    /// Scroll in touchpad units; `dy` follows finger direction.
    Scroll { dx: f64, dy: f64 },
    /// Pinch delta; positive means fingers moved apart.
    Zoom { delta: f64 },
    /// One sample of a three-finger swipe.
    Swipe { dx: f64, dy: f64 },
    /// A well-formed frame whose `type` is not in the known set.
    Unrecognized { kind: String },
}

impl InboundEvent {
    /// Short name for log lines that must not echo field values.
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::Calibration(_) => "deviceinfo",
            InboundEvent::Move { .. } => "move",
            InboundEvent::Click { .. } => "click",
            InboundEvent::Scroll { .. } => "scroll",
            InboundEvent::Zoom { .. } => "zoom",
            InboundEvent::Swipe { .. } => "threeswipe",
            InboundEvent::Unrecognized { .. } => "unrecognized",
        }
    }
}

impl From<WireMessage> for InboundEvent {
    fn from(msg: WireMessage) -> Self {
        let tag = msg.kind.unwrap_or_default();
        let dx = msg.dx.unwrap_or(0.0);
        let dy = msg.dy.unwrap_or(0.0);

        match EventKind::from_tag(&tag) {
            Some(EventKind::DeviceInfo) => InboundEvent::Calibration(DeviceInfo {
                touchpad_width: msg.touchpad_width.unwrap_or(0.0),
                touchpad_height: msg.touchpad_height.unwrap_or(0.0),
                screen_width: msg.screen_width.unwrap_or(0.0),
                screen_height: msg.screen_height.unwrap_or(0.0),
            }),
            Some(EventKind::Move) => InboundEvent::Move { dx, dy },
            Some(EventKind::Click) => InboundEvent::Click {
                button: msg.button.unwrap_or_default(),
            },
            Some(EventKind::Scroll) => InboundEvent::Scroll { dx, dy },
            Some(EventKind::Zoom) => InboundEvent::Zoom {
                delta: msg.delta.unwrap_or(0.0),
            },
            Some(EventKind::ThreeSwipe) => InboundEvent::Swipe { dx, dy },
            None => InboundEvent::Unrecognized { kind: tag },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
