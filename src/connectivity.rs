//! WiFi link supervision.
//!
//! A timed state machine advanced once per tick.  When the link drops it
//! reports [`LinkEvent::Disconnected`], restarts the association and then
//! polls link status at a fixed spacing for a bounded number of polls.  An
//! exhausted cycle falls back to `Down` and the next tick starts a fresh
//! one, so retries never stop while each tick stays short.
//!
//! ```text
//!            link lost                 poll: up
//!  Connected ─────────▶ Reconnecting ──────────▶ Connected
//!      ▲                  │      ▲
//!      │ up          max polls   │ next tick
//!      │                  ▼      │
//!      └─────────────── Down ────┘
//! ```

use log::{error, info, warn};

use crate::app::ports::ConnectivityPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    /// Not connected and no reconnect cycle running.
    Down,
    Reconnecting { polls: u8, last_poll_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

/// Result of one [`ConnectivityManager::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCheck {
    /// Polling may run this tick.
    pub up: bool,
    pub event: Option<LinkEvent>,
}

pub struct ConnectivityManager {
    state: LinkState,
    poll_interval_ms: u32,
    max_polls: u8,
}

impl ConnectivityManager {
    pub fn new(poll_interval_ms: u32, max_polls: u8) -> Self {
        Self {
            state: LinkState::Down,
            poll_interval_ms,
            max_polls: max_polls.max(1),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_up(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn apply_config(&mut self, poll_interval_ms: u32, max_polls: u8) {
        self.poll_interval_ms = poll_interval_ms;
        self.max_polls = max_polls.max(1);
    }

    /// Initial association at boot.  No disconnect, no event; the first
    /// [`check`](Self::check) reports `Connected` once the link is up.
    pub fn begin(&mut self, now_ms: u64, link: &mut impl ConnectivityPort) {
        if link.is_connected() {
            return;
        }
        info!("WIFI | connecting...");
        if let Err(e) = link.connect() {
            warn!("WIFI | connect failed: {e}");
        }
        self.state = LinkState::Reconnecting {
            polls: 0,
            last_poll_ms: now_ms,
        };
    }

    /// Advance the state machine.
    pub fn check(&mut self, now_ms: u64, link: &mut impl ConnectivityPort) -> LinkCheck {
        match self.state {
            LinkState::Connected => {
                if link.is_connected() {
                    return LinkCheck {
                        up: true,
                        event: None,
                    };
                }
                error!("WIFI | link lost, reconnecting");
                self.start_cycle(now_ms, link);
                LinkCheck {
                    up: false,
                    event: Some(LinkEvent::Disconnected),
                }
            }
            LinkState::Down => {
                if link.is_connected() {
                    return self.mark_connected();
                }
                self.start_cycle(now_ms, link);
                LinkCheck {
                    up: false,
                    event: None,
                }
            }
            LinkState::Reconnecting {
                polls,
                last_poll_ms,
            } => {
                if now_ms.saturating_sub(last_poll_ms) < u64::from(self.poll_interval_ms) {
                    return LinkCheck {
                        up: false,
                        event: None,
                    };
                }
                if link.is_connected() {
                    return self.mark_connected();
                }
                let polls = polls.saturating_add(1);
                if polls >= self.max_polls {
                    warn!("WIFI | still down after {polls} polls, retrying next tick");
                    self.state = LinkState::Down;
                } else {
                    self.state = LinkState::Reconnecting {
                        polls,
                        last_poll_ms: now_ms,
                    };
                }
                LinkCheck {
                    up: false,
                    event: None,
                }
            }
        }
    }

    /// Start a reconnect cycle now unless the link is already up.
    /// Returns whether a cycle was started.
    pub fn force_reconnect(&mut self, now_ms: u64, link: &mut impl ConnectivityPort) -> bool {
        if link.is_connected() {
            info!("WIFI | reconnect requested but link is up");
            return false;
        }
        self.start_cycle(now_ms, link);
        true
    }

    fn start_cycle(&mut self, now_ms: u64, link: &mut impl ConnectivityPort) {
        info!("WIFI | reconnecting...");
        link.disconnect();
        if let Err(e) = link.connect() {
            warn!("WIFI | connect failed: {e}");
        }
        self.state = LinkState::Reconnecting {
            polls: 0,
            last_poll_ms: now_ms,
        };
    }

    fn mark_connected(&mut self) -> LinkCheck {
        info!("WIFI | connected");
        self.state = LinkState::Connected;
        LinkCheck {
            up: true,
            event: Some(LinkEvent::Connected),
        }
    }
}
