// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboard callback data.

pub const MENU: &str = "productos";
pub const LOGO_YES: &str = "logo_si";
pub const LOGO_NO: &str = "logo_no";
pub const PAYMENT_PREFIX: &str = "pago_";
pub const SEATS_PREFIX: &str = "puestos_";
pub const STOPS_PREFIX: &str = "puntos_";

/// What a button press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Menu,
    Trip(String),
    Payment(String),
    Seats(String),
    Stops(String),
    Logo { liked: bool },
}

impl CallbackAction {
    /// Anything that is not a fixed action or a prefixed one names a trip.
    pub fn parse(data: &str) -> Self {
        match data {
            MENU => return Self::Menu,
            LOGO_YES => return Self::Logo { liked: true },
            LOGO_NO => return Self::Logo { liked: false },
            _ => {}
        }
        if let Some(id) = data.strip_prefix(PAYMENT_PREFIX) {
            Self::Payment(id.to_string())
        } else if let Some(id) = data.strip_prefix(SEATS_PREFIX) {
            Self::Seats(id.to_string())
        } else if let Some(id) = data.strip_prefix(STOPS_PREFIX) {
            Self::Stops(id.to_string())
        } else {
            Self::Trip(data.to_string())
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::Menu => MENU.to_string(),
            Self::Trip(id) => id.clone(),
            Self::Payment(id) => format!("{PAYMENT_PREFIX}{id}"),
            Self::Seats(id) => format!("{SEATS_PREFIX}{id}"),
            Self::Stops(id) => format!("{STOPS_PREFIX}{id}"),
            Self::Logo { liked: true } => LOGO_YES.to_string(),
            Self::Logo { liked: false } => LOGO_NO.to_string(),
        }
    }
}

/// True when `id` would not parse back as [`CallbackAction::Trip`].
pub fn is_reserved(id: &str) -> bool {
    !matches!(CallbackAction::parse(id), CallbackAction::Trip(_))
}
