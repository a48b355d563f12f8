// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text and keyboards for every fixed bot screen.
//!
//! Pure builders: nothing here talks to Telegram, so the handlers stay thin
//! and the wording is testable.

use std::path::PathBuf;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use translanda_config::model::ContactConfig;

use crate::callback::CallbackAction;
use crate::catalog::{Trip, TripCatalog};
use crate::markdown::RichText;

pub const GREETING: &str =
    "¡Hola! Soy TransLanda bot 🤖 utiliza /comandos para ver todas mis funciones.";
pub const LOGO_QUESTION: &str = "¿Te gusta nuestro logo?";
pub const TRIP_NOT_FOUND: &str = "❌ Producto no encontrado";
pub const IMAGE_QUERY_MISSING: &str = "Por favor, proporciona una búsqueda.";
pub const IMAGE_NOT_FOUND: &str = "No se encontró ninguna imagen.";
pub const IMAGE_SEARCH_DISABLED: &str = "La búsqueda de imágenes no está disponible.";

const BACK: &str = "⬅️ Volver";
const ASK_CONTACT: &str =
    "Cualquier tipo de duda, puedes comunicarte a nuestro WhatsApp, coloca /contacto para facilitarte los datos";

/// A captioned screen, optionally over a local image.
#[derive(Debug, Clone)]
pub struct Screen {
    pub caption: RichText,
    pub image: Option<PathBuf>,
    pub keyboard: InlineKeyboardMarkup,
}

fn button(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.data())
}

fn back_to(action: CallbackAction) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(BACK, action)]])
}

/// `/comandos`.
pub fn command_list() -> RichText {
    let commands = [
        ("Inicia el BOT 🤖", "/start"),
        ("Comandos disponibles ⚙️", "/comandos"),
        ("Contacta con Nosotros 📝", "/contacto"),
        ("Ver los viajes disponibles 🚍", "/viajes"),
        ("Muestra la tasa del Dólar 💵", "/dolar"),
        ("Muestra el logo de TransLanda 📷", "/logo"),
        ("Busca una imagen en Google 🔍", "/img <búsqueda>"),
    ];

    let mut text = RichText::new().bold("Comandos Disponibles:").line().line();
    for (label, command) in commands {
        text = text.bold(label).text("  ").code(command).line();
    }
    text.line()
        .bold("Escribe un mensaje para preguntar lo que quieras.")
}

/// `/contacto`. Unset fields are left out.
pub fn contact(contact: &ContactConfig) -> RichText {
    let fields = [
        ("Teléfono 📱", &contact.phone),
        ("Instagram TransLanda 🚍", &contact.instagram),
        ("Instagram Promotora 🚍", &contact.instagram_promoter),
        ("Correo 📩", &contact.email),
    ];

    let mut text = RichText::new().bold("Puedes contactarnos:").line().line();
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            text = text.bold(label).text("  ").code(value).line();
        }
    }
    text.line().text(
        "Puedes contactar con nosotros para cualquier información acerca de viajes disponibles, viajes futuros o servicio privado de transporte.",
    )
}

/// `/viajes` and the "back" target of every trip screen.
pub fn trip_menu(catalog: &TripCatalog, brand_image: Option<PathBuf>) -> Screen {
    let row: Vec<InlineKeyboardButton> = catalog
        .trips()
        .iter()
        .map(|t| button(format!("Ver {}", t.name), CallbackAction::Trip(t.id.clone())))
        .collect();

    Screen {
        caption: RichText::new()
            .text("Estos son nuestros viajes disponibles, selecciona uno para ver más detalles:"),
        image: brand_image,
        keyboard: InlineKeyboardMarkup::new(vec![row]),
    }
}

pub fn trip_details(trip: &Trip) -> Screen {
    let schedule = format!(
        "⏰ Fecha del viaje: {}\n⏰ Hora de salida: {}\n⏰ Hora de retorno: {}",
        trip.date, trip.departure_time, trip.return_time
    );

    let caption = RichText::new()
        .code(&trip.name)
        .line()
        .line()
        .bold("Medio de transporte 🚌")
        .text("  ")
        .code("Autobús")
        .line()
        .bold("Horario")
        .line()
        .pre(&schedule)
        .line()
        .bold("Destino 🚩")
        .text("  ")
        .code(&trip.destination)
        .line()
        .bold("Precio P/P 💵")
        .text("  ")
        .code(&trip.price)
        .line()
        .line()
        .bold(ASK_CONTACT);

    let id = trip.id.clone();
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![button("💺 Puestos Disponibles", CallbackAction::Seats(id.clone()))],
        vec![button("⛔ Paradas Disponibles", CallbackAction::Stops(id.clone()))],
        vec![button("💳 Métodos de Pago", CallbackAction::Payment(id))],
        vec![button(BACK, CallbackAction::Menu)],
    ]);

    Screen {
        caption,
        image: trip.images.cover.as_ref().map(PathBuf::from),
        keyboard,
    }
}

pub fn payment(trip: &Trip) -> Screen {
    let mut caption = RichText::new().text("💳 ").bold("Métodos de pago:").line();
    for method in &trip.payment_methods {
        caption = caption.pre(method).line();
    }
    caption = caption
        .line()
        .bold("Antes de realizar un pago notifícanos a nuestro WhatsApp, coloca /contacto para facilitarte los datos");

    Screen {
        caption,
        image: trip.images.payment.as_ref().map(PathBuf::from),
        keyboard: back_to(CallbackAction::Trip(trip.id.clone())),
    }
}

pub fn seats(trip: &Trip) -> Screen {
    Screen {
        caption: RichText::new()
            .pre("Puestos 💺\nPuestos Disponibles 🟢\nPuestos Reservados 🔴")
            .line()
            .text("En el momento de pagar tu pasaje podrás seleccionar tu puesto"),
        image: trip.images.seats.as_ref().map(PathBuf::from),
        keyboard: back_to(CallbackAction::Trip(trip.id.clone())),
    }
}

pub fn stops(trip: &Trip) -> Screen {
    let list = trip
        .stops
        .iter()
        .map(|s| format!("➖ {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut caption = RichText::new().text("⛔ ").bold("Paradas Disponibles:").line().line();
    caption = if list.is_empty() {
        caption.text("Consulta las paradas por /contacto")
    } else {
        caption.pre(&list)
    };

    Screen {
        caption,
        image: trip.images.map.as_ref().map(PathBuf::from),
        keyboard: back_to(CallbackAction::Trip(trip.id.clone())),
    }
}

pub fn logo_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("Sí", CallbackAction::Logo { liked: true })],
        vec![button("No", CallbackAction::Logo { liked: false })],
    ])
}

/// Caption that replaces the logo question once answered.
pub fn logo_answer(liked: bool) -> String {
    let answer = if liked {
        "¡Nos alegra que te guste! 😊"
    } else {
        "Gracias por tu opinión. Trabajaremos en mejorar."
    };
    format!("¿Te gusta el logo de nuestra empresa?\n\n{answer}")
}
