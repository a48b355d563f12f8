// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip catalog behind the `/viajes` menu.
//!
//! Loaded once at startup from a JSON document of the form
//! `{"viajes": [ ... ]}`. A missing file selects the built-in catalog.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use translanda_core::TranslandaError;

use crate::callback::{PAYMENT_PREFIX, SEATS_PREFIX, STOPS_PREFIX};

/// Telegram rejects callback data longer than this many bytes.
const MAX_CALLBACK_DATA: usize = 64;

/// One bookable trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Stable identifier, used as callback data.
    pub id: String,
    pub name: String,
    pub destination: String,
    pub date: String,
    pub departure_time: String,
    pub return_time: String,
    pub price: String,
    #[serde(default)]
    pub stops: Vec<String>,
    /// Free-form payment instructions, one block per method.
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub images: TripImages,
}

/// Local image paths for each trip screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripImages {
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub seats: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    viajes: Vec<Trip>,
}

/// Ordered list of trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripCatalog {
    trips: Vec<Trip>,
}

impl TripCatalog {
    /// Validates ids: non-empty, unique, and short enough to fit every
    /// callback prefix within Telegram's limit.
    pub fn new(trips: Vec<Trip>) -> Result<Self, TranslandaError> {
        let longest_prefix = [PAYMENT_PREFIX, SEATS_PREFIX, STOPS_PREFIX]
            .iter()
            .map(|p| p.len())
            .max()
            .unwrap_or(0);

        let mut seen = HashSet::new();
        for trip in &trips {
            if trip.id.trim().is_empty() {
                return Err(TranslandaError::Config(format!(
                    "trip {:?} has an empty id",
                    trip.name
                )));
            }
            if trip.id.len() + longest_prefix > MAX_CALLBACK_DATA {
                return Err(TranslandaError::Config(format!(
                    "trip id {:?} is too long for callback data",
                    trip.id
                )));
            }
            if crate::callback::is_reserved(&trip.id) {
                return Err(TranslandaError::Config(format!(
                    "trip id {:?} collides with a menu action",
                    trip.id
                )));
            }
            if !seen.insert(trip.id.as_str()) {
                return Err(TranslandaError::Config(format!(
                    "duplicate trip id {:?}",
                    trip.id
                )));
            }
        }
        Ok(Self { trips })
    }

    /// Reads the catalog file, falling back to [`TripCatalog::builtin`] when it
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, TranslandaError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "trip catalog not found, using built-in trips");
                return Ok(Self::builtin());
            }
            Err(e) => return Err(TranslandaError::storage(e)),
        };

        let doc: CatalogDocument =
            serde_json::from_str(&raw).map_err(|e| TranslandaError::MalformedStore {
                path: path.to_path_buf(),
                source: e,
            })?;

        let catalog = Self::new(doc.viajes)?;
        info!(path = %path.display(), trips = catalog.len(), "trip catalog loaded");
        Ok(catalog)
    }

    /// The two day trips the bot ships with.
    pub fn builtin() -> Self {
        let stops: Vec<String> = [
            "Av. Intercomunal",
            "Santa Clara",
            "Barroso",
            "5 Bocas",
            "Bolivia",
            "Cumaná",
            "La Norma",
            "La Burbuja",
            "La Estrella",
            "La Cvp",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let payment_methods = vec![
            "Pago Móvil\n➖ Datos disponibles por /contacto".to_string(),
            "Binance, Zelle o PayPal\n➖ Datos disponibles por /contacto".to_string(),
        ];

        let images = |cover: &str| TripImages {
            cover: Some(cover.to_string()),
            seats: Some("img/imagen_puestos.png".to_string()),
            payment: Some("img/pago.png".to_string()),
            map: Some("img/mapa.png".to_string()),
        };

        Self {
            trips: vec![
                Trip {
                    id: "producto1".into(),
                    name: "Adicora Full Day 🌊".into(),
                    destination: "Adicora".into(),
                    date: "01/02/2025".into(),
                    departure_time: "5:00 AM".into(),
                    return_time: "6:00 PM".into(),
                    price: "$5".into(),
                    stops: stops.clone(),
                    payment_methods: payment_methods.clone(),
                    images: images("img/adicora.jpg"),
                },
                Trip {
                    id: "producto2".into(),
                    name: "Aquatica Full Day ⛱️".into(),
                    destination: "Aquatica".into(),
                    date: "18/04/2025".into(),
                    departure_time: "8:00 AM".into(),
                    return_time: "4:30 PM".into(),
                    price: "$5".into(),
                    stops,
                    payment_methods,
                    images: images("img/aquatica.jpg"),
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
