//! In-memory backend for controller and store tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use crate::{
    client::WeatherBackend,
    error::ApiError,
    model::{ClearAck, HistoryEntry, WeatherSnapshot},
};

pub(crate) fn snapshot(city: &str, country: &str, temperature: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        city: city.to_string(),
        country: country.to_string(),
        latitude: 51.51,
        longitude: -0.13,
        temperature,
        feels_like: temperature - 1.0,
        temp_min: temperature - 2.0,
        temp_max: temperature + 2.0,
        humidity: 70,
        pressure: 1013,
        wind_speed: 3.5,
        wind_direction: 180,
        cloudiness: 40,
        visibility: 10.0,
        condition: "Clouds".to_string(),
        description: "scattered clouds".to_string(),
        icon_code: None,
        sunrise: "06:00".to_string(),
        sunset: "18:00".to_string(),
        timezone: 0,
    }
}

/// Behaves like the real backend: known cities succeed and are recorded in
/// history, everything else is a 404.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub weather_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub clear_calls: AtomicUsize,
    pub fail_history: AtomicBool,
    pub fail_clear: AtomicBool,
    history: Mutex<Vec<HistoryEntry>>,
    /// When set, `fetch_weather` and `clear_history` wait for a permit
    /// before answering.
    gate: Option<Arc<Notify>>,
    /// One gate per upcoming `fetch_history` call, consumed in order. The
    /// response is captured before waiting, so it can arrive stale.
    history_gates: Mutex<VecDeque<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self { gate: Some(gate), ..Self::default() }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn seed_history(&self, cities: &[(&str, &str, f64)]) {
        let mut history = self.history.lock().unwrap();
        for (city, country, temp) in cities {
            let id = history.len() as i64 + 1;
            history.insert(0, entry(id, city, country, *temp));
        }
    }

    pub fn gate_next_history(&self, gate: Arc<Notify>) {
        self.history_gates.lock().unwrap().push_back(gate);
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

fn entry(id: i64, city: &str, country: &str, temperature: f64) -> HistoryEntry {
    HistoryEntry {
        id,
        city_name: city.to_string(),
        country: country.to_string(),
        temperature,
        humidity: 70,
        wind_speed: 3.5,
        weather_description: "scattered clouds".to_string(),
        timestamp: Utc::now(),
    }
}

#[async_trait]
impl WeatherBackend for FakeBackend {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, ApiError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        let (name, country, temp) = match city.to_lowercase().as_str() {
            "london" => ("London", "GB", 15.5),
            "paris" => ("Paris", "FR", 18.0),
            "tokyo" => ("Tokyo", "JP", 21.3),
            _ => return Err(ApiError::NotFound("City not found".to_string())),
        };

        let mut history = self.history.lock().unwrap();
        let id = history.len() as i64 + 1;
        history.insert(0, entry(id, name, country, temp));

        Ok(snapshot(name, country, temp))
    }

    async fn fetch_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        let page: Vec<HistoryEntry> = {
            let history = self.history.lock().unwrap();
            history.iter().take(limit as usize).cloned().collect()
        };
        let gate = self.history_gates.lock().unwrap().pop_front();
        self.history_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_history.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 500,
                message: "Failed to fetch search history".to_string(),
            });
        }

        Ok(page)
    }

    async fn clear_history(&self) -> Result<ClearAck, ApiError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(ApiError::no_response());
        }

        let mut history = self.history.lock().unwrap();
        let deleted = history.len() as u64;
        history.clear();

        Ok(ClearAck {
            message: "Search history cleared successfully".to_string(),
            deleted_count: deleted,
        })
    }
}
