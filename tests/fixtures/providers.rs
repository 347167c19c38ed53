//! Scripted geocode providers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use route_planner::error::{Error, Result};
use route_planner::model::Coordinate;
use route_planner::traits::GeocodeProvider;

/// Answers from a fixed table, optionally after a simulated network delay.
#[derive(Clone)]
pub struct ScriptedProvider {
    name: &'static str,
    answers: HashMap<String, Coordinate>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
    queried: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            answers: HashMap::new(),
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            queried: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answer(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.answers.insert(address.to_string(), coordinate);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().expect("queried lock").clone()
    }

    pub fn boxed(&self) -> Box<dyn GeocodeProvider + Send> {
        Box::new(self.clone())
    }
}

impl GeocodeProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn lookup(&self, address: &str) -> Result<Coordinate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queried.lock().expect("queried lock").push(address.to_string());
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.answers
            .get(address)
            .copied()
            .ok_or_else(|| Error::lookup_failed(self.name, "no match"))
    }
}
