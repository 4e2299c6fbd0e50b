//! City → airport directory.
//!
//! Resolves a search code into the set of airport codes it stands for.
//! City keys (e.g. `NYC`) expand to every airport serving the city; any
//! other code is taken literally as an airport code. Resolution never fails.

use serde::Serialize;
use std::collections::BTreeMap;

/// Airport codes a search code resolved to.
///
/// Keeps the configured order for display; matching only asks for membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AirportSet(Vec<String>);

impl AirportSet {
    pub fn contains(&self, airport: &str) -> bool {
        self.0.iter().any(|a| a == airport)
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read-only mapping from upper-cased city code to its airports.
#[derive(Debug, Clone, Default)]
pub struct CityAirportIndex {
    cities: BTreeMap<String, Vec<String>>,
}

impl CityAirportIndex {
    /// Create an empty index. Every code resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default metropolitan areas.
    pub fn builtin() -> Self {
        let mut index = Self::new();
        index.insert("NYC", ["JFK", "LGA", "EWR"]);
        index.insert("LA", ["LAX", "BUR", "ONT"]);
        index.insert("CHI", ["ORD", "MDW"]);
        index.insert("LON", ["LHR", "LGW", "STN"]);
        index.insert("WAS", ["IAD", "DCA", "BWI"]);
        index.insert("SF", ["SFO", "OAK", "SJC"]);
        index
    }

    /// Add or replace a city. Keys and airport codes are stored upper-case.
    pub fn insert<I, S>(&mut self, city: &str, airports: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: Vec<String> = Vec::new();
        for a in airports {
            let code = a.as_ref().trim().to_uppercase();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        self.cities.insert(city.trim().to_uppercase(), codes);
    }

    /// Resolve a city or airport code.
    ///
    /// The code is upper-cased first. A known city yields its airports;
    /// anything else, including the empty string, yields a one-element set
    /// holding the upper-cased input.
    pub fn resolve(&self, code: &str) -> AirportSet {
        let key = code.to_uppercase();
        match self.cities.get(&key) {
            Some(airports) => AirportSet(airports.clone()),
            None => AirportSet(vec![key]),
        }
    }

    /// Iterate cities in key order.
    pub fn cities(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.cities.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
