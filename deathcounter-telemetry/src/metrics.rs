//! ## deathcounter-telemetry::metrics
//! **Prometheus counters for deaths, saves and queries**

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub deaths: IntCounter,
    pub save_failures: IntCounter,
    pub queries: IntCounter,
    pub tracked_players: IntGauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let deaths = IntCounter::new("deathcounter_deaths_total", "Player deaths recorded")?;
        let save_failures = IntCounter::new(
            "deathcounter_save_failures_total",
            "Death count snapshots that failed to reach disk",
        )?;
        let queries = IntCounter::new("deathcounter_queries_total", "Answered deaths queries")?;
        let tracked_players = IntGauge::new(
            "deathcounter_tracked_players",
            "Players with a recorded death count",
        )?;

        registry.register(Box::new(deaths.clone()))?;
        registry.register(Box::new(save_failures.clone()))?;
        registry.register(Box::new(queries.clone()))?;
        registry.register(Box::new(tracked_players.clone()))?;

        Ok(Self {
            registry,
            deaths,
            save_failures,
            queries,
            tracked_players,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_death(&self, tracked_players: usize) {
        self.deaths.inc();
        self.tracked_players.set(tracked_players as i64);
    }

    pub fn record_save_failure(&self) {
        self.save_failures.inc();
    }

    pub fn record_query(&self) {
        self.queries.inc();
    }
}
