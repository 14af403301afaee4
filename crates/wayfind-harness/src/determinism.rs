#![forbid(unsafe_code)]

//! Deterministic fixtures for tests.
//!
//! Seed and clock step come from the environment so a failing run can be
//! replayed exactly; in deterministic mode timestamps are counters instead
//! of wall time and JSONL output is byte-stable.

use std::cell::Cell;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value, json};

const ENV_DETERMINISTIC: &str = "WAYFIND_TEST_DETERMINISTIC";
const ENV_SEED: &str = "WAYFIND_TEST_SEED";
const ENV_TIME_STEP_MS: &str = "WAYFIND_TEST_TIME_STEP_MS";

/// Seed, run id and a stepping clock for one test run.
#[derive(Debug)]
pub struct DeterminismFixture {
    seed: u64,
    deterministic: bool,
    time_step: Duration,
    run_id: String,
    ticks: Cell<u64>,
}

impl DeterminismFixture {
    /// Fixture configured from the environment.
    #[must_use]
    pub fn new(prefix: &str, default_seed: u64) -> Self {
        Self::new_with(
            prefix,
            env_u64(ENV_SEED).unwrap_or(default_seed),
            env_flag(ENV_DETERMINISTIC),
            env_u64(ENV_TIME_STEP_MS).unwrap_or(16),
        )
    }

    /// Fixture with explicit configuration.
    #[must_use]
    pub fn new_with(prefix: &str, seed: u64, deterministic: bool, time_step_ms: u64) -> Self {
        let run_id = if deterministic {
            format!("{prefix}_seed{seed}")
        } else {
            format!("{prefix}_{}_{}", std::process::id(), unix_secs())
        };
        Self {
            seed,
            deterministic,
            time_step: Duration::from_millis(time_step_ms),
            run_id,
            ticks: Cell::new(0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Advance the fixture clock by one step and return the new time.
    pub fn step(&self) -> Duration {
        let n = self.ticks.get() + 1;
        self.ticks.set(n);
        self.now()
    }

    /// Current fixture time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.time_step.saturating_mul(u32::try_from(self.ticks.get()).unwrap_or(u32::MAX))
    }

    /// Timestamp label: a counter in deterministic mode, wall time otherwise.
    #[must_use]
    pub fn timestamp(&self) -> String {
        if self.deterministic {
            format!("T{:06}", self.ticks.get())
        } else {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            format!("{}.{:03}", now.as_secs(), now.subsec_millis())
        }
    }
}

/// JSONL event logger bound to a fixture.
#[derive(Debug)]
pub struct TestJsonlLogger {
    fixture: DeterminismFixture,
    seq: Cell<u64>,
    context: Map<String, Value>,
}

impl TestJsonlLogger {
    #[must_use]
    pub fn new(fixture: DeterminismFixture) -> Self {
        Self {
            fixture,
            seq: Cell::new(0),
            context: Map::new(),
        }
    }

    #[must_use]
    pub fn fixture(&self) -> &DeterminismFixture {
        &self.fixture
    }

    /// Attach a field to every later line.
    pub fn add_context(&mut self, key: &str, value: impl Into<Value>) {
        self.context.insert(key.to_string(), value.into());
    }

    /// Build one JSONL line. Caller fields never override the envelope.
    pub fn emit_line(&self, event: &str, fields: &[(&str, Value)]) -> String {
        let seq = self.seq.get();
        self.seq.set(seq + 1);

        let mut line = Map::new();
        for (key, value) in fields {
            line.insert((*key).to_string(), value.clone());
        }
        if !self.context.is_empty() {
            line.insert("context".into(), Value::Object(self.context.clone()));
        }
        line.insert("seq".into(), json!(seq));
        line.insert("ts".into(), json!(self.fixture.timestamp()));
        line.insert("event".into(), json!(event));
        line.insert("run_id".into(), json!(self.fixture.run_id()));
        line.insert("seed".into(), json!(self.fixture.seed()));
        Value::Object(line).to_string()
    }

    /// Emit a line to stderr.
    pub fn log(&self, event: &str, fields: &[(&str, Value)]) {
        eprintln!("{}", self.emit_line(event, fields));
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> bool {
    matches!(std::env::var(key).as_deref(), Ok("1" | "true" | "TRUE"))
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_run_id_and_clock() {
        let fixture = DeterminismFixture::new_with("tour", 7, true, 16);
        assert_eq!(fixture.run_id(), "tour_seed7");
        assert_eq!(fixture.now(), Duration::ZERO);
        assert_eq!(fixture.step(), Duration::from_millis(16));
        assert_eq!(fixture.step(), Duration::from_millis(32));
        assert_eq!(fixture.timestamp(), "T000002");
    }

    #[test]
    fn jsonl_lines_are_valid_and_sequenced() {
        let mut logger = TestJsonlLogger::new(DeterminismFixture::new_with("tour", 1, true, 10));
        logger.add_context("viewport", "1280x800");
        let first = logger.emit_line("recompute", &[("top", json!(180.0)), ("seq", json!(99))]);
        let second = logger.emit_line("recompute", &[]);

        let a: Value = serde_json::from_str(&first).unwrap();
        let b: Value = serde_json::from_str(&second).unwrap();
        assert_eq!(a["seq"], 0);
        assert_eq!(b["seq"], 1);
        assert_eq!(a["top"], 180.0);
        assert_eq!(a["event"], "recompute");
        assert_eq!(a["context"]["viewport"], "1280x800");
        assert_eq!(a["run_id"], "tour_seed1");
    }
}
