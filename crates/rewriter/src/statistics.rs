//! Process-wide named counters shared by every filter instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
pub struct Variable {
    name: String,
    value: AtomicU64,
}

impl Variable {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub struct Statistics {
    variables: Mutex<HashMap<String, Arc<Variable>>>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Variable>>> {
        // Counters stay meaningful even if a holder panicked; recover the map.
        self.variables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `name`, or return the existing variable when already registered.
    pub fn add_variable(&self, name: &str) -> Arc<Variable> {
        let mut vars = self.lock();
        Arc::clone(
            vars.entry(name.to_string())
                .or_insert_with(|| Arc::new(Variable::new(name))),
        )
    }

    pub fn find_variable(&self, name: &str) -> Option<Arc<Variable>> {
        self.lock().get(name).cloned()
    }

    pub fn increment(&self, name: &str) {
        self.add_variable(name).add(1);
    }

    /// Current values sorted by name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut out: Vec<(String, u64)> = self
            .lock()
            .values()
            .map(|v| (v.name().to_string(), v.get()))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn add_variable_is_idempotent() {
        let stats = Statistics::new();
        let a = stats.add_variable("pages");
        let b = stats.add_variable("pages");
        a.add(2);
        assert_eq!(b.get(), 2);
        assert_eq!(stats.snapshot(), vec![("pages".to_string(), 2)]);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let stats = Arc::new(Statistics::new());
        let var = stats.add_variable("pages");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        stats.increment("pages");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker");
        }
        assert_eq!(var.get(), 8_000);
    }

    #[test]
    fn missing_variable_is_none() {
        assert!(Statistics::new().find_variable("nope").is_none());
    }
}
