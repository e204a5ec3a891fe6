use crate::types::Sequence;
use std::collections::HashMap;
use std::sync::Mutex;

/// Memoizes per-sequence feature encodings across rounds
pub struct EncodingCache {
    data: Mutex<HashMap<Sequence, Vec<f64>>>,
    capacity: usize,
}

impl EncodingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn get(&self, key: &Sequence) -> Option<Vec<f64>> {
        let data = self.data.lock().unwrap();
        data.get(key).cloned()
    }

    pub fn set(&self, key: Sequence, value: Vec<f64>) {
        let mut data = self.data.lock().unwrap();
        if data.len() >= self.capacity {
            // A simple eviction strategy: clear the cache when full.
            data.clear();
        }
        data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
