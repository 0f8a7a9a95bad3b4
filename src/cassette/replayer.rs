//! Serves recorded fetches back by URL.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Outcome};

/// Replays a cassette: each URL gets its recorded outcomes in order.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<String, VecDeque<Outcome>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut exchanges: Vec<_> = cassette.exchanges.iter().collect();
        exchanges.sort_by_key(|e| e.seq);

        let mut queues: HashMap<String, VecDeque<Outcome>> = HashMap::new();
        for exchange in exchanges {
            queues
                .entry(exchange.url.clone())
                .or_default()
                .push_back(exchange.outcome.clone());
        }
        Self { queues }
    }

    /// Take the next recorded outcome for `url`.
    ///
    /// # Errors
    ///
    /// Returns a description of what the cassette does contain when `url` was
    /// never recorded or all its outcomes have been served.
    pub fn next_outcome(&mut self, url: &str) -> Result<Outcome, String> {
        if let Some(outcome) = self.queues.get_mut(url).and_then(VecDeque::pop_front) {
            return Ok(outcome);
        }
        let mut recorded: Vec<&str> = self.queues.keys().map(String::as_str).collect();
        recorded.sort_unstable();
        Err(format!(
            "Cassette exhausted: no recorded fetch left for {url:?}. Recorded URLs: [{}]",
            recorded.join(", ")
        ))
    }
}
