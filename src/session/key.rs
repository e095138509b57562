use std::time::{SystemTime, UNIX_EPOCH};

use livequery_api::QueryKey;
use rand::Rng;
use rand::distributions::Alphanumeric;

const RANDOM_ID_LEN: usize = 4;

/// Issues a fresh [`QueryKey`] for every (re)start of a query.
///
/// Discriminators look like `k3Qz:1700000000123`: a short random id followed
/// by the current epoch milliseconds. They correlate responses with the run
/// that produced them and carry no security meaning.
#[derive(Debug, Default)]
pub struct QueryKeyFactory {
    last_discriminator: Option<String>,
}

impl QueryKeyFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self, scope_id: &str, scope_name: &str, query_id: &str) -> QueryKey {
        let discriminator = self.next_discriminator();
        QueryKey::new(scope_id, scope_name, query_id, discriminator)
    }

    /// Never returns the discriminator it returned last, even when two calls
    /// land in the same millisecond and draw the same random id.
    pub fn next_discriminator(&mut self) -> String {
        let now = epoch_millis();
        loop {
            let candidate = format!("{}:{now}", random_id(RANDOM_ID_LEN));
            if self.last_discriminator.as_deref() != Some(candidate.as_str()) {
                self.last_discriminator = Some(candidate.clone());
                return candidate;
            }
        }
    }
}

fn random_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn discriminator_has_random_prefix_and_timestamp() {
        let mut factory = QueryKeyFactory::new();
        let discriminator = factory.next_discriminator();
        let (random, millis) = discriminator.split_once(':').expect("separator");
        assert_eq!(random.len(), RANDOM_ID_LEN);
        assert!(random.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(millis.parse::<u128>().is_ok());
    }

    #[test]
    fn back_to_back_keys_never_repeat() {
        let mut factory = QueryKeyFactory::new();
        let mut previous = factory.next_key("D1", "Dashboard", "Q1");
        for _ in 0..1_000 {
            let next = factory.next_key("D1", "Dashboard", "Q1");
            assert!(next.same_query(&previous));
            assert_ne!(next.discriminator, previous.discriminator);
            previous = next;
        }
    }

    #[test]
    fn burst_of_keys_is_mostly_unique() {
        let mut factory = QueryKeyFactory::new();
        let seen: HashSet<_> = (0..100).map(|_| factory.next_discriminator()).collect();
        // 62^4 ids per millisecond makes a collision within 100 draws vanishingly rare.
        assert!(seen.len() >= 99);
    }
}
