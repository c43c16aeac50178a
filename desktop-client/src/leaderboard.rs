use std::collections::HashMap;
use common::protocol::LeaderboardEntry;

/// Keeps each user's best score and orders by score, highest first.
/// Ties are broken by username so the table doesn't jump between polls.
pub fn best_per_user(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    let mut best: HashMap<_, LeaderboardEntry> = HashMap::new();

    for entry in entries {
        match best.get(&entry.id) {
            Some(existing) if existing.score >= entry.score => {}
            _ => {
                best.insert(entry.id, entry);
            }
        }
    }

    let mut ranked: Vec<LeaderboardEntry> = best.into_values().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.username.cmp(&b.username)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    fn entry(id: u64, username: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            id: UserId::new(id),
            username: username.to_string(),
            score,
        }
    }

    #[test]
    fn test_keeps_best_score_per_user() {
        let ranked = best_per_user(vec![
            entry(1, "ana", 30),
            entry(2, "bob", 50),
            entry(1, "ana", 80),
            entry(2, "bob", 20),
        ]);
        assert_eq!(ranked, vec![entry(1, "ana", 80), entry(2, "bob", 50)]);
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let ranked = best_per_user(vec![entry(3, "cid", 40), entry(1, "ana", 40)]);
        assert_eq!(ranked[0].username, "ana");
        assert_eq!(ranked[1].username, "cid");
    }

    #[test]
    fn test_empty_input() {
        assert!(best_per_user(vec![]).is_empty());
    }
}
