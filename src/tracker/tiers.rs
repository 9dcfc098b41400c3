use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// BEP 12 announce tiers. Never empty, and no tier is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceTiers(Vec<Vec<String>>);

impl AnnounceTiers {
    /// `announce-list` wins when it holds at least one url, `announce` becomes
    /// a single tier otherwise. `None` when there's no url at all.
    pub fn build(announce: Option<String>, announce_list: Option<Vec<Vec<String>>>) -> Option<Self> {
        let tiers: Vec<Vec<String>> = announce_list
            .unwrap_or_default()
            .into_iter()
            .filter(|tier| !tier.is_empty())
            .collect();

        if !tiers.is_empty() {
            return Some(Self(tiers));
        }

        announce.map(|url| Self(vec![vec![url]]))
    }

    /// Shuffle urls within every tier, tier order stays.
    pub fn shuffle_for_start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for tier in self.0.iter_mut() {
            tier.shuffle(rng);
        }
    }

    /// Move `url` to the front of tier `tier_idx`, the rest keep their order.
    pub fn promote(&mut self, tier_idx: usize, url: &str) {
        let Some(tier) = self.0.get_mut(tier_idx) else {
            return;
        };

        if let Some(pos) = tier.iter().position(|u| u == url) {
            tier[..=pos].rotate_right(1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<String>> {
        self.0.iter()
    }

    /// `(tier index, url)` in traversal order.
    pub fn urls(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(idx, tier)| tier.iter().map(move |url| (idx, url.as_str())))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec<String>] {
        &self.0
    }
}

impl From<AnnounceTiers> for Vec<Vec<String>> {
    fn from(value: AnnounceTiers) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::AnnounceTiers;
    use rand::{rngs::StdRng, SeedableRng};

    fn tiers(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|tier| tier.iter().map(|url| url.to_string()).collect())
            .collect()
    }

    #[test]
    fn build_prefers_announce_list() {
        let built = AnnounceTiers::build(
            Some("http://a/announce".to_string()),
            Some(tiers(&[&["http://b/announce", "http://c/announce"], &["http://d/announce"]])),
        )
        .unwrap();

        assert_eq!(
            built.as_slice(),
            tiers(&[&["http://b/announce", "http://c/announce"], &["http://d/announce"]])
        );
    }

    #[test]
    fn build_falls_back_to_announce() {
        let single = AnnounceTiers::build(Some("http://a/announce".to_string()), None).unwrap();
        assert_eq!(single.as_slice(), tiers(&[&["http://a/announce"]]));

        let empty_list =
            AnnounceTiers::build(Some("http://a/announce".to_string()), Some(tiers(&[&[]]))).unwrap();
        assert_eq!(empty_list.as_slice(), tiers(&[&["http://a/announce"]]));

        assert!(AnnounceTiers::build(None, Some(vec![])).is_none());
        assert!(AnnounceTiers::build(None, None).is_none());
    }

    #[test]
    fn build_drops_empty_tiers() {
        let built =
            AnnounceTiers::build(None, Some(tiers(&[&[], &["http://a/announce"], &[]]))).unwrap();

        assert_eq!(built.len(), 1);
    }

    #[test]
    fn shuffle_keeps_tiers() {
        let original = tiers(&[
            &["1", "2", "3", "4", "5", "6", "7", "8"],
            &["a"],
            &["x", "y", "z"],
        ]);
        let mut shuffled = AnnounceTiers::build(None, Some(original.clone())).unwrap();

        shuffled.shuffle_for_start(&mut StdRng::seed_from_u64(7));

        assert_eq!(shuffled.len(), original.len());
        for (shuffled_tier, original_tier) in shuffled.iter().zip(original.iter()) {
            let mut lhs = shuffled_tier.clone();
            let mut rhs = original_tier.clone();
            lhs.sort();
            rhs.sort();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn promote() {
        let mut built =
            AnnounceTiers::build(None, Some(tiers(&[&["a"], &["b", "c", "d", "e"]]))).unwrap();

        built.promote(1, "d");
        assert_eq!(built.as_slice(), tiers(&[&["a"], &["d", "b", "c", "e"]]));

        built.promote(1, "d");
        assert_eq!(built.as_slice(), tiers(&[&["a"], &["d", "b", "c", "e"]]));

        // unknown url or tier, nothing moves
        built.promote(0, "d");
        built.promote(5, "a");
        assert_eq!(built.as_slice(), tiers(&[&["a"], &["d", "b", "c", "e"]]));
    }

    #[test]
    fn urls_in_traversal_order() {
        let built = AnnounceTiers::build(None, Some(tiers(&[&["a", "b"], &["c"]]))).unwrap();

        assert_eq!(
            built.urls().collect::<Vec<_>>(),
            vec![(0, "a"), (0, "b"), (1, "c")]
        );
    }
}
