use super::SortedMap;
use crate::policy::Compare;

impl<K, V, C: Compare<K>> SortedMap<K, V, C> {
    /// Returns the entry with the greatest key less than or equal to `key`.
    pub fn find_greatest_less_than_or_equal(&mut self, key: &K) -> Option<(&K, &V)> {
        let compare = &self.compare;
        self.raw
            .greatest_at_most(|(probe, _)| compare.compare(key, probe))
            .map(|(k, v)| (k, v))
    }

    /// Returns the entry with the greatest key strictly less than `key`.
    pub fn find_greatest_less_than(&mut self, key: &K) -> Option<(&K, &V)> {
        let compare = &self.compare;
        self.raw
            .greatest_below(|(probe, _)| compare.compare(key, probe))
            .map(|(k, v)| (k, v))
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    pub fn find_least_greater_than_or_equal(&mut self, key: &K) -> Option<(&K, &V)> {
        let compare = &self.compare;
        self.raw
            .least_at_least(|(probe, _)| compare.compare(key, probe))
            .map(|(k, v)| (k, v))
    }

    /// Returns the entry with the least key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedMap;
    ///
    /// let mut map = SortedMap::from([(1, "one"), (5, "five")]);
    /// assert_eq!(map.find_least_greater_than(&1), Some((&5, &"five")));
    /// assert_eq!(map.find_least_greater_than(&5), None);
    /// ```
    pub fn find_least_greater_than(&mut self, key: &K) -> Option<(&K, &V)> {
        let compare = &self.compare;
        self.raw
            .least_above(|(probe, _)| compare.compare(key, probe))
            .map(|(k, v)| (k, v))
    }
}
