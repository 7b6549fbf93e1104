use super::SortedSet;
use crate::policy::Compare;

impl<T, C: Compare<T>> SortedSet<T, C> {
    /// Splays the least value to the root and returns it.
    pub fn find_least(&mut self) -> Option<&T> {
        self.raw.splay_first()
    }

    /// Splays the greatest value to the root and returns it.
    pub fn find_greatest(&mut self) -> Option<&T> {
        self.raw.splay_last()
    }

    /// Returns the greatest value less than or equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([10, 20, 30]);
    /// assert_eq!(set.find_greatest_less_than_or_equal(&20), Some(&20));
    /// assert_eq!(set.find_greatest_less_than_or_equal(&25), Some(&20));
    /// assert_eq!(set.find_greatest_less_than_or_equal(&5), None);
    /// ```
    pub fn find_greatest_less_than_or_equal(&mut self, value: &T) -> Option<&T> {
        let compare = &self.compare;
        self.raw.greatest_at_most(|probe| compare.compare(value, probe))
    }

    /// Returns the greatest value strictly less than `value`.
    pub fn find_greatest_less_than(&mut self, value: &T) -> Option<&T> {
        let compare = &self.compare;
        self.raw.greatest_below(|probe| compare.compare(value, probe))
    }

    /// Returns the least value greater than or equal to `value`.
    pub fn find_least_greater_than_or_equal(&mut self, value: &T) -> Option<&T> {
        let compare = &self.compare;
        self.raw.least_at_least(|probe| compare.compare(value, probe))
    }

    /// Returns the least value strictly greater than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([10, 20, 30]);
    /// assert_eq!(set.find_least_greater_than(&20), Some(&30));
    /// assert_eq!(set.find_least_greater_than(&30), None);
    /// ```
    pub fn find_least_greater_than(&mut self, value: &T) -> Option<&T> {
        let compare = &self.compare;
        self.raw.least_above(|probe| compare.compare(value, probe))
    }
}
