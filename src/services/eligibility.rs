use std::collections::HashSet;

use crate::models::{Channel, Interest};

/// Filters recommendable channels down to the user's preferred channels
///
/// A channel is preferred when its tag set overlaps the interest set; any
/// single shared tag qualifies. An empty interest set means no filtering at
/// all. When nothing overlaps the result is empty; reverting to the
/// unfiltered set is a pipeline decision, not this function's.
pub fn preferred_channels(recommendable: &[Channel], interests: &[Interest]) -> Vec<Channel> {
    if interests.is_empty() {
        return recommendable.to_vec();
    }

    let interests: HashSet<Interest> = interests.iter().copied().collect();

    recommendable
        .iter()
        .filter(|channel| channel.tags.iter().any(|tag| interests.contains(tag)))
        .cloned()
        .collect()
}
