use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::ImageEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// Fresh uniform permutation every cycle.
    Shuffle,
    /// Ascending by relative path.
    Sorted,
}

impl OrderMode {
    pub fn from_shuffle_flag(shuffle: bool) -> Self {
        if shuffle { Self::Shuffle } else { Self::Sorted }
    }
}

pub fn order<R: Rng + ?Sized>(
    mut entries: Vec<ImageEntry>,
    mode: OrderMode,
    rng: &mut R,
) -> Vec<ImageEntry> {
    match mode {
        OrderMode::Shuffle => entries.shuffle(rng),
        OrderMode::Sorted => entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path)),
    }
    entries
}
