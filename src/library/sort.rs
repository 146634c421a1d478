use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::Clip;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    Size,
    Movement,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Latest,
    Oldest,
    MostActivity,
    LeastActivity,
    Column(SortColumn, SortDirection),
}

/// Click-to-sort header state: the active column flips on repeat clicks, a
/// new column starts ascending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSort {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl ColumnSort {
    pub fn click(self, column: SortColumn) -> Self {
        match self.column {
            Some(active) if active == column => Self {
                column: Some(column),
                direction: self.direction.flipped(),
            },
            _ => Self {
                column: Some(column),
                direction: SortDirection::Ascending,
            },
        }
    }

    pub fn key(&self) -> Option<SortKey> {
        self.column
            .map(|column| SortKey::Column(column, self.direction))
    }
}

/// Stable sort by `key`. Unprocessed movement scores always land after every
/// scored clip, whichever direction the movement column is in.
pub fn apply_sort(clips: &[Clip], key: SortKey) -> Vec<Clip> {
    let mut ordered = clips.to_vec();
    ordered.sort_by(|a, b| compare(a, b, key));
    ordered
}

fn compare(a: &Clip, b: &Clip, key: SortKey) -> Ordering {
    match key {
        SortKey::Latest => b.modified_secs().total_cmp(&a.modified_secs()),
        SortKey::Oldest => a.modified_secs().total_cmp(&b.modified_secs()),
        SortKey::MostActivity => b.wildlife_proportion().total_cmp(&a.wildlife_proportion()),
        SortKey::LeastActivity => a.wildlife_proportion().total_cmp(&b.wildlife_proportion()),
        SortKey::Column(SortColumn::Name, direction) => {
            direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortKey::Column(SortColumn::Size, direction) => direction.apply(a.size.cmp(&b.size)),
        SortKey::Column(SortColumn::Movement, direction) => {
            match (a.movement.score(), b.movement.score()) {
                (Some(left), Some(right)) => direction.apply(left.total_cmp(&right)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movement;

    fn clip(vid: &str, modified: Option<f64>, wildlife: Option<f64>, movement: Movement) -> Clip {
        let mut clip = Clip::new(vid, format!("{vid}.mp4"));
        clip.modified = modified;
        clip.wildlife_prop = wildlife;
        clip.movement = movement;
        clip.size = vid.len() as u64 * 100;
        clip
    }

    fn vids(clips: &[Clip]) -> Vec<&str> {
        clips.iter().map(|clip| clip.vid.as_str()).collect()
    }

    fn library() -> Vec<Clip> {
        vec![
            clip("b", Some(200.0), Some(0.5), Movement::Score(0.3)),
            clip("a", None, None, Movement::Unprocessed),
            clip("dd", Some(100.0), Some(0.9), Movement::Score(0.8)),
            clip("c", Some(200.0), Some(0.5), Movement::Unprocessed),
            clip("eee", Some(50.0), Some(0.1), Movement::Score(0.0)),
        ]
    }

    #[test]
    fn latest_and_oldest_treat_missing_as_epoch_and_keep_ties() {
        assert_eq!(vids(&apply_sort(&library(), SortKey::Latest)), ["b", "c", "dd", "eee", "a"]);
        assert_eq!(vids(&apply_sort(&library(), SortKey::Oldest)), ["a", "eee", "dd", "b", "c"]);
    }

    #[test]
    fn activity_sorts_by_wildlife_proportion() {
        assert_eq!(
            vids(&apply_sort(&library(), SortKey::MostActivity)),
            ["dd", "b", "c", "eee", "a"]
        );
        assert_eq!(
            vids(&apply_sort(&library(), SortKey::LeastActivity)),
            ["a", "eee", "b", "c", "dd"]
        );
    }

    #[test]
    fn unprocessed_movement_is_always_last() {
        let asc = apply_sort(
            &library(),
            SortKey::Column(SortColumn::Movement, SortDirection::Ascending),
        );
        assert_eq!(vids(&asc), ["eee", "b", "dd", "a", "c"]);

        let desc = apply_sort(
            &library(),
            SortKey::Column(SortColumn::Movement, SortDirection::Descending),
        );
        assert_eq!(vids(&desc), ["dd", "b", "eee", "a", "c"]);
    }

    #[test]
    fn numeric_sorts_are_idempotent() {
        let keys = [
            SortKey::Latest,
            SortKey::Oldest,
            SortKey::MostActivity,
            SortKey::LeastActivity,
            SortKey::Column(SortColumn::Size, SortDirection::Descending),
            SortKey::Column(SortColumn::Movement, SortDirection::Ascending),
            SortKey::Column(SortColumn::Movement, SortDirection::Descending),
        ];
        for key in keys {
            let once = apply_sort(&library(), key);
            let twice = apply_sort(&once, key);
            assert_eq!(once, twice, "{key:?} is not idempotent");
        }
    }

    #[test]
    fn column_clicks_toggle_and_reset() {
        let fresh = ColumnSort::default().click(SortColumn::Name);
        assert_eq!(fresh.direction, SortDirection::Ascending);

        let flipped = fresh.click(SortColumn::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let back = flipped.click(SortColumn::Name);
        assert_eq!(back, fresh);
        assert_eq!(
            apply_sort(&library(), back.key().unwrap()),
            apply_sort(&library(), fresh.key().unwrap())
        );

        let other = flipped.click(SortColumn::Size);
        assert_eq!(other.column, Some(SortColumn::Size));
        assert_eq!(other.direction, SortDirection::Ascending);
    }

    #[test]
    fn name_and_size_columns() {
        let by_name = apply_sort(&library(), SortKey::Column(SortColumn::Name, SortDirection::Descending));
        assert_eq!(vids(&by_name), ["eee", "dd", "c", "b", "a"]);

        let by_size = apply_sort(&library(), SortKey::Column(SortColumn::Size, SortDirection::Ascending));
        assert_eq!(vids(&by_size), ["b", "a", "c", "dd", "eee"]);
    }
}
