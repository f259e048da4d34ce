//! Column descriptors for the result table and client-side sorting

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::display;
use crate::state::PokemonSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Id,
    Name,
    Height,
    Weight,
    Sprite,
    View,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Name,
        Column::Height,
        Column::Weight,
        Column::Sprite,
        Column::View,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Name",
            Column::Height => "Height",
            Column::Weight => "Weight",
            Column::Sprite => "Sprite",
            Column::View => "View",
        }
    }

    pub fn is_sortable(self) -> bool {
        !matches!(self, Column::View)
    }

    /// Header shortcut: sortable columns are bound to `1`..=`5` in order.
    pub fn from_shortcut(ch: char) -> Option<Column> {
        let index = ch.to_digit(10)? as usize;
        Column::ALL
            .get(index.checked_sub(1)?)
            .copied()
            .filter(|column| column.is_sortable())
    }

    /// Ascending comparison, `None` for columns without a sort key.
    pub fn compare(self, a: &PokemonSummary, b: &PokemonSummary) -> Option<Ordering> {
        let ordering = match self {
            Column::Id => a.id.cmp(&b.id),
            Column::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Column::Height => a.height.cmp(&b.height),
            Column::Weight => a.weight.cmp(&b.weight),
            Column::Sprite => a.sprites.standard.cmp(&b.sprites.standard),
            Column::View => return None,
        };
        Some(ordering)
    }

    /// Text shown in a cell. The sprite cell falls back to this when no
    /// image is available.
    pub fn cell_text(self, entry: &PokemonSummary) -> String {
        match self {
            Column::Id => entry.id.to_string(),
            Column::Name => display::capitalize(&entry.name),
            Column::Height => display::height_inches(entry.height),
            Column::Weight => display::weight_kgs(entry.weight),
            Column::Sprite => entry.sprites.standard.clone().unwrap_or_else(|| "-".into()),
            Column::View => "[ View ]".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortState {
    /// Header activation: a new column starts ascending, the active column
    /// flips direction. Unsortable columns leave the sort untouched.
    pub fn activate(current: Option<SortState>, column: Column) -> Option<SortState> {
        if !column.is_sortable() {
            return current;
        }
        match current {
            Some(state) if state.column == column => Some(SortState {
                column,
                direction: state.direction.toggle(),
            }),
            _ => Some(SortState {
                column,
                direction: SortDirection::Ascending,
            }),
        }
    }
}

/// Indices of `entries` in display order. Stable: ties keep fetch order.
pub fn sorted_indices(entries: &[PokemonSummary], sort: Option<SortState>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..entries.len()).collect();
    let Some(sort) = sort else {
        return indices;
    };
    indices.sort_by(|&a, &b| {
        let ordering = sort
            .column
            .compare(&entries[a], &entries[b])
            .unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SpritePair;
    use pretty_assertions::assert_eq;

    fn entry(id: u32, name: &str, height: u32, weight: u32) -> PokemonSummary {
        PokemonSummary {
            id,
            name: name.into(),
            height,
            weight,
            sprites: SpritePair {
                standard: Some(format!("https://img/{id}.png")),
                alternate: None,
            },
            types: Vec::new(),
            cry: None,
        }
    }

    fn names(entries: &[PokemonSummary], sort: Option<SortState>) -> Vec<String> {
        sorted_indices(entries, sort)
            .into_iter()
            .map(|idx| entries[idx].name.clone())
            .collect()
    }

    #[test]
    fn unsorted_keeps_fetch_order() {
        let entries = vec![entry(3, "c", 1, 1), entry(1, "a", 1, 1)];
        assert_eq!(names(&entries, None), vec!["c", "a"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let entries = vec![entry(1, "bulbasaur", 7, 69), entry(2, "Abra", 9, 195)];
        let sort = SortState::activate(None, Column::Name);
        assert_eq!(names(&entries, sort), vec!["Abra", "bulbasaur"]);
    }

    #[test]
    fn reactivating_a_column_flips_direction() {
        let entries = vec![
            entry(1, "bulbasaur", 7, 69),
            entry(2, "ivysaur", 10, 130),
            entry(4, "charmander", 6, 85),
        ];
        let sort = SortState::activate(None, Column::Height);
        assert_eq!(names(&entries, sort), vec!["charmander", "bulbasaur", "ivysaur"]);

        let sort = SortState::activate(sort, Column::Height);
        assert_eq!(sort.map(|s| s.direction), Some(SortDirection::Descending));
        assert_eq!(names(&entries, sort), vec!["ivysaur", "bulbasaur", "charmander"]);
    }

    #[test]
    fn last_activated_column_wins() {
        let sort = SortState::activate(None, Column::Weight);
        let sort = SortState::activate(sort, Column::Weight);
        let sort = SortState::activate(sort, Column::Id);
        assert_eq!(
            sort,
            Some(SortState {
                column: Column::Id,
                direction: SortDirection::Ascending,
            })
        );
    }

    #[test]
    fn view_column_is_not_sortable() {
        let current = SortState::activate(None, Column::Id);
        assert_eq!(SortState::activate(current, Column::View), current);
        assert_eq!(Column::from_shortcut('6'), None);
        assert_eq!(Column::from_shortcut('0'), None);
        assert_eq!(Column::from_shortcut('2'), Some(Column::Name));
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let entries = vec![
            entry(1, "first", 5, 10),
            entry(2, "second", 5, 10),
            entry(3, "third", 1, 10),
        ];
        let sort = SortState::activate(None, Column::Height);
        assert_eq!(names(&entries, sort), vec!["third", "first", "second"]);
        let sort = SortState::activate(sort, Column::Height);
        assert_eq!(names(&entries, sort), vec!["first", "second", "third"]);
    }

    #[test]
    fn cell_text_applies_display_transforms() {
        let bulbasaur = entry(1, "bulbasaur", 7, 69);
        assert_eq!(Column::Id.cell_text(&bulbasaur), "1");
        assert_eq!(Column::Name.cell_text(&bulbasaur), "Bulbasaur");
        assert_eq!(Column::Height.cell_text(&bulbasaur), "27.56 Inches");
        assert_eq!(Column::Weight.cell_text(&bulbasaur), "6.90 KGs");
    }
}
