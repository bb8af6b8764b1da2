/// The favorites collection and the single toggle-planning function every
/// view uses.
///
/// A flower is shown as favorited iff an entry with its flower id exists
/// in the collection the view fetched on mount. Removal must quote the
/// favorite-record id the server assigned, so entries track both ids.
/// Nothing here is applied optimistically: the collection changes only
/// after the server confirms, which keeps failed toggles from corrupting
/// local state.
use crate::api::models::FavoriteRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteEntry {
    /// Id of the favorite record itself, required for deletion.
    pub fav_flower_id: i64,
    /// Id of the referenced flower, used for membership checks.
    pub flower_id: i64,
}

/// In-memory favorites collection owned by a single view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    entries: Vec<FavoriteEntry>,
}

/// What the server must be asked to do to toggle a flower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Add,
    Remove { fav_flower_id: i64 },
}

impl Favorites {
    pub fn new() -> Self {
        Favorites::default()
    }

    /// Build the collection from the server's `fav_flowers` listing.
    pub fn from_records(records: &[FavoriteRecord]) -> Self {
        Favorites {
            entries: records
                .iter()
                .map(|record| FavoriteEntry {
                    fav_flower_id: record.id,
                    flower_id: record.flower.id,
                })
                .collect(),
        }
    }

    pub fn is_favorited(&self, flower_id: i64) -> bool {
        self.entries.iter().any(|entry| entry.flower_id == flower_id)
    }

    /// The favorite-record id for a flower, if it is favorited.
    pub fn record_for(&self, flower_id: i64) -> Option<i64> {
        self.entries
            .iter()
            .find(|entry| entry.flower_id == flower_id)
            .map(|entry| entry.fav_flower_id)
    }

    /// Decide the server call for a toggle based on current membership.
    pub fn toggle_action(&self, flower_id: i64) -> ToggleAction {
        match self.record_for(flower_id) {
            Some(fav_flower_id) => ToggleAction::Remove { fav_flower_id },
            None => ToggleAction::Add,
        }
    }

    /// Apply a server-confirmed add: prepend the record the server
    /// assigned.
    pub fn apply_added(&mut self, flower_id: i64, fav_flower_id: i64) {
        self.entries.insert(
            0,
            FavoriteEntry {
                fav_flower_id,
                flower_id,
            },
        );
    }

    /// Apply a server-confirmed removal.
    pub fn apply_removed(&mut self, flower_id: i64) {
        self.entries.retain(|entry| entry.flower_id != flower_id);
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Flower;

    fn flower(id: i64) -> Flower {
        Flower {
            id,
            name: format!("Flower {id}"),
            latin_name: String::new(),
            sightings: 0,
            profile_picture: String::new(),
            favorite: false,
            description: String::new(),
            features: Vec::new(),
        }
    }

    #[test]
    fn membership_follows_the_collection() {
        let records = vec![
            FavoriteRecord {
                id: 7,
                flower: flower(42),
            },
            FavoriteRecord {
                id: 8,
                flower: flower(43),
            },
        ];
        let favorites = Favorites::from_records(&records);

        assert!(favorites.is_favorited(42));
        assert!(favorites.is_favorited(43));
        assert!(!favorites.is_favorited(44));
    }

    #[test]
    fn add_then_remove_restores_original_membership() {
        let mut favorites = Favorites::new();
        assert_eq!(favorites.toggle_action(42), ToggleAction::Add);

        // The add endpoint answered with record id 7.
        favorites.apply_added(42, 7);
        assert!(favorites.is_favorited(42));
        assert_eq!(
            favorites.entries(),
            &[FavoriteEntry {
                fav_flower_id: 7,
                flower_id: 42
            }]
        );

        // Removal must quote record id 7, not flower id 42.
        assert_eq!(
            favorites.toggle_action(42),
            ToggleAction::Remove { fav_flower_id: 7 }
        );
        favorites.apply_removed(42);
        assert!(favorites.is_empty());
    }

    #[test]
    fn new_records_are_prepended() {
        let mut favorites = Favorites::new();
        favorites.apply_added(1, 10);
        favorites.apply_added(2, 11);

        assert_eq!(favorites.entries()[0].flower_id, 2);
        assert_eq!(favorites.entries()[1].flower_id, 1);
    }

    #[test]
    fn removal_only_touches_the_matching_flower() {
        let mut favorites = Favorites::new();
        favorites.apply_added(1, 10);
        favorites.apply_added(2, 11);

        favorites.apply_removed(1);
        assert!(!favorites.is_favorited(1));
        assert!(favorites.is_favorited(2));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn record_for_returns_the_deletion_id() {
        let mut favorites = Favorites::new();
        favorites.apply_added(42, 7);
        assert_eq!(favorites.record_for(42), Some(7));
        assert_eq!(favorites.record_for(43), None);
    }
}
