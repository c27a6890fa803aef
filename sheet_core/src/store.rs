use crate::character::Character;
use crate::StoreError;

/// Persistence collaborator owning character storage
///
/// Rules code receives an already-loaded character and hands back a mutated
/// copy; it never queries storage itself.
pub trait CharacterStore {
    /// Load the character owned by an external user
    fn load(&self, user_id: u64) -> Result<Character, StoreError>;

    /// Persist a mutated character
    fn save(&self, character: &Character) -> Result<(), StoreError>;
}
