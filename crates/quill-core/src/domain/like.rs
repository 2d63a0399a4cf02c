//! The like toggle shared by posts and comments.

use uuid::Uuid;

/// Flip membership of `user_id` in a liked-by set.
///
/// Returns `true` when the user likes the resource after the call, `false`
/// when the call removed an existing like. Callers that need atomicity under
/// concurrent toggles must run this inside the store's own critical section
/// (a write lock, or a single conditional UPDATE).
pub fn toggle(likes: &mut Vec<Uuid>, user_id: Uuid) -> bool {
    if let Some(pos) = likes.iter().position(|id| *id == user_id) {
        likes.remove(pos);
        false
    } else {
        likes.push(user_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let user = Uuid::new_v4();
        let mut likes = Vec::new();

        assert!(toggle(&mut likes, user));
        assert_eq!(likes, vec![user]);

        assert!(!toggle(&mut likes, user));
        assert!(likes.is_empty());
    }

    #[test]
    fn double_toggle_is_an_involution() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut likes = vec![bob];
        let original = likes.clone();

        toggle(&mut likes, alice);
        toggle(&mut likes, alice);

        assert_eq!(likes, original);
    }

    #[test]
    fn repeated_toggles_never_accumulate_duplicates() {
        let user = Uuid::new_v4();
        let mut likes = Vec::new();

        for _ in 0..101 {
            toggle(&mut likes, user);
            assert!(likes.iter().filter(|id| **id == user).count() <= 1);
        }
        // Odd number of toggles: the like stands.
        assert_eq!(likes, vec![user]);
    }

    #[test]
    fn toggle_only_touches_the_acting_user() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut likes = vec![alice];

        assert!(toggle(&mut likes, bob));
        assert_eq!(likes, vec![alice, bob]);
    }
}
