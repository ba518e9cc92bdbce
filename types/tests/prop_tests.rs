use proptest::prelude::*;

use purge_types::{extract_real_id, purged_record_id, RoleSet};

proptest! {
    /// Shuffling or repeating roles never changes the role hash.
    #[test]
    fn role_hash_is_order_independent(
        roles in prop::collection::vec("[a-z_]{1,12}", 0..8),
        seed in any::<u64>(),
    ) {
        let mut shuffled = roles.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
        }
        shuffled.extend(roles.iter().take(2).cloned());

        let a = RoleSet::new(roles);
        let b = RoleSet::new(shuffled);
        prop_assert_eq!(a.hash(), b.hash());
        prop_assert_eq!(a, b);
    }

    /// extract_real_id inverts purged_record_id for every document ID.
    #[test]
    fn record_id_inverts(doc_id in "\\PC{0,40}") {
        prop_assert_eq!(extract_real_id(&purged_record_id(&doc_id)), doc_id);
    }

    /// The role hash is always 64 hex characters.
    #[test]
    fn role_hash_shape(roles in prop::collection::vec("\\PC{0,10}", 0..5)) {
        let hash = RoleSet::new(roles).hash();
        prop_assert_eq!(hash.len(), 64);
        prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
