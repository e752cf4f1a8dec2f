use uuid::Uuid;

/// Prefix for generated user keys.
pub const USER_ID_PREFIX: &str = "user-";

/// Prefix for generated order keys.
pub const ORDER_ID_PREFIX: &str = "order-";

/// Generates a fresh user key.
///
/// Backed by a random v4 UUID, so collisions are practically impossible. The
/// store's conditional insert is still what guarantees uniqueness.
pub fn new_user_id() -> String {
    format!("{USER_ID_PREFIX}{}", Uuid::new_v4())
}

/// Generates a fresh order key.
///
/// Backed by a v7 UUID: the leading bits are a millisecond timestamp, so keys
/// generated later sort after keys generated earlier.
pub fn new_order_id() -> String {
    format!("{ORDER_ID_PREFIX}{}", Uuid::now_v7())
}
