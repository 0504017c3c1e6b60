/// Set holding the key of every stored order.
pub const ORDER_INDEX: &str = "orders";

const ORDER_KEY_PREFIX: &str = "order:";

pub fn order_key(id: u64) -> String {
    format!("{ORDER_KEY_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed_decimal_id() {
        assert_eq!(order_key(42), "order:42");
        assert_eq!(order_key(0), "order:0");
        assert_eq!(order_key(u64::MAX), "order:18446744073709551615");
    }

    #[test]
    fn distinct_ids_give_distinct_keys() {
        assert_ne!(order_key(1), order_key(11));
        assert_ne!(order_key(12), order_key(121));
    }

    #[test]
    fn keys_never_collide_with_the_index() {
        assert_ne!(order_key(0), ORDER_INDEX);
    }
}
