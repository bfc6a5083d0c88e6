use primehash::{
    BASE_SIZE, CountingMode, DeletionMode, HashMapExtensions, HashTable, TableConfig, TableError,
    is_prime,
};

fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn overwrite_keeps_latest_value() {
    init_test_logger();
    let mut table = HashTable::new();
    table.insert("a", "1");
    table.insert("b", "2");
    table.insert("a", "3");

    assert_eq!(table.search("a"), Some("3"));
    assert_eq!(table.search("b"), Some("2"));
}

#[test]
fn hundred_keys_force_prime_growth() {
    init_test_logger();
    let mut table = HashTable::new();
    for i in 0..100 {
        table.insert(&format!("k{i}"), &format!("v{i}"));
    }

    for i in 0..100 {
        assert_eq!(table.search(&format!("k{i}")), Some(format!("v{i}").as_str()), "k{i}");
    }
    assert!(table.capacity() > BASE_SIZE);
    assert!(is_prime(table.capacity()));
}

#[test]
fn delete_leaves_other_keys() {
    let mut table = HashTable::new();
    table.insert("a", "1");
    table.insert("b", "2");
    table.delete("a");

    assert_eq!(table.search("a"), None);
    assert_eq!(table.search("b"), Some("2"));
}

#[test]
fn delete_missing_key_is_noop() {
    let mut table = HashTable::new();
    for i in 0..20 {
        table.insert(&format!("k{i}"), "v");
    }
    let mut keys = table.keys();
    keys.sort();

    table.delete("not-there");

    assert_eq!(table.len(), 20);
    let mut after = table.keys();
    after.sort();
    assert_eq!(keys, after);
}

#[test]
fn empty_strings_are_storable() {
    let mut table = HashTable::new();
    table.insert("", "empty key");
    table.insert("empty value", "");

    assert_eq!(table.search(""), Some("empty key"));
    assert_eq!(table.search("empty value"), Some(""));
}

#[test]
fn unicode_keys() {
    let mut table = HashTable::new();
    table.insert("ключ", "значение");
    table.insert("鍵", "値");
    table.insert("🔑", "🔒");

    assert_eq!(table.search("ключ"), Some("значение"));
    assert_eq!(table.search("鍵"), Some("値"));
    assert_eq!(table.search("🔑"), Some("🔒"));
}

#[test]
fn distinct_inserts_count_exactly() {
    let config = TableConfig::default().with_counting(CountingMode::DistinctKeys);
    let mut table = HashTable::with_config(config).unwrap();
    for round in 0..3 {
        for i in 0..60 {
            table.insert(&format!("k{i}"), &format!("round{round}"));
        }
    }
    assert_eq!(table.len(), 60);
    assert_eq!(table.search("k59"), Some("round2"));
}

#[test]
fn default_counting_inflates_on_overwrite() {
    let mut table = HashTable::new();
    for round in 0..3 {
        for i in 0..10 {
            table.insert(&format!("k{i}"), &format!("round{round}"));
        }
    }
    assert_eq!(table.len(), 30);
    assert_eq!(table.iter().count(), 10);
}

#[test]
fn custom_thresholds() {
    let config = TableConfig::corrected().with_base_size(11).with_thresholds(50, 0);
    let mut table = HashTable::with_config(config).unwrap();
    // 6 * 100 / 11 == 54 > 50, so the 7th insert grows to next_prime(22)
    for i in 0..7 {
        table.insert(&format!("k{i}"), "v");
    }
    assert_eq!(table.capacity(), 23);

    // a shrink threshold of 0 never shrinks
    for i in 0..7 {
        table.delete(&format!("k{i}"));
    }
    assert_eq!(table.capacity(), 23);
    assert!(table.is_empty());
}

#[test]
fn config_is_validated() {
    let err = HashTable::with_config(TableConfig::default().with_thresholds(70, 80)).unwrap_err();
    assert!(matches!(err, TableError::InvalidConfig(_)));
    assert!(err.to_string().contains("shrink threshold"));

    let config = TableConfig::default().with_deletion(DeletionMode::Tombstone);
    assert_eq!(HashTable::with_config(config).unwrap().config(), config);
}

#[test]
fn search_view_borrows_table() {
    let mut table = HashTable::new();
    table.insert("a", "1");
    let value = table.search("a").map(str::to_owned);
    table.insert("a", "2");
    assert_eq!(value.as_deref(), Some("1"));
    assert_eq!(table.search("a"), Some("2"));
}
