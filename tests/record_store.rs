use serde_json::{Value, json};
use teen_health::store::{
    CREATED_FIELD, Collection, Filter, ID_FIELD, MemoryStore, Record, RecordStore, StoreError,
    UPDATED_FIELD, Upserted,
};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

fn record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => panic!("record must be a JSON object"),
    }
}

#[test_log::test(tokio::test)]
async fn test_insert_sets_managed_fields() {
    let store = MemoryStore::new();

    let stored = store
        .insert(Collection::Pages, record(json!({"pageId": "faq"})))
        .await
        .unwrap();

    let id = stored[ID_FIELD].as_str().unwrap();
    assert!(uuid::Uuid::try_parse(id).is_ok());
    let created = stored[CREATED_FIELD].as_str().unwrap();
    assert!(OffsetDateTime::parse(created, &Rfc3339).is_ok());
    assert_eq!(stored[CREATED_FIELD], stored[UPDATED_FIELD]);
    assert_eq!(store.count(Collection::Pages), 1);
}

#[test_log::test(tokio::test)]
async fn test_query_filters() {
    let store = MemoryStore::new();
    for (title, user) in [("Sleep basics", "a"), ("Water", "a"), ("Better sleep", "b")] {
        store
            .insert(
                Collection::HealthData,
                record(json!({"title": title, "userId": user})),
            )
            .await
            .unwrap();
    }

    let all = store.query(Collection::HealthData, &Filter::All).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["title"], "Sleep basics");

    let sleepy = store
        .query(Collection::HealthData, &Filter::contains("title", "SLEEP"))
        .await
        .unwrap();
    assert_eq!(sleepy.len(), 2);

    let filter = Filter::contains("title", "sleep").and(Filter::eq("userId", "b"));
    let matched = store.query(Collection::HealthData, &filter).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["title"], "Better sleep");

    let filter = Filter::eq("title", "Water").or(Filter::eq("userId", "b"));
    let matched = store.query(Collection::HealthData, &filter).await.unwrap();
    assert_eq!(matched.len(), 2);

    // Other collections are untouched
    let none = store.query(Collection::BlogPosts, &Filter::All).await.unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_empty_combinators() {
    let any = record(json!({"x": 1}));
    assert!(Filter::And(Vec::new()).matches(&any));
    assert!(!Filter::Or(Vec::new()).matches(&any));
}

#[test]
fn test_after_filter_ignores_unparseable_values() {
    let now = OffsetDateTime::now_utc();
    let later = (now + Duration::hours(1)).format(&Rfc3339).unwrap();
    let earlier = (now - Duration::hours(1)).format(&Rfc3339).unwrap();
    let filter = Filter::after("appointmentDate", now);

    assert!(filter.matches(&record(json!({"appointmentDate": later}))));
    assert!(!filter.matches(&record(json!({"appointmentDate": earlier}))));
    assert!(!filter.matches(&record(json!({"appointmentDate": "soon"}))));
    assert!(!filter.matches(&record(json!({}))));
}

#[test_log::test(tokio::test)]
async fn test_find_first_returns_oldest_match() {
    let store = MemoryStore::new();
    store
        .insert(Collection::BlogPosts, record(json!({"tag": "x", "n": 1})))
        .await
        .unwrap();
    store
        .insert(Collection::BlogPosts, record(json!({"tag": "x", "n": 2})))
        .await
        .unwrap();

    let first = store
        .find_first(Collection::BlogPosts, &Filter::eq("tag", "x"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first["n"], 1);

    let missing = store
        .find_first(Collection::BlogPosts, &Filter::eq("tag", "y"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[test_log::test(tokio::test)]
async fn test_unique_email_in_users() {
    let store = MemoryStore::new();
    store
        .insert(Collection::Users, record(json!({"email": "a@example.com"})))
        .await
        .unwrap();

    for email in ["a@example.com", "A@Example.COM"] {
        let result = store
            .insert(Collection::Users, record(json!({"email": email})))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::Duplicate {
                collection: Collection::Users,
                field: "email"
            })
        ));
    }
    assert_eq!(store.count(Collection::Users), 1);

    // Other collections have no unique field
    for _ in 0..2 {
        store
            .insert(Collection::Bookings, record(json!({"email": "a@example.com"})))
            .await
            .unwrap();
    }
    assert_eq!(store.count(Collection::Bookings), 2);
}

#[test_log::test(tokio::test)]
async fn test_update_replaces_record_and_keeps_created_date() {
    let store = MemoryStore::new();
    let stored = store
        .insert(Collection::CartItems, record(json!({"qty": 1, "note": "gift"})))
        .await
        .unwrap();

    let mut replacement = record(json!({"qty": 2}));
    replacement.insert(ID_FIELD.to_string(), stored[ID_FIELD].clone());
    replacement.insert(CREATED_FIELD.to_string(), json!("1999-01-01T00:00:00Z"));

    let updated = store
        .update(Collection::CartItems, replacement)
        .await
        .unwrap();

    assert_eq!(updated["qty"], 2);
    assert!(updated.get("note").is_none());
    assert_eq!(updated[CREATED_FIELD], stored[CREATED_FIELD]);

    let all = store.query(Collection::CartItems, &Filter::All).await.unwrap();
    assert_eq!(all, vec![updated]);
}

#[test_log::test(tokio::test)]
async fn test_update_errors() {
    let store = MemoryStore::new();

    let result = store
        .update(Collection::CartItems, record(json!({"qty": 2})))
        .await;
    assert!(matches!(result, Err(StoreError::MissingId)));

    let result = store
        .update(Collection::CartItems, record(json!({"_id": "not-a-uuid"})))
        .await;
    assert!(matches!(result, Err(StoreError::MissingId)));

    let result = store
        .update(
            Collection::CartItems,
            record(json!({"_id": uuid::Uuid::new_v4().to_string()})),
        )
        .await;
    assert!(matches!(result, Err(StoreError::RecordNotFound)));
}

#[test_log::test(tokio::test)]
async fn test_upsert_creates_then_merges() {
    let store = MemoryStore::new();
    let key = || Filter::eq("userId", "u-1");

    let outcome = store
        .upsert(
            Collection::HealthMetrics,
            key(),
            record(json!({"userId": "u-1", "sleep": 8})),
        )
        .await
        .unwrap();
    let created = match outcome {
        Upserted::Created(record) => record,
        other => panic!("expected a new record, got {other:?}"),
    };

    let outcome = store
        .upsert(
            Collection::HealthMetrics,
            key(),
            record(json!({"userId": "u-2", "exercise": 30})),
        )
        .await
        .unwrap();
    let updated = match outcome {
        Upserted::Updated(record) => record,
        other => panic!("expected a merged record, got {other:?}"),
    };

    assert_eq!(updated[ID_FIELD], created[ID_FIELD]);
    assert_eq!(updated["sleep"], 8);
    assert_eq!(updated["exercise"], 30);
    // The filter key is never overwritten by a merge
    assert_eq!(updated["userId"], "u-1");
    assert_eq!(store.count(Collection::HealthMetrics), 1);
}
