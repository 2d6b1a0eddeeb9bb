//! Resource and entity operations end to end against the fake server.

use serde_json::{json, Map, Value};

use acslib::{
    AccessControlObject, ClearanceClient, ClearanceItemClient, ClearanceItemCreateData,
    CredentialClient, CredentialCreateData, ObjectType, PersonnelClient, PersonnelCreateData,
    SearchFilter, SearchRequest,
};

use crate::common::FakeCcure;

const NO_TERMS: [&str; 0] = [];

fn updates(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

async fn seed_people(personnel: &PersonnelClient) {
    for (first, last) in [("Ada", "Lovelace"), ("Grace", "Hopper"), ("Alan", "Turing")] {
        personnel
            .create(&PersonnelCreateData::new(last).with_first_name(first))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_create_then_search_round_trip() {
    let fake = FakeCcure::start().await;
    let personnel = PersonnelClient::new(fake.resource());

    let created = personnel
        .create(
            &PersonnelCreateData::new("Lovelace")
                .with_first_name("Ada")
                .with_property("Text1", "analyst"),
        )
        .await
        .unwrap();
    let id = created["ObjectID"].as_i64().unwrap();

    let rows = personnel.search(&["lovelace"], None).await.unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["ObjectID"], id);
    assert_eq!(rows[0]["FirstName"], "Ada");
    assert_eq!(rows[0]["LastName"], "Lovelace");
    // Only display properties come back.
    assert!(rows[0].get("Text1").is_none());

    let filter = SearchFilter::personnel().update_display_properties(["Text1"]);
    let rows = personnel.search(&["ada"], Some(&filter)).await.unwrap();
    assert_eq!(rows[0]["Text1"], "analyst");
}

#[tokio::test]
async fn test_search_terms_narrow_results() {
    let fake = FakeCcure::start().await;
    let personnel = PersonnelClient::new(fake.resource());
    seed_people(&personnel).await;

    // "a" matches all three in first or last name.
    assert_eq!(personnel.count(&["a"], None).await.unwrap(), 3);
    // Terms are ANDed: "a" and "ing" leaves only Turing.
    let rows = personnel.search(&["a", "ing"], None).await.unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["LastName"], "Turing");
    // No terms matches everything.
    assert_eq!(personnel.count(&NO_TERMS, None).await.unwrap(), 3);
}

#[tokio::test]
async fn test_paging_is_caller_driven() {
    let fake = FakeCcure::start().await;
    let personnel = PersonnelClient::new(fake.resource());
    seed_people(&personnel).await;

    let first = personnel
        .search_page(&NO_TERMS, None, Some(2), 1)
        .await
        .unwrap();
    let second = personnel
        .search_page(&NO_TERMS, None, Some(2), 2)
        .await
        .unwrap();

    assert_eq!(first.as_array().unwrap().len(), 2);
    assert_eq!(second.as_array().unwrap().len(), 1);
    assert_ne!(first[0]["ObjectID"], second[0]["ObjectID"]);
}

#[tokio::test]
async fn test_update_and_delete() {
    let fake = FakeCcure::start().await;
    let personnel = PersonnelClient::new(fake.resource());
    seed_people(&personnel).await;

    let rows = personnel.search(&["hopper"], None).await.unwrap();
    let id = rows[0]["ObjectID"].as_i64().unwrap();

    personnel
        .update(id, &updates(json!({"MiddleName": "Murray"})))
        .await
        .unwrap();
    let rows = personnel.search(&["hopper"], None).await.unwrap();
    assert_eq!(rows[0]["MiddleName"], "Murray");

    personnel.delete(id).await.unwrap();
    assert_eq!(personnel.count(&["hopper"], None).await.unwrap(), 0);

    // Deleting again is a server error, reported as a bad request.
    let err = personnel.delete(id).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("does not exist"));
}

#[tokio::test]
async fn test_credentials_and_clearance_items_are_children() {
    let fake = FakeCcure::start().await;
    let resource = fake.resource();
    let personnel = PersonnelClient::new(resource.clone());
    let credentials = CredentialClient::new(resource.clone());
    let doors = ClearanceItemClient::doors(resource);

    let person = personnel
        .create(&PersonnelCreateData::new("Lovelace"))
        .await
        .unwrap();
    let person_id = person["ObjectID"].as_i64().unwrap();

    credentials
        .create(
            &CredentialCreateData::new(person_id, "1234567890")
                .with_card_number(42)
                .with_property("Name", "Ada badge"),
        )
        .await
        .unwrap();
    doors
        .create(&ClearanceItemCreateData::new(12, "Lab 101 Door"))
        .await
        .unwrap();

    let objects = fake.objects();
    let credential = objects
        .iter()
        .find(|obj| obj["TypeFullName"] == ObjectType::Credential.full_name())
        .unwrap();
    assert_eq!(credential["ParentID"], person_id);
    assert_eq!(credential["CHUID"], "1234567890");

    let door = objects
        .iter()
        .find(|obj| obj["TypeFullName"] == ObjectType::Door.full_name())
        .unwrap();
    assert_eq!(door["ParentID"], 12);

    let rows = credentials.search(&["badge"], None).await.unwrap();
    assert_eq!(rows[0]["CardNumber"], "42");
    assert_eq!(doors.count(&["lab"], None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_expired_session_is_renewed_transparently() {
    let fake = FakeCcure::start().await;
    let personnel = PersonnelClient::new(fake.resource());
    seed_people(&personnel).await;
    assert_eq!(fake.logins(), 1);

    fake.expire_sessions();
    assert_eq!(personnel.count(&NO_TERMS, None).await.unwrap(), 3);
    assert_eq!(fake.logins(), 2);
}

#[tokio::test]
async fn test_shared_connection_across_clients() {
    let fake = FakeCcure::start().await;
    let resource = fake.resource();
    let personnel = PersonnelClient::new(resource.clone());
    let clearances = ClearanceClient::new(resource.clone());

    let (people, found) = tokio::join!(
        personnel.count(&NO_TERMS, None),
        clearances.search(&NO_TERMS, None),
    );
    assert_eq!(people.unwrap(), 0);
    assert_eq!(found.unwrap(), json!([]));
    // One session serves both clients.
    assert_eq!(fake.logins(), 1);
}

#[tokio::test]
async fn test_unsupported_clearance_writes_send_nothing() {
    let fake = FakeCcure::start().await;
    let clearances = ClearanceClient::new(fake.resource());

    let before = fake.request_count().await;
    assert!(clearances.create(&Map::new()).await.unwrap_err().is_unsupported());
    assert!(clearances.update(1, &Map::new()).await.unwrap_err().is_unsupported());
    assert!(clearances.delete(1).await.unwrap_err().is_unsupported());
    assert_eq!(fake.request_count().await, before);
}

#[tokio::test]
async fn test_raw_search_request_with_count_only_option() {
    let fake = FakeCcure::start().await;
    let resource = fake.resource();
    seed_people(&PersonnelClient::new(resource.clone())).await;

    let request = SearchRequest::new(ObjectType::Personnel.full_name())
        .page_size(0)
        .option("CountOnly", true);
    let payload = resource
        .search(&request, &SearchFilter::personnel())
        .await
        .unwrap();
    assert_eq!(payload, json!(3));
}
