//! Vehicle and user operations against a mock backend.

use serde_json::json;

use directus_bridge::directus::{AccountInput, RecordId, UserRecordInput};
use directus_bridge::ErrorKind;

mod common;
use common::{data, error, MockDirectus};

#[tokio::test]
async fn test_list_vehicles_keeps_order() {
    let mock = MockDirectus::new()
        .route("GET", "/items/Vehiculo", |_| {
            data(json!([
                { "id": 2, "Placa": "XYZ980", "Tipo": "moto", "Ciudad": 1, "Usuario": "u-1" },
                { "id": 1, "Placa": "ABC123", "Tipo": "car", "Ciudad": 1, "Usuario": null }
            ]))
        })
        .start()
        .await;

    let vehicles = mock.client_with_token("acc").list_vehicles().await;
    let plates: Vec<_> = vehicles.iter().map(|v| v.plate.as_str()).collect();
    assert_eq!(plates, vec!["XYZ980", "ABC123"]);
    assert_eq!(vehicles[0].owner, Some(RecordId::from("u-1")));
    assert!(vehicles[1].owner.is_none());
}

#[tokio::test]
async fn test_list_vehicles_swallows_failures() {
    let mock = MockDirectus::new()
        .route("GET", "/items/Vehiculo", |_| error(403, "Forbidden", Some("FORBIDDEN")))
        .start()
        .await;

    assert!(mock.client().list_vehicles().await.is_empty());
}

#[tokio::test]
async fn test_create_vehicle_without_acting_user() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Vehiculo", |req| {
            let mut record = req.body.clone();
            record["id"] = json!(41);
            data(record)
        })
        .start()
        .await;

    let envelope = mock.client().create_vehicle("ABC123", "car", None).await;

    let vehicle = envelope.data().expect("create should succeed");
    assert_eq!(vehicle.id, RecordId::from("41"));
    assert_eq!(vehicle.city, Some(RecordId::from("1")));
    assert!(vehicle.owner.is_none());

    let sent = mock.last("POST", "/items/Vehiculo").unwrap();
    assert_eq!(
        sent.body,
        json!({ "Placa": "ABC123", "Tipo": "car", "Ciudad": "1", "Usuario": null })
    );
}

#[tokio::test]
async fn test_create_vehicle_with_acting_user() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Vehiculo", |req| {
            let mut record = req.body.clone();
            record["id"] = json!(42);
            data(record)
        })
        .start()
        .await;

    let owner = RecordId::from("u-7");
    let envelope = mock
        .client_with_token("acc")
        .create_vehicle("DEF456", "car", Some(&owner))
        .await;

    assert_eq!(envelope.data().unwrap().owner, Some(owner));
    assert_eq!(
        mock.last("POST", "/items/Vehiculo").unwrap().authorization.as_deref(),
        Some("Bearer acc")
    );
}

#[tokio::test]
async fn test_create_vehicle_duplicate_plate() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Vehiculo", |_| {
            error(400, "Value for field \"Placa\" has to be unique.", Some("RECORD_NOT_UNIQUE"))
        })
        .start()
        .await;

    let envelope = mock.client().create_vehicle("ABC123", "car", None).await;
    assert_eq!(envelope.error().unwrap().kind, ErrorKind::DuplicateResource);
}

#[tokio::test]
async fn test_get_vehicle_found_and_missing() {
    let mock = MockDirectus::new()
        .route("GET", "/items/Vehiculo", |req| {
            match req.query_param("filter[id][_eq]").as_deref() {
                Some("7") => data(json!([{ "id": 7, "Placa": "GHI789", "Tipo": "car", "Usuario": null }])),
                _ => data(json!([])),
            }
        })
        .start()
        .await;
    let client = mock.client();

    let found = client.get_vehicle("7").await;
    assert_eq!(found.data().unwrap().as_ref().unwrap().plate, "GHI789");

    let missing = client.get_vehicle("missing-id").await;
    assert!(missing.is_ok(), "empty match set is not an error");
    assert_eq!(missing.data().unwrap(), &None);

    let sent = mock.last("GET", "/items/Vehiculo").unwrap();
    assert_eq!(sent.query_param("fields").as_deref(), Some("id,Placa,Tipo,Ciudad,Usuario"));
}

#[tokio::test]
async fn test_get_vehicle_error_stays_error() {
    let mock = MockDirectus::new()
        .route("GET", "/items/Vehiculo", |_| error(503, "Service Unavailable", None))
        .start()
        .await;

    let envelope = mock.client().get_vehicle("7").await;
    assert_eq!(envelope.error().unwrap().kind, ErrorKind::NetworkOrServerError);
}

#[tokio::test]
async fn test_create_user_record_applies_defaults() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Usuario", |req| {
            let mut record = req.body.clone();
            record["id"] = json!(5);
            data(record)
        })
        .start()
        .await;

    let input = UserRecordInput {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        phone: Some("3001234567".into()),
        password: "pw".into(),
        city: Some(RecordId::from("1")),
        role: None,
    };
    let envelope = mock.client().create_user_record(&input).await;

    let record = envelope.data().unwrap();
    assert_eq!(record.name.as_deref(), Some("Ana"));
    assert_eq!(record.status.as_deref(), Some("active"));
    assert_eq!(record.role, Some(RecordId::from("3")));

    let sent = mock.last("POST", "/items/Usuario").unwrap();
    assert_eq!(sent.body["Clave"], "pw");
    assert_eq!(sent.body["Correo"], "ana@example.com");
}

#[tokio::test]
async fn test_create_user_record_duplicate_email() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Usuario", |_| {
            error(500, "Duplicate entry 'ana@example.com' for key 'Correo'", None)
        })
        .start()
        .await;

    let input = UserRecordInput {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: "pw".into(),
        ..UserRecordInput::default()
    };
    let envelope = mock.client().create_user_record(&input).await;

    let err = envelope.error().unwrap();
    assert_eq!(err.kind, ErrorKind::DuplicateResource);
    assert_eq!(
        err.message,
        "This email address is already registered. Please use another one."
    );
    assert!(err.detail.as_deref().unwrap().contains("Duplicate entry"));
}

#[tokio::test]
async fn test_create_user_record_requires_name_email_and_password() {
    let mock = MockDirectus::new()
        .route("POST", "/items/Usuario", |req| data(req.body.clone()))
        .start()
        .await;
    let client = mock.client();

    let envelope = client.create_user_record(&UserRecordInput::default()).await;
    let err = envelope.error().unwrap();
    assert_eq!(err.kind, ErrorKind::ValidationFailure);
    assert_eq!(err.message, "Name, email and password are required");

    let blank_name = UserRecordInput {
        name: "  ".into(),
        email: "ana@example.com".into(),
        password: "pw".into(),
        ..UserRecordInput::default()
    };
    assert!(!client.create_user_record(&blank_name).await.is_ok());
    assert!(mock.requests().is_empty(), "no request may be issued");
}

#[tokio::test]
async fn test_create_account_requires_email_and_password() {
    let mock = MockDirectus::new().start().await;

    let envelope = mock.client().create_account(&AccountInput::default()).await;

    assert_eq!(envelope.error().unwrap().kind, ErrorKind::ValidationFailure);
    assert!(mock.requests().is_empty(), "no request may be issued");
}

#[tokio::test]
async fn test_create_account_sends_fixed_role() {
    let mock = MockDirectus::new()
        .route("POST", "/users", |req| {
            data(json!({
                "id": "9b1d",
                "email": req.body["email"],
                "first_name": req.body["first_name"],
                "role": req.body["role"],
                "status": "active"
            }))
        })
        .start()
        .await;

    let input = AccountInput {
        email: "ana@example.com".into(),
        password: "pw".into(),
        first_name: None,
    };
    let envelope = mock.client_with_token("admin").create_account(&input).await;

    let account = envelope.data().unwrap();
    assert_eq!(account.id, RecordId::from("9b1d"));
    assert_eq!(
        account.role,
        Some(RecordId::from("4bf867c2-ea16-4c47-a042-efe0b39ecce9"))
    );
    assert_eq!(mock.last("POST", "/users").unwrap().body["first_name"], "");
}

#[tokio::test]
async fn test_create_account_friendly_errors() {
    let mock = MockDirectus::new()
        .route("POST", "/users", |req| match req.body["email"].as_str() {
            Some("taken@example.com") => {
                error(400, "Field \"email\" has to be unique.", Some("RECORD_NOT_UNIQUE"))
            }
            _ => error(403, "You don't have permission to access this.", Some("FORBIDDEN")),
        })
        .start()
        .await;
    let client = mock.client();

    let taken = AccountInput {
        email: "taken@example.com".into(),
        password: "pw".into(),
        first_name: None,
    };
    let err = client.create_account(&taken).await.error().cloned().unwrap();
    assert_eq!(err.kind, ErrorKind::DuplicateResource);
    assert_eq!(err.message, "This email address is already registered");

    let other = AccountInput {
        email: "new@example.com".into(),
        ..taken
    };
    let err = client.create_account(&other).await.error().cloned().unwrap();
    assert_eq!(err.kind, ErrorKind::PermissionDenied);
    assert_eq!(err.message, "You do not have permission to create users");
}

#[tokio::test]
async fn test_list_users_with_placeholders() {
    let mock = MockDirectus::new()
        .route("GET", "/users", |_| {
            data(json!([
                { "id": "u-1", "first_name": "Ana", "email": "ana@example.com", "phone": "300" },
                { "id": "u-2", "first_name": null, "email": "b@example.com" }
            ]))
        })
        .start()
        .await;

    let users = mock.client().list_users().await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Ana");
    assert_eq!(users[1].name, "Unnamed");
    assert_eq!(users[1].phone, "Not available");
}

#[tokio::test]
async fn test_list_users_empty_on_failure() {
    assert!(common::unreachable_client().list_users().await.is_empty());
}

#[tokio::test]
async fn test_get_user_placeholders() {
    let mock = MockDirectus::new()
        .route("GET", "/users", |req| {
            match req.query_param("filter[id][_eq]").as_deref() {
                Some("u-1") => data(json!([{ "id": "u-1", "first_name": "Ana", "email": "ana@example.com" }])),
                _ => data(json!([])),
            }
        })
        .start()
        .await;
    let client = mock.client();

    let ana = client.get_user("u-1").await;
    assert_eq!(ana.name, "Ana");
    assert_eq!(ana.phone, "Not available");

    let ghost = client.get_user("u-404").await;
    assert_eq!(ghost.id, "u-404");
    assert_eq!(ghost.name, "Failed to load");
    assert_eq!(ghost.email, "Not available");
}
