//! Distribution-level CRUD against stored datasets.

mod common;

use common::{config, dataset_ttl, harness, seed_catalogue};
use hub_service::{HubError, UpdateOutcome};
use hub_store::MetadataStore;

fn distribution_ttl(identifier: &str, title: &str) -> String {
    format!(
        r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        <urn:src-dist> a dcat:Distribution ;
            dct:identifier "{identifier}" ;
            dct:title "{title}"@en .
    "#
    )
}

fn created_id(outcome: UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Created { id, .. } => id,
        other => panic!("expected Created, got {other:?}"),
    }
}

#[tokio::test]
async fn adding_a_distribution_is_create_only() {
    let h = harness(config());
    seed_catalogue(&h).await;
    h.datasets
        .put_dataset(
            "ds",
            dataset_ttl("Air quality", "dist-a").as_bytes(),
            "text/turtle",
            "cat",
        )
        .await
        .unwrap();

    let outcome = h
        .datasets
        .post_distribution("ds", distribution_ttl("dist-b", "JSON").as_bytes(), "text/turtle")
        .await
        .unwrap();
    let UpdateOutcome::Created { id, location } = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(id.len(), 32);
    assert_eq!(location, format!("https://hub.example.org/distribution/{id}"));

    // the index sees both distributions, still under the catalogue
    let doc = h.index.dataset("ds").unwrap();
    assert_eq!(doc["catalog"]["id"], "cat");
    assert_eq!(doc["distributions"].as_array().unwrap().len(), 2);

    // the same identity key cannot be added twice
    let err = h
        .datasets
        .post_distribution("ds", distribution_ttl("dist-b", "JSON").as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::Conflict(_)));

    // nor one that collides with the harvested distribution
    let err = h
        .datasets
        .post_distribution("ds", distribution_ttl("dist-a", "CSV").as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::Conflict(_)));
}

#[tokio::test]
async fn distribution_round_trip() {
    let h = harness(config());
    seed_catalogue(&h).await;
    h.datasets
        .put_dataset(
            "ds",
            dataset_ttl("Air quality", "dist-a").as_bytes(),
            "text/turtle",
            "cat",
        )
        .await
        .unwrap();
    let id = created_id(
        h.datasets
            .post_distribution("ds", distribution_ttl("dist-b", "JSON").as_bytes(), "text/turtle")
            .await
            .unwrap(),
    );

    let body = h.datasets.get_distribution(&id, "text/turtle").await.unwrap();
    assert!(body.contains("JSON"));
    assert!(body.contains("dist-b"));

    // an update keeps the URI
    let outcome = h
        .datasets
        .put_distribution(&id, distribution_ttl("dist-b", "JSON v2").as_bytes(), "text/turtle")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            location: format!("https://hub.example.org/distribution/{id}")
        }
    );
    let body = h.datasets.get_distribution(&id, "text/turtle").await.unwrap();
    assert!(body.contains("JSON v2"));

    // a payload without an identifier keeps the stored one
    let bare = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        <urn:src-dist> a dcat:Distribution ; dct:title "JSON v3"@en .
    "#;
    h.datasets
        .put_distribution(&id, bare.as_bytes(), "text/turtle")
        .await
        .unwrap();
    let body = h.datasets.get_distribution(&id, "text/turtle").await.unwrap();
    assert!(body.contains("dist-b"));
    let err = h
        .datasets
        .post_distribution("ds", distribution_ttl("dist-b", "again").as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::Conflict(_)));

    // deletion frees the identity key and leaves the dataset intact
    h.datasets.delete_distribution(&id).await.unwrap();
    let err = h.datasets.get_distribution(&id, "text/turtle").await.unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));
    let err = h.datasets.delete_distribution(&id).await.unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));

    let dataset = h.datasets.get_dataset("ds", "text/turtle").await.unwrap();
    assert!(dataset.contains("dist-a"));
    assert!(!dataset.contains("dist-b"));
    assert!(h
        .datasets
        .post_distribution("ds", distribution_ttl("dist-b", "JSON").as_bytes(), "text/turtle")
        .await
        .is_ok());
}

#[tokio::test]
async fn missing_targets_are_not_found() {
    let h = harness(config());
    seed_catalogue(&h).await;

    let err = h
        .datasets
        .post_distribution("nope", distribution_ttl("d", "t").as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));

    let err = h
        .datasets
        .get_distribution("nope", "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));

    let err = h
        .datasets
        .put_distribution("nope", distribution_ttl("d", "t").as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));

    let err = h.datasets.delete_distribution("nope").await.unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));
}

#[tokio::test]
async fn malformed_distribution_payloads_are_bad_requests() {
    let h = harness(config());
    seed_catalogue(&h).await;
    h.datasets
        .put_dataset(
            "ds",
            dataset_ttl("Air quality", "dist-a").as_bytes(),
            "text/turtle",
            "cat",
        )
        .await
        .unwrap();

    let err = h
        .datasets
        .post_distribution("ds", b"{}", "application/json")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::BadRequest(_)));

    let err = h
        .datasets
        .post_distribution("ds", b"<urn:a> <urn:b> <urn:c> .", "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::BadRequest(_)));

    let two = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        <urn:d1> a dcat:Distribution . <urn:d2> a dcat:Distribution .
    "#;
    let err = h
        .datasets
        .post_distribution("ds", two.as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::BadRequest(_)));

    let identity_less = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        [] a dcat:Distribution .
    "#;
    let err = h
        .datasets
        .post_distribution("ds", identity_less.as_bytes(), "text/turtle")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::BadRequest(_)));
}

#[tokio::test]
async fn edits_register_as_content_changes() {
    let h = harness(config());
    seed_catalogue(&h).await;
    let body = dataset_ttl("Air quality", "dist-a");
    h.datasets
        .put_dataset("ds", body.as_bytes(), "text/turtle", "cat")
        .await
        .unwrap();
    h.datasets
        .post_distribution("ds", distribution_ttl("dist-b", "JSON").as_bytes(), "text/turtle")
        .await
        .unwrap();

    // the edit moved the record checksum, so the identical harvester
    // payload is no longer a no-op
    let outcome = h
        .datasets
        .put_dataset("ds", body.as_bytes(), "text/turtle", "cat")
        .await
        .unwrap();
    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));

    // the dataset graph survived both rounds
    assert!(h
        .store
        .graph_exists("https://hub.example.org/dataset/ds")
        .await
        .unwrap());
}
