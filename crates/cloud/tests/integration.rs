//! Integration tests against the live SGIS OpenAPI.
//!
//! Tests marked `#[ignore]` require network access and SGIS credentials in
//! `SGIS_CONSUMER_KEY` / `SGIS_CONSUMER_SECRET`.
//! Run with: `cargo test -p hotspot-cloud -- --ignored`

use hotspot_cloud::reproject::boundary_to_wgs84;
use hotspot_cloud::{
    assemble_regions, AreaQuery, CloudError, SgisClient, SgisClientOptions, Variable,
};

fn client() -> SgisClient {
    SgisClient::from_env(SgisClientOptions::default()).expect("SGIS credentials not set")
}

#[test]
fn missing_credentials_is_auth_error() {
    if std::env::var("SGIS_CONSUMER_KEY").is_ok() {
        return;
    }
    match SgisClient::from_env(SgisClientOptions::default()) {
        Err(CloudError::Auth(msg)) => assert!(msg.contains("SGIS_CONSUMER_KEY")),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("client created without credentials"),
    }
}

#[tokio::test]
#[ignore]
async fn test_token_is_cached() {
    let client = client();
    let a = client.access_token().await.expect("token");
    let b = client.access_token().await.expect("token");
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

/// Seoul (code 11) has 25 districts.
#[tokio::test]
#[ignore]
async fn test_seoul_partition() {
    let client = client();
    let partition = client.fetch_partition(2023, "11").await.expect("partition");
    println!(
        "Seoul: {} statistics rows, {} boundaries",
        partition.population.len(),
        partition.boundary.len()
    );
    let regions = assemble_regions(&[partition], Variable::Population);
    assert_eq!(regions.len(), 25);
    assert!(regions.iter().all(|r| r.code.starts_with("11") && r.value > 0.0));
    assert!(regions.iter().all(|r| r.geometry.is_some()));
}

#[tokio::test]
#[ignore]
async fn test_boundary_to_wgs84() {
    let client = client();
    let mut boundary = client
        .boundary(&AreaQuery::children_of(2023, "11"))
        .await
        .expect("boundary");
    boundary_to_wgs84(&mut boundary).expect("reproject");

    let bbox_ok = boundary.iter().filter_map(|f| f.geometry.as_ref()).all(|g| {
        g.to_multi_polygon()
            .map(|mp| {
                mp.0.iter().flat_map(|p| p.exterior().0.iter()).all(|c| {
                    (126.7..127.3).contains(&c.x) && (37.4..37.8).contains(&c.y)
                })
            })
            .unwrap_or(true)
    });
    assert!(bbox_ok, "Seoul boundaries outside expected lon/lat window");
}

#[tokio::test]
#[ignore]
async fn test_nationwide_fetch() {
    let client = client();
    let partitions = client.fetch_nationwide(2023).await.expect("nationwide");
    assert_eq!(partitions.len(), 17);
    let regions = assemble_regions(&partitions, Variable::Density);
    println!("{} municipalities", regions.len());
    assert!(regions.len() > 200);
    assert!(regions.windows(2).all(|w| w[0].code < w[1].code));
}
