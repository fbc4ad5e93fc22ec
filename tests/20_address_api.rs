mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use homestay_api_rust::address::{HttpLookupSource, LookupError, LookupSource};

async fn post(path: &str, body: Value) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new().post(server.url(path)).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn province_selection_populates_districts() -> Result<()> {
    let server = common::ensure_server().await?;
    let body: Value = reqwest::get(server.url("/api/address/options/district?province=Bagmati"))
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["options"], json!(["Kathmandu", "Lalitpur"]));

    let body: Value = reqwest::get(server.url("/api/address/options/municipality"))
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["enabled"], false);
    assert_eq!(body["data"]["options"], json!([]));
    Ok(())
}

#[tokio::test]
async fn full_chain_is_cleared_when_province_changes() -> Result<()> {
    let (status, body) = post(
        "/api/address/change",
        json!({
            "selection": {
                "province": "Bagmati",
                "district": "Kathmandu",
                "municipality": "KMC",
                "ward": "5",
                "city": "Kathmandu",
                "tole": "Thamel"
            },
            "level": "province",
            "value": "Gandaki"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let selection = &body["data"]["selection"];
    assert_eq!(selection["province"], "Gandaki");
    assert_eq!(selection["district"], "");
    assert_eq!(selection["municipality"], "");
    assert_eq!(selection["ward"], "");
    assert_eq!(selection["tole"], "Thamel");
    Ok(())
}

#[tokio::test]
async fn district_shared_by_two_provinces_survives() -> Result<()> {
    let (status, body) = post(
        "/api/address/change",
        json!({
            "selection": { "province": "Gandaki", "district": "Nawalpur", "municipality": "Kawasoti" },
            "level": "province",
            "value": "Lumbini"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["patch"], json!({ "province": "Lumbini" }));
    Ok(())
}

#[tokio::test]
async fn reselecting_district_changes_nothing() -> Result<()> {
    let (status, body) = post(
        "/api/address/change",
        json!({
            "selection": { "province": "Bagmati", "district": "Kathmandu", "municipality": "KMC", "ward": "32" },
            "level": "district",
            "value": "Kathmandu"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["patch"], json!({}));
    assert_eq!(body["data"]["selection"]["ward"], "32");
    Ok(())
}

#[tokio::test]
async fn reconcile_repairs_stale_selection() -> Result<()> {
    let (status, body) = post(
        "/api/address/reconcile",
        json!({ "province": "Lumbini", "district": "Kaski", "municipality": "Pokhara", "ward": "7" }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["patch"],
        json!({ "district": "", "municipality": "", "ward": "" })
    );
    Ok(())
}

#[tokio::test]
async fn ward_display_transliterates() -> Result<()> {
    let server = common::ensure_server().await?;
    let body: Value = reqwest::Client::new()
        .get(server.url("/api/address/ward-display"))
        .query(&[("ward", "७")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["ward"], "७");
    assert_eq!(body["data"]["display"], "7");
    Ok(())
}

#[tokio::test]
async fn edits_rejected_while_lookup_failed() -> Result<()> {
    let server = common::ensure_degraded_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/address/change"))
        .json(&json!({ "level": "province", "value": "Bagmati" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = reqwest::get(server.url("/api/address/options/province")).await?.json().await?;
    assert_eq!(body["data"]["enabled"], false);
    Ok(())
}

#[tokio::test]
async fn http_source_loads_documents_served_by_the_api() -> Result<()> {
    let server = common::ensure_server().await?;
    let source = HttpLookupSource::new(&server.url("/data"), Duration::from_secs(5))?;
    let lookup = source.load().await?;

    assert_eq!(lookup.provinces(), ["Bagmati", "Gandaki", "Lumbini"]);
    assert_eq!(lookup.wards("Butwal"), ["७"]);

    let api: Value = reqwest::get(server.url("/api/address/lookup")).await?.json().await?;
    assert_eq!(api["data"]["allProvinces"], json!(["Bagmati", "Gandaki", "Lumbini"]));
    Ok(())
}

#[tokio::test]
async fn http_source_fails_whole_load_on_missing_document() -> Result<()> {
    let server = common::ensure_server().await?;
    let source = HttpLookupSource::new(&server.url("/data/missing"), Duration::from_secs(5))?;
    let err = source.load().await.unwrap_err();
    assert!(matches!(err, LookupError::Status { status: 404, .. }), "unexpected error: {err}");
    Ok(())
}
