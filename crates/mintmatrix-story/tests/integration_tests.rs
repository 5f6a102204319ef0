//! Integration tests for the edge fetcher, relationship aggregator and lookups

use mintmatrix_domain::{EdgeFilter, IpEdge};
use mintmatrix_story::{
    ApiRequest, ApiResponse, Method, MockTransport, RetryPolicy, StoryClient, StoryConfig,
    StoryError,
};
use serde_json::{json, Value};
use std::sync::Arc;

const TARGET: &str = "0x00000000000000000000000000000000000000aa";

fn client(transport: &MockTransport) -> StoryClient {
    StoryClient::with_transport(
        Arc::new(transport.clone()),
        &StoryConfig::default(),
        RetryPolicy::immediate(3),
    )
}

fn edges_json(edges: &[IpEdge]) -> Value {
    serde_json::to_value(edges).unwrap()
}

/// Serve `edges` in pages keyed by numeric offset cursors
fn paged(edges: Vec<IpEdge>) -> MockTransport {
    MockTransport::new(move |req: &ApiRequest| {
        let pagination = &req.body.as_ref().unwrap()["options"]["pagination"];
        let limit = pagination["limit"].as_u64().unwrap() as usize;
        let start: usize = pagination["after"]
            .as_str()
            .map(|c| c.parse().unwrap())
            .unwrap_or(0);
        let end = (start + limit).min(edges.len());
        let next = if end < edges.len() { json!(end.to_string()) } else { Value::Null };
        Ok(ApiResponse::ok(json!({
            "data": edges_json(&edges[start..end]),
            "next": next,
        })))
    })
}

fn numbered(n: usize) -> Vec<IpEdge> {
    (0..n)
        .map(|i| IpEdge::new(format!("0xc{}", i), TARGET).at_block(1_000 - i as u64))
        .collect()
}

#[tokio::test]
async fn test_not_found_yields_empty_without_retry() {
    let transport = MockTransport::always_status(404);
    let edges = client(&transport)
        .fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await;

    assert!(edges.is_empty());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_stops_at_cap_of_one_hundred() {
    let transport = paged(numbered(120));
    let edges = client(&transport)
        .fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await;

    assert_eq!(edges.len(), 100);
    assert_eq!(transport.call_count(), 2);
    assert_eq!(edges, numbered(100));
}

#[tokio::test]
async fn test_request_body_carries_clean_filter() {
    let transport = paged(numbered(3));
    let filter = EdgeFilter {
        parent_ip_id: Some(TARGET.to_string()),
        license_template: Some(String::new()),
        ..EdgeFilter::default()
    };
    client(&transport).fetch_edges(&filter).await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/assets/edges");
    let options = &calls[0].body.as_ref().unwrap()["options"];
    assert_eq!(options["orderBy"], "blockNumber");
    assert_eq!(options["orderDirection"], "desc");
    assert_eq!(options["pagination"]["limit"], 50);
    assert_eq!(options["where"], json!({ "parentIpId": TARGET }));
}

#[tokio::test]
async fn test_empty_filter_omits_where() {
    let transport = paged(numbered(2));
    client(&transport).fetch_edges(&EdgeFilter::default()).await;

    let body = transport.calls()[0].body.clone().unwrap();
    assert!(body["options"].get("where").is_none());
}

#[tokio::test]
async fn test_bad_request_falls_back_to_local_filter() {
    let page = vec![
        IpEdge::new("0xc1", TARGET),
        IpEdge::new("0xc2", "0xother"),
        IpEdge::new("0xc3", TARGET.to_uppercase().replace("0X", "0x")),
    ];
    let transport = MockTransport::new(move |req: &ApiRequest| {
        let filtered = req.body.as_ref().unwrap()["options"].get("where").is_some();
        if filtered {
            Ok(ApiResponse::status(400))
        } else {
            Ok(ApiResponse::ok(json!({
                "data": edges_json(&page),
                "next": "more-pages-ignored",
            })))
        }
    });

    let edges = client(&transport)
        .fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await;

    let ids: Vec<_> = edges.iter().map(|e| e.ip_id.as_str()).collect();
    assert_eq!(ids, vec!["0xc1", "0xc3"]);
    // one rejected filtered call, one unfiltered call, no pagination
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_failed_fallback_is_not_retried() {
    let transport = MockTransport::sequence(vec![
        Ok(ApiResponse::status(400)),
        Ok(ApiResponse::status(503)),
    ]);
    let client = client(&transport);

    let result = client.try_fetch_edges(&EdgeFilter::by_child(TARGET)).await;
    assert_eq!(result.unwrap_err().status(), Some(503));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_retry_exhaustion_degrades_to_empty() {
    let transport = MockTransport::always_status(500);
    let client = client(&transport);

    assert!(client.fetch_edges(&EdgeFilter::by_child(TARGET)).await.is_empty());
    assert_eq!(transport.call_count(), 3);

    let err = client
        .try_fetch_edges(&EdgeFilter::by_child(TARGET))
        .await
        .unwrap_err();
    assert!(matches!(err, StoryError::RetriesExhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let transport = MockTransport::sequence(vec![
        Err(StoryError::Transport("connection reset".to_string())),
        Ok(ApiResponse::ok(json!({ "data": edges_json(&numbered(2)) }))),
    ]);
    let edges = client(&transport)
        .fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await;
    assert_eq!(edges.len(), 2);
}

#[tokio::test]
async fn test_relationships_order_and_idempotence() {
    let parents = vec![IpEdge::new(TARGET, "0xp1"), IpEdge::new(TARGET, "0xp2")];
    let children = vec![IpEdge::new("0xc1", TARGET), IpEdge::new("0xc1", TARGET)];
    let (p, c) = (parents.clone(), children.clone());
    let transport = MockTransport::new(move |req: &ApiRequest| {
        let clause = &req.body.as_ref().unwrap()["options"]["where"];
        let data = if clause.get("ipId").is_some() { &p } else { &c };
        Ok(ApiResponse::ok(json!({ "data": edges_json(data) })))
    });
    let client = client(&transport);

    let first = client.get_ip_relationships(TARGET).await;
    let second = client.get_ip_relationships(TARGET).await;

    assert_eq!(first.parents, parents);
    assert_eq!(first.children, children);
    assert_eq!(first.all_relationships.len(), 4);
    assert_eq!(first.all_relationships[..2], parents[..]);
    assert_eq!(first, second);

    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[0].body.as_ref().unwrap()["options"]["where"].get("ipId").is_some());
    assert!(calls[1].body.as_ref().unwrap()["options"]["where"].get("parentIpId").is_some());
}

#[tokio::test]
async fn test_family_tree_expands_one_generation() {
    let transport = MockTransport::new(|req: &ApiRequest| {
        let clause = &req.body.as_ref().unwrap()["options"]["where"];
        let data = match (clause["ipId"].as_str(), clause["parentIpId"].as_str()) {
            (Some(TARGET), _) => vec![IpEdge::new(TARGET, "0xp1")],
            (Some("0xp1"), _) => vec![IpEdge::new("0xp1", "0xg1")],
            (_, Some(TARGET)) => vec![IpEdge::new("0xc1", TARGET)],
            (_, Some("0xc1")) => vec![IpEdge::new("0xd1", "0xc1"), IpEdge::new("0xd2", "0xc1")],
            _ => Vec::new(),
        };
        Ok(ApiResponse::ok(json!({ "data": edges_json(&data) })))
    });

    let tree = client(&transport).get_family_tree(TARGET).await;
    assert_eq!(tree.parents.len(), 1);
    assert_eq!(tree.ancestors, vec![IpEdge::new("0xp1", "0xg1")]);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.descendants.len(), 2);
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn test_disputes_and_assets() {
    let transport = MockTransport::new(|req: &ApiRequest| match req.path.as_str() {
        "/disputes" => Ok(ApiResponse::ok(json!({
            "data": [
                { "id": 1, "targetIpId": TARGET, "status": "Raised" },
                { "id": "2", "targetIpId": TARGET, "status": "Resolved" }
            ]
        }))),
        "/assets/0xmissing" => Ok(ApiResponse::status(404)),
        _ => Ok(ApiResponse::ok(json!({ "data": { "id": TARGET } }))),
    });
    let client = client(&transport);

    let (summary, disputes) = client.dispute_summary(TARGET).await.unwrap();
    assert_eq!(disputes.len(), 2);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.resolved, 1);
    assert_eq!(
        transport.calls()[0].body.as_ref().unwrap()["options"]["where"],
        json!({ "targetIpId": TARGET })
    );

    assert!(client.get_asset("0xmissing").await.unwrap().is_none());
    let asset = client.get_asset(TARGET).await.unwrap().unwrap();
    assert_eq!(asset["id"], TARGET);
}

#[tokio::test]
async fn test_detailed_license_terms_body() {
    let transport = MockTransport::new(|_| Ok(ApiResponse::ok(json!({ "data": [{ "id": "1" }] }))));
    let client = client(&transport);

    let terms = client
        .detailed_ip_license_terms(&[TARGET.to_string()])
        .await
        .unwrap();
    assert_eq!(terms.len(), 1);
    assert_eq!(transport.calls()[0].body, Some(json!({ "ipIds": [TARGET] })));

    assert!(client.detailed_ip_license_terms(&[]).await.unwrap().is_empty());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_bad_request_on_later_page_keeps_error() {
    let transport = MockTransport::sequence(vec![
        Ok(ApiResponse::ok(json!({ "data": edges_json(&numbered(50)), "next": "50" }))),
        Ok(ApiResponse::status(400)),
    ]);
    let client = client(&transport);

    let err = client
        .try_fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    // no unfiltered fallback request after the filter was accepted once
    assert_eq!(transport.call_count(), 2);
    assert!(transport.calls()[1].body.as_ref().unwrap()["options"]
        .get("where")
        .is_some());
}

#[tokio::test]
async fn test_malformed_edge_row_is_skipped() {
    let transport = MockTransport::new(|_| {
        Ok(ApiResponse::ok(json!({
            "data": [
                { "ipId": "0xc1", "parentIpId": TARGET, "blockNumber": 10 },
                { "ipId": "0xc2" }
            ]
        })))
    });

    let edges = client(&transport)
        .fetch_edges(&EdgeFilter::by_parent(TARGET))
        .await;

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].ip_id, "0xc1");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_ip_license_terms_is_a_get_by_id() {
    let transport = MockTransport::new(|req: &ApiRequest| match req.path.as_str() {
        "/licenses/ip/terms/0xmissing" => Ok(ApiResponse::status(404)),
        _ => Ok(ApiResponse::ok(json!({
            "data": [{ "licenseTermsId": "1" }, { "licenseTermsId": "7" }]
        }))),
    });
    let client = client(&transport);

    let terms = client.ip_license_terms(TARGET).await.unwrap();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[1]["licenseTermsId"], "7");

    let call = &transport.calls()[0];
    assert_eq!(call.method, Method::Get);
    assert_eq!(call.path, format!("/licenses/ip/terms/{}", TARGET));
    assert!(call.body.is_none());

    assert!(client.ip_license_terms("0xmissing").await.unwrap().is_empty());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_single_object_lookups() {
    let transport = MockTransport::new(|req: &ApiRequest| match req.path.as_str() {
        "/licenses/terms/404" | "/licenses/tokens/404" | "/assets/0xmissing/metadata" => {
            Ok(ApiResponse::status(404))
        }
        path => Ok(ApiResponse::ok(json!({ "data": { "path": path } }))),
    });
    let client = client(&transport);

    let metadata = client.get_asset_metadata(TARGET).await.unwrap().unwrap();
    assert_eq!(metadata["path"], format!("/assets/{}/metadata", TARGET));
    let terms = client.license_terms("5").await.unwrap().unwrap();
    assert_eq!(terms["path"], "/licenses/terms/5");
    let token = client.license_token("42").await.unwrap().unwrap();
    assert_eq!(token["path"], "/licenses/tokens/42");

    assert!(client.get_asset_metadata("0xmissing").await.unwrap().is_none());
    assert!(client.license_terms("404").await.unwrap().is_none());
    assert!(client.license_token("404").await.unwrap().is_none());

    // 404s are answers, not failures: one call each
    assert_eq!(transport.call_count(), 6);
    assert!(transport.calls().iter().all(|c| c.method == Method::Get));
}

#[tokio::test]
async fn test_list_assets_paginates_to_cap() {
    let transport = paged(numbered(120));
    let assets = client(&transport).list_assets(None).await.unwrap();

    assert_eq!(assets.len(), 100);
    assert_eq!(transport.call_count(), 2);
    let calls = transport.calls();
    assert!(calls.iter().all(|c| c.method == Method::Post && c.path == "/assets"));
    let first = calls[0].body.as_ref().unwrap();
    assert!(first["options"].get("where").is_none());
    assert_eq!(first["options"]["orderBy"], "blockNumber");
    assert_eq!(calls[1].body.as_ref().unwrap()["options"]["pagination"]["after"], "50");
}

#[tokio::test]
async fn test_list_license_tokens_sends_filter() {
    let transport = paged(numbered(3));
    let tokens = client(&transport)
        .list_license_tokens(Some(json!({ "licensorIpId": TARGET })))
        .await
        .unwrap();

    assert_eq!(tokens.len(), 3);
    let call = &transport.calls()[0];
    assert_eq!(call.method, Method::Post);
    assert_eq!(call.path, "/licenses/tokens");
    assert_eq!(
        call.body.as_ref().unwrap()["options"]["where"],
        json!({ "licensorIpId": TARGET })
    );
}
