//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use pokedex::catalog::RemoteCatalogClient;
use pokedex::config::ApiConfig;
use serde_json::{json, Value};

/// Client pointed at a mock server with short timeouts.
pub fn client_for(base_url: &str) -> RemoteCatalogClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..ApiConfig::default()
    };
    RemoteCatalogClient::new(&config).expect("Failed to build client")
}

/// Reference URL in the upstream format.
pub fn pokemon_url(id: u32) -> String {
    format!("https://pokeapi.co/api/v2/pokemon/{}/", id)
}

/// A list response body with `count` entries starting at id `first_id`.
pub fn list_body(first_id: u32, count: u32, next: Option<&str>) -> Value {
    let results: Vec<Value> = (first_id..first_id + count)
        .map(|id| json!({ "name": format!("mon-{}", id), "url": pokemon_url(id) }))
        .collect();
    json!({
        "count": 1302,
        "next": next,
        "previous": null,
        "results": results,
    })
}

/// A detail response body.
pub fn detail_body(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "sprites": {},
        "types": [{ "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }],
        "stats": [
            { "base_stat": 35, "effort": 0, "stat": { "name": "hp" } },
            { "base_stat": 90, "effort": 2, "stat": { "name": "speed" } }
        ]
    })
}
