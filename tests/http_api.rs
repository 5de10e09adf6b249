use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use subject_area_gateway::config::{AppConfig, TenantConfig};
use subject_area_gateway::{app, bootstrap_registry};
use tokio::net::TcpListener;

const BASE: &str = "/servers/cocoMDS1/open-metadata/access-services/subject-area/users/garygeeke";

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    /// Starts a gateway on an ephemeral port and returns a client for it.
    async fn start(config: AppConfig) -> Self {
        let registry = bootstrap_registry(&config);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(registry)).await.unwrap();
        });
        Self {
            client: Client::new(),
            base_url: format!("http://{}", address),
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn create(&self, collection: &str, body: Value) -> String {
        let response = self
            .post(&format!("{}/{}", BASE, collection), body)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        body["result"]["guid"].as_str().unwrap().to_string()
    }
}

async fn client() -> TestClient {
    TestClient::start(AppConfig::default()).await
}

#[tokio::test]
async fn test_health() {
    let client = client().await;
    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_glossary_lifecycle_over_http() {
    let client = client().await;
    let guid = client
        .create(
            "glossaries",
            json!({"nodeType": "Glossary", "name": "finance", "description": "money"}),
        )
        .await;
    let instance = format!("{}/glossaries/{}", BASE, guid);

    let response = client.get(&instance).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["responseCategory"], "Single");
    assert_eq!(body["result"]["name"], "finance");
    assert_eq!(body["result"]["status"], "ACTIVE");

    let response = client
        .put(
            &format!("{}?isReplace=true", instance),
            json!({"nodeType": "Glossary", "name": "finance"}),
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert!(body["result"].get("description").is_none());

    let response = client.delete(&instance).await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["status"], "DELETED");

    let response = client
        .post(&format!("{}/restore", instance), json!({}))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["status"], "ACTIVE");

    let response = client
        .delete(&format!("{}?isPurge=true", instance))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["responseCategory"], "Void");

    let response = client.get(&instance).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["kind"], "UnrecognizedIdentifier");
    assert_eq!(body["error"]["errorId"], "OMAS-SUBJECT-AREA-404-001");
}

#[tokio::test]
async fn test_find_with_query_parameters() {
    let client = client().await;
    for name in ["finance", "Financial Reporting", "marketing"] {
        client
            .create("glossaries", json!({"nodeType": "Glossary", "name": name}))
            .await;
    }

    let response = client
        .get(&format!(
            "{}/glossaries?searchCriteria=finan&ignoreCase=true&sequencingOrder=PROPERTY_ASCENDING&sequencingProperty=name",
            BASE
        ))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|node| node["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Financial Reporting", "finance"]);

    let response = client
        .get(&format!("{}/glossaries?pageSize=1&startingFrom=2", BASE))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["name"], "marketing");

    let response = client
        .get(&format!("{}/glossaries?pageSize=-1", BASE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["parameter"], "pageSize");
}

#[tokio::test]
async fn test_terms_and_relationships_over_http() {
    let client = client().await;
    let glossary = client
        .create("glossaries", json!({"nodeType": "Glossary", "name": "sales"}))
        .await;
    let mut terms = Vec::new();
    for name in ["client", "customer"] {
        terms.push(
            client
                .create(
                    "terms",
                    json!({"nodeType": "Term", "name": name, "glossary": {"guid": glossary}}),
                )
                .await,
        );
    }

    let response = client
        .get(&format!("{}/glossaries/{}/terms", BASE, glossary))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let response = client
        .post(
            &format!("{}/relationships/synonym", BASE),
            json!({
                "lineType": "Synonym",
                "end1": {"nodeGuid": terms[0]},
                "end2": {"nodeGuid": terms[1]},
                "confidence": 80
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["end2"]["name"], "customer");
    let line = body["result"]["guid"].as_str().unwrap().to_string();

    let response = client
        .get(&format!("{}/relationships/synonym/{}", BASE, line))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["confidence"], 80);

    let response = client
        .get(&format!("{}/relationships/similar-to/{}", BASE, line))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .delete(&format!("{}/glossaries/{}", BASE, glossary))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["kind"], "ContentPreventedDelete");
}

#[tokio::test]
async fn test_request_errors_are_envelopes() {
    let client = client().await;

    let response = client
        .client
        .post(&format!("{}{}/glossaries", client.base_url, BASE))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["responseCategory"], "Error");
    assert_eq!(body["error"]["parameter"], "body");

    let response = client
        .get("/servers/unknown/open-metadata/access-services/subject-area/users/garygeeke/glossaries")
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["parameter"], "serverName");

    let response = client
        .post(
            &format!("{}/glossaries", BASE),
            json!({"nodeType": "Glossary", "status": "ACTIVE"}),
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["kind"], "InvalidParameter");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("a glossary must have a name"));

    let guid = client
        .create("glossaries", json!({"nodeType": "Glossary", "name": "finance"}))
        .await;
    let instance = format!("{}/glossaries/{}", BASE, guid);
    let synonyms = format!("{}/relationships/synonym/{}", BASE, guid);
    let malformed = vec![
        client.delete(&format!("{}?isPurge=yes", instance)).await.unwrap(),
        client
            .put(
                &format!("{}?isReplace=maybe", instance),
                json!({"nodeType": "Glossary", "name": "finance"}),
            )
            .await
            .unwrap(),
        client.delete(&format!("{}?isPurge=yes", synonyms)).await.unwrap(),
        client
            .put(&format!("{}?isReplace=maybe", synonyms), json!({"lineType": "Synonym"}))
            .await
            .unwrap(),
    ];
    for response in malformed {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["responseCategory"], "Error");
        assert_eq!(body["error"]["kind"], "InvalidParameter");
        assert_eq!(body["error"]["parameter"], "query");
    }

    // the malformed purge left the glossary alone
    let response = client.get(&instance).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unauthorized_user() {
    let config = AppConfig {
        tenants: vec![TenantConfig {
            authorized_users: vec!["erinoverview".to_string()],
            ..TenantConfig::named("cocoMDS1")
        }],
        ..AppConfig::default()
    };
    let client = TestClient::start(config).await;
    let response = client.get(&format!("{}/glossaries", BASE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["kind"], "UserNotAuthorized");
}
