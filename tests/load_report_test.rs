use apiscan::{ApiScanner, HttpMethod, JsonReportGenerator, ReportGenerator, SpecLoadError};
use tempfile::TempDir;

const PETSTORE_YAML: &str = r#"
openapi: 3.0.0
info:
  title: Pet Store
  version: 1.2.3
servers:
  - url: https://petstore.example.com/v2
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            format: int32
      responses:
        "200":
          description: A paged array of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  type: object
                  properties:
                    id:
                      type: integer
                    name:
                      type: string
    post:
      operationId: createPet
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required:
                - name
              properties:
                name:
                  type: string
      responses:
        "201":
          description: Created
  /pets/{petId}:
    get:
      operationId: getPet
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: string
      responses:
        "200":
          description: A single pet
components:
  securitySchemes:
    apiKey:
      type: apiKey
      in: header
"#;

#[tokio::test]
async fn test_load_from_file_and_generate_report() {
    let temp_dir = TempDir::new().unwrap();
    let spec_file = temp_dir.path().join("petstore.yaml");
    std::fs::write(&spec_file, PETSTORE_YAML).unwrap();

    let scanner = ApiScanner::new();
    let spec = scanner.load_file(&spec_file).await.unwrap();

    assert_eq!(spec.title, "Pet Store");
    assert_eq!(spec.version, "1.2.3");
    assert_eq!(spec.base_url, "https://petstore.example.com/v2");
    assert_eq!(spec.endpoint_count(), 3);
    assert_eq!(spec.endpoints["/pets"][0].method, HttpMethod::Get);
    assert_eq!(spec.endpoints["/pets"][1].method, HttpMethod::Post);
    assert_eq!(spec.security_schemes.len(), 1);
    assert_eq!(spec.security_schemes[0].location, "header");

    let report_dir = temp_dir.path().join("reports");
    std::fs::create_dir_all(&report_dir).unwrap();
    let report_file = JsonReportGenerator::new()
        .generate(&spec, &report_dir)
        .unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_file).unwrap()).unwrap();
    assert_eq!(report["apiTitle"], "Pet Store");
    assert_eq!(report["baseUrl"], "https://petstore.example.com/v2");

    let endpoints = report["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 3);
    assert_eq!(endpoints[0]["path"], "/pets");
    assert_eq!(endpoints[0]["method"], "GET");
    assert_eq!(endpoints[0]["operationId"], "listPets");
    assert!(endpoints[0]["inputSchema"].is_null());
    assert_eq!(
        endpoints[1]["inputSchema"]["properties"]["name"]["type"],
        "string"
    );
    assert_eq!(
        endpoints[0]["outputSchemas"][0]["schema"]["items"]["properties"]["id"]["type"],
        "integer"
    );
}

#[tokio::test]
async fn test_load_missing_file_reports_origin() {
    let scanner = ApiScanner::new();
    let err = scanner.load_file("/no/such/spec.yaml").await.unwrap_err();

    assert!(matches!(err, SpecLoadError::Io { .. }));
    assert_eq!(err.origin(), "/no/such/spec.yaml");
}

#[tokio::test]
async fn test_load_unrecognized_document_fails() {
    let temp_dir = TempDir::new().unwrap();
    let spec_file = temp_dir.path().join("random.yaml");
    std::fs::write(&spec_file, "kind: Deployment\nmetadata:\n  name: web\n").unwrap();

    let scanner = ApiScanner::new();
    let err = scanner.load_file(&spec_file).await.unwrap_err();
    assert!(matches!(err, SpecLoadError::UnsupportedDocument { .. }));
}

#[tokio::test]
async fn test_security_failure_yields_no_partial_spec() {
    let temp_dir = TempDir::new().unwrap();
    let spec_file = temp_dir.path().join("bad-security.json");
    std::fs::write(
        &spec_file,
        serde_json::json!({
            "openapi": "3.0.0",
            "info": { "title": "Broken", "version": "1.0.0" },
            "paths": { "/x": { "get": {} } },
            "components": {
                "securitySchemes": { "odd": { "type": "bogus" } }
            }
        })
        .to_string(),
    )
    .unwrap();

    let scanner = ApiScanner::new();
    let err = scanner.load_file(&spec_file).await.unwrap_err();
    assert!(matches!(err, SpecLoadError::UnknownSecurityType { ref value, .. } if value == "bogus"));
}
