use buylist::{
    CartSource, EtlEngine, LocalStorage, ShoppingListPipeline, SourceSpec, TomlConfig,
};
use httpmock::prelude::*;
use tempfile::TempDir;

fn write_cart_json(dir: &TempDir) -> String {
    let cart = serde_json::json!([
        {"name": "Flour", "measurement_unit": "g", "amount": 200},
        {"name": "Egg", "measurement_unit": "pcs", "amount": 2},
        {"name": "Flour", "measurement_unit": "g", "amount": 300}
    ]);
    let path = dir.path().join("cart.json");
    std::fs::write(&path, serde_json::to_vec(&cart).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn file_job(input: &str, output: &str, extra: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[job]
name = "integration"

[source]
type = "file"
path = "{}"

{}
"#,
        input.replace('\\', "/"),
        extra.replace("{output}", &output.replace('\\', "/"))
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

async fn run_job(config: TomlConfig) -> buylist::Result<String> {
    let spec = config.source_spec()?;
    let source = CartSource::from_spec(&spec)?;
    let storage = LocalStorage::new(config.load.output_path.clone());
    let pipeline = ShoppingListPipeline::new(storage, source, config);
    EtlEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_text_and_csv_from_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_cart_json(&temp_dir);
    let output = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = file_job(
        &input,
        &output,
        r#"
[load]
output_path = "{output}"
output_formats = ["text", "csv"]
"#,
    );

    let output_file = run_job(config).await.unwrap();
    assert!(output_file.ends_with("buylist.txt"));

    let text = std::fs::read_to_string(std::path::Path::new(&output).join("buylist.txt")).unwrap();
    assert_eq!(text, "Ingredient list:\n1) Flour - 500, g\n2) Egg - 2, pcs\n");

    let csv = std::fs::read_to_string(std::path::Path::new(&output).join("buylist.csv")).unwrap();
    assert_eq!(csv, "name,unit,amount\nFlour,g,500\nEgg,pcs,2\n");
}

#[tokio::test]
async fn test_end_to_end_archive_with_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_cart_json(&temp_dir);
    let output = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = file_job(
        &input,
        &output,
        r#"
[load]
output_path = "{output}"
output_formats = ["pdf", "json"]

[load.archive]
enabled = true
filename = "buylist.zip"
"#,
    );

    let output_file = run_job(config).await.unwrap();
    assert!(output_file.ends_with("buylist.zip"));

    let zip_data = std::fs::read(std::path::Path::new(&output).join("buylist.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut json = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("buylist.json").unwrap(), &mut json).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(rows[0]["name"], "Flour");
    assert_eq!(rows[0]["amount"], 500);
    assert_eq!(rows[1]["unit"], "pcs");
}

#[tokio::test]
async fn test_end_to_end_two_hundred_ingredients_paginate() {
    let temp_dir = TempDir::new().unwrap();
    let lines: Vec<serde_json::Value> = (1..=200)
        .map(|i| serde_json::json!({"name": format!("Ingredient {}", i), "unit": "g", "amount": i}))
        .collect();
    let input = temp_dir.path().join("big.json");
    std::fs::write(&input, serde_json::to_vec(&lines).unwrap()).unwrap();
    let output = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = file_job(
        input.to_str().unwrap(),
        &output,
        r#"
[render]
lines_per_page = 50

[load]
output_path = "{output}"
output_formats = ["text", "pdf"]
"#,
    );

    run_job(config).await.unwrap();

    let text = std::fs::read_to_string(std::path::Path::new(&output).join("buylist.txt")).unwrap();
    let pages: Vec<&str> = text.split(buylist::core::render::PAGE_BREAK).collect();
    assert_eq!(pages.len(), 4);
    for page in &pages {
        let ingredient_lines = page.lines().filter(|l| !l.starts_with("Ingredient list:")).count();
        assert!(ingredient_lines <= 50);
    }

    let pdf = std::fs::read(std::path::Path::new(&output).join("buylist.pdf")).unwrap();
    let pdf_text = String::from_utf8_lossy(&pdf);
    assert!(pdf_text.contains("/Count 4"));
}

#[tokio::test]
async fn test_end_to_end_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_cart_json(&temp_dir);

    let mut outputs = Vec::new();
    for run in 0..2 {
        let output = temp_dir.path().join(format!("run{}", run)).to_str().unwrap().to_string();
        let config = file_job(
            &input,
            &output,
            r#"
[load]
output_path = "{output}"
output_formats = ["pdf"]
"#,
        );
        run_job(config).await.unwrap();
        outputs.push(std::fs::read(std::path::Path::new(&output).join("buylist.pdf")).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_end_to_end_from_api() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/recipes/cart_ingredients/")
            .header("Authorization", "Token s3cret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"name": "Milk", "measurement_unit": "ml", "amount": 250},
                {"name": "Sugar", "measurement_unit": "g", "amount": 40},
                {"name": "Milk", "measurement_unit": "ml", "amount": 250}
            ]));
    });

    let toml_content = format!(
        r#"
[job]
name = "api"

[source]
type = "api"
endpoint = "{}"
token = "s3cret"

[load]
output_path = "{}"
output_formats = ["text"]
"#,
        server.url("/api/recipes/cart_ingredients/"),
        output.replace('\\', "/")
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    assert!(matches!(config.source_spec().unwrap(), SourceSpec::Api { .. }));

    run_job(config).await.unwrap();

    api_mock.assert();
    let text = std::fs::read_to_string(temp_dir.path().join("buylist.txt")).unwrap();
    assert_eq!(text, "Ingredient list:\n1) Milk - 500, ml\n2) Sugar - 40, g\n");
}

#[tokio::test]
async fn test_end_to_end_api_failure_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/cart");
        then.status(500);
    });

    let toml_content = format!(
        r#"
[job]
name = "api-failure"

[source]
type = "api"
endpoint = "{}"

[load]
output_path = "{}"
output_formats = ["text"]
"#,
        server.url("/cart"),
        output.replace('\\', "/")
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let err = run_job(config).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, buylist::BuylistError::ApiStatusError { status: 500, .. }));
    assert!(!temp_dir.path().join("buylist.txt").exists());
}

#[tokio::test]
async fn test_end_to_end_strict_units_rejects_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("cart.csv");
    std::fs::write(&input, "name,unit,amount\nMilk,ml,200\nMilk,l,1\n").unwrap();
    let output = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = file_job(
        input.to_str().unwrap(),
        &output,
        r#"
[aggregate]
unit_conflict = "reject"

[load]
output_path = "{output}"
output_formats = ["text"]
"#,
    );

    let err = run_job(config).await.unwrap_err();
    assert!(matches!(err, buylist::BuylistError::UnitConflictError { .. }));
}

#[test]
fn test_bundled_demo_config_is_valid() {
    use buylist::utils::validation::Validate;

    let config = TomlConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/buylist.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.source_spec().unwrap(),
        SourceSpec::File {
            path: "demos/cart.json".to_string()
        }
    );
}
