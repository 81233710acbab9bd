use std::fs;

use weather_companion::api::generate_openapi_spec;

fn main() {
    let spec = generate_openapi_spec();
    let json = spec
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI spec");

    fs::write("openapi.json", json).expect("Failed to write openapi.json");
    println!("✅ Generated openapi.json");
}
