use std::fs;

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");

    let cargo_toml = match fs::read_to_string("Cargo.toml") {
        Ok(contents) => contents,
        Err(e) => panic!("Failed to read Cargo.toml: {}", e),
    };
    let cargo: toml::Value = match cargo_toml.parse() {
        Ok(value) => value,
        Err(e) => panic!("Failed to parse Cargo.toml: {}", e),
    };

    let package = cargo.get("package");
    let field = |key: &str| {
        package
            .and_then(|pkg| pkg.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_owned()
    };

    // Outbound calls to the provider identify themselves with name/version.
    println!(
        "cargo:rustc-env=CHECKOUT_USER_AGENT={}/{}",
        field("name"),
        field("version")
    );
}
