fn main() {
    // Embedded defaults are parsed with `expect` at runtime; reject them here instead.
    require_tables(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
        &["grammar", "report", "recognizer"],
    );
    require_tables(
        "src/phoneme/default_phonemes.toml",
        include_str!("src/phoneme/default_phonemes.toml"),
        &["mappings"],
    );
}

fn require_tables(path: &str, content: &str, tables: &[&str]) {
    println!("cargo:rerun-if-changed={path}");
    let doc: toml::Table = match content.parse() {
        Ok(doc) => doc,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    };
    for name in tables {
        if !doc.get(*name).is_some_and(toml::Value::is_table) {
            panic!("{path} is missing the [{name}] table");
        }
    }
}
