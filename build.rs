// build.rs

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Default)]
struct Manifest {
    #[serde(default)]
    group: Vec<Group>,
    #[serde(default)]
    command: Vec<Command>,
}

#[derive(Deserialize)]
struct Group {
    name: String,
    shorthand: Option<String>,
    #[serde(default)]
    command: Vec<Command>,
}

#[derive(Deserialize)]
struct Command {
    name: String,
    shorthand: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    admin_only: bool,
    #[serde(default)]
    usage: String,
}

fn main() {
    // --- 1. Inform Cargo about rerun triggers ---
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=commands.toml");

    // --- 2. Load the command manifest ---
    // A missing manifest is not an error: the crate then ships without built-in commands.
    let manifest: Manifest = match fs::read_to_string("commands.toml") {
        Ok(content) => toml::from_str(&content).expect("Failed to parse commands.toml"),
        Err(_) => {
            println!("cargo:warning=commands.toml not found. No built-in commands will be declared.");
            Manifest::default()
        }
    };

    // --- 3. Generate the static declaration table ---
    // Validation is left to runtime discovery so malformed entries are reported through the logger.
    let mut code = String::from("&[\n");
    for group in &manifest.group {
        for command in &group.command {
            code.push_str(&render(Some(group), command));
        }
    }
    for command in &manifest.command {
        code.push_str(&render(None, command));
    }
    code.push(']');

    // --- 4. Write the generated code to the `OUT_DIR` directory ---
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("declared_commands.rs");
    fs::write(&dest_path, code).expect("Failed to write declared_commands.rs");
}

/// Renders one declaration as a `StaticDeclaration` literal.
/// `{:?}` on strings yields valid, escaped Rust string literals.
fn render(group: Option<&Group>, command: &Command) -> String {
    format!(
        "    StaticDeclaration {{ group: {:?}, group_shorthand: {:?}, name: {:?}, shorthand: {:?}, description: {:?}, admin_only: {}, usage: {:?} }},\n",
        group.map(|g| g.name.as_str()),
        group.and_then(|g| g.shorthand.as_deref()),
        command.name,
        command.shorthand.as_deref(),
        command.description,
        command.admin_only,
        command.usage,
    )
}
