use anyhow::Context;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Crates a package may not pull in as a normal (non-dev) dependency.
const FORBIDDEN: &[(&str, &[&str])] = &[
    (
        "lifesys-domain",
        &[
            "tokio",
            "sqlx",
            "axum",
            "tower",
            "tower-http",
            "reqwest",
            "lifesys-shared",
            "lifesys-engine",
            "lifesys-player",
        ],
    ),
    (
        "lifesys-shared",
        &["tokio", "sqlx", "axum", "reqwest", "lifesys-engine", "lifesys-player"],
    ),
    ("lifesys-player", &["sqlx", "axum", "lifesys-engine", "lifesys-domain"]),
];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `null` for normal dependencies, `"dev"` or `"build"` otherwise
    kind: Option<String>,
}

fn violations(metadata: &Metadata) -> Vec<String> {
    let mut found = Vec::new();
    for package in &metadata.packages {
        let Some((_, forbidden)) = FORBIDDEN.iter().find(|(name, _)| *name == package.name) else {
            continue;
        };
        for dep in &package.dependencies {
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            if forbidden.contains(&dep.name.as_str()) {
                found.push(format!("{} depends on {}", package.name, dep.name));
            }
        }
    }
    found
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;
    let found = violations(&metadata);
    if !found.is_empty() {
        for violation in &found {
            eprintln!("arch-check: {violation}");
        }
        anyhow::bail!("{} layering violation(s)", found.len());
    }

    println!("arch-check: ok ({} packages)", metadata.packages.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(json: &str) -> Metadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn domain_on_tokio_is_a_violation() {
        let found = violations(&metadata(
            r#"{"packages":[{"name":"lifesys-domain","dependencies":[
                {"name":"serde","kind":null},
                {"name":"tokio","kind":null}
            ]}]}"#,
        ));
        assert_eq!(found, vec!["lifesys-domain depends on tokio".to_string()]);
    }

    #[test]
    fn dev_dependencies_are_allowed() {
        let found = violations(&metadata(
            r#"{"packages":[{"name":"lifesys-player","dependencies":[
                {"name":"lifesys-engine","kind":"dev"},
                {"name":"reqwest","kind":null}
            ]}]}"#,
        ));
        assert!(found.is_empty());
    }
}
