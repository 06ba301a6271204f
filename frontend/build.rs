use std::time::Duration;
use std::{env, fs, io::Write, path::Path, path::PathBuf};

/// (vendor dir, package, version env var, default version, files under dist/)
const VENDORED: &[(&str, &str, &str, &str, &[&str])] = &[
    (
        "leaflet",
        "leaflet",
        "LEAFLET_VERSION",
        "1.9.4",
        &["leaflet.js", "leaflet.css"],
    ),
    (
        "leaflet.vectorgrid",
        "leaflet.vectorgrid",
        "VECTORGRID_VERSION",
        "1.3.0",
        &["Leaflet.VectorGrid.bundled.min.js"],
    ),
    (
        "maplibre-gl",
        "maplibre-gl",
        "MAPLIBRE_VERSION",
        "4.7.1",
        &["maplibre-gl.js", "maplibre-gl.css"],
    ),
];

fn main() {
    // Re-run if this file changes
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MVTSHOW_OFFLINE");

    if env::var_os("MVTSHOW_OFFLINE").is_some() {
        return;
    }

    // frontend/dist/vendor relative to this crate
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let vendor_dir = manifest_dir.join("dist").join("vendor");

    let client = match reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {e}");
            return;
        }
    };

    for (dir, package, version_var, default_version, files) in VENDORED {
        println!("cargo:rerun-if-env-changed={version_var}");
        let version = env::var(version_var).unwrap_or_else(|_| default_version.to_string());

        let out_dir = vendor_dir.join(dir);
        if let Err(e) = fs::create_dir_all(&out_dir) {
            eprintln!("Failed to create vendor dir {out_dir:?}: {e}");
            continue;
        }

        for file in *files {
            if let Err(e) = download_file(&client, &out_dir, package, &version, file) {
                eprintln!("Failed to download {package}/{file}: {e}");
            }
        }
    }
}

fn download_file(
    client: &reqwest::blocking::Client,
    out_dir: &Path,
    package: &str,
    version: &str,
    file: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_path = out_dir.join(file);

    // If file already exists, don't redownload every build
    if out_path.exists() {
        return Ok(());
    }

    let url = format!("https://unpkg.com/{package}@{version}/dist/{file}");
    println!("Downloading {url} -> {}", out_path.display());

    let resp = client.get(&url).send()?;
    if !resp.status().is_success() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }

    let bytes = resp.bytes()?;
    let mut out = fs::File::create(&out_path)?;
    out.write_all(&bytes)?;
    out.flush()?;

    Ok(())
}
