//! `docchat onboard` — First-time setup wizard.

use docchat_config::AppConfig;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let defaults = AppConfig::default();

    println!("📄 DocChat — First-Time Setup");
    println!("=============================\n");

    // Create directories
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let documents_dir = &defaults.retrieval.documents_dir;
    if !documents_dir.exists() {
        std::fs::create_dir_all(documents_dir)?;
        println!("✅ Created documents folder: {}", documents_dir.display());
    }

    // Secrets file with an empty key
    let secrets_path = &defaults.secrets.path;
    if !secrets_path.exists() {
        std::fs::write(
            secrets_path,
            concat!(
                "# DocChat secrets. Keep this file private.\n",
                "api_key = \"\"\n",
            ),
        )?;
        println!("✅ Created secrets file: {}", secrets_path.display());
    }

    // Create config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Put your API key in {}", secrets_path.display());
    println!("   2. Copy PDFs into {} and run: docchat index", documents_dir.display());
    println!("   3. Run: docchat chat --rag   (or docchat ask --document <file>)\n");

    Ok(())
}
