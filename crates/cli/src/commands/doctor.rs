//! `docchat doctor` — Diagnose configuration and provider access.

use docchat_agent::counter_from_config;
use docchat_config::AppConfig;
use docchat_documents::list_pdfs;
use docchat_memory::VectorCollection;

use super::CommandResult;

pub async fn run() -> CommandResult {
    println!("🩺 DocChat Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — using defaults (run `docchat onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (model {}, budget {})", config.default_model, config.context.token_budget);
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    // Check tokenizer
    match counter_from_config(&config.context) {
        Ok(counter) => println!("  ✅ Token counter: {}", counter.name()),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // Check documents and collection
    match list_pdfs(&config.retrieval.documents_dir) {
        Ok(pdfs) => println!(
            "  ✅ Documents folder: {} PDF(s) in {}",
            pdfs.len(),
            config.retrieval.documents_dir.display()
        ),
        Err(e) => {
            println!("  ⚠️  {e}");
            issues += 1;
        }
    }

    match VectorCollection::load(&config.retrieval.collection_path) {
        Ok(collection) => println!(
            "  ✅ Collection '{}': {} chunk(s) from {} document(s)",
            collection.name,
            collection.len(),
            collection.sources().len()
        ),
        Err(_) => {
            println!("  ⚠️  No collection yet — run `docchat index` to enable `chat --rag`");
            issues += 1;
        }
    }

    // Check API key, then the provider itself
    match docchat_security::resolve_api_key(&config) {
        Ok(api_key) => {
            println!("  ✅ API key configured");
            let provider = docchat_providers::build_from_config(&config, &api_key)?;
            match provider.health_check().await {
                Ok(true) => {
                    println!("  ✅ Provider '{}' reachable", provider.name());
                    match provider.list_models().await {
                        Ok(models) => {
                            let wanted = [
                                config.default_model.as_str(),
                                config.advanced_model.as_str(),
                                config.retrieval.embedding_model.as_str(),
                            ];
                            for model in wanted {
                                if models.iter().any(|m| m == model) {
                                    println!("  ✅ Model '{model}' available");
                                } else {
                                    println!("  ⚠️  Model '{model}' not listed by the provider");
                                    issues += 1;
                                }
                            }
                        }
                        Err(e) => println!("  ⚠️  Could not list models: {e}"),
                    }
                }
                Ok(false) => {
                    println!("  ⚠️  Provider '{}' responded with an error", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider '{}': {e}", provider.name());
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
