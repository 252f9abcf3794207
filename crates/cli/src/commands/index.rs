//! `docchat index` — Build the vector collection from a folder of PDFs.

use std::path::PathBuf;

use docchat_memory::{CollectionIndexer, VectorCollection};
use tracing::warn;

use super::{CommandResult, connect, load_config};

pub async fn run(folder: Option<PathBuf>) -> CommandResult {
    let config = load_config()?;
    let provider = connect(&config)?;
    let retrieval = &config.retrieval;

    let folder = folder.unwrap_or_else(|| retrieval.documents_dir.clone());
    let path = &retrieval.collection_path;

    let mut collection = VectorCollection::open(path, &retrieval.collection_name, &retrieval.embedding_model)?;
    if collection.embedding_model != retrieval.embedding_model {
        warn!(
            stored = %collection.embedding_model,
            configured = %retrieval.embedding_model,
            "Embedding model changed, rebuilding collection from scratch"
        );
        collection = VectorCollection::new(&retrieval.collection_name, &retrieval.embedding_model);
    }

    println!("📚 Indexing PDFs in {}", folder.display());

    let indexer = CollectionIndexer::new(provider, &retrieval.embedding_model)
        .with_chunk_size(retrieval.chunk_size);
    let report = indexer.index_folder(&folder, &mut collection).await?;
    collection.save(path)?;

    println!(
        "✅ Indexed {} file(s), {} chunk(s). Collection now holds {} chunk(s) from {} document(s).",
        report.files_indexed,
        report.chunks_added,
        collection.len(),
        collection.sources().len()
    );
    for (file, reason) in &report.skipped {
        println!("  ⚠️  Skipped {file}: {reason}");
    }
    println!("   Saved to {}", path.display());

    Ok(())
}
