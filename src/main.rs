use anyhow::Context;
use bookrec::{
    books_for, books_for_queries, subject_queries, Book, Era, JsonCatalog, RecommendConfig,
    RecommendationResponse, Recommender,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based book recommendations
#[derive(Parser, Debug)]
#[command(name = "bookrec")]
#[command(about = "Rank candidate books against books you already like", long_about = None)]
struct Args {
    /// JSON catalog file with candidate books
    #[arg(short, long)]
    candidates: PathBuf,

    /// JSON catalog file with reference books
    #[arg(short, long, conflicts_with = "reference_ids")]
    reference: Option<PathBuf>,

    /// Catalog keys of candidate books to use as references
    #[arg(long, value_delimiter = ',')]
    reference_ids: Vec<String>,

    /// Only consider candidates matching this query
    #[arg(short, long, default_value = "")]
    query: String,

    /// Content subjects to search, combined with every genre and era
    #[arg(long, value_delimiter = ',', requires_all = ["genre", "era"], conflicts_with = "query")]
    content: Vec<String>,

    /// Genre subjects to search
    #[arg(long, value_delimiter = ',', requires = "content")]
    genre: Vec<String>,

    /// Publication eras to search, as START-END
    #[arg(long, value_delimiter = ',', requires = "content")]
    era: Vec<Era>,

    /// Maximum number of records read from each catalog
    #[arg(long, default_value_t = 500)]
    fetch_limit: usize,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of recommendations
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Number of topics
    #[arg(short = 'k', long)]
    topics: Option<usize>,

    /// Earliest publication year
    #[arg(long)]
    min_year: Option<i32>,

    /// Latest publication year
    #[arg(long)]
    max_year: Option<i32>,

    /// Topic model seed
    #[arg(long)]
    seed: Option<u64>,

    /// Leave the reference books out of the results
    #[arg(long)]
    exclude_references: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn recommend_config(&self) -> anyhow::Result<RecommendConfig> {
        let mut config = match &self.config {
            Some(path) => RecommendConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RecommendConfig::default(),
        };

        config.restrict_to_eras(&self.era);
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(topics) = self.topics {
            config.topics = topics;
        }
        if self.min_year.is_some() {
            config.min_year = self.min_year;
        }
        if self.max_year.is_some() {
            config.max_year = self.max_year;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.exclude_references {
            config.exclude_references = true;
        }

        config.validate()?;
        Ok(config)
    }

    fn candidate_books(&self, catalog: &JsonCatalog) -> anyhow::Result<Vec<Book>> {
        if self.content.is_empty() {
            return Ok(books_for(catalog, &self.query, self.fetch_limit)?);
        }
        let queries = subject_queries(&self.content, &self.genre, &self.era);
        info!(queries = queries.len(), "searching subjects");
        Ok(books_for_queries(catalog, &queries, self.fetch_limit)?)
    }

    fn reference_books(&self, candidates: &[Book]) -> anyhow::Result<Vec<Book>> {
        if let Some(path) = &self.reference {
            let catalog = JsonCatalog::load(path)
                .with_context(|| format!("failed to load references {}", path.display()))?;
            return Ok(books_for(&catalog, "", self.fetch_limit)?);
        }

        if self.reference_ids.is_empty() {
            return Ok(candidates.to_vec());
        }

        let selected: Vec<Book> = candidates
            .iter()
            .filter(|b| b.key().is_some_and(|k| self.reference_ids.iter().any(|id| id == k)))
            .cloned()
            .collect();
        if selected.len() < self.reference_ids.len() {
            warn!(
                requested = self.reference_ids.len(),
                found = selected.len(),
                "some reference ids are not in the candidate catalog"
            );
        }
        Ok(selected)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bookrec v{}", env!("CARGO_PKG_VERSION"));

    let config = args.recommend_config()?;
    let catalog = JsonCatalog::load(&args.candidates)
        .with_context(|| format!("failed to load candidates {}", args.candidates.display()))?;
    let candidates = args.candidate_books(&catalog)?;
    let references = args.reference_books(&candidates)?;
    info!(candidates = candidates.len(), references = references.len(), "catalogs loaded");

    let recommender = Recommender::new(config)?;
    let response = match recommender.recommend(&references, &candidates) {
        Ok(recommendations) => recommendations.into_response(),
        Err(e) if e.is_data_insufficient() => {
            warn!("no results: {}", e);
            RecommendationResponse::empty()
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
