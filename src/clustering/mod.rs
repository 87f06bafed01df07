// Module declarations
pub mod grouping;
pub mod themes;
#[cfg(test)]
mod tests;
pub mod types;

pub use grouping::{group_articles, group_articles_at};
pub use themes::theme_clusters;
pub use types::{ArticleCluster, ThemeCluster};

/// Log target for clustering events
pub const TARGET_CLUSTERING: &str = "article_clustering";
